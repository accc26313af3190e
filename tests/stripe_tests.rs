#![cfg(feature = "stripe")]

use rust_decimal_macros::dec;
use vatbook::core::*;
use vatbook::stripe::parse_invoices;
use vatbook::tax::*;

const FIXTURE: &str = include_str!("fixtures/stripe_invoices.json");

#[test]
fn fixture_maps_paid_invoices_only() {
    let invoices = parse_invoices(FIXTURE, "DE").unwrap();
    let numbers: Vec<_> = invoices.iter().map(|i| i.number.as_str()).collect();
    assert_eq!(
        numbers,
        ["A1B2C3-0001", "A1B2C3-0002", "A1B2C3-0003", "A1B2C3-0004"]
    );
}

#[test]
fn fixture_field_mapping() {
    let invoices = parse_invoices(FIXTURE, "DE").unwrap();

    let de = &invoices[0];
    assert_eq!(de.customer, "Kunde AG");
    assert_eq!(de.date.to_string(), "2024-05-02");
    assert_eq!(de.facts.gross_amount, dec!(119));
    assert_eq!(de.facts.invoice_level_tax_amount_minor, Some(1900));
    assert_eq!(de.facts.company_country, "DE");
    assert_eq!(de.facts.line_item_taxes[0].percentage, Some(dec!(19)));
    let totals = de.facts.total_tax_amounts.as_ref().unwrap();
    assert_eq!(totals[0].percentage, None);

    let consumer = &invoices[2];
    assert_eq!(consumer.customer, "jan@example.nl");
    assert_eq!(consumer.date.to_string(), "2024-05-04");
    assert_eq!(consumer.facts.customer_country, "NL");

    let us = &invoices[3];
    assert_eq!(us.facts.currency, "USD");
    assert_eq!(us.facts.invoice_level_tax_amount_minor, None);
    assert_eq!(us.facts.total_tax_amounts.as_deref(), Some(&[][..]));
}

#[test]
fn fixture_classification() {
    let invoices = parse_invoices(FIXTURE, "DE").unwrap();
    let mut log = EventLog::new();
    let export = export_invoices(&invoices, &ExportConfig::new("DE"), &mut log).unwrap();

    let labels: Vec<_> = export.rows.iter().map(|r| r.tax_rate.as_str()).collect();
    assert_eq!(labels, ["19%", "0% (RC)", "21% (OSS)", "0% (Export)"]);

    let infos: Vec<_> = export.rows.iter().map(|r| r.tax_info).collect();
    assert_eq!(
        infos,
        [
            TaxInfo::Standard,
            TaxInfo::ReverseCharge,
            TaxInfo::Oss,
            TaxInfo::Export
        ]
    );

    // Consumer invoice only had unexpanded rates: derived from net.
    assert!(log.for_invoice("A1B2C3-0003").any(|e| matches!(
        e,
        TaxEvent::RateDerived { rate, .. } if *rate == dec!(21)
    )));
    assert_eq!(log.anomalies().count(), 0);
}

#[cfg(feature = "report")]
#[test]
fn fixture_end_to_end_summary_csv() {
    use vatbook::report::summary_csv;

    let invoices = parse_invoices(FIXTURE, "DE").unwrap();
    let export = export_invoices(&invoices, &ExportConfig::new("DE"), &mut ()).unwrap();
    let csv = summary_csv(&export.summary).unwrap();
    insta::assert_snapshot!(csv, @r#"
    Country,Tax Rate,Currency,Tax Info,Total Gross,Total Net,Total Tax,Invoice Count
    "DE","19%","EUR","Standard","119.00","100.00","19.00","1"
    "NL","0% (RC)","EUR","Reverse Charge","500.00","500.00","0.00","1"
    "NL","21% (OSS)","EUR","OSS","121.00","100.00","21.00","1"
    "US","0% (Export)","USD","Export","250.00","250.00","0.00","1"
    "#);
}
