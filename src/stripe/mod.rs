//! Billing-provider intake: Stripe invoice JSON to [`PaidInvoice`] records.
//!
//! Accepts either a bare JSON array of invoice objects or a list envelope
//! (`{"object": "list", "data": [...]}`) as returned by the invoices
//! endpoint. Fetching and pagination happen elsewhere.
//!
//! # Example
//!
//! ```
//! use vatbook::stripe::parse_invoices;
//!
//! let json = r#"[{
//!     "id": "in_1", "number": "A-0001", "status": "paid",
//!     "currency": "eur", "total": 11900, "tax": 1900, "created": 1717200000,
//!     "customer_name": "Kunde AG", "customer_address": {"country": "DE"},
//!     "total_tax_amounts": [{"amount": 1900, "tax_rate": "txr_1", "taxability_reason": "standard_rated"}],
//!     "lines": {"data": []}
//! }]"#;
//! let invoices = parse_invoices(json, "DE").unwrap();
//! assert_eq!(invoices[0].number, "A-0001");
//! assert_eq!(invoices[0].facts.customer_country, "DE");
//! ```

mod model;

use chrono::DateTime;
use rust_decimal::Decimal;

use crate::core::{InvoiceTaxFacts, PaidInvoice, TaxEntry, TaxExportError, normalize_country};
use model::{StripeInvoice, StripeInvoices, StripeTaxAmount};

const UNKNOWN_CUSTOMER: &str = "Unknown";

/// Parse provider invoices, skipping any whose status is present and not `paid`.
///
/// `company_country` is copied into every record's facts.
pub fn parse_invoices(json: &str, company_country: &str) -> Result<Vec<PaidInvoice>, TaxExportError> {
    let parsed: StripeInvoices = serde_json::from_str(json)
        .map_err(|e| TaxExportError::Provider(format!("invalid invoice JSON: {e}")))?;

    parsed
        .into_vec()
        .into_iter()
        .filter(|inv| inv.status.as_deref().is_none_or(|s| s == "paid"))
        .map(|inv| to_paid_invoice(inv, company_country))
        .collect()
}

fn to_paid_invoice(inv: StripeInvoice, company_country: &str) -> Result<PaidInvoice, TaxExportError> {
    let timestamp = inv
        .status_transitions
        .as_ref()
        .and_then(|t| t.paid_at)
        .unwrap_or(inv.created);
    let date = DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| {
            TaxExportError::Provider(format!("invoice {}: invalid timestamp {timestamp}", inv.id))
        })?
        .date_naive();

    let customer_country = normalize_country(
        inv.customer_address
            .as_ref()
            .and_then(|a| a.country.as_deref())
            .or_else(|| {
                inv.customer_shipping
                    .as_ref()
                    .and_then(|s| s.address.as_ref())
                    .and_then(|a| a.country.as_deref())
            }),
    );

    let customer = inv
        .customer_name
        .clone()
        .or_else(|| inv.customer_email.clone())
        .or_else(|| inv.customer.clone())
        .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());

    let line_item_taxes = inv
        .lines
        .data
        .iter()
        .flat_map(|line| line.tax_amounts.iter())
        .map(to_tax_entry)
        .collect();

    let facts = InvoiceTaxFacts {
        gross_amount: Decimal::new(inv.total, 2),
        currency: inv.currency.to_uppercase(),
        customer_country,
        company_country: company_country.to_string(),
        line_item_taxes,
        invoice_level_tax_amount_minor: inv.tax,
        total_tax_amounts: inv
            .total_tax_amounts
            .as_ref()
            .map(|totals| totals.iter().map(to_tax_entry).collect()),
    };

    Ok(PaidInvoice {
        number: inv.number.unwrap_or(inv.id),
        customer,
        date,
        facts,
    })
}

fn to_tax_entry(t: &StripeTaxAmount) -> TaxEntry {
    let (percentage, display_name) = t.tax_rate.details();
    TaxEntry {
        amount_minor: t.amount,
        percentage,
        display_name,
        taxability_reason: t.taxability_reason.as_deref().map(Into::into),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{TaxabilityReason, UNKNOWN_COUNTRY};
    use rust_decimal_macros::dec;

    #[test]
    fn list_envelope_and_expanded_rate() {
        let json = r#"{
            "object": "list",
            "has_more": false,
            "data": [{
                "id": "in_1",
                "number": null,
                "status": "paid",
                "currency": "eur",
                "total": 12100,
                "created": 1717200000,
                "status_transitions": {"paid_at": 1717286400},
                "customer_email": "jan@example.nl",
                "customer_address": {"country": "nl"},
                "lines": {"data": [{
                    "tax_amounts": [{
                        "amount": 2100,
                        "tax_rate": {"id": "txr_nl", "percentage": 21.0, "display_name": "BTW"},
                        "taxability_reason": "standard_rated"
                    }]
                }]}
            }]
        }"#;
        let invoices = parse_invoices(json, "DE").unwrap();
        let inv = &invoices[0];
        assert_eq!(inv.number, "in_1");
        assert_eq!(inv.customer, "jan@example.nl");
        assert_eq!(inv.date.to_string(), "2024-06-02");
        assert_eq!(inv.facts.currency, "EUR");
        assert_eq!(inv.facts.customer_country, "NL");
        assert_eq!(inv.facts.gross_amount, dec!(121));
        assert!(inv.facts.total_tax_amounts.is_none());
        let line = &inv.facts.line_item_taxes[0];
        assert_eq!(line.percentage, Some(dec!(21)));
        assert_eq!(line.display_name.as_deref(), Some("BTW"));
        assert_eq!(line.taxability_reason, Some(TaxabilityReason::StandardRated));
    }

    #[test]
    fn unpaid_invoices_skipped() {
        let json = r#"[
            {"id": "in_a", "status": "open", "currency": "eur", "total": 100, "created": 1717200000},
            {"id": "in_b", "status": "paid", "currency": "eur", "total": 100, "created": 1717200000}
        ]"#;
        let invoices = parse_invoices(json, "DE").unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].number, "in_b");
    }

    #[test]
    fn missing_country_becomes_unknown() {
        let json = r#"[{"id": "in_c", "currency": "usd", "total": 500, "created": 1717200000,
                        "customer": "cus_123"}]"#;
        let inv = &parse_invoices(json, "DE").unwrap()[0];
        assert_eq!(inv.facts.customer_country, UNKNOWN_COUNTRY);
        assert_eq!(inv.customer, "cus_123");
    }

    #[test]
    fn shipping_country_fallback() {
        let json = r#"[{"id": "in_d", "currency": "eur", "total": 500, "created": 1717200000,
                        "customer_address": {"country": null},
                        "customer_shipping": {"address": {"country": "AT"}}}]"#;
        let inv = &parse_invoices(json, "DE").unwrap()[0];
        assert_eq!(inv.facts.customer_country, "AT");
    }

    #[test]
    fn malformed_json_is_provider_error() {
        let err = parse_invoices("{not json", "DE").unwrap_err();
        assert!(matches!(err, TaxExportError::Provider(_)));
    }
}
