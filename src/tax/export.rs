//! Run a batch of paid invoices through extraction, classification, and aggregation.

use serde::{Deserialize, Deserializer, Serialize};

use super::aggregate::Summary;
use super::classify::classify_traced;
use super::events::{TaxObserver, Traced};
use super::extract::extract_tax_traced;
use crate::core::{DetailRow, PaidInvoice, SummaryBucket, TaxExportError, is_known_country_code};

/// Order of the summary buckets in a [`TaxExport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryOrder {
    /// First occurrence of each key.
    #[default]
    Insertion,
    /// By country, rate label, currency.
    Sorted,
}

/// Configuration for an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Country the selling company is established in (ISO 3166-1 alpha-2).
    #[serde(deserialize_with = "country_code")]
    pub company_country: String,
    pub summary_order: SummaryOrder,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            company_country: "DE".into(),
            summary_order: SummaryOrder::Insertion,
        }
    }
}

impl ExportConfig {
    pub fn new(company_country: impl Into<String>) -> Self {
        Self {
            company_country: company_country.into().trim().to_uppercase(),
            ..Default::default()
        }
    }

    pub fn summary_order(mut self, order: SummaryOrder) -> Self {
        self.summary_order = order;
        self
    }

    /// Reject a company country that is not a known ISO code.
    pub fn validate(&self) -> Result<(), TaxExportError> {
        if !is_known_country_code(&self.company_country) {
            return Err(TaxExportError::Config(format!(
                "company country '{}' is not an ISO 3166-1 alpha-2 code",
                self.company_country
            )));
        }
        Ok(())
    }
}

fn country_code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let code = String::deserialize(deserializer)?;
    Ok(code.trim().to_uppercase())
}

/// Detail rows (input order) and summary buckets of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxExport {
    pub rows: Vec<DetailRow>,
    pub summary: Vec<SummaryBucket>,
}

/// Extract and classify one invoice into a detail row.
pub fn classify_invoice(invoice: &PaidInvoice, company_country: &str) -> Traced<DetailRow> {
    let facts = &invoice.facts;
    let extraction = extract_tax_traced(facts);
    let ex = &extraction.value;
    let class = classify_traced(company_country, &facts.customer_country, ex.amount, ex);

    let row = DetailRow {
        invoice_number: invoice.number.clone(),
        customer: invoice.customer.clone(),
        country: facts.customer_country.clone(),
        date: invoice.date,
        currency: facts.currency.clone(),
        gross_amount: facts.gross_amount,
        net_amount: facts.gross_amount - ex.amount,
        tax_amount: ex.amount,
        tax_rate: class.value.tax_rate_display,
        tax_info: class.value.tax_info,
        is_reverse_charge: class.value.is_reverse_charge,
    };

    let mut events = extraction.events;
    events.extend(class.events);
    Traced { value: row, events }
}

/// Classify every invoice and fold the rows into summary buckets.
///
/// The configured company country overrides the one on each invoice.
/// Events are forwarded to `observer` tagged with the invoice number.
pub fn export_invoices(
    invoices: &[PaidInvoice],
    config: &ExportConfig,
    observer: &mut dyn TaxObserver,
) -> Result<TaxExport, TaxExportError> {
    config.validate()?;

    let mut rows = Vec::with_capacity(invoices.len());
    let mut summary = Summary::new();
    for invoice in invoices {
        let traced = classify_invoice(invoice, &config.company_country);
        for event in &traced.events {
            observer.observe(&invoice.number, event);
        }
        summary.add(&traced.value);
        rows.push(traced.value);
    }

    tracing::info!(
        invoices = rows.len(),
        buckets = summary.len(),
        company = %config.company_country,
        "tax export complete"
    );

    let summary = match config.summary_order {
        SummaryOrder::Insertion => summary.into_buckets(),
        SummaryOrder::Sorted => summary.into_sorted(),
    };
    Ok(TaxExport { rows, summary })
}
