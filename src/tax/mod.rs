//! Tax extraction, classification, and aggregation.
//!
//! Per invoice the [`extract`] step yields one tax tuple, [`classify`]
//! assigns a category and rate label, and the [`aggregate`] fold collects the
//! rows into summary buckets. [`export`] wires the three together.
//!
//! # Example
//!
//! ```
//! use vatbook::core::*;
//! use vatbook::tax::*;
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//!
//! let invoices = vec![
//!     PaidInvoice {
//!         number: "INV-1".into(),
//!         customer: "Acme B.V.".into(),
//!         date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
//!         facts: InvoiceTaxFactsBuilder::new(dec!(100), "EUR").customer_country("NL").build(),
//!     },
//!     PaidInvoice {
//!         number: "INV-2".into(),
//!         customer: "Jan de Vries".into(),
//!         date: NaiveDate::from_ymd_opt(2024, 6, 2).unwrap(),
//!         facts: InvoiceTaxFactsBuilder::new(dec!(121), "EUR")
//!             .customer_country("NL")
//!             .total_tax(TaxEntry::new(2100).percentage(dec!(21)))
//!             .build(),
//!     },
//! ];
//!
//! let export = export_invoices(&invoices, &ExportConfig::new("DE"), &mut TracingObserver).unwrap();
//! assert_eq!(export.summary.len(), 2);
//! assert_eq!(export.summary[0].tax_rate, "0% (RC)");
//! assert_eq!(export.summary[1].tax_rate, "21% (OSS)");
//! ```

pub mod aggregate;
pub mod classify;
pub mod events;
pub mod export;
pub mod extract;

pub use aggregate::{CurrencyTotals, Summary};
pub use classify::{
    ClassificationRule, RuleId, RuleInput, TaxClassification, classify, classify_traced,
    format_rate_label, is_reverse_charge_label, rules,
};
pub use events::{EventLog, TaxEvent, TaxObserver, Traced, TracingObserver};
pub use export::{ExportConfig, SummaryOrder, TaxExport, classify_invoice, export_invoices};
pub use extract::{extract_tax, extract_tax_traced};
