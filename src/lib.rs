//! # vatbook
//!
//! Tax classification and aggregation for paid invoices exported from a
//! billing provider. Produces accounting-ready detail rows and a
//! per-jurisdiction VAT summary (Standard, Reverse Charge, OSS, Export, Tax-free).
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use vatbook::core::*;
//! use vatbook::tax::*;
//! use rust_decimal_macros::dec;
//!
//! let facts = InvoiceTaxFactsBuilder::new(dec!(121.00), "eur")
//!     .company_country("DE")
//!     .customer_country("NL")
//!     .line_tax(TaxEntry::new(2100).percentage(dec!(21)).display_name("VAT"))
//!     .build();
//!
//! let extraction = extract_tax(&facts);
//! assert_eq!(extraction.amount, dec!(21));
//!
//! let class = classify(&facts.company_country, &facts.customer_country, extraction.amount, &extraction);
//! assert_eq!(class.tax_info, TaxInfo::Oss);
//! assert_eq!(class.tax_rate_display, "21% (OSS)");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Data model, extraction, classification, aggregation, pipeline |
//! | `report` | Detailed and summary CSV rendering |
//! | `stripe` | Billing-provider invoice JSON intake |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod tax;

#[cfg(feature = "report")]
pub mod report;

#[cfg(feature = "stripe")]
pub mod stripe;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
