//! Detailed and summary CSV reports.
//!
//! Produces the two accounting files of an export run:
//! - detailed: one row per invoice
//! - summary: one row per country × rate label × currency bucket
//!
//! The header row is unquoted; every data field is quoted. Money is printed
//! with exactly two decimal places.
//!
//! # Example
//!
//! ```ignore
//! use vatbook::report::*;
//!
//! let report = to_csv_report(&export, &ReportConfig::default())?;
//! std::fs::write("invoices_detailed.csv", report.detailed)?;
//! std::fs::write("tax_summary.csv", report.summary)?;
//! ```

mod csv_export;

use serde::{Deserialize, Serialize};

use crate::core::TaxExportError;
use crate::tax::TaxExport;

pub use csv_export::{DETAILED_HEADER, SUMMARY_HEADER, detailed_csv, summary_csv};

/// Configuration for CSV rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// `chrono` format string for the Date column.
    pub date_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            date_format: "%Y-%m-%d".into(),
        }
    }
}

/// Rendered report files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvReport {
    pub detailed: String,
    pub summary: String,
}

/// Render both CSV files of an export.
pub fn to_csv_report(export: &TaxExport, config: &ReportConfig) -> Result<CsvReport, TaxExportError> {
    Ok(CsvReport {
        detailed: detailed_csv(&export.rows, config)?,
        summary: summary_csv(&export.summary)?,
    })
}
