//! CSV serialization of detail rows and summary buckets.

use rust_decimal::Decimal;
use std::fmt::Write;

use super::ReportConfig;
use crate::core::{DetailRow, SummaryBucket, TaxExportError};

/// Header line of the detailed report.
pub const DETAILED_HEADER: &str = "Invoice Number,Customer,Country,Date,Currency,Gross Amount,Net Amount,Tax Amount,Tax Rate,Tax Info";

/// Header line of the summary report.
pub const SUMMARY_HEADER: &str =
    "Country,Tax Rate,Currency,Tax Info,Total Gross,Total Net,Total Tax,Invoice Count";

/// Render detail rows, one line per invoice, in the given order.
pub fn detailed_csv(rows: &[DetailRow], config: &ReportConfig) -> Result<String, TaxExportError> {
    let mut wtr = quoted_writer(DETAILED_HEADER);
    for row in rows {
        let mut date = String::new();
        write!(date, "{}", row.date.format(&config.date_format)).map_err(|_| {
            TaxExportError::Report(format!("invalid date format '{}'", config.date_format))
        })?;
        wtr.write_record([
            row.invoice_number.as_str(),
            row.customer.as_str(),
            row.country.as_str(),
            date.as_str(),
            row.currency.as_str(),
            money(row.gross_amount).as_str(),
            money(row.net_amount).as_str(),
            money(row.tax_amount).as_str(),
            row.tax_rate.as_str(),
            row.tax_info.label(),
        ])
        .map_err(csv_error)?;
    }
    finish(wtr)
}

/// Render summary buckets, one line per bucket, in the given order.
pub fn summary_csv(buckets: &[SummaryBucket]) -> Result<String, TaxExportError> {
    let mut wtr = quoted_writer(SUMMARY_HEADER);
    for b in buckets {
        wtr.write_record([
            b.country.as_str(),
            b.tax_rate.as_str(),
            b.currency.as_str(),
            b.tax_info.label(),
            money(b.total_gross).as_str(),
            money(b.total_net).as_str(),
            money(b.total_tax).as_str(),
            b.invoice_count.to_string().as_str(),
        ])
        .map_err(csv_error)?;
    }
    finish(wtr)
}

/// A writer over a buffer that already holds the unquoted header line.
fn quoted_writer(header: &str) -> csv::Writer<Vec<u8>> {
    let mut buf = Vec::with_capacity(header.len() + 1);
    buf.extend_from_slice(header.as_bytes());
    buf.push(b'\n');
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(buf)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, TaxExportError> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| TaxExportError::Report(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| TaxExportError::Report(e.to_string()))
}

fn csv_error(e: csv::Error) -> TaxExportError {
    TaxExportError::Report(e.to_string())
}

fn money(d: Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}
