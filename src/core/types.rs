use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel used when the customer's country cannot be determined.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Provider-supplied code explaining why a tax line was (not) taxed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaxabilityReason {
    /// `standard_rated`
    StandardRated,
    /// `not_subject_to_tax`
    NotSubjectToTax,
    /// `not_collecting`: seller is not registered in the jurisdiction.
    NotCollecting,
    /// Any other provider-specific code, kept verbatim.
    Other(String),
}

impl TaxabilityReason {
    /// Provider code string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::StandardRated => "standard_rated",
            Self::NotSubjectToTax => "not_subject_to_tax",
            Self::NotCollecting => "not_collecting",
            Self::Other(code) => code,
        }
    }

    /// True for the reasons that mean no tax was charged on purpose.
    pub fn is_untaxed(&self) -> bool {
        matches!(self, Self::NotSubjectToTax | Self::NotCollecting)
    }
}

impl From<&str> for TaxabilityReason {
    fn from(code: &str) -> Self {
        match code {
            "standard_rated" => Self::StandardRated,
            "not_subject_to_tax" => Self::NotSubjectToTax,
            "not_collecting" => Self::NotCollecting,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TaxabilityReason {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl From<TaxabilityReason> for String {
    fn from(reason: TaxabilityReason) -> Self {
        match reason {
            TaxabilityReason::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaxabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tax amount record, either per line item or invoice-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxEntry {
    /// Tax amount in minor currency units (cents).
    pub amount_minor: i64,
    /// Tax rate percentage, when the provider resolved one.
    pub percentage: Option<Decimal>,
    /// Tax rate display name (e.g. "VAT", "USt", "Reverse Charge").
    pub display_name: Option<String>,
    /// Why the amount was (not) taxed.
    pub taxability_reason: Option<TaxabilityReason>,
}

/// Tax-relevant facts of one invoice. Read-only input to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTaxFacts {
    /// Total charged, in major currency units.
    pub gross_amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// ISO 3166-1 alpha-2 code or [`UNKNOWN_COUNTRY`].
    pub customer_country: String,
    /// ISO 3166-1 alpha-2 code of the selling company.
    pub company_country: String,
    /// Per-line tax amounts, zero or more.
    pub line_item_taxes: Vec<TaxEntry>,
    /// Invoice-level tax total, used when no line data is usable.
    pub invoice_level_tax_amount_minor: Option<i64>,
    /// Provider's authoritative tax totals; supersede line items when non-zero.
    pub total_tax_amounts: Option<Vec<TaxEntry>>,
}

/// The single tax tuple derived from an invoice's tax fields.
///
/// Invariant: `amount == 0` implies `rate == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxExtraction {
    /// Tax amount in major units (≥ 0 for sane input).
    pub amount: Decimal,
    /// Tax rate percentage; zero when unresolved.
    pub rate: Decimal,
    pub display_name: Option<String>,
    pub taxability_reason: Option<TaxabilityReason>,
}

impl TaxExtraction {
    /// Rate as printed in labels: normalized decimal, e.g. `19`, `7.7`, `0`.
    pub fn rate_string(&self) -> String {
        self.rate.normalize().to_string()
    }
}

/// Jurisdiction-aware tax category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaxInfo {
    /// Domestic or otherwise standard-taxed sale.
    Standard,
    /// EU B2B cross-border sale, buyer self-assesses VAT.
    ReverseCharge,
    /// EU B2C cross-border sale taxed at destination rate (One-Stop-Shop).
    Oss,
    /// EU to non-EU sale, zero-rated.
    Export,
    /// No tax due.
    TaxFree,
}

impl TaxInfo {
    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::ReverseCharge => "Reverse Charge",
            Self::Oss => "OSS",
            Self::Export => "Export",
            Self::TaxFree => "Tax-free",
        }
    }

    /// Parenthetical suffix appended to the rate label.
    pub fn rate_suffix(&self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::ReverseCharge => " (RC)",
            Self::Oss => " (OSS)",
            Self::Export => " (Export)",
            Self::TaxFree => " (Tax-free)",
        }
    }
}

impl fmt::Display for TaxInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A paid invoice as handed over by the provider client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaidInvoice {
    /// Invoice number.
    pub number: String,
    /// Customer display name.
    pub customer: String,
    /// Payment (or issue) date.
    pub date: NaiveDate,
    pub facts: InvoiceTaxFacts,
}

/// One classified invoice, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRow {
    pub invoice_number: String,
    pub customer: String,
    /// Customer country (or [`UNKNOWN_COUNTRY`]).
    pub country: String,
    pub date: NaiveDate,
    pub currency: String,
    pub gross_amount: Decimal,
    /// `gross_amount - tax_amount`.
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    /// Rate label, e.g. `"19%"` or `"0% (RC)"`.
    pub tax_rate: String,
    pub tax_info: TaxInfo,
    pub is_reverse_charge: bool,
}

/// Identity of a summary bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
    pub country: String,
    pub tax_rate: String,
    pub currency: String,
}

impl BucketKey {
    pub fn of(row: &DetailRow) -> Self {
        Self {
            country: row.country.clone(),
            tax_rate: row.tax_rate.clone(),
            currency: row.currency.clone(),
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.country, self.tax_rate, self.currency)
    }
}

/// Aggregated totals for one country × rate label × currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryBucket {
    pub country: String,
    pub tax_rate: String,
    pub currency: String,
    /// Category of the first row that opened the bucket.
    pub tax_info: TaxInfo,
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_tax: Decimal,
    pub invoice_count: u64,
}

impl SummaryBucket {
    /// Empty bucket carrying the descriptive fields of `row`.
    pub fn open(row: &DetailRow) -> Self {
        Self {
            country: row.country.clone(),
            tax_rate: row.tax_rate.clone(),
            currency: row.currency.clone(),
            tax_info: row.tax_info,
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_tax: Decimal::ZERO,
            invoice_count: 0,
        }
    }

    pub fn key(&self) -> BucketKey {
        BucketKey {
            country: self.country.clone(),
            tax_rate: self.tax_rate.clone(),
            currency: self.currency.clone(),
        }
    }
}
