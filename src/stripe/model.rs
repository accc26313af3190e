//! Subset of the Stripe invoice object needed for tax extraction.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Either a list envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum StripeInvoices {
    List { data: Vec<StripeInvoice> },
    Array(Vec<StripeInvoice>),
}

impl StripeInvoices {
    pub(super) fn into_vec(self) -> Vec<StripeInvoice> {
        match self {
            Self::List { data } => data,
            Self::Array(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeInvoice {
    pub id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    pub currency: String,
    /// Total in minor units.
    pub total: i64,
    /// Invoice-level tax in minor units.
    #[serde(default)]
    pub tax: Option<i64>,
    /// Unix seconds.
    pub created: i64,
    #[serde(default)]
    pub status_transitions: Option<StatusTransitions>,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_address: Option<StripeAddress>,
    #[serde(default)]
    pub customer_shipping: Option<StripeShipping>,
    #[serde(default)]
    pub total_tax_amounts: Option<Vec<StripeTaxAmount>>,
    #[serde(default)]
    pub lines: StripeLines,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusTransitions {
    #[serde(default)]
    pub paid_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeAddress {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeShipping {
    #[serde(default)]
    pub address: Option<StripeAddress>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StripeLines {
    #[serde(default)]
    pub data: Vec<StripeLine>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeLine {
    #[serde(default)]
    pub tax_amounts: Vec<StripeTaxAmount>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StripeTaxAmount {
    pub amount: i64,
    #[serde(default)]
    pub tax_rate: TaxRateRef,
    #[serde(default)]
    pub taxability_reason: Option<String>,
}

/// `tax_rate` is an ID unless the request expanded it.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
pub(super) enum TaxRateRef {
    Expanded(ExpandedTaxRate),
    Id(String),
    #[default]
    Missing,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExpandedTaxRate {
    #[serde(default)]
    pub percentage: Option<Decimal>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl TaxRateRef {
    /// Percentage and display name, when expanded.
    pub(super) fn details(&self) -> (Option<Decimal>, Option<String>) {
        match self {
            Self::Expanded(rate) => (rate.percentage, rate.display_name.clone()),
            Self::Id(_) | Self::Missing => (None, None),
        }
    }
}
