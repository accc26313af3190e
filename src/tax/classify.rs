//! Classify an invoice into a jurisdiction-aware tax category.
//!
//! Classification is a fixed, priority-ordered list of rules; the first rule
//! whose predicate holds decides the category. The table is public through
//! [`rules`] so every rule can be checked on its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::events::{TaxEvent, Traced};
use crate::core::{TaxExtraction, TaxInfo, UNKNOWN_COUNTRY, is_eu_country};

/// Identifies the rule that produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    /// Display name mentions reverse charge.
    ReverseChargeLabel,
    /// Untaxed reason, EU seller, non-EU buyer.
    UntaxedExport,
    /// Untaxed reason, EU seller, buyer in another EU country.
    UntaxedIntraEu,
    /// Untaxed reason, any other geography.
    UntaxedOther,
    UnknownCountryUntaxed,
    UnknownCountryTaxed,
    /// No tax, both EU, different countries.
    ZeroIntraEu,
    /// No tax, EU seller, non-EU buyer.
    ZeroExport,
    /// No tax, neither party in the EU.
    ZeroNonEu,
    ZeroOther,
    /// Tax charged, both EU, different countries.
    TaxedIntraEu,
    /// Tax charged on an EU-to-non-EU sale.
    TaxedExport,
    TaxedDomestic,
    TaxedOther,
    Default,
}

/// Inputs shared by all rule predicates.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub company_country: &'a str,
    pub customer_country: &'a str,
    pub tax_amount: Decimal,
    pub extraction: &'a TaxExtraction,
    pub company_eu: bool,
    pub customer_eu: bool,
}

impl<'a> RuleInput<'a> {
    pub fn new(
        company_country: &'a str,
        customer_country: &'a str,
        tax_amount: Decimal,
        extraction: &'a TaxExtraction,
    ) -> Self {
        Self {
            company_country,
            customer_country,
            tax_amount,
            extraction,
            company_eu: is_eu_country(company_country),
            customer_eu: is_eu_country(customer_country),
        }
    }

    fn intra_eu(&self) -> bool {
        self.company_eu && self.customer_eu && self.customer_country != self.company_country
    }

    fn eu_to_non_eu(&self) -> bool {
        self.company_eu && !self.customer_eu
    }

    fn untaxed_reason(&self) -> bool {
        self.extraction
            .taxability_reason
            .as_ref()
            .is_some_and(|r| r.is_untaxed())
    }

    fn unknown_customer(&self) -> bool {
        self.customer_country == UNKNOWN_COUNTRY
    }

    fn zero_tax(&self) -> bool {
        self.tax_amount.is_zero()
    }

    fn positive_tax(&self) -> bool {
        self.tax_amount > Decimal::ZERO
    }
}

/// One entry of the rule table.
pub struct ClassificationRule {
    pub id: RuleId,
    pub applies: fn(&RuleInput<'_>) -> bool,
    pub outcome: TaxInfo,
}

impl std::fmt::Debug for ClassificationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationRule")
            .field("id", &self.id)
            .field("outcome", &self.outcome)
            .finish()
    }
}

static RULES: &[ClassificationRule] = &[
    ClassificationRule {
        id: RuleId::ReverseChargeLabel,
        applies: |i| {
            i.extraction
                .display_name
                .as_deref()
                .is_some_and(is_reverse_charge_label)
        },
        outcome: TaxInfo::ReverseCharge,
    },
    ClassificationRule {
        id: RuleId::UntaxedExport,
        applies: |i| i.untaxed_reason() && i.eu_to_non_eu(),
        outcome: TaxInfo::Export,
    },
    ClassificationRule {
        id: RuleId::UntaxedIntraEu,
        applies: |i| i.untaxed_reason() && i.intra_eu(),
        outcome: TaxInfo::ReverseCharge,
    },
    ClassificationRule {
        id: RuleId::UntaxedOther,
        applies: |i| i.untaxed_reason(),
        outcome: TaxInfo::TaxFree,
    },
    ClassificationRule {
        id: RuleId::UnknownCountryUntaxed,
        applies: |i| i.unknown_customer() && i.zero_tax(),
        outcome: TaxInfo::TaxFree,
    },
    ClassificationRule {
        id: RuleId::UnknownCountryTaxed,
        applies: |i| i.unknown_customer(),
        outcome: TaxInfo::Standard,
    },
    ClassificationRule {
        id: RuleId::ZeroIntraEu,
        applies: |i| i.zero_tax() && i.intra_eu(),
        outcome: TaxInfo::ReverseCharge,
    },
    ClassificationRule {
        id: RuleId::ZeroExport,
        applies: |i| i.zero_tax() && i.eu_to_non_eu(),
        outcome: TaxInfo::Export,
    },
    ClassificationRule {
        id: RuleId::ZeroNonEu,
        applies: |i| i.zero_tax() && !i.company_eu && !i.customer_eu,
        outcome: TaxInfo::Standard,
    },
    ClassificationRule {
        id: RuleId::ZeroOther,
        applies: |i| i.zero_tax(),
        outcome: TaxInfo::TaxFree,
    },
    ClassificationRule {
        id: RuleId::TaxedIntraEu,
        applies: |i| i.positive_tax() && i.intra_eu(),
        outcome: TaxInfo::Oss,
    },
    ClassificationRule {
        id: RuleId::TaxedExport,
        applies: |i| i.positive_tax() && i.eu_to_non_eu(),
        outcome: TaxInfo::Export,
    },
    ClassificationRule {
        id: RuleId::TaxedDomestic,
        applies: |i| i.positive_tax() && i.customer_country == i.company_country,
        outcome: TaxInfo::Standard,
    },
    ClassificationRule {
        id: RuleId::TaxedOther,
        applies: |i| i.positive_tax(),
        outcome: TaxInfo::Standard,
    },
    ClassificationRule {
        id: RuleId::Default,
        applies: |_| true,
        outcome: TaxInfo::Standard,
    },
];

/// The classification rule table in evaluation order.
pub fn rules() -> &'static [ClassificationRule] {
    RULES
}

/// Category, reverse-charge flag, and rate label for one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxClassification {
    pub tax_info: TaxInfo,
    pub is_reverse_charge: bool,
    /// e.g. `"19%"`, `"0% (RC)"`, `"21% (OSS)"`.
    pub tax_rate_display: String,
    /// Rule that decided the category.
    pub rule: RuleId,
}

/// Classify an invoice from the two countries, the tax amount, and the extraction.
///
/// Total: every input maps to exactly one category.
pub fn classify(
    company_country: &str,
    customer_country: &str,
    tax_amount: Decimal,
    extraction: &TaxExtraction,
) -> TaxClassification {
    classify_traced(company_country, customer_country, tax_amount, extraction).value
}

/// Like [`classify`], also returning the diagnostic events.
pub fn classify_traced(
    company_country: &str,
    customer_country: &str,
    tax_amount: Decimal,
    extraction: &TaxExtraction,
) -> Traced<TaxClassification> {
    let input = RuleInput::new(company_country, customer_country, tax_amount, extraction);
    // The table ends in a catch-all, the fallback is never reached.
    let (rule, tax_info) = RULES
        .iter()
        .find(|r| (r.applies)(&input))
        .map_or((RuleId::Default, TaxInfo::Standard), |r| (r.id, r.outcome));

    let mut traced = Traced::new(TaxClassification {
        tax_info,
        is_reverse_charge: tax_info == TaxInfo::ReverseCharge,
        tax_rate_display: format_rate_label(
            &extraction.rate_string(),
            tax_info,
            tax_info == TaxInfo::ReverseCharge,
        ),
        rule,
    });

    if input.unknown_customer() {
        traced.events.push(TaxEvent::UnknownCustomerCountry);
    }
    if rule == RuleId::TaxedExport {
        traced.events.push(TaxEvent::ExportWithTax {
            company_country: company_country.to_string(),
            customer_country: customer_country.to_string(),
            amount: tax_amount,
        });
    }
    traced
}

/// Case-insensitive check for "reverse charge", "reverse", or "rc".
///
/// Plain substring match: any name containing "rc" qualifies.
pub fn is_reverse_charge_label(name: &str) -> bool {
    let lower = name.to_lowercase();
    ["reverse charge", "reverse", "rc"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Render `"{rate}%"` plus the category suffix.
pub fn format_rate_label(rate: &str, tax_info: TaxInfo, is_reverse_charge: bool) -> String {
    let suffix = if is_reverse_charge {
        TaxInfo::ReverseCharge.rate_suffix()
    } else {
        tax_info.rate_suffix()
    };
    format!("{rate}%{suffix}")
}
