use rust_decimal::Decimal;

use super::types::*;

impl TaxEntry {
    /// A tax entry with the given amount in minor units and nothing else resolved.
    pub fn new(amount_minor: i64) -> Self {
        Self {
            amount_minor,
            percentage: None,
            display_name: None,
            taxability_reason: None,
        }
    }

    pub fn percentage(mut self, percentage: Decimal) -> Self {
        self.percentage = Some(percentage);
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn reason(mut self, reason: impl Into<TaxabilityReason>) -> Self {
        self.taxability_reason = Some(reason.into());
        self
    }
}

/// Builder for [`InvoiceTaxFacts`].
///
/// The engine does not validate its input, so building never fails.
///
/// ```
/// use vatbook::core::*;
/// use rust_decimal_macros::dec;
///
/// let facts = InvoiceTaxFactsBuilder::new(dec!(119), "eur")
///     .company_country("DE")
///     .customer_country("DE")
///     .total_tax(TaxEntry::new(1900).percentage(dec!(19)).reason("standard_rated"))
///     .build();
/// assert_eq!(facts.currency, "EUR");
/// assert_eq!(facts.total_tax_amounts.as_ref().map(Vec::len), Some(1));
/// ```
pub struct InvoiceTaxFactsBuilder {
    facts: InvoiceTaxFacts,
}

impl InvoiceTaxFactsBuilder {
    pub fn new(gross_amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            facts: InvoiceTaxFacts {
                gross_amount,
                currency: currency.into().to_uppercase(),
                customer_country: UNKNOWN_COUNTRY.to_string(),
                company_country: "DE".to_string(),
                line_item_taxes: Vec::new(),
                invoice_level_tax_amount_minor: None,
                total_tax_amounts: None,
            },
        }
    }

    pub fn customer_country(mut self, code: impl Into<String>) -> Self {
        self.facts.customer_country = code.into();
        self
    }

    pub fn company_country(mut self, code: impl Into<String>) -> Self {
        self.facts.company_country = code.into();
        self
    }

    /// Append a line-item tax entry.
    pub fn line_tax(mut self, entry: TaxEntry) -> Self {
        self.facts.line_item_taxes.push(entry);
        self
    }

    /// Set the invoice-level tax total in minor units.
    pub fn invoice_tax(mut self, amount_minor: i64) -> Self {
        self.facts.invoice_level_tax_amount_minor = Some(amount_minor);
        self
    }

    /// Append an authoritative total entry (makes `total_tax_amounts` present).
    pub fn total_tax(mut self, entry: TaxEntry) -> Self {
        self.facts
            .total_tax_amounts
            .get_or_insert_with(Vec::new)
            .push(entry);
        self
    }

    /// Mark authoritative totals as present but empty.
    pub fn no_total_tax(mut self) -> Self {
        self.facts.total_tax_amounts = Some(Vec::new());
        self
    }

    pub fn build(self) -> InvoiceTaxFacts {
        self.facts
    }
}
