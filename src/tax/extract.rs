//! Derive a single authoritative tax tuple from heterogeneous invoice tax fields.

use rust_decimal::Decimal;

use super::events::{TaxEvent, Traced};
use crate::core::{InvoiceTaxFacts, TaxEntry, TaxExtraction};

/// Extract `(amount, rate, display name, taxability reason)` from an invoice.
///
/// Pure and total; see [`extract_tax_traced`] for the precedence rules.
pub fn extract_tax(facts: &InvoiceTaxFacts) -> TaxExtraction {
    extract_tax_traced(facts).value
}

/// Like [`extract_tax`], also returning the diagnostic events.
///
/// # Precedence
///
/// 1. Sum line-item taxes; rate and display name come from the last line
///    entry with a positive amount.
/// 2. If authoritative totals are present, their non-zero sum replaces the
///    line sum. A zero sum forces the amount to zero, and for untaxed reasons
///    (`not_collecting`, `not_subject_to_tax`) also the rate. Any totals
///    entry may supply the display name; only positive ones supply the rate.
/// 3. Non-zero amount without a rate: back-calculate the rate from net.
/// 4. Still zero: fall back to the invoice-level tax amount.
/// 5. Zero amount always means zero rate.
pub fn extract_tax_traced(facts: &InvoiceTaxFacts) -> Traced<TaxExtraction> {
    let mut events = Vec::new();
    let mut ex = TaxExtraction::default();

    ex.amount = minor_to_major(sum_minor(&facts.line_item_taxes));
    absorb_entries(&mut ex, &facts.line_item_taxes, NameSource::PositiveOnly);

    if let Some(totals) = &facts.total_tax_amounts {
        let line_amount = ex.amount;
        let total_amount = minor_to_major(sum_minor(totals));
        absorb_entries(&mut ex, totals, NameSource::Any);

        if total_amount > Decimal::ZERO {
            if total_amount != line_amount {
                events.push(TaxEvent::AuthoritativeTotalOverride {
                    line_amount,
                    total_amount,
                });
            }
            ex.amount = total_amount;
        } else {
            if !line_amount.is_zero() {
                events.push(TaxEvent::ZeroAuthoritativeTotal {
                    reason: ex.taxability_reason.clone(),
                });
            }
            ex.amount = Decimal::ZERO;
            if ex.taxability_reason.as_ref().is_some_and(|r| r.is_untaxed()) {
                ex.rate = Decimal::ZERO;
            }
        }
    }

    if ex.amount > Decimal::ZERO && ex.rate.is_zero() {
        back_calculate_rate(&mut ex, facts.gross_amount, &mut events);
    }

    if ex.amount.is_zero() {
        if let Some(minor) = facts.invoice_level_tax_amount_minor.filter(|m| *m > 0) {
            ex.amount = minor_to_major(minor);
            events.push(TaxEvent::InvoiceLevelFallback { amount: ex.amount });
            if ex.rate.is_zero() {
                back_calculate_rate(&mut ex, facts.gross_amount, &mut events);
            }
        }
    }

    if ex.amount.is_zero() {
        ex.rate = Decimal::ZERO;
    }

    Traced { value: ex, events }
}

fn sum_minor(entries: &[TaxEntry]) -> i64 {
    entries
        .iter()
        .fold(0i64, |acc, e| acc.saturating_add(e.amount_minor))
}

fn minor_to_major(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

/// Which entries may set the display name.
#[derive(Clone, Copy, PartialEq, Eq)]
enum NameSource {
    /// Only entries with a positive amount (line items).
    PositiveOnly,
    /// Any entry carrying a name (authoritative totals). A 0% reverse-charge
    /// rate always has a zero amount, its name must still reach the classifier.
    Any,
}

/// Take labels from entries in order. A zero-amount entry never overwrites
/// a rate, but its taxability reason still counts.
fn absorb_entries(ex: &mut TaxExtraction, entries: &[TaxEntry], names: NameSource) {
    for entry in entries {
        let positive = entry.amount_minor > 0;
        if positive {
            if let Some(pct) = entry.percentage {
                ex.rate = pct;
            }
        }
        if positive || names == NameSource::Any {
            if let Some(name) = &entry.display_name {
                ex.display_name = Some(name.clone());
            }
        }
        if let Some(reason) = &entry.taxability_reason {
            ex.taxability_reason = Some(reason.clone());
        }
    }
}

/// `rate = round(amount / (gross - amount) * 100)`, skipped when net ≤ 0
/// or when the quotient does not fit a `Decimal`.
fn back_calculate_rate(ex: &mut TaxExtraction, gross: Decimal, events: &mut Vec<TaxEvent>) {
    let net = gross
        .checked_sub(ex.amount)
        .filter(|net| *net > Decimal::ZERO);
    let rate = net.and_then(|net| {
        ex.amount
            .checked_div(net)
            .and_then(|q| q.checked_mul(Decimal::ONE_HUNDRED))
            .map(|pct| (net, pct.round()))
    });
    let Some((net, rate)) = rate else {
        events.push(TaxEvent::RateUnresolved {
            amount: ex.amount,
            gross,
        });
        return;
    };
    ex.rate = rate;
    events.push(TaxEvent::RateDerived {
        amount: ex.amount,
        net,
        rate,
    });
}
