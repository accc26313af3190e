//! Diagnostic events emitted alongside extraction and classification results.
//!
//! The engine itself never logs. It returns [`Traced`] values and the
//! pipeline forwards their events to a [`TaxObserver`].

use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::TaxabilityReason;

/// Something noteworthy that happened while computing a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TaxEvent {
    /// Non-zero authoritative totals replaced the line-item sum.
    AuthoritativeTotalOverride {
        line_amount: Decimal,
        total_amount: Decimal,
    },
    /// Authoritative totals summed to zero and forced the amount to zero.
    ZeroAuthoritativeTotal {
        reason: Option<TaxabilityReason>,
    },
    /// Neither line items nor totals carried tax; the invoice-level amount was used.
    InvoiceLevelFallback { amount: Decimal },
    /// Rate was back-calculated from amount and net.
    RateDerived {
        amount: Decimal,
        net: Decimal,
        rate: Decimal,
    },
    /// Tax is non-zero but no rate could be resolved (net ≤ 0).
    RateUnresolved { amount: Decimal, gross: Decimal },
    /// Tax was charged on an EU-to-non-EU sale; usually a provider misconfiguration.
    ExportWithTax {
        company_country: String,
        customer_country: String,
        amount: Decimal,
    },
    /// Customer country could not be determined.
    UnknownCustomerCountry,
}

impl TaxEvent {
    /// Events that point at questionable provider data.
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Self::RateUnresolved { .. } | Self::ExportWithTax { .. } | Self::UnknownCustomerCountry
        )
    }
}

/// A computed value together with the events raised while computing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traced<T> {
    pub value: T,
    pub events: Vec<TaxEvent>,
}

impl<T> Traced<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            events: Vec::new(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Traced<U> {
        Traced {
            value: f(self.value),
            events: self.events,
        }
    }
}

/// Receives events from the export pipeline, tagged with the invoice number.
pub trait TaxObserver {
    fn observe(&mut self, invoice_number: &str, event: &TaxEvent);
}

/// Discards every event.
impl TaxObserver for () {
    fn observe(&mut self, _invoice_number: &str, _event: &TaxEvent) {}
}

/// Emits events as structured `tracing` records.
///
/// Anomalies are logged at `warn`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TaxObserver for TracingObserver {
    fn observe(&mut self, invoice_number: &str, event: &TaxEvent) {
        match event {
            TaxEvent::RateUnresolved { amount, gross } => tracing::warn!(
                invoice = invoice_number,
                %amount,
                %gross,
                "non-zero tax without a resolvable rate"
            ),
            TaxEvent::ExportWithTax {
                company_country,
                customer_country,
                amount,
            } => tracing::warn!(
                invoice = invoice_number,
                company = %company_country,
                customer = %customer_country,
                %amount,
                "tax charged on export, check provider tax settings"
            ),
            TaxEvent::UnknownCustomerCountry => {
                tracing::warn!(invoice = invoice_number, "customer country unknown")
            }
            other => tracing::debug!(invoice = invoice_number, event = ?other, "tax event"),
        }
    }
}

/// Collects events in memory.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub entries: Vec<(String, TaxEvent)>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events recorded for one invoice.
    pub fn for_invoice<'a>(&'a self, invoice_number: &'a str) -> impl Iterator<Item = &'a TaxEvent> {
        self.entries
            .iter()
            .filter(move |(n, _)| n == invoice_number)
            .map(|(_, e)| e)
    }

    pub fn anomalies(&self) -> impl Iterator<Item = &(String, TaxEvent)> {
        self.entries.iter().filter(|(_, e)| e.is_anomaly())
    }
}

impl TaxObserver for EventLog {
    fn observe(&mut self, invoice_number: &str, event: &TaxEvent) {
        self.entries.push((invoice_number.to_string(), event.clone()));
    }
}
