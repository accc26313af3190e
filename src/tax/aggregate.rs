//! Fold classified rows into country × rate label × currency buckets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::core::{BucketKey, DetailRow, SummaryBucket};

/// Summary buckets in first-seen order.
///
/// Buckets are never merged across differing rate labels, so one country can
/// appear several times (e.g. `0% (RC)` and `21% (OSS)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    buckets: Vec<SummaryBucket>,
    index: HashMap<BucketKey, usize>,
}

/// Grand totals for one currency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub total_gross: Decimal,
    pub total_net: Decimal,
    pub total_tax: Decimal,
    pub invoice_count: u64,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a DetailRow>) -> Self {
        let mut summary = Self::new();
        for row in rows {
            summary.add(row);
        }
        summary
    }

    /// Add one row, opening its bucket on first sight.
    pub fn add(&mut self, row: &DetailRow) {
        let idx = self.slot(BucketKey::of(row), || SummaryBucket::open(row));
        let bucket = &mut self.buckets[idx];
        bucket.total_gross += row.gross_amount;
        bucket.total_net += row.net_amount;
        bucket.total_tax += row.tax_amount;
        bucket.invoice_count += 1;
    }

    /// Merge a partial summary (e.g. from another shard) into this one.
    ///
    /// Existing buckets keep their position; new keys are appended in
    /// `other`'s order.
    pub fn merge(&mut self, other: Summary) {
        for incoming in other.buckets {
            let idx = self.slot(incoming.key(), || SummaryBucket {
                total_gross: Decimal::ZERO,
                total_net: Decimal::ZERO,
                total_tax: Decimal::ZERO,
                invoice_count: 0,
                ..incoming.clone()
            });
            let bucket = &mut self.buckets[idx];
            bucket.total_gross += incoming.total_gross;
            bucket.total_net += incoming.total_net;
            bucket.total_tax += incoming.total_tax;
            bucket.invoice_count += incoming.invoice_count;
        }
    }

    fn slot(&mut self, key: BucketKey, open: impl FnOnce() -> SummaryBucket) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        self.buckets.push(open());
        let idx = self.buckets.len() - 1;
        self.index.insert(key, idx);
        idx
    }

    /// Buckets in first-seen order.
    pub fn buckets(&self) -> &[SummaryBucket] {
        &self.buckets
    }

    pub fn get(&self, country: &str, tax_rate: &str, currency: &str) -> Option<&SummaryBucket> {
        let key = BucketKey {
            country: country.to_string(),
            tax_rate: tax_rate.to_string(),
            currency: currency.to_string(),
        };
        self.index.get(&key).map(|&idx| &self.buckets[idx])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets sorted by country, rate label, then currency.
    pub fn into_sorted(self) -> Vec<SummaryBucket> {
        let mut buckets = self.buckets;
        buckets.sort_by(|a, b| {
            (&a.country, &a.tax_rate, &a.currency).cmp(&(&b.country, &b.tax_rate, &b.currency))
        });
        buckets
    }

    pub fn into_buckets(self) -> Vec<SummaryBucket> {
        self.buckets
    }

    /// Grand totals per currency, keyed by currency code.
    pub fn totals_by_currency(&self) -> BTreeMap<String, CurrencyTotals> {
        let mut totals: BTreeMap<String, CurrencyTotals> = BTreeMap::new();
        for b in &self.buckets {
            let t = totals.entry(b.currency.clone()).or_default();
            t.total_gross += b.total_gross;
            t.total_net += b.total_net;
            t.total_tax += b.total_tax;
            t.invoice_count += b.invoice_count;
        }
        totals
    }
}
