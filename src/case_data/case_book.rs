use ahash::AHashSet;
use tracing::warn;

use crate::case_data::adapters::{FeedEnvelope, FeedSource};
use crate::case_data::normaliser::normalize_country_key;
use crate::engine::aggregator::aggregate;
use crate::engine::sort_view;
use crate::engine::types::{AggregateTotals, CanonicalRecord, SortKey};

// Case book holds the current record set and the totals derived from it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseBook {
    records: Vec<CanonicalRecord>, // feed order, one per country
    totals: AggregateTotals,
    last_updated: Option<String>,
    source: Option<FeedSource>, // feed that produced the current set
}

impl CaseBook {
    pub fn new() -> Self {
        Self::default()
    }

    // Replace the whole book with a fresh snapshot
    pub fn apply_snapshot(&mut self, envelope: FeedEnvelope) {
        let records = dedupe_countries(envelope.records);
        self.totals = aggregate(&records);
        self.records = records;
        self.last_updated = Some(envelope.last_updated);
        self.source = Some(envelope.source);
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn totals(&self) -> AggregateTotals {
        self.totals
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn source(&self) -> Option<FeedSource> {
        self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sorted(&self, key: SortKey) -> Vec<CanonicalRecord> {
        sort_view::sort(&self.records, key)
    }
}

// First occurrence of a country wins. Countries match on their lookup key,
// so "Italy*" and "Italy" are the same country.
fn dedupe_countries(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    let mut seen = AHashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| {
            let key = normalize_country_key(&r.country);
            let fresh = seen.insert(key);
            if !fresh {
                warn!(country = %r.country, "duplicate country in feed, keeping first");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(source: FeedSource, records: Vec<CanonicalRecord>) -> FeedEnvelope {
        FeedEnvelope { source, last_updated: "2020-03-29T00:50:02.918Z".into(), records }
    }

    #[test]
    fn test_new_book_is_empty() {
        let book = CaseBook::new();
        assert!(book.is_empty());
        assert_eq!(book.totals(), AggregateTotals::default());
        assert_eq!(book.last_updated(), None);
        assert_eq!(book.source(), None);
    }

    #[test]
    fn test_snapshot_replaces_not_merges() {
        let mut book = CaseBook::new();
        book.apply_snapshot(envelope(
            FeedSource::Scmp,
            vec![
                CanonicalRecord::new("China", 81_000.0, 3_200.0, 70_000.0),
                CanonicalRecord::new("Italy", 92_000.0, 10_000.0, 12_000.0),
            ],
        ));
        assert_eq!(book.len(), 2);

        book.apply_snapshot(envelope(FeedSource::Bing, vec![CanonicalRecord::new("France", 5_000.0, 0.0, 0.0)]));
        assert_eq!(book.len(), 1);
        assert_eq!(book.source(), Some(FeedSource::Bing));
        assert_eq!(book.totals(), AggregateTotals { cases: 5_000.0, deaths: 0.0, recovered: 0.0 });
    }

    #[test]
    fn test_duplicates_keep_first() {
        let mut book = CaseBook::new();
        book.apply_snapshot(envelope(
            FeedSource::Bing,
            vec![
                CanonicalRecord::new("Spain", 10.0, 1.0, 0.0),
                CanonicalRecord::new("Spain", 99.0, 9.0, 9.0),
                CanonicalRecord::new("Peru", 5.0, 0.0, 0.0),
            ],
        ));
        assert_eq!(book.len(), 2);
        assert_eq!(book.records()[0].cases, 10.0);
        // totals only count what survived
        assert_eq!(book.totals().cases, 15.0);
    }

    #[test]
    fn test_duplicates_match_on_lookup_key() {
        let mut book = CaseBook::new();
        book.apply_snapshot(envelope(
            FeedSource::Scmp,
            vec![
                CanonicalRecord::new("Italy", 92_472.0, 10_023.0, 12_384.0),
                CanonicalRecord::new("Italy* ", 1.0, 1.0, 1.0),
                CanonicalRecord::new("Côte d\u{2019}Ivoire", 165.0, 1.0, 4.0),
                CanonicalRecord::new("Cote d'Ivoire", 7.0, 0.0, 0.0),
            ],
        ));
        let names: Vec<_> = book.records().iter().map(|r| r.country.as_str()).collect();
        // display text of the kept row is untouched
        assert_eq!(names, vec!["Italy", "Côte d\u{2019}Ivoire"]);
        assert_eq!(book.totals(), AggregateTotals { cases: 92_637.0, deaths: 10_024.0, recovered: 12_388.0 });
    }

    #[test]
    fn test_sorted_does_not_reorder_book() {
        let mut book = CaseBook::new();
        book.apply_snapshot(envelope(
            FeedSource::Bing,
            vec![CanonicalRecord::new("B", 1.0, 0.0, 0.0), CanonicalRecord::new("A", 2.0, 0.0, 0.0)],
        ));
        let sorted = book.sorted(SortKey::Country);
        assert_eq!(sorted[0].country, "A");
        assert_eq!(book.records()[0].country, "B");
    }
}
