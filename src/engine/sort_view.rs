// Ordered, read-only views over a record set.

use std::cmp::Reverse;

use itertools::Itertools;
use ordered_float::OrderedFloat;

use crate::engine::types::{CanonicalRecord, SortKey};

/// Return a new ordering of `records` for `key`; the input is left untouched.
///
/// Country sorts ascending; the count keys sort descending. The sort is stable,
/// so ties keep the feed's order.
pub fn sort(records: &[CanonicalRecord], key: SortKey) -> Vec<CanonicalRecord> {
    let rows = records.iter().cloned();
    match key {
        SortKey::Country => rows.sorted_by(|a, b| a.country.cmp(&b.country)).collect(),
        SortKey::Cases => rows.sorted_by_key(|r| Reverse(OrderedFloat(r.cases))).collect(),
        SortKey::Deaths => rows.sorted_by_key(|r| Reverse(OrderedFloat(r.deaths))).collect(),
        SortKey::Recovered => rows.sorted_by_key(|r| Reverse(OrderedFloat(r.recovered))).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fixture() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new("Italy", 92_472.0, 10_023.0, 12_384.0),
            CanonicalRecord::new("China", 81_439.0, 3_300.0, 75_448.0),
            CanonicalRecord::new("Spain", 78_797.0, 6_528.0, 14_709.0),
            CanonicalRecord::new("Andorra", 334.0, 6.0, 1.0),
        ]
    }

    #[test]
    fn test_sort_by_country() {
        let sorted = sort(&fixture(), SortKey::Country);
        let names: Vec<_> = sorted.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Andorra", "China", "Italy", "Spain"]);
    }

    #[test]
    fn test_sort_by_counts() {
        let records = fixture();
        let by_cases: Vec<_> = sort(&records, SortKey::Cases).into_iter().map(|r| r.country).collect();
        assert_eq!(by_cases, vec!["Italy", "China", "Spain", "Andorra"]);

        let by_deaths: Vec<_> = sort(&records, SortKey::Deaths).into_iter().map(|r| r.country).collect();
        assert_eq!(by_deaths, vec!["Italy", "Spain", "China", "Andorra"]);

        let by_recovered: Vec<_> = sort(&records, SortKey::Recovered).into_iter().map(|r| r.country).collect();
        assert_eq!(by_recovered, vec!["China", "Spain", "Italy", "Andorra"]);
    }

    #[test]
    fn test_input_untouched() {
        let records = fixture();
        let before = records.clone();
        let _ = sort(&records, SortKey::Cases);
        assert_eq!(records, before);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let records = vec![
            CanonicalRecord::new("Zambia", 0.0, 0.0, 0.0),
            CanonicalRecord::new("Aruba", 0.0, 0.0, 0.0),
            CanonicalRecord::new("Malta", 0.0, 0.0, 0.0),
        ];
        let sorted: Vec<_> = sort(&records, SortKey::Deaths).into_iter().map(|r| r.country).collect();
        assert_eq!(sorted, vec!["Zambia", "Aruba", "Malta"]);
    }

    proptest! {
        #[test]
        fn prop_orderings_are_monotone(
            rows in prop::collection::vec(("[A-Za-z ]{0,10}", 0u32..1_000_000, 0u32..1_000_000, 0u32..1_000_000), 0..48)
        ) {
            let records: Vec<_> = rows
                .into_iter()
                .map(|(c, a, d, r)| CanonicalRecord::new(c, a as f64, d as f64, r as f64))
                .collect();

            let by_country = sort(&records, SortKey::Country);
            prop_assert!(by_country.windows(2).all(|w| w[0].country <= w[1].country));

            let by_cases = sort(&records, SortKey::Cases);
            prop_assert!(by_cases.windows(2).all(|w| w[0].cases >= w[1].cases));

            let by_deaths = sort(&records, SortKey::Deaths);
            prop_assert!(by_deaths.windows(2).all(|w| w[0].deaths >= w[1].deaths));

            let by_recovered = sort(&records, SortKey::Recovered);
            prop_assert!(by_recovered.windows(2).all(|w| w[0].recovered >= w[1].recovered));
            prop_assert_eq!(by_recovered.len(), records.len());
        }
    }
}
