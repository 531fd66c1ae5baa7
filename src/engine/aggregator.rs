// Fold a record set into global totals.
// Totals are always rebuilt from the full set, never patched.

use crate::engine::types::{AggregateTotals, CanonicalRecord};

pub fn aggregate(records: &[CanonicalRecord]) -> AggregateTotals {
    records.iter().collect()
}

impl<'a> FromIterator<&'a CanonicalRecord> for AggregateTotals {
    fn from_iter<I: IntoIterator<Item = &'a CanonicalRecord>>(iter: I) -> Self {
        let mut totals = AggregateTotals::default();
        totals.extend(iter);
        totals
    }
}

impl<'a> Extend<&'a CanonicalRecord> for AggregateTotals {
    fn extend<I: IntoIterator<Item = &'a CanonicalRecord>>(&mut self, iter: I) {
        for record in iter {
            self.add(record);
        }
    }
}
