// Pure domain: canonical records, totals and orderings
pub mod types;       // CanonicalRecord, AggregateTotals, SortKey
pub mod aggregator;  // record set -> totals
pub mod sort_view;   // record set -> ordered view

pub use types::*;
