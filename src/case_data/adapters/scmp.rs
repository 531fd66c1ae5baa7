// SCMP adapter: string counts with thousands separators

use tracing::{debug, instrument};

use super::scmp_types::{ScmpCases, ScmpEntry};
use super::{DecodeError, FeedAdapter, FeedEnvelope, FeedSource};
use crate::case_data::normaliser::parse_count_or_zero;
use crate::engine::types::CanonicalRecord;

pub struct ScmpAdapter;

impl ScmpAdapter {
    fn to_record(entry: ScmpEntry) -> CanonicalRecord {
        CanonicalRecord {
            cases: parse_count_or_zero("cases", &entry.cases),
            deaths: parse_count_or_zero("deaths", &entry.deaths),
            recovered: parse_count_or_zero("recovered", &entry.recovered),
            country: entry.country,
        }
    }
}

impl FeedAdapter for ScmpAdapter {
    fn source(&self) -> FeedSource {
        FeedSource::Scmp
    }

    #[instrument(level = "debug", skip_all, fields(bytes = raw.len()))]
    fn decode(&self, raw: &[u8]) -> Result<FeedEnvelope, DecodeError> {
        let doc: ScmpCases =
            serde_json::from_slice(raw).map_err(|e| DecodeError::malformed(FeedSource::Scmp, e))?;

        let records: Vec<CanonicalRecord> = doc.entries.into_iter().map(Self::to_record).collect();
        debug!(entries = records.len(), last_updated = %doc.last_updated, "decoded SCMP feed");

        Ok(FeedEnvelope { source: FeedSource::Scmp, last_updated: doc.last_updated, records })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_entry() {
        let raw = br#"{"last_updated":"2020-03-29T00:50:02.918Z","entries":[{"continent":"Asia","country":"China","cases":"81,000","deaths":"3,200","recovered":"70,000","lastupdated":null}]}"#;
        let env = ScmpAdapter.decode(raw).unwrap();
        assert_eq!(env.source, FeedSource::Scmp);
        assert_eq!(env.last_updated, "2020-03-29T00:50:02.918Z");
        assert_eq!(env.records, vec![CanonicalRecord::new("China", 81_000.0, 3_200.0, 70_000.0)]);
    }

    #[test]
    fn test_unparsable_counts_become_zero() {
        let raw = br#"{"last_updated":"2020-03-29T00:50:02.918Z","entries":[
            {"continent":"Europe","country":"Italy*","cases":"92,472","deaths":"","recovered":"n/a"}
        ]}"#;
        let env = ScmpAdapter.decode(raw).unwrap();
        // country is kept verbatim; the key normaliser runs elsewhere
        assert_eq!(env.records, vec![CanonicalRecord::new("Italy*", 92_472.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_missing_required_field_is_malformed() {
        let raw = br#"{"last_updated":"2020-03-29T00:50:02.918Z","entries":[{"country":"China","cases":"1"}]}"#;
        assert!(matches!(
            ScmpAdapter.decode(raw),
            Err(DecodeError::Malformed { feed: FeedSource::Scmp, .. })
        ));
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        // a Bing document handed to the SCMP adapter
        let raw = br#"{"lastUpdated":"2020-03-29T00:50:02.918Z","areas":[]}"#;
        assert!(ScmpAdapter.decode(raw).is_err());
        assert!(ScmpAdapter.decode(b"<html>rate limited</html>").is_err());
    }

    #[test]
    fn test_empty_entries() {
        let raw = br#"{"last_updated":"2020-03-29T00:50:02.918Z","entries":[]}"#;
        assert!(ScmpAdapter.decode(raw).unwrap().records.is_empty());
    }
}
