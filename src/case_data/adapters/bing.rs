// Bing adapter: native integer counts, deaths/recovered optional

use tracing::{debug, instrument};

use super::bing_types::{BingArea, BingCases};
use super::{DecodeError, FeedAdapter, FeedEnvelope, FeedSource};
use crate::engine::types::CanonicalRecord;

pub struct BingAdapter;

impl BingAdapter {
    fn to_record(area: BingArea) -> CanonicalRecord {
        CanonicalRecord {
            country: area.display_name,
            cases: area.total_confirmed as f64,
            deaths: area.total_deaths.unwrap_or(0) as f64,
            recovered: area.total_recovered.unwrap_or(0) as f64,
        }
    }
}

impl FeedAdapter for BingAdapter {
    fn source(&self) -> FeedSource {
        FeedSource::Bing
    }

    #[instrument(level = "debug", skip_all, fields(bytes = raw.len()))]
    fn decode(&self, raw: &[u8]) -> Result<FeedEnvelope, DecodeError> {
        let doc: BingCases =
            serde_json::from_slice(raw).map_err(|e| DecodeError::malformed(FeedSource::Bing, e))?;

        let records: Vec<CanonicalRecord> = doc.areas.into_iter().map(Self::to_record).collect();
        debug!(areas = records.len(), last_updated = %doc.last_updated, "decoded Bing feed");

        Ok(FeedEnvelope { source: FeedSource::Bing, last_updated: doc.last_updated, records })
    }
}
