// Shared trait + envelope for feed adapters

use std::fmt;
use std::str::FromStr;

use crate::engine::types::CanonicalRecord;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Wrong JSON shape or a required field is missing. Fails the whole cycle.
    #[error("malformed {feed} payload: {detail}")]
    Malformed { feed: FeedSource, detail: String },

    /// A numeric string could not be parsed. Recovered in place as zero.
    #[error("unparsable {field} value {raw:?}")]
    FieldParse { field: &'static str, raw: String },
}

impl DecodeError {
    pub(crate) fn malformed(feed: FeedSource, err: serde_json::Error) -> Self {
        DecodeError::Malformed { feed, detail: err.to_string() }
    }
}

/// The upstream feeds we know how to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Scmp,
    #[default]
    Bing,
}

impl FeedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSource::Scmp => "scmp",
            FeedSource::Bing => "bing",
        }
    }

    // Attribution text shown alongside the data
    pub fn label(&self) -> &'static str {
        match self {
            FeedSource::Scmp => "SCMP",
            FeedSource::Bing => "Microsoft/Bing",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            FeedSource::Scmp => FeedSource::Bing,
            FeedSource::Bing => FeedSource::Scmp,
        }
    }

    pub fn adapter(&self) -> &'static dyn FeedAdapter {
        match self {
            FeedSource::Scmp => &scmp::ScmpAdapter,
            FeedSource::Bing => &bing::BingAdapter,
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown feed source: {0} (expected scmp or bing)")]
pub struct UnknownFeedSource(pub String);

impl FromStr for FeedSource {
    type Err = UnknownFeedSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scmp" | "a" => Ok(FeedSource::Scmp),
            "bing" | "b" => Ok(FeedSource::Bing),
            other => Err(UnknownFeedSource(other.to_string())),
        }
    }
}

// One decoded document, already in canonical shape
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEnvelope {
    pub source: FeedSource,
    pub last_updated: String,
    pub records: Vec<CanonicalRecord>,
}

pub trait FeedAdapter: Send + Sync {
    fn source(&self) -> FeedSource;

    // Whole-document decode; no partial recovery on shape errors.
    fn decode(&self, raw: &[u8]) -> Result<FeedEnvelope, DecodeError>;
}

pub mod scmp;
pub mod scmp_types;
pub mod bing;
pub mod bing_types;
