//! Pandemic case counts from two interchangeable feeds (SCMP and Bing),
//! normalised into one record shape with global totals and sortable views.

pub mod case_data;
pub mod config;
pub mod engine;
pub mod telemetry;

pub use case_data::adapters::{DecodeError, FeedAdapter, FeedEnvelope, FeedSource};
pub use case_data::orchestrator::{CaseView, FetchOrchestrator, RefreshOutcome};
pub use case_data::transport::{FeedEndpoints, FeedTransport, FetchError, HttpTransport};
pub use engine::types::{AggregateTotals, CanonicalRecord, SortKey};
