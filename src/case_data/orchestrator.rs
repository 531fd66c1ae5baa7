//! Fetch orchestrator
//!
//! Owns the active source, the sort key and the [`CaseBook`]. A fetch cycle is
//! retrieve -> decode -> aggregate -> publish; the book is swapped under one
//! write lock so readers see either the old set or the new one, never a mix.
//!
//! At most one retrieval runs per orchestrator. A `refresh()` that arrives while
//! a cycle is in flight is coalesced into a single queued cycle that runs as
//! soon as the current one completes.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, info, instrument, warn};

use crate::case_data::adapters::{FeedEnvelope, FeedSource};
use crate::case_data::case_book::CaseBook;
use crate::case_data::transport::{FeedEndpoints, FeedTransport, FetchError};
use crate::engine::types::{AggregateTotals, CanonicalRecord, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Fetching { pending: bool },
}

#[derive(Debug, Clone)]
struct Session {
    source: FeedSource,
    sort_key: SortKey,
    phase: Phase,
    last_error: Option<String>,
    // a queued refresh whose running cycle was dropped before it could run it
    pending_after_cancel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A cycle ran and replaced the book.
    Completed { source: FeedSource, records: usize },
    /// A cycle was already in flight; one more will run after it. If the
    /// running refresh is dropped first, the request is kept as
    /// [`CaseView::refresh_pending`] until the next `refresh()` serves it.
    Queued,
}

/// Everything the presentation side needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseView {
    pub records: Vec<CanonicalRecord>, // ordered by `sort_key`
    pub totals: AggregateTotals,
    pub loading: bool,
    pub last_updated: Option<String>,
    pub active_source: FeedSource,
    pub data_source: Option<FeedSource>, // feed behind `records`
    pub sort_key: SortKey,
    pub last_error: Option<String>,
    pub refresh_pending: bool, // a queued refresh was stranded by cancellation
}

/// Read-only handle to the book for readers on other threads.
#[derive(Clone)]
pub struct CaseBookReader(Arc<RwLock<CaseBook>>);

impl CaseBookReader {
    pub fn read(&self) -> RwLockReadGuard<'_, CaseBook> {
        self.0.read()
    }
}

pub struct FetchOrchestrator<T: FeedTransport> {
    transport: T,
    endpoints: FeedEndpoints,
    book: Arc<RwLock<CaseBook>>,
    session: Mutex<Session>,
}

// Resets the phase if a cycle's future is dropped before it finishes
struct CycleGuard<'a> {
    session: &'a Mutex<Session>,
    armed: bool,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut session = self.session.lock();
            if session.phase == (Phase::Fetching { pending: true }) {
                session.pending_after_cancel = true;
                warn!("refresh dropped mid-cycle, queued refresh left pending");
            }
            session.phase = Phase::Idle;
        }
    }
}

impl<T: FeedTransport> FetchOrchestrator<T> {
    pub fn new(transport: T, endpoints: FeedEndpoints) -> Self {
        Self::with_session(transport, endpoints, FeedSource::default(), SortKey::default())
    }

    pub fn with_session(transport: T, endpoints: FeedEndpoints, source: FeedSource, sort_key: SortKey) -> Self {
        Self {
            transport,
            endpoints,
            book: Arc::new(RwLock::new(CaseBook::new())),
            session: Mutex::new(Session { source, sort_key, phase: Phase::Idle, last_error: None, pending_after_cancel: false }),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // Takes effect on the next refresh; does not fetch.
    pub fn select_source(&self, source: FeedSource) {
        self.session.lock().source = source;
        debug!(source = %source, "source selected");
    }

    pub fn toggle_source(&self) -> FeedSource {
        let mut session = self.session.lock();
        session.source = session.source.toggled();
        session.source
    }

    pub fn active_source(&self) -> FeedSource {
        self.session.lock().source
    }

    pub fn set_sort_key(&self, key: SortKey) {
        self.session.lock().sort_key = key;
    }

    pub fn sort_key(&self) -> SortKey {
        self.session.lock().sort_key
    }

    pub fn is_loading(&self) -> bool {
        self.session.lock().phase != Phase::Idle
    }

    pub fn refresh_pending(&self) -> bool {
        self.session.lock().pending_after_cancel
    }

    pub fn last_error(&self) -> Option<String> {
        self.session.lock().last_error.clone()
    }

    pub fn reader(&self) -> CaseBookReader {
        CaseBookReader(Arc::clone(&self.book))
    }

    pub fn totals(&self) -> AggregateTotals {
        self.book.read().totals()
    }

    pub fn sorted_records(&self) -> Vec<CanonicalRecord> {
        let key = self.sort_key();
        self.book.read().sorted(key)
    }

    pub fn view(&self) -> CaseView {
        let (active_source, sort_key, loading, last_error, refresh_pending) = {
            let s = self.session.lock();
            (s.source, s.sort_key, s.phase != Phase::Idle, s.last_error.clone(), s.pending_after_cancel)
        };
        let book = self.book.read();
        CaseView {
            records: book.sorted(sort_key),
            totals: book.totals(),
            loading,
            last_updated: book.last_updated().map(str::to_string),
            active_source,
            data_source: book.source(),
            sort_key,
            last_error,
            refresh_pending,
        }
    }

    /// Run a fetch cycle for the active source.
    ///
    /// On failure the book is left exactly as it was and the error is returned.
    /// There is no retry.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, FetchError> {
        if !self.begin_cycle() {
            debug!("fetch already in flight, queued one refresh");
            return Ok(RefreshOutcome::Queued);
        }

        let mut guard = CycleGuard { session: &self.session, armed: true };
        loop {
            let result = self.run_cycle().await;
            if !self.finish_cycle() {
                guard.armed = false;
                return result;
            }
            debug!("running queued refresh");
        }
    }

    // Idle -> Fetching, or mark a pending refresh if already fetching
    fn begin_cycle(&self) -> bool {
        let mut session = self.session.lock();
        match session.phase {
            Phase::Idle => {
                session.phase = Phase::Fetching { pending: false };
                // this cycle serves any request stranded by a dropped refresh
                session.pending_after_cancel = false;
                true
            }
            Phase::Fetching { .. } => {
                session.phase = Phase::Fetching { pending: true };
                false
            }
        }
    }

    // true if a queued refresh should run now; otherwise back to Idle
    fn finish_cycle(&self) -> bool {
        let mut session = self.session.lock();
        match session.phase {
            Phase::Fetching { pending: true } => {
                session.phase = Phase::Fetching { pending: false };
                true
            }
            _ => {
                session.phase = Phase::Idle;
                false
            }
        }
    }

    async fn run_cycle(&self) -> Result<RefreshOutcome, FetchError> {
        let source = self.active_source();
        let started = Instant::now();
        let result = self.fetch_envelope(source).await;
        metrics::histogram!("covid_fetch_duration_seconds", "source" => source.as_str())
            .record(started.elapsed().as_secs_f64());

        match result {
            Ok(envelope) => {
                let records = {
                    let mut book = self.book.write();
                    book.apply_snapshot(envelope);
                    book.len()
                };
                self.session.lock().last_error = None;
                metrics::counter!("covid_fetch_cycles_total", "source" => source.as_str(), "outcome" => "ok")
                    .increment(1);
                metrics::gauge!("covid_records").set(records as f64);
                info!(source = %source, records, "fetch cycle complete");
                Ok(RefreshOutcome::Completed { source, records })
            }
            Err(e) => {
                warn!(source = %source, error = %e, transient = e.is_transient(), "fetch cycle failed, keeping previous data");
                self.session.lock().last_error = Some(e.to_string());
                metrics::counter!("covid_fetch_cycles_total", "source" => source.as_str(), "outcome" => "error")
                    .increment(1);
                Err(e)
            }
        }
    }

    async fn fetch_envelope(&self, source: FeedSource) -> Result<FeedEnvelope, FetchError> {
        let url = self.endpoints.url_for(source);
        let raw = self.transport.get(url).await?;
        Ok(source.adapter().decode(&raw)?)
    }
}
