//! Asynchronous row loads.
//!
//! A [`PendingLoad`] owns everything it needs, so the host can await it
//! without holding the controller; the resulting [`LoadOutcome`] goes back
//! through `WorkspaceController::complete`.

use crate::data::{CsvDecoder, ResourceFetcher, ResultSet};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Why a load was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    /// Opening, activating or reloading a session.
    Load,
    /// An explicit query run. At most one per session is in flight.
    Run,
}

/// A fetch-and-decode for one session, not yet started.
pub struct PendingLoad {
    pub session_id: String,
    pub title: String,
    pub kind: LoadKind,
    pub delay: Duration,
    fetcher: Arc<dyn ResourceFetcher>,
    decoder: CsvDecoder,
}

impl fmt::Debug for PendingLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingLoad")
            .field("session_id", &self.session_id)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

impl PendingLoad {
    pub(crate) fn new(
        session_id: String,
        title: String,
        kind: LoadKind,
        delay: Duration,
        fetcher: Arc<dyn ResourceFetcher>,
        decoder: CsvDecoder,
    ) -> Self {
        Self {
            session_id,
            title,
            kind,
            delay,
            fetcher,
            decoder,
        }
    }

    /// Waits out the delay, fetches the resource and decodes it.
    pub async fn execute(self) -> LoadOutcome {
        let started = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match self.fetcher.fetch(&self.title).await {
            Ok(text) => self
                .decoder
                .decode(&text)
                .map(|rows| rows.with_loaded_at(started.elapsed())),
            Err(e) => Err(e),
        };

        debug!(
            "Load for '{}' finished in {:?} ({})",
            self.session_id,
            started.elapsed(),
            if result.is_ok() { "ok" } else { "failed" }
        );

        LoadOutcome {
            session_id: self.session_id,
            kind: self.kind,
            result,
        }
    }
}

/// The result of a finished load, bound to the session that issued it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub session_id: String,
    pub kind: LoadKind,
    pub result: Result<ResultSet>,
}
