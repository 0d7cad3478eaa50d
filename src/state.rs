//! Shared server state: the symbol index slot and the interactive session.

use crate::config::LookupConfig;
use crate::error::LookupError;
use crate::javadoc;
use crate::record::TargetRef;
use crate::search::{BuildReport, IndexSnapshot, SymbolIndex};
use crate::session::{QuerySession, ResultSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// The selected hit, as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub qualified_name: String,
    pub target: Option<TargetRef>,
}

/// What a lookup ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The query ran and its results are now presented.
    Presented(ResultSet),
    /// The query was empty; the session is idle.
    Cleared,
    /// A newer lookup or an index reload arrived during the debounce wait.
    Superseded,
}

/// State shared by all tool handlers.
///
/// Lock order is always index, then session.
pub struct LookupState {
    index: RwLock<SymbolIndex>,
    session: Mutex<QuerySession>,
    config: LookupConfig,
}

impl std::fmt::Debug for LookupState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupState")
            .field("config", &self.config)
            .field(
                "index_built",
                &self.index.try_read().ok().map(|index| index.is_built()),
            )
            .finish()
    }
}

impl LookupState {
    pub fn new(config: LookupConfig) -> Self {
        let session = QuerySession::new(config.session_options());
        Self {
            index: RwLock::new(SymbolIndex::new()),
            session: Mutex::new(session),
            config,
        }
    }

    pub const fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Reads the given files/directories and replaces the index with their
    /// entries. The session is cleared since its results refer to the old index.
    pub async fn load(&self, paths: Vec<PathBuf>) -> Result<BuildReport, String> {
        // Parsing is CPU and disk bound, keep it off the async workers
        let entries = tokio::task::spawn_blocking(move || javadoc::load_paths(&paths))
            .await
            .map_err(|e| format!("Index loading task failed: {}", e))?
            .map_err(|e| e.to_string())?;

        let mut index = self.index.write().await;
        let report = index.rebuild(&entries);
        self.session.lock().await.clear();
        Ok(report)
    }

    pub async fn snapshot(&self) -> Result<Arc<IndexSnapshot>, LookupError> {
        self.index.read().await.snapshot()
    }

    /// Feeds `query` to the session as a keystroke and waits out the debounce.
    ///
    /// The session lock is released while waiting, so a later lookup that
    /// lands first supersedes this one and its results are never presented.
    pub async fn lookup(&self, query: &str) -> Result<LookupOutcome, LookupError> {
        let (sequence, deadline) = {
            let index = self.index.read().await;
            let mut session = self.session.lock().await;
            let Some(ticket) = session.keystroke(&index, query, Instant::now())? else {
                return Ok(LookupOutcome::Cleared);
            };
            (ticket.sequence(), session.next_deadline())
        };

        if let Some(deadline) = deadline {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        }

        let mut session = self.session.lock().await;
        if session.sequence() != sequence {
            tracing::trace!(
                "Lookup #{} '{}' superseded by #{}",
                sequence,
                query,
                session.sequence()
            );
            return Ok(LookupOutcome::Superseded);
        }

        let now = deadline.map_or_else(Instant::now, |d| d.max(Instant::now()));
        Ok(session
            .poll(now)
            .cloned()
            .map_or(LookupOutcome::Superseded, LookupOutcome::Presented))
    }

    /// Hands back the target of the presented hit at `position`.
    pub async fn select(&self, position: usize) -> Result<Selection, LookupError> {
        let session = self.session.lock().await;
        let target = session.select(position)?.cloned();
        let qualified_name = session
            .results()
            .and_then(|results| results.hits().get(position))
            .map(|hit| hit.record.qualified_name())
            .unwrap_or_default();
        Ok(Selection {
            qualified_name,
            target,
        })
    }
}
