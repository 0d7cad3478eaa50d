//! Interactive query sessions.
//!
//! A [`QuerySession`] tracks the text in a search box and moves through
//! `Idle → Querying → Presenting` as keystrokes arrive and results complete.
//!
//! Every keystroke bumps the session's sequence number and hands out a
//! [`QueryTicket`]. A ticket can be run at any time, against the snapshot that
//! was current when it was issued; its [`ResultSet`] is only presented if no
//! newer keystroke (or clear) happened in the meantime. That rule is the whole
//! cancellation story for fast typing: stale results are dropped, never shown.

use crate::error::LookupError;
use crate::record::{Category, SymbolRecord, SymbolView, TargetRef};
use crate::search::{IndexSnapshot, MatchTier, SymbolIndex, match_query, normalize_text, rank_matches};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Where a session is in its query cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Querying,
    Presenting,
}

/// Tunables for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Quiet period after a keystroke before [`QuerySession::poll`] runs it.
    pub debounce: Duration,
    /// Upper bound on presented hits; `None` keeps every match.
    pub max_results: Option<usize>,
}

/// A ranked match, detached from the snapshot it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolHit {
    pub record: SymbolRecord,
    pub tier: MatchTier,
}

/// The outcome of one query cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSet {
    sequence: u64,
    query: String,
    generation: u64,
    hits: Vec<SymbolHit>,
    total_matches: usize,
}

impl ResultSet {
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The raw query text these results answer.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Generation of the snapshot the query ran against.
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn hits(&self) -> &[SymbolHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Number of matches before the `max_results` cap was applied.
    pub const fn total_matches(&self) -> usize {
        self.total_matches
    }

    pub const fn is_truncated(&self) -> bool {
        self.total_matches > self.hits.len()
    }

    /// Hits grouped by category in priority order, skipping empty groups.
    /// Ranking order is preserved inside each group.
    pub fn by_category(&self) -> Vec<(Category, Vec<&SymbolHit>)> {
        Category::BY_PRIORITY
            .into_iter()
            .map(|category| {
                let hits: Vec<&SymbolHit> = self
                    .hits
                    .iter()
                    .filter(|hit| hit.record.category() == category)
                    .collect();
                (category, hits)
            })
            .filter(|(_, hits)| !hits.is_empty())
            .collect()
    }

    /// Serializable form handed to the presentation layer.
    pub fn payload(&self) -> ResultPayload {
        ResultPayload {
            query: self.query.clone(),
            results: self.hits.iter().map(|hit| SymbolView::from(&hit.record)).collect(),
        }
    }
}

/// Output-boundary form of a [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPayload {
    pub query: String,
    pub results: Vec<SymbolView>,
}

/// One issued query, bound to the snapshot current at issue time.
#[derive(Debug, Clone)]
pub struct QueryTicket {
    sequence: u64,
    query: String,
    max_results: Option<usize>,
    snapshot: Arc<IndexSnapshot>,
}

impl QueryTicket {
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Matches and ranks the query. Pure with respect to the session.
    pub fn run(&self) -> ResultSet {
        let candidates = match_query(&self.snapshot, &self.query);
        let mut ranked = rank_matches(candidates, &self.query);
        let total_matches = ranked.len();
        if let Some(limit) = self.max_results {
            ranked.truncate(limit);
        }

        let hits: Vec<SymbolHit> = ranked
            .into_iter()
            .map(|m| SymbolHit {
                record: m.record.clone(),
                tier: m.tier,
            })
            .collect();

        tracing::debug!(
            "Query #{} '{}' matched {} symbols",
            self.sequence,
            self.query,
            hits.len()
        );

        ResultSet {
            sequence: self.sequence,
            query: self.query.clone(),
            generation: self.snapshot.generation(),
            hits,
            total_matches,
        }
    }
}

#[derive(Debug)]
struct Pending {
    ticket: QueryTicket,
    due: Instant,
}

/// Mutable state behind one search box.
#[derive(Debug)]
pub struct QuerySession {
    options: SessionOptions,
    state: SessionState,
    raw_query: String,
    normalized_query: String,
    sequence: u64,
    results: Option<ResultSet>,
    pending: Option<Pending>,
}

impl Default for QuerySession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl QuerySession {
    pub const fn new(options: SessionOptions) -> Self {
        Self {
            options,
            state: SessionState::Idle,
            raw_query: String::new(),
            normalized_query: String::new(),
            sequence: 0,
            results: None,
            pending: None,
        }
    }

    /// Records new search-box text.
    ///
    /// Text that normalizes to nothing clears the session and returns `None`.
    /// Otherwise the session enters `Querying` with a fresh sequence number and
    /// the returned ticket is also kept as the pending query for [`Self::poll`].
    pub fn keystroke(
        &mut self,
        index: &SymbolIndex,
        text: &str,
        now: Instant,
    ) -> Result<Option<QueryTicket>, LookupError> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            self.clear();
            return Ok(None);
        }

        let snapshot = index.snapshot()?;

        self.sequence += 1;
        self.state = SessionState::Querying;
        self.raw_query = text.to_string();
        self.normalized_query = normalized;

        let ticket = QueryTicket {
            sequence: self.sequence,
            query: self.raw_query.clone(),
            max_results: self.options.max_results,
            snapshot,
        };
        self.pending = Some(Pending {
            ticket: ticket.clone(),
            due: now + self.options.debounce,
        });

        Ok(Some(ticket))
    }

    /// Presents `results` if they answer the latest query; drops them otherwise.
    pub fn deliver(&mut self, results: ResultSet) -> Option<&ResultSet> {
        if self.state == SessionState::Idle || results.sequence != self.sequence {
            tracing::trace!(
                "Discarding stale results for '{}' (#{}, current #{})",
                results.query,
                results.sequence,
                self.sequence
            );
            return None;
        }

        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket.sequence == results.sequence)
        {
            self.pending = None;
        }

        self.state = SessionState::Presenting;
        self.results = Some(results);
        self.results.as_ref()
    }

    /// Runs the pending query once its debounce period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<&ResultSet> {
        if !self.pending.as_ref().is_some_and(|p| now >= p.due) {
            return None;
        }
        let pending = self.pending.take()?;
        let results = pending.ticket.run();
        self.deliver(results)
    }

    /// When the pending query becomes due, if there is one.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Keystroke, run and deliver in one step, ignoring the debounce delay.
    pub fn submit(
        &mut self,
        index: &SymbolIndex,
        text: &str,
    ) -> Result<Option<&ResultSet>, LookupError> {
        let Some(ticket) = self.keystroke(index, text, Instant::now())? else {
            return Ok(None);
        };
        self.pending = None;
        let results = ticket.run();
        Ok(self.deliver(results))
    }

    /// Empties the query and returns to `Idle`. Results still in flight go stale.
    pub fn clear(&mut self) {
        self.sequence += 1;
        self.state = SessionState::Idle;
        self.raw_query.clear();
        self.normalized_query.clear();
        self.results = None;
        self.pending = None;
    }

    /// Link target of the presented hit at `position`, returned unopened.
    ///
    /// `Ok(None)` means the hit exists but carries no link.
    pub fn select(&self, position: usize) -> Result<Option<&TargetRef>, LookupError> {
        let hits = self.results().map_or(&[][..], ResultSet::hits);
        hits.get(position)
            .map(|hit| hit.record.target())
            .ok_or(LookupError::NoSuchResult {
                position,
                available: hits.len(),
            })
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn normalized_query(&self) -> &str {
        &self.normalized_query
    }

    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// The results on display; `None` unless the session is presenting.
    pub fn results(&self) -> Option<&ResultSet> {
        match self.state {
            SessionState::Presenting => self.results.as_ref(),
            _ => None,
        }
    }

    pub const fn options(&self) -> SessionOptions {
        self.options
    }
}
