//! Incremental pagination and merge engine.
//!
//! [`PageEngine`] accumulates the pages of one filter epoch into a single
//! deduplicated list. It never performs I/O: every request it permits is
//! returned as a [`FetchTicket`] for the caller to execute, and every reply is
//! fed back through [`PageEngine::apply_page`] or [`PageEngine::apply_failure`].
//!
//! # State Machine
//!
//! ```text
//!              reset()                     request_next()
//!   * ─────────────────→ LoadingFirstPage   Idle ─────────────→ LoadingNextPage
//!                           │   │            ↑                       │   │
//!              non-empty    │   │ empty      │ non-empty / failure   │   │ empty
//!                           ↓   ↓            └───────────────────────┘   ↓
//!                         Idle  Exhausted ←──────────────────────────────┘
//! ```
//!
//! # Epochs
//!
//! Each [`reset`](PageEngine::reset) starts a new epoch with a strictly larger
//! counter. Replies tagged with any other epoch are discarded, so a slow reply
//! for a superseded filter can never overwrite the current list.

use crate::catalog::CatalogQuery;
use crate::domain::Movie;
use std::collections::HashSet;

/// Default number of successful loads after which the sentinel stops
/// triggering loads and the manual control takes over.
pub const DEFAULT_AUTO_LOAD_THRESHOLD: u32 = 3;

/// Engine lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Exhausted,
}

/// What asked for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTrigger {
    /// The end-of-list sentinel became visible.
    Sentinel,
    /// The user pressed the manual "load more" control.
    Manual,
}

/// A permitted fetch: execute `query` for `page` and reply with `epoch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub epoch: u64,
    pub page: u32,
    pub query: CatalogQuery,
}

/// Outcome of feeding a reply into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The reply belonged to another epoch or page and was ignored.
    Stale,
    /// The page was merged; `added` new ids were appended.
    Merged { added: usize },
    /// The page was empty; no further pages will be requested this epoch.
    Exhausted,
}

/// Accumulated list plus paging state for the current epoch.
#[derive(Debug, Clone)]
pub struct PageEngine {
    epoch: u64,
    query: CatalogQuery,
    items: Vec<Movie>,
    seen: HashSet<i64>,
    last_loaded: u32,
    in_flight: Option<u32>,
    has_more: bool,
    auto_load_count: u32,
    phase: LoadPhase,
    auto_load_threshold: u32,
}

impl Default for PageEngine {
    fn default() -> Self {
        Self::new(DEFAULT_AUTO_LOAD_THRESHOLD)
    }
}

impl PageEngine {
    /// Creates an idle engine at epoch 0 with no items.
    ///
    /// Nothing is fetched until the first [`reset`](Self::reset).
    #[must_use]
    pub fn new(auto_load_threshold: u32) -> Self {
        Self {
            epoch: 0,
            query: CatalogQuery::Popular,
            items: Vec::new(),
            seen: HashSet::new(),
            last_loaded: 0,
            in_flight: None,
            has_more: true,
            auto_load_count: 0,
            phase: LoadPhase::Idle,
            auto_load_threshold,
        }
    }

    /// Starts a new epoch for `query` and returns the page-1 request.
    ///
    /// Clears accumulated items, restores `has_more`, zeroes the auto-load
    /// count, and invalidates any reply still in flight.
    pub fn reset(&mut self, query: CatalogQuery) -> FetchTicket {
        self.epoch += 1;
        self.query = query;
        self.items.clear();
        self.seen.clear();
        self.last_loaded = 0;
        self.in_flight = Some(1);
        self.has_more = true;
        self.auto_load_count = 0;
        self.phase = LoadPhase::LoadingFirstPage;

        tracing::debug!(epoch = self.epoch, query = self.query.kind(), "epoch reset");
        self.ticket(1)
    }

    /// Abandons the current epoch without requesting anything.
    ///
    /// Any reply in flight becomes stale. The accumulated items are kept for
    /// display until the next [`reset`](Self::reset).
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.in_flight = None;
        if self.phase != LoadPhase::Exhausted {
            self.phase = LoadPhase::Idle;
        }
        tracing::debug!(epoch = self.epoch, "epoch invalidated");
    }

    /// Requests the next page if `trigger` is currently allowed to.
    ///
    /// Returns `None` while a fetch is in flight, once the epoch is exhausted,
    /// when the sentinel fires at or beyond the auto-load threshold, or when the
    /// manual control is used below it.
    pub fn request_next(&mut self, trigger: LoadTrigger) -> Option<FetchTicket> {
        if self.phase != LoadPhase::Idle || !self.has_more {
            tracing::trace!(phase = ?self.phase, has_more = self.has_more, "next page rejected");
            return None;
        }

        let permitted = match trigger {
            LoadTrigger::Sentinel => self.sentinel_armed(),
            LoadTrigger::Manual => self.manual_load_available(),
        };
        if !permitted {
            tracing::trace!(?trigger, auto_load_count = self.auto_load_count, "trigger gated");
            return None;
        }

        let page = self.last_loaded + 1;
        self.in_flight = Some(page);
        self.phase = LoadPhase::LoadingNextPage;

        tracing::debug!(epoch = self.epoch, page, ?trigger, "next page requested");
        Some(self.ticket(page))
    }

    /// Merges a successful reply.
    ///
    /// Page 1 replaces the list; later pages append only ids not yet present,
    /// preserving first-seen order. An empty page exhausts the epoch.
    pub fn apply_page(&mut self, epoch: u64, page: u32, movies: Vec<Movie>) -> MergeOutcome {
        if !self.accepts(epoch, page) {
            tracing::debug!(epoch, page, current_epoch = self.epoch, "discarding stale page");
            return MergeOutcome::Stale;
        }
        self.in_flight = None;

        if movies.is_empty() {
            self.has_more = false;
            self.phase = LoadPhase::Exhausted;
            tracing::debug!(epoch, page, "catalog exhausted");
            return MergeOutcome::Exhausted;
        }

        if page == 1 {
            self.items.clear();
            self.seen.clear();
        }
        let before = self.items.len();
        for movie in movies {
            if self.seen.insert(movie.id) {
                self.items.push(movie);
            }
        }
        let added = self.items.len() - before;

        self.last_loaded = page;
        self.auto_load_count += 1;
        self.phase = LoadPhase::Idle;

        tracing::debug!(
            epoch,
            page,
            added,
            total = self.items.len(),
            auto_load_count = self.auto_load_count,
            "page merged"
        );
        MergeOutcome::Merged { added }
    }

    /// Records a failed fetch.
    ///
    /// Items and `has_more` are left untouched; the engine becomes idle so the
    /// same page can be requested again. Returns `false` for stale replies.
    pub fn apply_failure(&mut self, epoch: u64, page: u32) -> bool {
        if !self.accepts(epoch, page) {
            tracing::debug!(epoch, page, current_epoch = self.epoch, "discarding stale failure");
            return false;
        }
        self.in_flight = None;
        self.phase = LoadPhase::Idle;
        tracing::warn!(epoch, page, "page fetch failed, engine idle");
        true
    }

    fn accepts(&self, epoch: u64, page: u32) -> bool {
        epoch == self.epoch && self.in_flight == Some(page)
    }

    fn ticket(&self, page: u32) -> FetchTicket {
        FetchTicket {
            epoch: self.epoch,
            page,
            query: self.query.clone(),
        }
    }

    /// Whether the sentinel is displayed and may auto-trigger a load.
    #[must_use]
    pub const fn sentinel_armed(&self) -> bool {
        self.has_more && self.auto_load_count < self.auto_load_threshold
    }

    /// Whether the manual "load more" control is displayed.
    #[must_use]
    pub const fn manual_load_available(&self) -> bool {
        self.has_more && self.auto_load_count >= self.auto_load_threshold
    }

    #[must_use]
    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn query(&self) -> &CatalogQuery {
        &self.query
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::LoadingFirstPage | LoadPhase::LoadingNextPage)
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn auto_load_count(&self) -> u32 {
        self.auto_load_count
    }

    /// Highest page merged this epoch, 0 before page 1 arrives.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.last_loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: impl IntoIterator<Item = i64>) -> Vec<Movie> {
        ids.into_iter().map(|id| Movie::new(id, format!("movie {id}"))).collect()
    }

    fn ids(engine: &PageEngine) -> Vec<i64> {
        engine.items().iter().map(|m| m.id).collect()
    }

    fn loaded_engine(pages: u32) -> PageEngine {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Popular);
        engine.apply_page(ticket.epoch, 1, movies([1]));
        for page in 2..=pages {
            let trigger = if engine.sentinel_armed() { LoadTrigger::Sentinel } else { LoadTrigger::Manual };
            let ticket = engine.request_next(trigger).unwrap();
            engine.apply_page(ticket.epoch, page, movies([i64::from(page)]));
        }
        engine
    }

    #[test]
    fn reset_issues_page_one_and_clears_state() {
        let mut engine = loaded_engine(2);
        let ticket = engine.reset(CatalogQuery::DiscoverByYear { year: "1999".into() });

        assert_eq!(ticket.page, 1);
        assert_eq!(ticket.epoch, engine.epoch());
        assert!(engine.items().is_empty());
        assert_eq!(engine.auto_load_count(), 0);
        assert!(engine.has_more());
        assert_eq!(engine.phase(), LoadPhase::LoadingFirstPage);
    }

    #[test]
    fn next_page_appends_only_unseen_ids_in_order() {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Popular);
        engine.apply_page(ticket.epoch, 1, movies([1, 2, 3]));

        let next = engine.request_next(LoadTrigger::Sentinel).unwrap();
        assert_eq!(next.page, 2);
        let outcome = engine.apply_page(next.epoch, 2, movies([3, 4, 1, 5]));

        assert_eq!(outcome, MergeOutcome::Merged { added: 2 });
        assert_eq!(ids(&engine), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn page_one_dedupes_within_itself() {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Popular);
        engine.apply_page(ticket.epoch, 1, movies([1, 2, 1]));
        assert_eq!(ids(&engine), vec![1, 2]);
    }

    #[test]
    fn one_request_in_flight_at_a_time() {
        let mut engine = PageEngine::default();
        engine.reset(CatalogQuery::Popular);
        assert!(engine.request_next(LoadTrigger::Sentinel).is_none());
    }

    #[test]
    fn empty_page_exhausts_until_reset() {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Popular);
        engine.apply_page(ticket.epoch, 1, movies([1]));
        let next = engine.request_next(LoadTrigger::Sentinel).unwrap();

        assert_eq!(engine.apply_page(next.epoch, 2, vec![]), MergeOutcome::Exhausted);
        assert_eq!(ids(&engine), vec![1]);
        assert!(engine.request_next(LoadTrigger::Sentinel).is_none());
        assert!(engine.request_next(LoadTrigger::Manual).is_none());
        assert!(!engine.sentinel_armed());
        assert!(!engine.manual_load_available());

        engine.reset(CatalogQuery::Popular);
        assert!(engine.has_more());
    }

    #[test]
    fn empty_first_page_exhausts() {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Search { query: "zzzz".into(), year: None });
        engine.apply_page(ticket.epoch, 1, vec![]);
        assert_eq!(engine.phase(), LoadPhase::Exhausted);
        assert!(engine.items().is_empty());
    }

    #[test]
    fn sentinel_and_manual_gate_flip_at_threshold() {
        let expectations = [(1, true, false), (2, true, false), (3, false, true), (4, false, true)];
        for (loads, sentinel, manual) in expectations {
            let engine = loaded_engine(loads);
            assert_eq!(engine.auto_load_count(), loads);
            assert_eq!(engine.sentinel_armed(), sentinel, "sentinel at {loads}");
            assert_eq!(engine.manual_load_available(), manual, "manual at {loads}");
        }

        let fresh = PageEngine::default();
        assert_eq!(fresh.auto_load_count(), 0);
        assert!(fresh.sentinel_armed());
        assert!(!fresh.manual_load_available());
    }

    #[test]
    fn gated_triggers_are_rejected() {
        let mut early = loaded_engine(2);
        assert!(early.request_next(LoadTrigger::Manual).is_none());
        assert!(early.request_next(LoadTrigger::Sentinel).is_some());

        let mut late = loaded_engine(3);
        assert!(late.request_next(LoadTrigger::Sentinel).is_none());
        let ticket = late.request_next(LoadTrigger::Manual).unwrap();
        assert_eq!(ticket.page, 4);
    }

    #[test]
    fn stale_epoch_reply_is_discarded() {
        let mut engine = PageEngine::default();
        let a = engine.reset(CatalogQuery::Search { query: "a".into(), year: None });
        let b = engine.reset(CatalogQuery::Search { query: "b".into(), year: None });

        assert!(matches!(engine.apply_page(b.epoch, 1, movies([10, 11])), MergeOutcome::Merged { .. }));
        assert_eq!(engine.apply_page(a.epoch, 1, movies([1, 2])), MergeOutcome::Stale);
        assert_eq!(ids(&engine), vec![10, 11]);
        assert_eq!(engine.query(), &b.query);
    }

    #[test]
    fn failure_keeps_items_and_retries_same_page() {
        let mut engine = loaded_engine(2);
        let ticket = engine.request_next(LoadTrigger::Sentinel).unwrap();
        assert_eq!(ticket.page, 3);

        assert!(engine.apply_failure(ticket.epoch, 3));
        assert_eq!(ids(&engine), vec![1, 2]);
        assert!(engine.has_more());
        assert_eq!(engine.phase(), LoadPhase::Idle);
        assert_eq!(engine.auto_load_count(), 2);

        let retry = engine.request_next(LoadTrigger::Sentinel).unwrap();
        assert_eq!(retry.page, 3);
    }

    #[test]
    fn invalidate_makes_in_flight_reply_stale_but_keeps_items() {
        let mut engine = PageEngine::default();
        let ticket = engine.reset(CatalogQuery::Popular);
        engine.apply_page(ticket.epoch, 1, movies([1]));
        let next = engine.request_next(LoadTrigger::Sentinel).unwrap();

        engine.invalidate();

        assert_eq!(engine.apply_page(next.epoch, 2, movies([2])), MergeOutcome::Stale);
        assert!(!engine.apply_failure(next.epoch, 2));
        assert_eq!(ids(&engine), vec![1]);
        assert!(!engine.is_loading());
    }
}
