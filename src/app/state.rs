//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the orchestrator that owns the filter
//! state, the active view, the pagination engine, the favorites collection, and
//! the detail view. It is the single source of truth for everything rendered.
//!
//! # Epoch Rules
//!
//! - A change of the committed filter key starts a new epoch and requests
//!   page 1, but only while the Discover view is shown.
//! - A filter change made in the Favorites view invalidates the running epoch
//!   and defers the page-1 request until Discover is shown again.
//! - Switching views without a filter change never refetches.
//!
//! # Example
//!
//! ```rust
//! use cinematch::app::{AppSettings, AppState};
//! use cinematch::storage::{FavoritesStore, MemoryStore};
//!
//! let favorites = FavoritesStore::load(Box::new(MemoryStore::default()));
//! let mut state = AppState::new(favorites, &AppSettings::default());
//! let actions = state.start();
//! assert_eq!(actions.len(), 1);
//! ```

use super::debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
use super::detail::DetailView;
use super::filter::{FilterKey, FilterState};
use super::modes::View;
use super::pagination::{FetchTicket, LoadTrigger, PageEngine, DEFAULT_AUTO_LOAD_THRESHOLD};
use crate::app::Action;
use crate::domain::Movie;
use crate::storage::FavoritesStore;
use crate::ui::viewmodel::{self, FooterControl, UIViewModel};
use crate::worker::WorkerMessage;
use std::time::Duration;

/// Tunables for the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    /// Successful loads after which the sentinel stops auto-loading.
    pub auto_load_threshold: u32,
    /// Quiet period before typed search text is committed.
    pub search_debounce: Duration,
    /// Image CDN prefix used for poster and profile URLs.
    pub image_base_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_load_threshold: DEFAULT_AUTO_LOAD_THRESHOLD,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
            image_base_url: crate::domain::movie::DEFAULT_IMAGE_BASE_URL.to_string(),
        }
    }
}

/// Central application state container.
///
/// Mutated only by [`handle_event`](crate::app::handle_event); every network
/// request it needs is returned as an [`Action`].
#[derive(Debug)]
pub struct AppState {
    filter: FilterState,
    view: View,
    engine: PageEngine,
    favorites: FavoritesStore,
    detail: DetailView,
    debouncer: Debouncer,
    /// Filter key of the current (or deferred) epoch.
    applied_key: FilterKey,
    /// A filter change happened in Favorites view and page 1 is still owed.
    pending_reset: bool,
    image_base_url: String,
}

impl AppState {
    /// Creates the state with default filters in the Discover view.
    ///
    /// Nothing is fetched until [`start`](Self::start) is called.
    #[must_use]
    pub fn new(favorites: FavoritesStore, settings: &AppSettings) -> Self {
        let filter = FilterState::default();
        Self {
            applied_key: filter.key(),
            filter,
            view: View::Discover,
            engine: PageEngine::new(settings.auto_load_threshold),
            favorites,
            detail: DetailView::default(),
            debouncer: Debouncer::new(settings.search_debounce),
            pending_reset: false,
            image_base_url: settings.image_base_url.clone(),
        }
    }

    /// Starts the first epoch and returns the page-1 request.
    pub fn start(&mut self) -> Vec<Action> {
        self.restart_epoch()
    }

    /// Unconditionally restarts the current epoch if Discover is shown.
    pub fn restart_epoch(&mut self) -> Vec<Action> {
        self.applied_key = self.filter.key();
        if self.view == View::Favorites {
            self.engine.invalidate();
            self.pending_reset = true;
            return vec![];
        }
        self.pending_reset = false;
        let ticket = self.engine.reset(self.filter.query());
        vec![fetch_action(ticket)]
    }

    /// Starts a new epoch if the committed filter key changed.
    pub(crate) fn sync_epoch(&mut self) -> Vec<Action> {
        if self.filter.key() == self.applied_key {
            return vec![];
        }
        tracing::debug!(
            search_term = %self.filter.search_term(),
            year = ?self.filter.year(),
            mood = ?self.filter.mood(),
            view = %self.view,
            "filter changed"
        );
        self.restart_epoch()
    }

    /// Shows `view`, issuing a deferred page-1 request when returning to
    /// Discover after a filter change.
    pub(crate) fn switch_view(&mut self, view: View) -> Vec<Action> {
        if self.view == view {
            return vec![];
        }
        tracing::debug!(from = %self.view, to = %view, "view switched");
        self.view = view;

        if view == View::Discover && self.pending_reset {
            return self.restart_epoch();
        }
        vec![]
    }

    /// Requests the next page for `trigger` if permitted.
    pub(crate) fn request_next(&mut self, trigger: LoadTrigger) -> Vec<Action> {
        if self.view != View::Discover {
            tracing::trace!(?trigger, "pagination suspended outside discover");
            return vec![];
        }
        self.engine.request_next(trigger).map(fetch_action).into_iter().collect()
    }

    /// Selects `movie` for the detail view and requests its sub-resources.
    pub(crate) fn open_movie(&mut self, movie: Movie) -> Vec<Action> {
        let movie_id = movie.id;
        let token = self.detail.open(movie);
        vec![Action::PostToWorker(WorkerMessage::fetch_details(token, movie_id))]
    }

    /// Finds a movie by id among everything currently known to the UI.
    ///
    /// Looks at the detail selection, its similar titles, the discover list,
    /// and the favorites, in that order.
    #[must_use]
    pub fn find_movie(&self, movie_id: i64) -> Option<&Movie> {
        let selected = self.detail.selected().into_iter();
        let similar = self.detail.details().into_iter().flat_map(|d| d.similar.iter());
        selected
            .chain(similar)
            .chain(self.engine.items())
            .chain(self.favorites.list())
            .find(|m| m.id == movie_id)
    }

    /// The list rendered for the current view.
    #[must_use]
    pub fn displayed_movies(&self) -> &[Movie] {
        match self.view {
            View::Discover => self.engine.items(),
            View::Favorites => self.favorites.list(),
        }
    }

    /// Picks a movie from the displayed list using `roll`.
    #[must_use]
    pub fn shuffle_pick(&self, roll: u64) -> Option<Movie> {
        let movies = self.displayed_movies();
        if movies.is_empty() {
            return None;
        }
        let len = u64::try_from(movies.len()).ok()?;
        let index = usize::try_from(roll % len).ok()?;
        movies.get(index).cloned()
    }

    /// Computes the renderable view model for the local time `now`.
    #[must_use]
    pub fn compute_viewmodel(&self, now: chrono::NaiveDateTime) -> UIViewModel {
        viewmodel::compute(self, now)
    }

    pub(crate) fn footer_control(&self) -> FooterControl {
        if self.view != View::Discover {
            return FooterControl::None;
        }
        if self.engine.sentinel_armed() {
            FooterControl::Sentinel { loading: self.engine.is_loading() && self.engine.page() > 0 }
        } else if self.engine.manual_load_available() {
            FooterControl::LoadMore { loading: self.engine.is_loading() }
        } else {
            FooterControl::None
        }
    }

    pub(crate) fn filter_mut(&mut self) -> &mut FilterState {
        &mut self.filter
    }

    pub(crate) fn engine_mut(&mut self) -> &mut PageEngine {
        &mut self.engine
    }

    pub(crate) fn favorites_mut(&mut self) -> &mut FavoritesStore {
        &mut self.favorites
    }

    pub(crate) fn detail_mut(&mut self) -> &mut DetailView {
        &mut self.detail
    }

    pub(crate) fn debouncer_mut(&mut self) -> &mut Debouncer {
        &mut self.debouncer
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub const fn engine(&self) -> &PageEngine {
        &self.engine
    }

    #[must_use]
    pub const fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    #[must_use]
    pub const fn detail(&self) -> &DetailView {
        &self.detail
    }

    #[must_use]
    pub const fn pending_reset(&self) -> bool {
        self.pending_reset
    }

    #[must_use]
    pub fn image_base_url(&self) -> &str {
        &self.image_base_url
    }
}

fn fetch_action(ticket: FetchTicket) -> Action {
    Action::PostToWorker(WorkerMessage::fetch_page(ticket.epoch, ticket.page, ticket.query))
}
