//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user commands,
//! timer ticks, and worker responses, translating them into state changes and
//! action sequences. It is the only place where [`AppState`] is mutated.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the input reader, a debounce timer, or the worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Filters**: `SearchInput`, `DebounceElapsed`, `SelectYear`, `SelectMood`, `ClearFilters`
//! - **Navigation**: `SwitchView`, `SentinelVisible`, `LoadMore`, `Reload`
//! - **Detail**: `OpenMovie`, `OpenSimilar`, `CloseMovie`, `ToggleFavorite`, `Shuffle`
//! - **Worker**: `WorkerResponse` with typed reply variants
//!
//! # Example
//!
//! ```rust
//! use cinematch::app::{handle_event, AppSettings, AppState, Event, View};
//! use cinematch::storage::{FavoritesStore, MemoryStore};
//!
//! let favorites = FavoritesStore::load(Box::new(MemoryStore::default()));
//! let mut state = AppState::new(favorites, &AppSettings::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::SwitchView(View::Favorites))?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::pagination::{LoadTrigger, MergeOutcome};
use crate::app::{Action, AppState, View};
use crate::domain::error::Result;
use crate::domain::Mood;
use crate::worker::WorkerResponse;

/// Events triggered by user input, timers, or worker responses.
///
/// Each event is processed to completion before the next, so state
/// transitions are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The raw search text changed. Starts a debounce timer.
    SearchInput(String),

    /// A debounce timer finished.
    ///
    /// Commits the search text if `token` is the latest one armed.
    DebounceElapsed {
        token: u64,
    },

    /// Selects a release year, or clears it with `None`.
    SelectYear(Option<String>),

    /// Selects a mood, or clears it with `None`.
    SelectMood(Option<Mood>),

    /// Clears search, year, and mood.
    ClearFilters,

    /// Shows the discover or favorites list.
    SwitchView(View),

    /// The end-of-list sentinel became visible.
    SentinelVisible,

    /// The manual "load more" control was used.
    LoadMore,

    /// Restarts the current epoch from page 1.
    Reload,

    /// Opens the detail view for a known movie id.
    OpenMovie {
        movie_id: i64,
    },

    /// Opens the `index`-th (0-based) similar title of the open detail view.
    OpenSimilar {
        index: usize,
    },

    /// Closes the detail view.
    CloseMovie,

    /// Toggles a favorite; `None` targets the movie open in the detail view.
    ToggleFavorite {
        movie_id: Option<i64>,
    },

    /// Opens a random movie from the displayed list.
    Shuffle {
        roll: u64,
    },

    /// Ends the session.
    Quit,

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// A tuple of `(should_render, actions)`. `should_render` is `false` when the
/// event left everything visible unchanged, such as a stale worker reply.
///
/// # Errors
///
/// Reserved for failures of state mutation; current transitions are total.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event for debugging.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::SearchInput(text) => {
            state.filter_mut().set_search_text(text);
            let token = state.debouncer_mut().arm();
            let delay = state.debouncer_mut().delay();
            tracing::trace!(text = %text, token, "search text updated");

            // Typing can clear a mood, which changes the committed key right away.
            let mut actions = state.sync_epoch();
            actions.push(Action::ScheduleDebounce { token, delay });
            Ok((true, actions))
        }
        Event::DebounceElapsed { token } => {
            if !state.debouncer_mut().fire(*token) {
                tracing::trace!(token, "superseded debounce token");
                return Ok((false, vec![]));
            }
            state.filter_mut().commit_search();
            let actions = state.sync_epoch();
            Ok((!actions.is_empty(), actions))
        }
        Event::SelectYear(year) => {
            state.filter_mut().set_year(year.as_deref());
            Ok((true, state.sync_epoch()))
        }
        Event::SelectMood(mood) => {
            if mood.is_some() {
                state.debouncer_mut().cancel();
            }
            state.filter_mut().set_mood(*mood);
            Ok((true, state.sync_epoch()))
        }
        Event::ClearFilters => {
            state.debouncer_mut().cancel();
            state.filter_mut().clear();
            Ok((true, state.sync_epoch()))
        }
        Event::SwitchView(view) => Ok((true, state.switch_view(*view))),
        Event::SentinelVisible => {
            let actions = state.request_next(LoadTrigger::Sentinel);
            Ok((!actions.is_empty(), actions))
        }
        Event::LoadMore => {
            let actions = state.request_next(LoadTrigger::Manual);
            Ok((!actions.is_empty(), actions))
        }
        Event::Reload => {
            tracing::info!("reloading current list");
            Ok((true, state.restart_epoch()))
        }
        Event::OpenMovie { movie_id } => {
            let Some(movie) = state.find_movie(*movie_id).cloned() else {
                tracing::debug!(movie_id, "movie not in any visible list");
                return Ok((false, vec![]));
            };
            Ok((true, state.open_movie(movie)))
        }
        Event::OpenSimilar { index } => {
            let similar = state
                .detail()
                .details()
                .and_then(|details| details.similar.get(*index))
                .cloned();
            let Some(movie) = similar else {
                tracing::debug!(index, "no similar title at index");
                return Ok((false, vec![]));
            };
            Ok((true, state.open_movie(movie)))
        }
        Event::CloseMovie => {
            let was_open = state.detail().is_open();
            state.detail_mut().close();
            Ok((was_open, vec![]))
        }
        Event::ToggleFavorite { movie_id } => {
            let target = match movie_id {
                Some(id) => state.find_movie(*id).cloned(),
                None => state.detail().selected().cloned(),
            };
            let Some(movie) = target else {
                tracing::debug!(movie_id = ?movie_id, "nothing to toggle");
                return Ok((false, vec![]));
            };
            let saved = state.favorites_mut().toggle(&movie);
            tracing::debug!(movie_id = movie.id, saved, "favorite toggled");
            Ok((true, vec![]))
        }
        Event::Shuffle { roll } => match state.shuffle_pick(*roll) {
            Some(movie) => {
                tracing::debug!(movie_id = movie.id, "shuffle picked movie");
                Ok((true, state.open_movie(movie)))
            }
            None => Ok((false, vec![])),
        },
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::PageLoaded { epoch, page, movies } => {
            let outcome = state.engine_mut().apply_page(*epoch, *page, movies.clone());
            let visible = state.view() == View::Discover;
            match outcome {
                MergeOutcome::Stale => (false, vec![]),
                MergeOutcome::Merged { .. } | MergeOutcome::Exhausted => (visible, vec![]),
            }
        }
        WorkerResponse::PageFailed { epoch, page, message } => {
            let applied = state.engine_mut().apply_failure(*epoch, *page);
            if applied {
                tracing::warn!(epoch, page, error = %message, "keeping current list after failed fetch");
            }
            (applied && state.view() == View::Discover, vec![])
        }
        WorkerResponse::DetailsLoaded { token, movie_id, details } => {
            let applied = state.detail_mut().apply(*token, *movie_id, details.clone());
            (applied, vec![])
        }
    }
}
