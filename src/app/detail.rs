//! Selected-movie detail view.
//!
//! Opening a movie bumps a token and asks the worker for its sub-resources.
//! A reply is accepted only if its token still matches, so switching quickly
//! between titles never shows the details of the previous one.

use crate::domain::{Movie, MovieDetails};

#[derive(Debug, Clone, Default)]
pub struct DetailView {
    selected: Option<Movie>,
    details: Option<MovieDetails>,
    token: u64,
}

impl DetailView {
    /// Selects `movie` and returns the token its detail reply must carry.
    pub fn open(&mut self, movie: Movie) -> u64 {
        self.token += 1;
        tracing::debug!(movie_id = movie.id, token = self.token, "detail opened");
        self.selected = Some(movie);
        self.details = None;
        self.token
    }

    pub fn close(&mut self) {
        if let Some(movie) = self.selected.take() {
            tracing::debug!(movie_id = movie.id, "detail closed");
        }
        self.details = None;
        self.token += 1;
    }

    /// Stores `details` if `token` and `movie_id` match the open selection.
    pub fn apply(&mut self, token: u64, movie_id: i64, details: MovieDetails) -> bool {
        let current = self.selected.as_ref().map(|m| m.id);
        if token != self.token || current != Some(movie_id) {
            tracing::debug!(token, movie_id, current_token = self.token, "discarding stale details");
            return false;
        }
        self.details = Some(details);
        true
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&Movie> {
        self.selected.as_ref()
    }

    /// Loaded details, `None` while the request is outstanding.
    #[must_use]
    pub const fn details(&self) -> Option<&MovieDetails> {
        self.details.as_ref()
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}
