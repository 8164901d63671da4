//! Favorites collection with write-through persistence.
//!
//! The collection is an ordered list of movies, unique by id, in insertion
//! order. Every mutation re-serializes the whole list as a JSON array under
//! [`FAVORITES_KEY`] through the injected [`KeyValueStore`].
//!
//! Persistence never fails an operation: unreadable or malformed stored content
//! yields an empty collection at startup, and write failures are logged while
//! the in-memory list stays authoritative for the session.

use crate::domain::Movie;
use crate::storage::backend::KeyValueStore;

/// Storage key holding the serialized favorites array.
pub const FAVORITES_KEY: &str = "cinematch_favorites";

/// The user's saved movies.
///
/// # Examples
///
/// ```
/// use cinematch::storage::{FavoritesStore, MemoryStore};
/// use cinematch::Movie;
///
/// let mut favorites = FavoritesStore::load(Box::new(MemoryStore::default()));
/// favorites.toggle(&Movie::new(603, "The Matrix"));
/// assert!(favorites.is_favorite(603));
/// favorites.toggle(&Movie::new(603, "The Matrix"));
/// assert!(favorites.list().is_empty());
/// ```
pub struct FavoritesStore {
    store: Box<dyn KeyValueStore>,
    movies: Vec<Movie>,
}

impl FavoritesStore {
    /// Loads the collection from `store`.
    ///
    /// Absent, unreadable, or malformed content produces an empty collection.
    /// Duplicate ids in stored content are collapsed to their first entry.
    #[must_use]
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let _span = tracing::debug_span!("favorites_load").entered();

        let movies = match store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(movies) => dedup_by_id(movies),
                Err(e) => {
                    tracing::warn!(error = %e, "stored favorites malformed, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read favorites, starting empty");
                Vec::new()
            }
        };

        tracing::debug!(count = movies.len(), "favorites loaded");
        Self { store, movies }
    }

    /// Appends `movie` unless a movie with the same id is already saved.
    pub fn add(&mut self, movie: &Movie) {
        if self.is_favorite(movie.id) {
            return;
        }
        self.movies.push(movie.clone());
        tracing::debug!(movie_id = movie.id, count = self.movies.len(), "favorite added");
        self.persist();
    }

    /// Removes the movie with `movie_id`, if present.
    pub fn remove(&mut self, movie_id: i64) {
        let before = self.movies.len();
        self.movies.retain(|m| m.id != movie_id);
        if self.movies.len() == before {
            return;
        }
        tracing::debug!(movie_id, count = self.movies.len(), "favorite removed");
        self.persist();
    }

    /// Removes `movie` if saved, otherwise adds it. Returns the new state.
    pub fn toggle(&mut self, movie: &Movie) -> bool {
        if self.is_favorite(movie.id) {
            self.remove(movie.id);
            false
        } else {
            self.add(movie);
            true
        }
    }

    #[must_use]
    pub fn is_favorite(&self, movie_id: i64) -> bool {
        self.movies.iter().any(|m| m.id == movie_id)
    }

    /// Saved movies in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Movie] {
        &self.movies
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.movies)
            .map_err(Into::into)
            .and_then(|json| self.store.set(FAVORITES_KEY, &json));

        if let Err(e) = result {
            tracing::error!(error = %e, count = self.movies.len(), "failed to persist favorites");
        }
    }
}

impl std::fmt::Debug for FavoritesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("count", &self.movies.len())
            .finish_non_exhaustive()
    }
}

fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = std::collections::HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}
