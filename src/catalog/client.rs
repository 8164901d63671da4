//! Catalog client abstraction.
//!
//! This module defines the [`Catalog`] trait that abstracts over the remote
//! movie catalog. The application only ever issues read requests, each one
//! mapping directly to a screen or filter in the UI.
//!
//! The trait is object safe so the background worker can hold a
//! `Box<dyn Catalog>`, and tests can substitute an in-memory fake.

use crate::domain::error::Result;
use crate::domain::{CastMember, Movie, ProviderAvailability, Video};

/// Typed read access to the remote movie catalog.
///
/// All calls are blocking; they are executed on the worker thread, never on the
/// thread that owns the application state.
///
/// # Implementations
///
/// - [`TmdbClient`](crate::catalog::TmdbClient): HTTP client for TMDB v3
///
/// # Errors
///
/// Every method returns an error on transport failure, non-success status, or a
/// response body that cannot be decoded. There is no richer error taxonomy.
pub trait Catalog: Send {
    /// Globally popular movies.
    fn popular(&self, page: u32) -> Result<Vec<Movie>>;

    /// Discovery filtered to the given genres, most popular first.
    fn discover_by_genres(&self, genre_ids: &[u32], page: u32) -> Result<Vec<Movie>>;

    /// Discovery filtered to a primary release year, most popular first.
    fn discover_by_year(&self, year: &str, page: u32) -> Result<Vec<Movie>>;

    /// Full-text search, optionally scoped to a release year. Adult titles
    /// are always excluded.
    fn search(&self, query: &str, year: Option<&str>, page: u32) -> Result<Vec<Movie>>;

    /// Videos attached to a movie, in the preferred languages.
    fn videos(&self, movie_id: i64) -> Result<Vec<Video>>;

    /// Streaming and rental providers for the preferred region.
    fn watch_providers(&self, movie_id: i64) -> Result<ProviderAvailability>;

    /// Cast list in billing order.
    fn credits(&self, movie_id: i64) -> Result<Vec<CastMember>>;

    /// Titles similar to the given movie.
    fn similar(&self, movie_id: i64) -> Result<Vec<Movie>>;
}
