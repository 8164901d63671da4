//! Remote movie catalog access.
//!
//! # Modules
//!
//! - `client`: [`Catalog`] trait, the seam between the app and the network
//! - `tmdb`: TMDB v3 implementation over `ureq`
//! - `models`: wire envelopes for paged lists, credits, and providers
//! - `query`: pure selection of the query for a filter state

pub mod client;
pub mod models;
pub mod query;
pub mod tmdb;

pub use client::Catalog;
pub use query::{resolve, CatalogQuery};
pub use tmdb::{Endpoint, TmdbClient, TmdbSettings, DEFAULT_BASE_URL};
