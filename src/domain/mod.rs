//! Domain layer for Cinematch.
//!
//! Core types shared by every other layer, independent of the HTTP client, the
//! storage backend, or the terminal front-end.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`movie`]: Movie and detail sub-resource models
//! - [`mood`]: Mood filter and its static genre/copy table

pub mod error;
pub mod mood;
pub mod movie;

pub use error::{CinematchError, Result};
pub use mood::{Mood, MoodProfile};
pub use movie::{CastMember, Movie, MovieDetails, ProviderAvailability, Video, WatchProvider};
