//! Storage layer for persistent client-side data.
//!
//! The only persisted state is the favorites collection, stored as a JSON
//! string under a single key. The key-value seam keeps the favorites logic
//! independent of where the bytes live.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait
//! - `json`: JSON file store with atomic writes
//! - `memory`: in-process store for tests and ephemeral sessions
//! - `favorites`: favorites collection with write-through persistence

pub mod backend;
pub mod favorites;
pub mod json;
pub mod memory;

pub use backend::KeyValueStore;
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use json::JsonFileStore;
pub use memory::MemoryStore;
