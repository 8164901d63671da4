//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime (`main.rs`) and the catalog, storage,
//! and worker layers. It implements the event-driven state machine that turns
//! filter input into paginated catalog requests.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Discover/favorites view
//! - [`state`]: Orchestrator owning filters, pagination, favorites, and details
//! - [`filter`]: Filter fields and their mutual-exclusion rules
//! - [`pagination`]: Epoch-aware page accumulation and the auto/manual load gate
//! - [`debounce`]: Token-based search debounce
//! - [`detail`]: Selected-movie detail view

pub mod actions;
pub mod debounce;
pub mod detail;
pub mod filter;
pub mod handler;
pub mod modes;
pub mod pagination;
pub mod state;

pub use actions::Action;
pub use filter::{FilterKey, FilterState};
pub use handler::{handle_event, Event};
pub use modes::View;
pub use pagination::{FetchTicket, LoadPhase, LoadTrigger, MergeOutcome, PageEngine};
pub use state::{AppSettings, AppState};
