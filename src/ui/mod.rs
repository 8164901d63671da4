//! Terminal user interface layer.
//!
//! This module turns application state into text and text into events.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text output
//! input line → parse_command → Event → handle_event
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types and presentation rules (greeting, titles, copy)
//! - [`renderer`]: Plain-text layout of the view model
//! - [`input`]: Line command parser

pub mod input;
pub mod renderer;
pub mod viewmodel;

pub use input::{parse_command, Command, CommandError, HELP};
pub use renderer::render;
pub use viewmodel::{
    DetailInfo, DisplayItem, EmptyState, FooterControl, HeaderInfo, UIViewModel,
};
