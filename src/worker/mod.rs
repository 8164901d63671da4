//! Background worker thread for catalog requests.
//!
//! All network I/O runs here so the event loop never blocks on the catalog.
//! Requests and replies carry enough identity (epoch, page, detail token) for
//! the application state to discard replies that are no longer relevant.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation, message processing, and thread spawn

pub mod handler;
pub mod messages;

pub use handler::{CatalogWorker, WorkerHandle};
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
