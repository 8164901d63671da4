//! Actions representing side effects to be executed by the runtime.
//!
//! This module defines the [`Action`] type, the imperative commands produced by
//! the event handler after processing user input, timer ticks, or worker
//! replies. Actions bridge the synchronous state machine and effectful
//! operations like network requests and timers.
//!
//! # Architecture
//!
//! The event handler returns a `Vec<Action>` after processing each event, so
//! several side effects can be queued atomically. The binary executes them in
//! sequence.
//!
//! # Example
//!
//! ```rust
//! use cinematch::app::Action;
//! use cinematch::catalog::CatalogQuery;
//! use cinematch::worker::WorkerMessage;
//!
//! let actions = vec![
//!     Action::PostToWorker(WorkerMessage::fetch_page(1, 1, CatalogQuery::Popular)),
//! ];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;
use std::time::Duration;

/// Commands representing side effects to be executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker thread.
    ///
    /// Used for page fetches and detail fetches; the reply comes back as
    /// [`Event::WorkerResponse`](crate::app::Event::WorkerResponse).
    PostToWorker(WorkerMessage),

    /// Starts a debounce timer.
    ///
    /// After `delay` the runtime must deliver
    /// [`Event::DebounceElapsed`](crate::app::Event::DebounceElapsed) with the
    /// same `token`.
    ScheduleDebounce {
        token: u64,
        delay: Duration,
    },

    /// Ends the session.
    Quit,
}
