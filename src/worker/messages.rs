//! Requests and replies exchanged with the catalog worker thread.
//!
//! This module defines the request and response protocol between the event
//! loop and the background worker thread that performs catalog calls. It also
//! implements tracing context propagation across the thread boundary.

use crate::catalog::CatalogQuery;
use crate::domain::{Movie, MovieDetails};
use serde::{Deserialize, Serialize};

/// Span identity of the sender, so worker spans join the caller's trace.
///
/// Captures the current trace and span IDs from OpenTelemetry so that worker
/// spans are parented to the span that issued the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// Hex trace id.
    pub trace_id: String,

    /// Hex id of the span that issued the request.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry identity of the current span.
    ///
    /// `None` when no OpenTelemetry layer is installed (plain stderr logging)
    /// or the current span is disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use cinematch::worker::TraceContext;
    ///
    /// // No subscriber in this doctest, so there is nothing to capture.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let context = tracing::Span::current().context();
        let span = context.span();
        let ids = span.span_context();
        if !ids.is_valid() {
            return None;
        }

        let captured = Self {
            trace_id: format!("{:032x}", ids.trace_id()),
            parent_span_id: format!("{:016x}", ids.span_id()),
        };
        tracing::trace!(trace_id = %captured.trace_id, span_id = %captured.parent_span_id, "trace context captured");
        Some(captured)
    }
}

/// Generates one constructor per request variant, capturing the current span.
///
/// Each generated constructor attaches the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Builds a `", stringify!($variant), "` request tagged with the active span.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_page(FetchPage { epoch: u64, page: u32, query: CatalogQuery }),
    fetch_details(FetchDetails { token: u64, movie_id: i64 }),
}

/// Requests sent from the event loop to the worker thread.
///
/// The worker processes them one at a time in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch one page of a catalog query for a pagination epoch.
    FetchPage {
        /// Epoch the reply must be tagged with.
        epoch: u64,

        /// 1-based page number.
        page: u32,

        /// Query fixed for the epoch.
        query: CatalogQuery,

        /// Span of the issuer.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch videos, providers, credits, and similar titles for one movie.
    FetchDetails {
        /// Detail-view token the reply must carry.
        token: u64,

        movie_id: i64,

        /// Span of the issuer.
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    pub(crate) const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchPage { trace_context, .. } | Self::FetchDetails { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Responses sent from the worker thread back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A page was fetched; `movies` may be empty when the catalog is exhausted.
    PageLoaded {
        epoch: u64,
        page: u32,
        movies: Vec<Movie>,
    },

    /// A page fetch failed at the transport or decode level.
    PageFailed {
        epoch: u64,
        page: u32,

        /// Failure text, logged and otherwise opaque.
        message: String,
    },

    /// Details were assembled. Missing sub-resources are empty, never errors.
    DetailsLoaded {
        token: u64,
        movie_id: i64,
        details: MovieDetails,
    },
}
