//! Worker thread executing catalog requests.
//!
//! The worker owns the [`Catalog`] and processes [`WorkerMessage`]s strictly in
//! arrival order on one background thread, so page replies for an epoch come
//! back in the order they were issued. Errors never cross the thread boundary
//! as panics: a failed page becomes [`WorkerResponse::PageFailed`], and failed
//! detail sub-resources resolve to empty values.

use crate::catalog::{Catalog, CatalogQuery};
use crate::domain::error::{CinematchError, Result};
use crate::domain::MovieDetails;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

/// Executes worker messages against a catalog.
pub struct CatalogWorker {
    catalog: Box<dyn Catalog>,
}

impl CatalogWorker {
    #[must_use]
    pub fn new(catalog: Box<dyn Catalog>) -> Self {
        Self { catalog }
    }

    fn handle_fetch_page(&self, epoch: u64, page: u32, query: &CatalogQuery) -> WorkerResponse {
        match query.fetch(self.catalog.as_ref(), page) {
            Ok(movies) => {
                tracing::debug!(epoch, page, count = movies.len(), query = query.kind(), "page fetched");
                WorkerResponse::PageLoaded { epoch, page, movies }
            }
            Err(e) => {
                tracing::warn!(epoch, page, query = query.kind(), error = %e, "page fetch failed");
                WorkerResponse::PageFailed {
                    epoch,
                    page,
                    message: e.to_string(),
                }
            }
        }
    }

    fn handle_fetch_details(&self, token: u64, movie_id: i64) -> WorkerResponse {
        let videos = Self::or_empty("videos", movie_id, self.catalog.videos(movie_id));
        let providers = Self::or_empty("watch providers", movie_id, self.catalog.watch_providers(movie_id));
        let cast = Self::or_empty("credits", movie_id, self.catalog.credits(movie_id));
        let similar = Self::or_empty("similar", movie_id, self.catalog.similar(movie_id));

        let details = MovieDetails::assemble(&videos, providers, cast, similar);
        tracing::debug!(
            movie_id,
            has_trailer = details.trailer_key.is_some(),
            cast = details.cast.len(),
            similar = details.similar.len(),
            "details assembled"
        );
        WorkerResponse::DetailsLoaded { token, movie_id, details }
    }

    /// Resolves a failed sub-resource to its empty value.
    fn or_empty<T: Default>(resource: &str, movie_id: i64, result: Result<T>) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!(resource, movie_id, error = %e, "sub-resource unavailable");
            T::default()
        })
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Reconstructs the OpenTelemetry context from the message so that spans
    /// created on the worker thread link to their parent on the event loop.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response to post back.
    ///
    /// Attaches the message's trace context and runs inside a
    /// `worker_handle_message` span.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchPage { epoch, page, query, .. } => {
                self.handle_fetch_page(epoch, page, &query)
            }
            WorkerMessage::FetchDetails { token, movie_id, .. } => {
                self.handle_fetch_details(token, movie_id)
            }
        }
    }

    /// Moves the worker onto a named background thread.
    ///
    /// Every response is passed to `on_response`. Dropping the returned
    /// [`WorkerHandle`] stops the thread: queued requests are skipped and the
    /// reply of the request in flight is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn<F>(self, on_response: F) -> Result<WorkerHandle>
    where
        F: Fn(WorkerResponse) + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();
        let stopped = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stopped);

        let thread = std::thread::Builder::new()
            .name("catalog-worker".to_string())
            .spawn(move || {
                tracing::debug!("worker started");
                for message in receiver {
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    let response = self.handle_message(message);
                    if stop_flag.load(Ordering::Acquire) {
                        break;
                    }
                    on_response(response);
                }
                tracing::debug!("worker stopped");
            })?;

        Ok(WorkerHandle {
            sender: Some(sender),
            stopped,
            thread: Some(thread),
        })
    }
}

impl std::fmt::Debug for CatalogWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWorker").finish_non_exhaustive()
    }
}

/// Sending half of a running worker.
#[derive(Debug)]
pub struct WorkerHandle {
    sender: Option<mpsc::Sender<WorkerMessage>>,
    stopped: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Queues `message` for the worker.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Worker`] if the worker thread has exited.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| CinematchError::Worker("worker shut down".to_string()))?;
        sender
            .send(message)
            .map_err(|e| CinematchError::Worker(format!("worker unavailable: {e}")))
    }
}

impl Drop for WorkerHandle {
    /// Signals the thread to stop without waiting on a request in flight.
    /// A thread that has already exited is joined so its panic is logged.
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        drop(self.sender.take());
        if let Some(thread) = self.thread.take() {
            if !thread.is_finished() {
                tracing::debug!("detaching busy worker thread");
            } else if thread.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CastMember, Movie, ProviderAvailability, Video};
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, Instant};

    struct StubCatalog {
        fail_pages: bool,
        delay: Duration,
    }

    impl StubCatalog {
        fn new(fail_pages: bool) -> Self {
            Self { fail_pages, delay: Duration::ZERO }
        }
    }

    impl Catalog for StubCatalog {
        fn popular(&self, page: u32) -> Result<Vec<Movie>> {
            std::thread::sleep(self.delay);
            if self.fail_pages {
                return Err(CinematchError::Catalog("503".into()));
            }
            Ok(vec![Movie::new(i64::from(page) * 100, "popular")])
        }

        fn discover_by_genres(&self, genre_ids: &[u32], _page: u32) -> Result<Vec<Movie>> {
            Ok(genre_ids.iter().map(|g| Movie::new(i64::from(*g), "genre")).collect())
        }

        fn discover_by_year(&self, _year: &str, _page: u32) -> Result<Vec<Movie>> {
            Ok(vec![])
        }

        fn search(&self, _query: &str, _year: Option<&str>, _page: u32) -> Result<Vec<Movie>> {
            Ok(vec![])
        }

        fn videos(&self, _movie_id: i64) -> Result<Vec<Video>> {
            Ok(vec![Video {
                id: "v".into(),
                key: "abc".into(),
                name: "Trailer".into(),
                site: "YouTube".into(),
                kind: "Trailer".into(),
            }])
        }

        fn watch_providers(&self, _movie_id: i64) -> Result<ProviderAvailability> {
            Err(CinematchError::Catalog("timeout".into()))
        }

        fn credits(&self, _movie_id: i64) -> Result<Vec<CastMember>> {
            Ok((0..12)
                .map(|i| CastMember {
                    id: i,
                    name: format!("actor {i}"),
                    character: String::new(),
                    profile_path: None,
                })
                .collect())
        }

        fn similar(&self, _movie_id: i64) -> Result<Vec<Movie>> {
            Err(CinematchError::Catalog("404".into()))
        }
    }

    #[test]
    fn page_reply_carries_epoch_and_page() {
        let worker = CatalogWorker::new(Box::new(StubCatalog::new(false)));
        let response = worker.handle_message(WorkerMessage::fetch_page(7, 2, CatalogQuery::Popular));
        assert_eq!(
            response,
            WorkerResponse::PageLoaded { epoch: 7, page: 2, movies: vec![Movie::new(200, "popular")] }
        );
    }

    #[test]
    fn page_error_becomes_failure_response() {
        let worker = CatalogWorker::new(Box::new(StubCatalog::new(true)));
        let response = worker.handle_message(WorkerMessage::fetch_page(1, 1, CatalogQuery::Popular));
        assert!(matches!(response, WorkerResponse::PageFailed { epoch: 1, page: 1, .. }));
    }

    #[test]
    fn failed_sub_resources_resolve_to_empty() {
        let worker = CatalogWorker::new(Box::new(StubCatalog::new(false)));
        let WorkerResponse::DetailsLoaded { token, movie_id, details } =
            worker.handle_message(WorkerMessage::fetch_details(4, 603))
        else {
            panic!("expected details");
        };

        assert_eq!((token, movie_id), (4, 603));
        assert_eq!(details.trailer_key.as_deref(), Some("abc"));
        assert!(details.providers.is_unavailable());
        assert_eq!(details.cast.len(), 8);
        assert!(details.similar.is_empty());
    }

    #[test]
    fn spawned_worker_replies_in_issue_order() {
        let (tx, rx) = mpsc::channel();
        let handle = CatalogWorker::new(Box::new(StubCatalog::new(false)))
            .spawn(move |response| {
                let _ = tx.send(response);
            })
            .unwrap();

        for page in 1..=3 {
            handle.post(WorkerMessage::fetch_page(1, page, CatalogQuery::Popular)).unwrap();
        }

        let pages: Vec<u32> = (0..3)
            .map(|_| match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                WorkerResponse::PageLoaded { page, .. } => page,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[test]
    fn dropping_handle_skips_queued_requests() {
        let replies = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&replies);
        let slow = StubCatalog { fail_pages: false, delay: Duration::from_millis(200) };
        let handle = CatalogWorker::new(Box::new(slow))
            .spawn(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        for page in 1..=20 {
            handle.post(WorkerMessage::fetch_page(1, page, CatalogQuery::Popular)).unwrap();
        }

        let started = Instant::now();
        drop(handle);
        assert!(started.elapsed() < Duration::from_millis(150));

        std::thread::sleep(Duration::from_millis(500));
        assert_eq!(replies.load(Ordering::SeqCst), 0);
    }
}
