//! Subscriber construction.

use super::exporter::{self, SCOPE_NAME};
use super::file_writer::{RotatingFileWriter, RotationPolicy};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "info";

/// Keeps the span export pipeline alive; flushes it on drop.
#[derive(Debug, Default)]
#[must_use = "dropping the guard shuts down span export"]
pub struct TracingGuard {
    provider: Option<TracerProvider>,
}

impl TracingGuard {
    /// Whether spans are being exported to a file.
    #[must_use]
    pub const fn exporting(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TracingGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            let _ = provider.shutdown();
        }
    }
}

/// Installs the global subscriber.
///
/// Always logs to stderr through a `fmt` layer. When `config.trace_file` is
/// set, spans are additionally exported as OTLP JSON lines to that file,
/// rotated according to `trace_max_bytes` and `trace_max_backups`.
///
/// Observability is optional: a trace file whose directory cannot be created
/// is skipped with a warning, and a second call leaves the first subscriber in
/// place.
///
/// # Example
///
/// ```rust
/// use cinematch::observability::init_tracing;
/// use cinematch::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// let guard = init_tracing(&config);
/// assert!(!guard.exporting());
/// ```
pub fn init_tracing(config: &Config) -> TracingGuard {
    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut skipped = None;
    let provider = config.trace_file.as_ref().and_then(|path| {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                skipped = Some((path.clone(), e));
                return None;
            }
        }
        let policy = RotationPolicy {
            max_bytes: config.trace_max_bytes,
            max_backups: config.trace_max_backups,
        };
        let resource = Resource::new(vec![
            opentelemetry::KeyValue::new("service.name", SCOPE_NAME),
            opentelemetry::KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ]);
        Some(exporter::tracer_provider(
            RotatingFileWriter::new(path.clone(), policy),
            resource,
        ))
    });

    let otel_layer = provider
        .as_ref()
        .map(|provider| OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();

    if let Some((path, error)) = skipped {
        tracing::warn!(path = %path.display(), %error, "trace file disabled");
    }

    TracingGuard { provider }
}
