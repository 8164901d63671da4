//! Tracing setup with optional OTLP-JSON span export to a rotating file.
//!
//! # Architecture
//!
//! ```text
//! tracing macros ─┬→ fmt layer → stderr
//!                 └→ tracing-opentelemetry → SDK provider → JsonLinesExporter → rotating file
//! ```
//!
//! The file branch only exists when `trace_file` is configured.
//!
//! # Level Resolution
//!
//! 1. `RUST_LOG` environment variable
//! 2. `trace_level` in the configuration
//! 3. `"info"`
//!
//! # Usage
//!
//! ```rust
//! use cinematch::observability::init_tracing;
//! use cinematch::Config;
//!
//! let _tracing = init_tracing(&Config::default());
//! tracing::debug!("tracing is now active");
//! ```

mod exporter;
mod file_writer;
mod init;

pub use file_writer::{RotatingFileWriter, RotationPolicy};
pub use init::{init_tracing, TracingGuard};
