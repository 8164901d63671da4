//! Cinematch: movie discovery over the TMDB catalog.
//!
//! Cinematch lets a user browse a remote movie catalog from the terminal:
//! - Popular titles, title search, release-year and mood filters
//! - Incremental pagination with an auto-load sentinel and a manual control
//! - A detail view with trailer, streaming availability, cast, and similar titles
//! - Favorites persisted to a local key-value file
//! - Catalog calls on a background worker thread with trace propagation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal Binary (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Filters, debounce, view switching                │
//! │  - Pagination engine with epochs                    │
//! │  - Detail view                                      │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View model  │   │ - KV backends │   │ - Page fetch  │
//! │ - Rendering   │   │ - Favorites   │   │ - Details     │
//! │ - Commands    │   │               │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                 │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog (catalog/)                                 │  ← TMDB v3
//! │  - Query resolution                                 │
//! │  - HTTP client                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain, Infrastructure, Observability              │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`catalog`]: Catalog trait, query resolution, and the TMDB client
//! - [`domain`]: Movies, moods, errors
//! - [`infrastructure`]: Platform directories
//! - [`storage`]: Key-value persistence and the favorites set
//! - [`worker`]: Background thread executing catalog calls
//! - [`ui`]: View model, plain-text renderer, command parser
//! - [`observability`]: Tracing subscriber and OTLP file export
//!
//! # Configuration
//!
//! Configuration is read from `<config dir>/cinematch/config.toml`; every key
//! is optional:
//!
//! ```toml
//! api_token = "eyJhbGciOi..."
//! language = "es-ES"
//! regions = ["DO", "US"]
//! search_debounce_ms = 500
//! auto_load_threshold = 3
//! trace_level = "debug"
//! trace_file = "~/.local/share/cinematch/trace.jsonl"
//! ```
//!
//! # Example
//!
//! ```rust
//! use cinematch::app::Action;
//! use cinematch::storage::MemoryStore;
//! use cinematch::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default(), Box::new(MemoryStore::default()));
//! let first = state.start();
//! assert!(matches!(first.as_slice(), [Action::PostToWorker(_)]));
//!
//! let (render, actions) = handle_event(&mut state, &Event::SearchInput("batman".into()))?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::ScheduleDebounce { .. }]));
//! # Ok::<(), cinematch::CinematchError>(())
//! ```

pub mod app;
pub mod catalog;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppSettings, AppState, Event, View};
pub use domain::{CinematchError, Mood, Movie, MovieDetails, Result};

use catalog::TmdbSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::{FavoritesStore, KeyValueStore};

/// Runtime configuration.
///
/// Every field has a default, so an empty or absent file is valid. The API
/// token is only required once a network client is built.
///
/// # Example
///
/// ```rust
/// use cinematch::Config;
///
/// let config = Config::from_toml_str("auto_load_threshold = 5\nregions = [\"ES\"]")?;
/// assert_eq!(config.auto_load_threshold, 5);
/// assert_eq!(config.regions, vec!["ES"]);
/// assert_eq!(config.search_debounce_ms, 500);
/// # Ok::<(), cinematch::CinematchError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB API root. Default: `https://api.themoviedb.org/3`
    pub api_base_url: String,

    /// TMDB v4 read access token.
    pub api_token: Option<String>,

    /// Response language. Default: `"es-ES"`
    pub language: String,

    /// Languages accepted for trailers, in order. Default: `"es,en"`
    pub video_languages: String,

    /// Streaming regions in preference order. Default: `["DO", "US"]`
    pub regions: Vec<String>,

    /// Image CDN prefix for posters and backdrops.
    pub image_base_url: String,

    /// Where the favorites store lives. Default: platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Quiet period before search text is committed. Default: 500
    pub search_debounce_ms: u64,

    /// Loads after which the sentinel gives way to the manual control. Default: 3
    pub auto_load_threshold: u32,

    /// Per-request timeout. Default: 15
    pub request_timeout_secs: u64,

    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// OTLP JSON span export target; no file export when unset.
    pub trace_file: Option<PathBuf>,

    /// Size at which the trace file is rotated.
    pub trace_max_bytes: u64,

    /// Rotated trace files kept.
    pub trace_max_backups: usize,
}

impl Default for Config {
    fn default() -> Self {
        let tmdb = TmdbSettings::default();
        let app = AppSettings::default();
        let rotation = observability::RotationPolicy::default();
        Self {
            api_base_url: tmdb.base_url,
            api_token: None,
            language: tmdb.language,
            video_languages: tmdb.video_languages,
            regions: tmdb.regions,
            image_base_url: app.image_base_url,
            data_dir: None,
            search_debounce_ms: u64::try_from(app.search_debounce.as_millis()).unwrap_or(500),
            auto_load_threshold: app.auto_load_threshold,
            request_timeout_secs: tmdb.timeout.as_secs(),
            trace_level: None,
            trace_file: None,
            trace_max_bytes: rotation.max_bytes,
            trace_max_backups: rotation.max_backups,
        }
    }
}

impl Config {
    /// Parses a TOML document, expanding `~` in path values.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Config`] if the document is not valid TOML or
    /// a value has the wrong type.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut config: Self =
            toml::from_str(source).map_err(|e| CinematchError::Config(e.to_string()))?;
        config.data_dir = config.data_dir.map(|p| expand(&p));
        config.trace_file = config.trace_file.map(|p| expand(&p));
        Ok(config)
    }

    /// Loads the file at `path`, or the defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Io`] if the file exists but cannot be read,
    /// and [`CinematchError::Config`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let _span = tracing::debug_span!("config_load", path = %path.display()).entered();

        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Directory holding the favorites store.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(infrastructure::data_dir)
    }

    /// Client settings for the TMDB catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Config`] if no API token is configured.
    pub fn tmdb_settings(&self) -> Result<TmdbSettings> {
        let api_token = self
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                CinematchError::Config(
                    "missing TMDB API token (set api_token or TMDB_API_TOKEN)".to_string(),
                )
            })?;

        Ok(TmdbSettings {
            base_url: self.api_base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            language: self.language.clone(),
            video_languages: self.video_languages.clone(),
            regions: self.regions.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }

    /// Tunables for the application state.
    #[must_use]
    pub fn app_settings(&self) -> AppSettings {
        AppSettings {
            auto_load_threshold: self.auto_load_threshold,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            image_base_url: self.image_base_url.clone(),
        }
    }
}

fn expand(path: &Path) -> PathBuf {
    infrastructure::expand_tilde(&path.to_string_lossy())
}

/// Builds the application state over `store`.
///
/// Favorites are loaded from the store immediately. Nothing is fetched until
/// [`AppState::start`] is called.
///
/// # Example
///
/// ```rust
/// use cinematch::storage::MemoryStore;
/// use cinematch::{initialize, Config, View};
///
/// let state = initialize(&Config::default(), Box::new(MemoryStore::default()));
/// assert_eq!(state.view(), View::Discover);
/// assert!(state.favorites().list().is_empty());
/// ```
pub fn initialize(config: &Config, store: Box<dyn KeyValueStore>) -> AppState {
    tracing::debug!("initializing cinematch");

    let favorites = FavoritesStore::load(store);
    AppState::new(favorites, &config.app_settings())
}
