//! Platform locations for configuration, persisted data, and traces.
//!
//! Every function falls back to the current directory when the platform
//! reports no home, so callers never have to handle a missing location.

use std::path::{Path, PathBuf};

/// Directory name used under the platform config and data roots.
pub const APP_DIR: &str = "cinematch";

/// Returns the data directory, e.g. `~/.local/share/cinematch` on Linux.
///
/// # Examples
///
/// ```
/// use cinematch::infrastructure::data_dir;
///
/// assert!(data_dir().ends_with("cinematch"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Returns `<config dir>/cinematch/config.toml`.
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Key-value store file inside `data_dir`.
#[must_use]
pub fn store_path(data_dir: &Path) -> PathBuf {
    data_dir.join("store.json")
}

/// Expands a leading `~` to the home directory.
///
/// # Examples
///
/// ```
/// use cinematch::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/var/lib/cinematch"), PathBuf::from("/var/lib/cinematch"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/movies"), home.join("movies"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = || dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    if path == "~" {
        home()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home().join(rest)
    } else {
        PathBuf::from(path)
    }
}
