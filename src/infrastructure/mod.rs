//! Environment-facing helpers: platform directories and path expansion.

pub mod paths;

pub use paths::{data_dir, default_config_path, expand_tilde, store_path};
