//! View mode for the application.
//!
//! The view selects which list is rendered and whether pagination is active:
//!
//! - **Discover**: the paginated catalog list for the current filters
//! - **Favorites**: the locally saved movies; never paginates or fetches

use std::fmt;

/// Which list is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    /// Catalog results for the current filter epoch.
    #[default]
    Discover,

    /// The user's saved movies.
    Favorites,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => f.write_str("discover"),
            Self::Favorites => f.write_str("favorites"),
        }
    }
}
