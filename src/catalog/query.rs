//! Query resolution from filter inputs.
//!
//! [`resolve`] maps the committed search term, year, and mood to exactly one
//! [`CatalogQuery`]. The query is chosen once per filter epoch; every page of
//! that epoch is fetched with the same query.
//!
//! # Priority
//!
//! ```text
//! search + year  → Search { year: Some }
//! search         → Search { year: None }
//! year           → DiscoverByYear
//! mood           → DiscoverByGenres   (Popular if the mood has no genres)
//! (nothing)      → Popular
//! ```

use crate::catalog::client::Catalog;
use crate::domain::error::Result;
use crate::domain::{Mood, Movie};
use serde::{Deserialize, Serialize};

/// The single remote query driving one filter epoch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogQuery {
    /// Globally popular list.
    Popular,
    /// Discovery filtered to genres, most popular first.
    DiscoverByGenres { genre_ids: Vec<u32> },
    /// Discovery filtered to a release year, most popular first.
    DiscoverByYear { year: String },
    /// Full-text search, optionally scoped to a release year.
    Search { query: String, year: Option<String> },
}

/// Selects the catalog query for the given filter inputs.
///
/// Pure and total: blank search text and blank years count as unset, and a
/// mood without a genre mapping falls back to the popular list.
///
/// # Examples
///
/// ```
/// use cinematch::catalog::{resolve, CatalogQuery};
/// use cinematch::Mood;
///
/// assert_eq!(
///     resolve("matrix", Some("1999"), None),
///     CatalogQuery::Search { query: "matrix".into(), year: Some("1999".into()) }
/// );
/// assert_eq!(
///     resolve("", None, Some(Mood::Laugh)),
///     CatalogQuery::DiscoverByGenres { genre_ids: vec![35] }
/// );
/// assert_eq!(resolve("", None, None), CatalogQuery::Popular);
/// ```
#[must_use]
pub fn resolve(search_term: &str, year: Option<&str>, mood: Option<Mood>) -> CatalogQuery {
    let search_term = search_term.trim();
    let year = year.map(str::trim).filter(|y| !y.is_empty());

    match (search_term.is_empty(), year) {
        (false, year) => CatalogQuery::Search {
            query: search_term.to_string(),
            year: year.map(ToString::to_string),
        },
        (true, Some(year)) => CatalogQuery::DiscoverByYear { year: year.to_string() },
        (true, None) => match mood.map(Mood::genre_ids) {
            Some(genre_ids) if !genre_ids.is_empty() => CatalogQuery::DiscoverByGenres {
                genre_ids: genre_ids.to_vec(),
            },
            _ => CatalogQuery::Popular,
        },
    }
}

impl CatalogQuery {
    /// Fetches one page of this query from `catalog`.
    ///
    /// # Errors
    ///
    /// Propagates the catalog client's error unchanged.
    pub fn fetch(&self, catalog: &dyn Catalog, page: u32) -> Result<Vec<Movie>> {
        match self {
            Self::Popular => catalog.popular(page),
            Self::DiscoverByGenres { genre_ids } => catalog.discover_by_genres(genre_ids, page),
            Self::DiscoverByYear { year } => catalog.discover_by_year(year, page),
            Self::Search { query, year } => catalog.search(query, year.as_deref(), page),
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::DiscoverByGenres { .. } => "discover_genres",
            Self::DiscoverByYear { .. } => "discover_year",
            Self::Search { year: Some(_), .. } => "search_year",
            Self::Search { year: None, .. } => "search",
        }
    }
}
