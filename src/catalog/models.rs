//! Wire response models for the catalog API.
//!
//! These envelopes only exist to unwrap TMDB responses into the domain types.
//! Missing fields default to empty collections so a sparse response never
//! becomes an error.

use crate::domain::{CastMember, ProviderAvailability, WatchProvider};
use serde::Deserialize;
use std::collections::HashMap;

/// A paged list envelope (`/movie/popular`, `/discover/movie`, `/search/movie`,
/// `/movie/{id}/similar`, `/movie/{id}/videos`).
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// `/movie/{id}/credits` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsResponse {
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

/// Providers offered in a single region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProviders {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<WatchProvider>,
    #[serde(default)]
    pub rent: Vec<WatchProvider>,
}

/// `/movie/{id}/watch/providers` envelope, keyed by ISO region code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProvidersResponse {
    #[serde(default)]
    pub results: HashMap<String, RegionProviders>,
}

impl WatchProvidersResponse {
    /// Picks the first region in `preference` that has an entry.
    ///
    /// Returns an empty [`ProviderAvailability`] when none of the preferred
    /// regions is present.
    #[must_use]
    pub fn resolve(mut self, preference: &[String]) -> ProviderAvailability {
        let Some(region) = preference.iter().find_map(|code| self.results.remove(code)) else {
            tracing::debug!(regions = ?preference, "no providers for preferred regions");
            return ProviderAvailability::default();
        };

        ProviderAvailability {
            link: region.link.unwrap_or_default(),
            flatrate: region.flatrate,
            rent: region.rent,
        }
    }
}
