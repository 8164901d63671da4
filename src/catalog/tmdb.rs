//! TMDB v3 HTTP catalog client.
//!
//! Blocking client built on a shared `ureq` agent. Every request carries the
//! bearer token and the configured `language`; discovery requests are sorted by
//! descending popularity and searches always exclude adult titles.

use crate::catalog::client::Catalog;
use crate::catalog::models::{CreditsResponse, PagedResponse, WatchProvidersResponse};
use crate::domain::error::{CinematchError, Result};
use crate::domain::{CastMember, Movie, ProviderAvailability, Video};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default TMDB API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Connection settings for [`TmdbClient`].
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    /// API root without trailing slash.
    pub base_url: String,
    /// v4 read access token sent as `Authorization: Bearer`.
    pub api_token: String,
    /// Response language, e.g. `es-ES`.
    pub language: String,
    /// Fallback languages for videos, e.g. `es,en`.
    pub video_languages: String,
    /// Provider regions in preference order.
    pub regions: Vec<String>,
    /// Global timeout applied to each request.
    pub timeout: Duration,
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            language: "es-ES".to_string(),
            video_languages: "es,en".to_string(),
            regions: vec!["DO".to_string(), "US".to_string()],
            timeout: Duration::from_secs(15),
        }
    }
}

/// A resolved request: path relative to the API root plus query parameters.
///
/// The `language` parameter is appended by the client for every request and is
/// therefore not part of the endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub path: String,
    pub params: Vec<(&'static str, String)>,
}

impl Endpoint {
    fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), params: Vec::new() }
    }

    fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    #[must_use]
    pub fn popular(page: u32) -> Self {
        Self::new("/movie/popular").param("page", page)
    }

    #[must_use]
    pub fn discover_by_genres(genre_ids: &[u32], page: u32) -> Self {
        let genres = genre_ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        Self::new("/discover/movie")
            .param("with_genres", genres)
            .param("sort_by", "popularity.desc")
            .param("page", page)
    }

    #[must_use]
    pub fn discover_by_year(year: &str, page: u32) -> Self {
        Self::new("/discover/movie")
            .param("primary_release_year", year)
            .param("sort_by", "popularity.desc")
            .param("page", page)
    }

    #[must_use]
    pub fn search(query: &str, year: Option<&str>, page: u32) -> Self {
        let endpoint = Self::new("/search/movie")
            .param("query", query)
            .param("include_adult", false)
            .param("page", page);
        match year {
            Some(year) => endpoint.param("primary_release_year", year),
            None => endpoint,
        }
    }

    #[must_use]
    pub fn videos(movie_id: i64, video_languages: &str) -> Self {
        Self::new(format!("/movie/{movie_id}/videos"))
            .param("include_video_language", video_languages)
    }

    #[must_use]
    pub fn watch_providers(movie_id: i64) -> Self {
        Self::new(format!("/movie/{movie_id}/watch/providers"))
    }

    #[must_use]
    pub fn credits(movie_id: i64) -> Self {
        Self::new(format!("/movie/{movie_id}/credits"))
    }

    #[must_use]
    pub fn similar(movie_id: i64) -> Self {
        Self::new(format!("/movie/{movie_id}/similar"))
    }
}

/// TMDB catalog client.
///
/// # Examples
///
/// ```no_run
/// use cinematch::catalog::{Catalog, TmdbClient, TmdbSettings};
///
/// let client = TmdbClient::new(TmdbSettings {
///     api_token: std::env::var("TMDB_API_TOKEN")?,
///     ..Default::default()
/// });
/// let movies = client.popular(1)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TmdbClient {
    agent: ureq::Agent,
    settings: TmdbSettings,
}

impl TmdbClient {
    #[must_use]
    pub fn new(settings: TmdbSettings) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(settings.timeout))
            .max_idle_connections_per_host(2)
            .build()
            .new_agent();

        Self { agent, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &TmdbSettings {
        &self.settings
    }

    /// Issues a GET for `endpoint` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`CinematchError::Catalog`] on transport failure or non-2xx
    /// status and [`CinematchError::Decode`] if the body is not the expected
    /// JSON shape.
    fn get<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let _span = tracing::debug_span!("tmdb_get",
            path = %endpoint.path,
            params = endpoint.params.len()
        ).entered();

        let url = format!("{}{}", self.settings.base_url.trim_end_matches('/'), endpoint.path);
        let auth = format!("Bearer {}", self.settings.api_token);

        let mut request = self
            .agent
            .get(url.as_str())
            .header("Authorization", auth.as_str())
            .header("Accept", "application/json")
            .query("language", &self.settings.language);
        for (key, value) in &endpoint.params {
            request = request.query(*key, value);
        }

        let mut response = request
            .call()
            .map_err(|e| CinematchError::Catalog(format!("GET {}: {e}", endpoint.path)))?;

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| CinematchError::Catalog(format!("reading {}: {e}", endpoint.path)))?;

        tracing::trace!(bytes = body.len(), "response received");
        Ok(serde_json::from_str(&body)?)
    }

    fn get_page<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<Vec<T>> {
        let page: PagedResponse<T> = self.get(endpoint)?;
        tracing::debug!(
            page = page.page,
            total_pages = ?page.total_pages,
            results = page.results.len(),
            "page decoded"
        );
        Ok(page.results)
    }
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.settings.base_url)
            .field("language", &self.settings.language)
            .finish_non_exhaustive()
    }
}

impl Catalog for TmdbClient {
    fn popular(&self, page: u32) -> Result<Vec<Movie>> {
        self.get_page(&Endpoint::popular(page))
    }

    fn discover_by_genres(&self, genre_ids: &[u32], page: u32) -> Result<Vec<Movie>> {
        self.get_page(&Endpoint::discover_by_genres(genre_ids, page))
    }

    fn discover_by_year(&self, year: &str, page: u32) -> Result<Vec<Movie>> {
        self.get_page(&Endpoint::discover_by_year(year, page))
    }

    fn search(&self, query: &str, year: Option<&str>, page: u32) -> Result<Vec<Movie>> {
        self.get_page(&Endpoint::search(query, year, page))
    }

    fn videos(&self, movie_id: i64) -> Result<Vec<Video>> {
        self.get_page(&Endpoint::videos(movie_id, &self.settings.video_languages))
    }

    fn watch_providers(&self, movie_id: i64) -> Result<ProviderAvailability> {
        let response: WatchProvidersResponse = self.get(&Endpoint::watch_providers(movie_id))?;
        Ok(response.resolve(&self.settings.regions))
    }

    fn credits(&self, movie_id: i64) -> Result<Vec<CastMember>> {
        let response: CreditsResponse = self.get(&Endpoint::credits(movie_id))?;
        Ok(response.cast)
    }

    fn similar(&self, movie_id: i64) -> Result<Vec<Movie>> {
        self.get_page(&Endpoint::similar(movie_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(endpoint: &'a Endpoint, key: &str) -> Option<&'a str> {
        endpoint
            .params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn genre_discovery_joins_ids_and_sorts_by_popularity() {
        let endpoint = Endpoint::discover_by_genres(&[28, 12], 2);
        assert_eq!(endpoint.path, "/discover/movie");
        assert_eq!(param(&endpoint, "with_genres"), Some("28,12"));
        assert_eq!(param(&endpoint, "sort_by"), Some("popularity.desc"));
        assert_eq!(param(&endpoint, "page"), Some("2"));
    }

    #[test]
    fn search_excludes_adult_and_scopes_year_only_when_given() {
        let scoped = Endpoint::search("matrix", Some("1999"), 1);
        assert_eq!(param(&scoped, "include_adult"), Some("false"));
        assert_eq!(param(&scoped, "primary_release_year"), Some("1999"));

        let unscoped = Endpoint::search("matrix", None, 1);
        assert_eq!(param(&unscoped, "primary_release_year"), None);
        assert_eq!(param(&unscoped, "query"), Some("matrix"));
    }

    #[test]
    fn detail_endpoints_embed_movie_id() {
        assert_eq!(Endpoint::watch_providers(603).path, "/movie/603/watch/providers");
        assert_eq!(Endpoint::credits(603).path, "/movie/603/credits");
        assert_eq!(Endpoint::similar(603).path, "/movie/603/similar");
        let videos = Endpoint::videos(603, "es,en");
        assert_eq!(param(&videos, "include_video_language"), Some("es,en"));
    }

    #[test]
    fn malformed_base_url_surfaces_catalog_error() {
        let client = TmdbClient::new(TmdbSettings {
            base_url: "not a url".to_string(),
            timeout: Duration::from_millis(500),
            ..Default::default()
        });

        let err = client.popular(1).unwrap_err();
        assert!(matches!(err, CinematchError::Catalog(_)));
    }
}
