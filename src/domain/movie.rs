//! Movie domain model and detail sub-resources.
//!
//! These types mirror the catalog's wire shape so that the same serde
//! representation is used for catalog responses and for the persisted
//! favorites set.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Maximum number of cast members kept for the detail view.
pub const CAST_LIMIT: usize = 8;

/// Maximum number of similar titles kept for the detail view.
pub const SIMILAR_LIMIT: usize = 6;

/// Default TMDB image CDN prefix.
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/150?text=No+Image";

/// A film returned by the catalog.
///
/// Movies are immutable once fetched and compare equal by `id` only, so the
/// same title fetched on two different pages is considered one movie.
///
/// # Examples
///
/// ```
/// use cinematch::Movie;
///
/// let movie = Movie::new(603, "The Matrix").with_release_date("1999-03-30");
/// assert_eq!(movie.release_year(), Some("1999"));
/// assert_eq!(movie, Movie::new(603, "Matrix (dup)"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl Movie {
    /// Creates a movie with only an id and a title set.
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            vote_average: 0.0,
            release_date: None,
        }
    }

    #[must_use]
    pub fn with_release_date(mut self, date: impl Into<String>) -> Self {
        self.release_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_poster(mut self, path: impl Into<String>) -> Self {
        self.poster_path = Some(path.into());
        self
    }

    /// Returns the `YYYY` prefix of the release date, if one is present.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }

    /// Poster URL at `w500`, or a placeholder when the movie has no poster.
    #[must_use]
    pub fn poster_url(&self, image_base: &str) -> String {
        self.poster_path.as_deref().map_or_else(
            || POSTER_PLACEHOLDER.to_string(),
            |path| format!("{image_base}/w500{path}"),
        )
    }

    /// Full-size backdrop URL, falling back to the poster artwork.
    #[must_use]
    pub fn backdrop_url(&self, image_base: &str) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .or(self.poster_path.as_deref())
            .map(|path| format!("{image_base}/original{path}"))
    }

    /// Overview text, or the fixed "no synopsis" copy when empty.
    #[must_use]
    pub fn synopsis(&self) -> &str {
        if self.overview.trim().is_empty() {
            "No hay sinopsis disponible."
        } else {
            &self.overview
        }
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Movie {}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A video attached to a movie (trailer, teaser, featurette...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Video {
    /// Whether this video is a YouTube-hosted trailer.
    #[must_use]
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && self.kind == "Trailer"
    }
}

/// A streaming or rental service offering a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchProvider {
    pub provider_id: i64,
    pub provider_name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
}

impl WatchProvider {
    #[must_use]
    pub fn logo_url(&self, image_base: &str) -> Option<String> {
        self.logo_path
            .as_deref()
            .map(|path| format!("{image_base}/original{path}"))
    }
}

/// Providers for a movie in the preferred region.
///
/// An empty value is a valid state meaning "not available for streaming".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderAvailability {
    pub link: String,
    pub flatrate: Vec<WatchProvider>,
    pub rent: Vec<WatchProvider>,
}

impl ProviderAvailability {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty()
    }
}

/// A cast member credited on a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl CastMember {
    #[must_use]
    pub fn profile_url(&self, image_base: &str) -> String {
        self.profile_path.as_deref().map_or_else(
            || PROFILE_PLACEHOLDER.to_string(),
            |path| format!("{image_base}/w200{path}"),
        )
    }
}

/// On-demand sub-resources shown in the detail view of one movie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// YouTube key of the first trailer, if any.
    pub trailer_key: Option<String>,
    pub providers: ProviderAvailability,
    /// Top-billed cast, at most [`CAST_LIMIT`] entries.
    pub cast: Vec<CastMember>,
    /// Similar titles, at most [`SIMILAR_LIMIT`] entries.
    pub similar: Vec<Movie>,
}

impl MovieDetails {
    /// Builds the detail view from raw sub-resource lists.
    ///
    /// Picks the first YouTube trailer and truncates cast and similar titles to
    /// their display limits.
    #[must_use]
    pub fn assemble(
        videos: &[Video],
        providers: ProviderAvailability,
        mut cast: Vec<CastMember>,
        mut similar: Vec<Movie>,
    ) -> Self {
        cast.truncate(CAST_LIMIT);
        similar.truncate(SIMILAR_LIMIT);

        Self {
            trailer_key: videos
                .iter()
                .find(|v| v.is_youtube_trailer())
                .map(|v| v.key.clone()),
            providers,
            cast,
            similar,
        }
    }

    #[must_use]
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key
            .as_ref()
            .map(|key| format!("https://www.youtube.com/embed/{key}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, kind: &str, key: &str) -> Video {
        Video {
            id: key.to_string(),
            key: key.to_string(),
            name: String::new(),
            site: site.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn deserializes_wire_shape_with_nulls() {
        let json = r#"{"id":1,"title":"Heat","overview":"","poster_path":null,
            "backdrop_path":"/b.jpg","vote_average":8.3,"release_date":"1995-12-15",
            "popularity":40.1}"#;
        let movie: Movie = serde_json::from_str(json).unwrap();

        assert_eq!(movie.id, 1);
        assert!(movie.poster_path.is_none());
        assert_eq!(movie.release_year(), Some("1995"));
        assert_eq!(movie.synopsis(), "No hay sinopsis disponible.");
    }

    #[test]
    fn empty_release_date_has_no_year() {
        let movie = Movie::new(2, "Untitled").with_release_date("");
        assert_eq!(movie.release_year(), None);
    }

    #[test]
    fn poster_url_falls_back_to_placeholder() {
        let base = DEFAULT_IMAGE_BASE_URL;
        assert_eq!(
            Movie::new(1, "a").with_poster("/p.jpg").poster_url(base),
            "https://image.tmdb.org/t/p/w500/p.jpg"
        );
        assert!(Movie::new(1, "a").poster_url(base).contains("placeholder"));
        assert_eq!(
            Movie::new(1, "a").with_poster("/p.jpg").backdrop_url(base).as_deref(),
            Some("https://image.tmdb.org/t/p/original/p.jpg")
        );
    }

    #[test]
    fn provider_logo_only_when_path_present() {
        let mut provider = WatchProvider {
            provider_id: 8,
            provider_name: "Netflix".to_string(),
            logo_path: Some("/n.png".to_string()),
        };
        assert_eq!(
            provider.logo_url(DEFAULT_IMAGE_BASE_URL).as_deref(),
            Some("https://image.tmdb.org/t/p/original/n.png")
        );
        provider.logo_path = None;
        assert_eq!(provider.logo_url(DEFAULT_IMAGE_BASE_URL), None);
    }

    #[test]
    fn assemble_picks_first_youtube_trailer_and_truncates() {
        let videos = vec![
            video("Vimeo", "Trailer", "v1"),
            video("YouTube", "Teaser", "t1"),
            video("YouTube", "Trailer", "yt1"),
            video("YouTube", "Trailer", "yt2"),
        ];
        let cast = (0..12)
            .map(|i| CastMember { id: i, name: format!("actor {i}"), character: String::new(), profile_path: None })
            .collect();
        let similar = (0..10).map(|i| Movie::new(i, "s")).collect();

        let details = MovieDetails::assemble(&videos, ProviderAvailability::default(), cast, similar);

        assert_eq!(details.trailer_key.as_deref(), Some("yt1"));
        assert_eq!(details.trailer_url().as_deref(), Some("https://www.youtube.com/embed/yt1"));
        assert_eq!(details.cast.len(), CAST_LIMIT);
        assert_eq!(details.similar.len(), SIMILAR_LIMIT);
        assert!(details.providers.is_unavailable());
    }
}
