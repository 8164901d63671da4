//! View model types representing renderable UI state.
//!
//! This module defines immutable view models computed from application state.
//! View models hold only display-ready data: every string a renderer prints,
//! including greeting, section title, and empty-state copy, is decided here.
//!
//! # Architecture
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic beyond presentation rules.
//!
//! # Example
//!
//! ```rust
//! use cinematch::ui::viewmodel::{greeting, section_title};
//! use cinematch::app::View;
//!
//! assert_eq!(greeting(9), "Buenos días, cinéfilo ☀️");
//! assert_eq!(
//!     section_title(View::Discover, "matrix", Some("1999"), None),
//!     "Resultados para \"matrix\" en 1999"
//! );
//! ```

use crate::app::{AppState, View};
use crate::domain::{Mood, Movie, MovieDetails, WatchProvider};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// How many years back the year selector reaches from the current year.
pub const YEAR_SPAN: i32 = 46;

/// Year selector entry that clears the year filter.
pub const ALL_YEARS: &str = "all";

const TAGLINE: &str = "¿No sabes qué ver? Deja que el azar decida por ti.";
const FALLBACK_MOOD_TITLE: &str = "Recomendaciones para ti";

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Heading above the list.
    pub section_title: String,

    /// Movies of the displayed list, in display order.
    pub display_items: Vec<DisplayItem>,

    /// Replaces the list when there is nothing to show.
    pub empty_state: Option<EmptyState>,

    /// Pagination control below the list.
    pub footer: FooterControl,

    /// Open detail view, if any.
    pub detail: Option<DetailInfo>,

    /// Year selector entries, "all" first.
    pub year_options: Vec<String>,
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub view: View,

    /// Time-of-day greeting, only on the unfiltered discover view.
    pub greeting: Option<String>,
    pub tagline: Option<String>,

    /// Raw search box text.
    pub search_text: String,
    pub year: Option<String>,
    pub mood: Option<Mood>,
    pub favorites_count: usize,

    /// A first page is being fetched.
    pub loading: bool,
}

/// Display information for one movie card.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: i64,
    pub title: String,
    /// Release year or empty.
    pub year: String,
    /// Rating with one decimal.
    pub rating: String,
    pub poster_url: String,
    pub is_favorite: bool,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Pagination control shown under the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterControl {
    None,
    /// Auto-load marker; `loading` while a later page is in flight.
    Sentinel { loading: bool },
    /// Manual "load more" button.
    LoadMore { loading: bool },
}

impl FooterControl {
    /// Button label for the manual control.
    #[must_use]
    pub const fn label(self) -> Option<&'static str> {
        match self {
            Self::LoadMore { loading: true } => Some("Cargando..."),
            Self::LoadMore { loading: false } => Some("Cargar más películas"),
            Self::Sentinel { .. } | Self::None => None,
        }
    }
}

/// Detail view display information.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailInfo {
    pub item: DisplayItem,
    pub synopsis: String,
    pub backdrop_url: Option<String>,

    /// Sub-resources are still being fetched.
    pub loading: bool,
    pub trailer_url: Option<String>,
    pub providers: ProvidersInfo,
    pub cast: Vec<CastInfo>,
    pub similar: Vec<DisplayItem>,
}

/// Streaming availability for the preferred region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidersInfo {
    pub link: String,
    pub flatrate: Vec<String>,
    pub rent: Vec<String>,
    /// Logo URLs of every listed provider that has one.
    pub logos: Vec<String>,
}

impl ProvidersInfo {
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        self.flatrate.is_empty() && self.rent.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastInfo {
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

/// Greeting for a local hour (0-23).
#[must_use]
pub const fn greeting(hour: u32) -> &'static str {
    match hour {
        6..=11 => "Buenos días, cinéfilo ☀️",
        12..=18 => "Buenas tardes 🌤️",
        _ => "Noche de película 🍿",
    }
}

/// Heading for the list, from the view and the committed filters.
#[must_use]
pub fn section_title(view: View, search_term: &str, year: Option<&str>, mood: Option<Mood>) -> String {
    if view == View::Favorites {
        return "Mis Favoritos".to_string();
    }
    match (search_term.is_empty(), year) {
        (false, Some(year)) => format!("Resultados para \"{search_term}\" en {year}"),
        (false, None) => format!("Resultados para \"{search_term}\""),
        (true, Some(year)) => format!("Lo mejor de {year} 📅"),
        (true, None) => match mood {
            Some(mood) => mood
                .profile()
                .map_or(FALLBACK_MOOD_TITLE, |profile| profile.title)
                .to_string(),
            None => "Tendencias de hoy 🔥".to_string(),
        },
    }
}

/// Year selector entries: [`ALL_YEARS`], then `current_year` back
/// [`YEAR_SPAN`] years, newest first.
#[must_use]
pub fn year_options(current_year: i32) -> Vec<String> {
    std::iter::once(ALL_YEARS.to_string())
        .chain((0..YEAR_SPAN).map(|offset| (current_year - offset).to_string()))
        .collect()
}

fn display_item(movie: &Movie, state: &AppState) -> DisplayItem {
    DisplayItem {
        id: movie.id,
        title: movie.title.clone(),
        year: movie.release_year().unwrap_or_default().to_string(),
        rating: format!("{:.1}", movie.vote_average),
        poster_url: movie.poster_url(state.image_base_url()),
        is_favorite: state.favorites().is_favorite(movie.id),
    }
}

fn detail_info(movie: &Movie, details: Option<&MovieDetails>, state: &AppState) -> DetailInfo {
    let image_base = state.image_base_url();
    let mut info = DetailInfo {
        item: display_item(movie, state),
        synopsis: movie.synopsis().to_string(),
        backdrop_url: movie.backdrop_url(image_base),
        loading: details.is_none(),
        trailer_url: None,
        providers: ProvidersInfo::default(),
        cast: Vec::new(),
        similar: Vec::new(),
    };

    if let Some(details) = details {
        let names = |providers: &[WatchProvider]| -> Vec<String> {
            providers.iter().map(|p| p.provider_name.clone()).collect()
        };
        info.trailer_url = details.trailer_url();
        info.providers = ProvidersInfo {
            link: details.providers.link.clone(),
            flatrate: names(&details.providers.flatrate),
            rent: names(&details.providers.rent),
            logos: details
                .providers
                .flatrate
                .iter()
                .chain(&details.providers.rent)
                .filter_map(|p| p.logo_url(image_base))
                .collect(),
        };
        info.cast = details
            .cast
            .iter()
            .map(|member| CastInfo {
                name: member.name.clone(),
                character: member.character.clone(),
                profile_url: member.profile_url(image_base),
            })
            .collect();
        info.similar = details.similar.iter().map(|m| display_item(m, state)).collect();
    }
    info
}

/// Builds the view model for `state` at local time `now`.
#[must_use]
pub fn compute(state: &AppState, now: NaiveDateTime) -> UIViewModel {
    let filter = state.filter();
    let view = state.view();
    let engine = state.engine();

    let unfiltered = !filter.is_searching() && filter.mood().is_none() && filter.year().is_none();
    let show_greeting = view == View::Discover && unfiltered;

    let header = HeaderInfo {
        view,
        greeting: show_greeting.then(|| greeting(now.hour()).to_string()),
        tagline: show_greeting.then(|| TAGLINE.to_string()),
        search_text: filter.search_text().to_string(),
        year: filter.year().map(ToString::to_string),
        mood: filter.mood(),
        favorites_count: state.favorites().list().len(),
        loading: view == View::Discover && engine.is_loading() && engine.page() == 0,
    };

    let display_items: Vec<DisplayItem> = state
        .displayed_movies()
        .iter()
        .map(|movie| display_item(movie, state))
        .collect();

    let empty_state = match view {
        View::Favorites if display_items.is_empty() => Some(EmptyState {
            message: "Aún no has guardado películas.".to_string(),
            subtitle: "Ve a explorar y marca algunas con ❤️".to_string(),
        }),
        View::Discover
            if (filter.is_searching() || filter.year().is_some())
                && display_items.is_empty()
                && !engine.is_loading() =>
        {
            Some(EmptyState {
                message: "Ups, no encontramos esa película. 😿".to_string(),
                subtitle: "¿Quizás un documental de gatos?".to_string(),
            })
        }
        _ => None,
    };

    let detail = state
        .detail()
        .selected()
        .map(|movie| detail_info(movie, state.detail().details(), state));

    tracing::trace!(
        items = display_items.len(),
        empty = empty_state.is_some(),
        "view model computed"
    );

    UIViewModel {
        header,
        section_title: section_title(view, filter.search_term(), filter.year(), filter.mood()),
        display_items,
        empty_state,
        footer: state.footer_control(),
        detail,
        year_options: year_options(now.year()),
    }
}
