//! Filter state and its mutual-exclusion rules.
//!
//! The raw search text and the committed search term are kept apart: typing
//! only changes `search_text`, while `search_term` changes when the debounce
//! elapses. Only committed fields take part in query selection.
//!
//! # Rules
//!
//! - Selecting a mood clears the search text, the committed term, and the year.
//! - Selecting a year clears the mood; the search is kept so both combine.
//! - Typing non-empty text clears the mood immediately, the year is kept.

use crate::catalog::{resolve, CatalogQuery};
use crate::domain::Mood;

/// The committed inputs that select a catalog query.
///
/// Two filter states with equal keys resolve to the same query, so an epoch
/// only needs to restart when the key changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterKey {
    pub search_term: String,
    pub year: Option<String>,
    pub mood: Option<Mood>,
}

/// Search text, year, and mood as currently selected by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    search_text: String,
    search_term: String,
    year: Option<String>,
    mood: Option<Mood>,
}

impl FilterState {
    /// Updates the raw search text.
    ///
    /// Non-empty text clears the mood. The committed term is left alone until
    /// [`commit_search`](Self::commit_search) runs.
    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
        if !is_blank(text) {
            self.mood = None;
        }
    }

    /// Commits the current raw text as the search term.
    pub fn commit_search(&mut self) {
        self.search_term = self.search_text.trim().to_string();
    }

    /// Sets or clears the year; an empty string counts as cleared.
    pub fn set_year(&mut self, year: Option<&str>) {
        self.year = year.map(str::trim).filter(|y| !y.is_empty()).map(ToString::to_string);
        if self.year.is_some() {
            self.mood = None;
        }
    }

    /// Sets or clears the mood. Setting one clears search and year.
    pub fn set_mood(&mut self, mood: Option<Mood>) {
        self.mood = mood;
        if mood.is_some() {
            self.search_text.clear();
            self.search_term.clear();
            self.year = None;
        }
    }

    /// Clears search, year, and mood.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn key(&self) -> FilterKey {
        FilterKey {
            search_term: self.search_term.clone(),
            year: self.year.clone(),
            mood: self.mood,
        }
    }

    /// Query for the committed fields.
    #[must_use]
    pub fn query(&self) -> CatalogQuery {
        resolve(&self.search_term, self.year.as_deref(), self.mood)
    }

    /// Whether the user has typed anything, committed or not.
    #[must_use]
    pub fn is_searching(&self) -> bool {
        !is_blank(&self.search_text)
    }

    #[must_use]
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    #[must_use]
    pub const fn mood(&self) -> Option<Mood> {
        self.mood
    }
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_clears_search_and_year() {
        let mut filter = FilterState::default();
        filter.set_search_text("matrix");
        filter.commit_search();
        filter.set_year(Some("1999"));

        filter.set_mood(Some(Mood::Scared));

        assert_eq!(filter.search_text(), "");
        assert_eq!(filter.search_term(), "");
        assert_eq!(filter.year(), None);
        assert!(!filter.is_searching());
        assert_eq!(filter.query(), CatalogQuery::DiscoverByGenres { genre_ids: vec![27] });
    }

    #[test]
    fn year_clears_mood_but_keeps_search() {
        let mut filter = FilterState::default();
        filter.set_mood(Some(Mood::Laugh));
        filter.set_year(Some("2010"));
        assert_eq!(filter.mood(), None);

        filter.set_search_text("inception");
        filter.commit_search();
        filter.set_year(Some("2010"));
        assert_eq!(filter.search_term(), "inception");
        assert_eq!(
            filter.query(),
            CatalogQuery::Search { query: "inception".into(), year: Some("2010".into()) }
        );
    }

    #[test]
    fn typing_clears_mood_before_commit() {
        let mut filter = FilterState::default();
        filter.set_mood(Some(Mood::Cry));

        filter.set_search_text("t");

        assert_eq!(filter.mood(), None);
        assert_eq!(filter.search_term(), "");
        assert_eq!(filter.query(), CatalogQuery::Popular);
    }

    #[test]
    fn blank_inputs_are_treated_as_unset() {
        let mut filter = FilterState::default();
        filter.set_mood(Some(Mood::Cry));
        filter.set_search_text("   ");
        filter.set_year(Some(""));

        assert_eq!(filter.mood(), Some(Mood::Cry));
        assert!(!filter.is_searching());
        assert_eq!(filter.year(), None);
    }

    #[test]
    fn key_tracks_committed_fields_only() {
        let mut filter = FilterState::default();
        let before = filter.key();
        filter.set_search_text("bat");
        assert_eq!(filter.key(), before);

        filter.commit_search();
        assert_ne!(filter.key(), before);
        assert_eq!(filter.key().search_term, "bat");
    }
}
