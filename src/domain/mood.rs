//! Mood filter and its static configuration table.
//!
//! Each mood maps to a set of catalog genre ids plus display copy. The mapping
//! lives in [`MOOD_PROFILES`] as plain data so it can be localized or extended
//! without touching the query logic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A viewer mood used to pick genres for discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Adrenaline,
    Cry,
    Laugh,
    Scared,
}

/// Static configuration for one mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodProfile {
    pub mood: Mood,
    /// Stable identifier used in commands and persisted state.
    pub id: &'static str,
    /// Button label.
    pub label: &'static str,
    /// Catalog genre ids, combined with a comma in discovery requests.
    pub genre_ids: &'static [u32],
    /// Section heading shown while the mood drives the list.
    pub title: &'static str,
}

/// Mood table: action+adventure, drama+romance, comedy, horror.
pub const MOOD_PROFILES: [MoodProfile; 4] = [
    MoodProfile {
        mood: Mood::Adrenaline,
        id: "adrenaline",
        label: "Adrenalina",
        genre_ids: &[28, 12],
        title: "Explosiones y Velocidad 💥",
    },
    MoodProfile {
        mood: Mood::Cry,
        id: "cry",
        label: "Llorar",
        genre_ids: &[18, 10749],
        title: "Prepara los pañuelos 😢",
    },
    MoodProfile {
        mood: Mood::Laugh,
        id: "laugh",
        label: "Reír",
        genre_ids: &[35],
        title: "Risas garantizadas 😂",
    },
    MoodProfile {
        mood: Mood::Scared,
        id: "scared",
        label: "Miedo",
        genre_ids: &[27],
        title: "No apagues la luz... 👻",
    },
];

impl Mood {
    /// Looks up this mood's profile in [`MOOD_PROFILES`].
    #[must_use]
    pub fn profile(self) -> Option<&'static MoodProfile> {
        MOOD_PROFILES.iter().find(|p| p.mood == self)
    }

    /// Genre ids for this mood; empty when the table has no entry.
    #[must_use]
    pub fn genre_ids(self) -> &'static [u32] {
        self.profile().map_or(&[], |p| p.genre_ids)
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Adrenaline => "adrenaline",
            Self::Cry => "cry",
            Self::Laugh => "laugh",
            Self::Scared => "scared",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        MOOD_PROFILES
            .iter()
            .find(|p| p.id == wanted || p.label.to_lowercase() == wanted)
            .map(|p| p.mood)
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}
