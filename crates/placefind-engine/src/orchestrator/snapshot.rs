use std::fmt;

use placefind_core::{Coordinate, Place};
use serde::Serialize;

/// Where the most recent search cycle stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Matching,
    QueryingPoi,
    QueryingGeocoder,
    Published,
    Failed,
}

/// User-visible informational message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    NoResults { query: String },
    MissingOrigin,
    MissingQuery,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::NoResults { query } => write!(f, "No results found for \"{query}\""),
            Notice::MissingOrigin => write!(f, "Your location is not available yet"),
            Notice::MissingQuery => write!(f, "Enter a place or category to search for"),
        }
    }
}

/// What the map and list views render. Replaced as a whole on every commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSnapshot {
    /// Search cycle that last wrote this snapshot.
    pub generation: u64,
    pub phase: SearchPhase,
    /// Text (or category label) of the committed cycle.
    pub query: Option<String>,
    pub origin: Option<Coordinate>,
    pub places: Vec<Place>,
    /// Index into `places`.
    pub selected: Option<usize>,
    pub notice: Option<Notice>,
}

impl SearchSnapshot {
    #[must_use]
    pub fn selected_place(&self) -> Option<&Place> {
        self.selected.and_then(|i| self.places.get(i))
    }
}

/// Why a search was refused before any request was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Precondition {
    MissingOrigin,
    EmptyQuery,
    UnknownCategory(String),
}

impl Precondition {
    pub(crate) fn notice(&self) -> Option<Notice> {
        match self {
            Precondition::MissingOrigin => Some(Notice::MissingOrigin),
            Precondition::EmptyQuery => Some(Notice::MissingQuery),
            Precondition::UnknownCategory(_) => None,
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::MissingOrigin => write!(f, "origin position is not known"),
            Precondition::EmptyQuery => write!(f, "query text is empty"),
            Precondition::UnknownCategory(key) => write!(f, "unknown category '{key}'"),
        }
    }
}

/// Result of one search cycle as seen by its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Published { count: usize },
    NoResults,
    MissingPrecondition(Precondition),
    /// A newer cycle started before this one resolved; nothing was written.
    Superseded,
}
