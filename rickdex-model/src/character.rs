use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Identifier assigned to a character by the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CharacterId(pub u32);

impl CharacterId {
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CharacterId)
    }
}

/// Life status as reported by the API.
///
/// The wire spelling is `"Alive"`, `"Dead"` and a lowercase `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[cfg_attr(feature = "serde", serde(rename = "unknown"))]
    Unknown,
}

impl CharacterStatus {
    pub const ALL: [CharacterStatus; 3] = [
        CharacterStatus::Alive,
        CharacterStatus::Dead,
        CharacterStatus::Unknown,
    ];

    /// Text used both on the wire and for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "Alive",
            CharacterStatus::Dead => "Dead",
            CharacterStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ModelError::UnknownStatus(trimmed.to_string()))
    }
}

/// A named link to another API resource (origin or last known location).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedResource {
    pub name: String,
    /// Empty when the API has no resource for the name (e.g. "unknown").
    #[cfg_attr(feature = "serde", serde(default))]
    pub url: String,
}

/// One character as returned by `GET /character`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterRecord {
    pub id: CharacterId,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    /// Free-form subtype, frequently empty.
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: String,
    pub gender: String,
    pub origin: NamedResource,
    pub location: NamedResource,
    pub image: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub episode: Vec<String>,
    pub url: String,
    pub created: DateTime<Utc>,
}

impl CharacterRecord {
    /// Number of episodes the character appears in.
    pub fn episode_count(&self) -> usize {
        self.episode.len()
    }
}
