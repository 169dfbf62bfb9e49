use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::character::CharacterRecord;
use crate::error::ModelError;

/// Record field a local substring filter is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterField {
    #[default]
    Status,
    Name,
    Species,
    Type,
    Gender,
    Origin,
    Location,
}

impl FilterField {
    pub const ALL: [FilterField; 7] = [
        FilterField::Status,
        FilterField::Name,
        FilterField::Species,
        FilterField::Type,
        FilterField::Gender,
        FilterField::Origin,
        FilterField::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Status => "status",
            FilterField::Name => "name",
            FilterField::Species => "species",
            FilterField::Type => "type",
            FilterField::Gender => "gender",
            FilterField::Origin => "origin",
            FilterField::Location => "location",
        }
    }

    /// Borrow the text of this field from a record.
    pub fn text<'a>(&self, record: &'a CharacterRecord) -> &'a str {
        match self {
            FilterField::Status => record.status.as_str(),
            FilterField::Name => &record.name,
            FilterField::Species => &record.species,
            FilterField::Type => &record.kind,
            FilterField::Gender => &record.gender,
            FilterField::Origin => &record.origin.name,
            FilterField::Location => &record.location.name,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterField {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                ModelError::UnknownFilterField(trimmed.to_string())
            })
    }
}
