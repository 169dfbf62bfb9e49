#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::character::CharacterStatus;
use crate::page::PageIndex;

/// Parameters of a single `GET /character` request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterQuery {
    /// Name filter applied by the server; empty matches every character.
    pub name: String,
    pub status: Option<CharacterStatus>,
    pub page: PageIndex,
}

impl CharacterQuery {
    pub fn new(name: impl Into<String>, page: PageIndex) -> Self {
        Self {
            name: name.into(),
            status: None,
            page,
        }
    }

    pub fn with_status(mut self, status: Option<CharacterStatus>) -> Self {
        self.status = status;
        self
    }

    /// Query pairs in wire order. Every parameter is always present and the
    /// page is rendered 1-based.
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("name", self.name.clone()),
            (
                "status",
                self.status
                    .map(|status| status.as_str().to_string())
                    .unwrap_or_default(),
            ),
            ("page", self.page.to_wire().to_string()),
        ]
    }
}
