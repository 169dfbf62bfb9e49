use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::character::CharacterRecord;

/// Zero-based page position as tracked by the pagination control.
///
/// The API numbers pages from 1; [`PageIndex::to_wire`] performs the
/// translation and is the only place it happens.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PageIndex(pub u32);

impl PageIndex {
    pub const FIRST: PageIndex = PageIndex(0);

    pub fn new(index: u32) -> Self {
        PageIndex(index)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// 1-based page number sent as the `page` query parameter.
    pub fn to_wire(&self) -> u32 {
        self.0.saturating_add(1)
    }

    /// Inverse of [`PageIndex::to_wire`]; `None` for page `0`.
    pub fn from_wire(page: u32) -> Option<Self> {
        page.checked_sub(1).map(PageIndex)
    }

    pub fn next(&self) -> Self {
        PageIndex(self.0.saturating_add(1))
    }

    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub(1).map(PageIndex)
    }
}

impl fmt::Display for PageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Pagination block of a `GET /character` response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageInfo {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Raw response body of `GET /character`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CharacterPage {
    pub info: PageInfo,
    #[cfg_attr(feature = "serde", serde(default))]
    pub results: Vec<CharacterRecord>,
}

/// One fetched page of records plus the pagination totals.
///
/// A new value replaces the previous one wholesale; pages are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageResult {
    /// Number of characters matching the query across all pages.
    pub total_count: u32,
    /// Number of pages the API reports for the query.
    pub page_count: u32,
    pub records: Vec<CharacterRecord>,
}

impl PageResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<CharacterPage> for PageResult {
    fn from(page: CharacterPage) -> Self {
        Self {
            total_count: page.info.count,
            page_count: page.info.pages,
            records: page.results,
        }
    }
}
