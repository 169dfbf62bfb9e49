use std::fmt;
use std::sync::Arc;

use rickdex_model::{CharacterQuery, PageResult};

use crate::error::FetchError;

/// Which request channel a fetch belongs to.
///
/// Supersession only happens within a channel: a page fetch never cancels
/// a term fetch and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchOrigin {
    /// Debounced search-term changes.
    Term,
    /// Page, status and start-up fetches.
    Page,
}

impl fmt::Display for FetchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOrigin::Term => f.write_str("term"),
            FetchOrigin::Page => f.write_str("page"),
        }
    }
}

/// A successful fetch.
#[derive(Debug, Clone)]
pub struct PageUpdate {
    /// Channel that issued the fetch.
    pub origin: FetchOrigin,
    /// Query that produced this page.
    pub query: CharacterQuery,
    /// The page, shared between subscribers.
    pub result: Arc<PageResult>,
}

/// A failed fetch. The coordinator keeps accepting input afterwards.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// Channel that issued the fetch.
    pub origin: FetchOrigin,
    /// Query that failed.
    pub query: CharacterQuery,
    /// Why it failed.
    pub error: FetchError,
}

/// One notification on the results stream.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// A page arrived.
    Loaded(PageUpdate),
    /// The newest fetch on a channel failed.
    Failed(FetchFailure),
}

impl QueryOutcome {
    /// Channel the outcome belongs to.
    pub fn origin(&self) -> FetchOrigin {
        match self {
            QueryOutcome::Loaded(update) => update.origin,
            QueryOutcome::Failed(failure) => failure.origin,
        }
    }

    /// Query the outcome answers.
    pub fn query(&self) -> &CharacterQuery {
        match self {
            QueryOutcome::Loaded(update) => &update.query,
            QueryOutcome::Failed(failure) => &failure.query,
        }
    }

    /// The page, when one was loaded.
    pub fn page(&self) -> Option<&Arc<PageResult>> {
        match self {
            QueryOutcome::Loaded(update) => Some(&update.result),
            QueryOutcome::Failed(_) => None,
        }
    }

    /// The error, when the fetch failed.
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            QueryOutcome::Loaded(_) => None,
            QueryOutcome::Failed(failure) => Some(&failure.error),
        }
    }

    /// True for [`QueryOutcome::Failed`].
    pub fn is_failure(&self) -> bool {
        matches!(self, QueryOutcome::Failed(_))
    }
}
