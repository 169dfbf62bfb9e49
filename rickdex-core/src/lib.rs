//! Search and pagination coordination for the Rick and Morty character API.
//!
//! The crate is split into three pieces:
//!
//! - [`api`]: the [`CharacterApi`] seam and its reqwest-backed
//!   [`ApiClient`].
//! - [`query`]: the [`QueryCoordinator`], which turns search-term and page
//!   changes into a newest-wins sequence of requests and publishes every
//!   outcome on a [`ResultStream`].
//! - [`table`] and [`selection`]: passive sinks a host view layer feeds with
//!   outcomes and dialog choices.

/// HTTP access to the character endpoint.
pub mod api;
/// Fetch and service errors.
pub mod error;
/// Debounced, latest-wins query coordination.
pub mod query;
/// Picking a value from a record to search for.
pub mod selection;
/// Local view over the latest page.
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, CharacterApi};
pub use error::{CoreError, FetchError, Result};
pub use query::{
    FetchFailure, FetchOrigin, PageUpdate, QueryCoordinator, QueryOutcome,
    ResultStream,
};
pub use selection::{DialogSelection, SearchTermSink};
pub use table::{PageBounds, ResultTable};

pub use rickdex_model as model;
