//! Search/pagination request pipeline.
//!
//! Term changes are debounced and deduplicated before they fetch page 0;
//! page changes fetch immediately. Each of the two channels keeps only its
//! newest request alive.

/// The coordinator handle and its actor task.
pub mod coordinator;
mod debounce;
/// Outcomes published to subscribers.
pub mod events;
mod slot;
/// Subscriber side of the outcome broadcast.
pub mod stream;

pub use coordinator::QueryCoordinator;
pub use events::{FetchFailure, FetchOrigin, PageUpdate, QueryOutcome};
pub use stream::ResultStream;
