//! Remote API access.

/// reqwest-backed client for the character endpoint.
pub mod client;
/// Relative routes under the API base URL.
pub mod routes;
/// The [`CharacterApi`](service::CharacterApi) seam.
pub mod service;

pub use client::ApiClient;
pub use service::CharacterApi;
