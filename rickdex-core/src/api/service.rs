//! The seam between the coordinator and the network.

use async_trait::async_trait;
use rickdex_model::{CharacterQuery, PageResult};

use crate::error::FetchError;

/// Anything that can answer a character query.
///
/// [`ApiClient`](super::ApiClient) is the production implementation; the
/// coordinator only ever sees this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterApi: Send + Sync {
    /// Fetch one page of characters. Never retried by callers.
    async fn fetch_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<PageResult, FetchError>;
}
