use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rickdex_config::{ApiConfig, normalize_base_url};
use rickdex_model::{CharacterPage, CharacterQuery, PageResult};
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use super::routes;
use super::service::CharacterApi;
use crate::error::{CoreError, FetchError};

/// Body the API sends alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

/// reqwest-backed client for the character endpoint.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl ApiClient {
    /// Create a client with default timeout and user agent.
    ///
    /// The base URL is normalized: a missing scheme becomes `http://` and a
    /// trailing slash is added.
    pub fn new(base_url: &str) -> Result<Self, CoreError> {
        let base_url = normalize_base_url(base_url).map_err(|source| {
            CoreError::InvalidBaseUrl {
                value: base_url.to_string(),
                source,
            }
        })?;
        Self::from_config(&ApiConfig {
            base_url,
            ..ApiConfig::default()
        })
    }

    /// Build a client with the timeout, user agent and base URL from `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(CoreError::HttpClient)?;

        info!(
            base_url = %config.base_url,
            timeout_ms = config.request_timeout.as_millis() as u64,
            "created API client"
        );

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL every route is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_page(&self, url: Url) -> Result<PageResult, FetchError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let page: CharacterPage = response.json().await?;
        Ok(page.into())
    }
}

/// Prefer the API's `{"error": ".."}` message, then the raw body, then the
/// canonical reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("unknown error")
        .to_string()
}

#[async_trait]
impl CharacterApi for ApiClient {
    async fn fetch_characters(
        &self,
        query: &CharacterQuery,
    ) -> Result<PageResult, FetchError> {
        let url = routes::character_url(&self.base_url, query)
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        self.get_page(url).await
    }
}
