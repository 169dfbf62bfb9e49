use std::path::PathBuf;
use std::time::Duration;

use rickdex_model::FilterField;
use url::Url;

/// Public Rick and Morty API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api/";
/// Per-request timeout when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Quiet period applied to search input.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);
/// Outcomes buffered per results subscriber.
pub const DEFAULT_RESULT_BUFFER: usize = 32;

/// `rickdex/<crate version>`.
pub fn default_user_agent() -> String {
    format!("rickdex/{}", env!("CARGO_PKG_VERSION"))
}

/// Fully composed configuration handed to the core library.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Remote API connection.
    pub api: ApiConfig,
    /// Query coordinator tuning.
    pub query: QueryConfig,
    /// Result table defaults.
    pub table: TableConfig,
    /// Where the values came from.
    pub metadata: ConfigMetadata,
}

/// Remote API connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the `character` route is joined onto. Always ends in `/`.
    pub base_url: Url,
    /// Total time allowed for one request.
    pub request_timeout: Duration,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL)
                .expect("default base URL is a valid absolute URL"),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: default_user_agent(),
        }
    }
}

/// Tuning for the query coordinator.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Quiet period applied to search-term input before a fetch fires.
    pub debounce: Duration,
    /// Issue an unfiltered first-page fetch as soon as the coordinator starts.
    pub fetch_on_start: bool,
    /// Capacity of the results broadcast channel. Subscribers that fall
    /// further behind skip the oldest outcomes.
    pub result_buffer: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            fetch_on_start: true,
            result_buffer: DEFAULT_RESULT_BUFFER,
        }
    }
}

/// Defaults for the result table.
#[derive(Debug, Clone, Default)]
pub struct TableConfig {
    /// Field the local filter matches first.
    pub filter_field: FilterField,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    /// TOML file that was read, if any.
    pub config_file: Option<PathBuf>,
    /// Whether a `.env` file was loaded.
    pub env_file_loaded: bool,
}
