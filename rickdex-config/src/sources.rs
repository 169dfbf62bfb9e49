use std::path::{Path, PathBuf};

use rickdex_model::FilterField;
use serde::{Deserialize, Serialize};

use crate::loader::error::ConfigLoadError;
use crate::util::non_blank;

/// Raw configuration as defined in a TOML file.
///
/// ```toml
/// [api]
/// base_url = "https://rickandmortyapi.com/api/"
/// request_timeout = "10s"
///
/// [query]
/// debounce = "400ms"
/// fetch_on_start = true
///
/// [table]
/// filter_field = "status"
/// ```
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct FileConfig {
    /// `[api]` table.
    #[serde(default)]
    pub api: FileApiConfig,
    /// `[query]` table.
    #[serde(default)]
    pub query: FileQueryConfig,
    /// `[table]` table.
    #[serde(default)]
    pub table: FileTableConfig,
}

/// `[api]` section of the config file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileApiConfig {
    /// API base URL; a missing scheme means `http://`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// humantime duration, e.g. `"10s"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    /// `User-Agent` override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// `[query]` section of the config file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileQueryConfig {
    /// humantime duration, e.g. `"400ms"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debounce: Option<String>,
    /// Load the unfiltered first page on start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_on_start: Option<bool>,
    /// Outcomes buffered per subscriber.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_buffer: Option<usize>,
}

/// `[table]` section of the config file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FileTableConfig {
    /// Initial local filter field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_field: Option<FilterField>,
}

impl FileConfig {
    /// Read and parse a TOML config file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigLoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ConfigLoadError::ReadFile {
                path: path.to_path_buf(),
                source,
            }
        })?;
        toml::from_str(&raw).map_err(|source| ConfigLoadError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Path of the TOML config file.
pub const ENV_CONFIG_PATH: &str = "RICKDEX_CONFIG";
/// Overrides `api.base_url`.
pub const ENV_API_BASE_URL: &str = "RICKDEX_API_BASE_URL";
/// Overrides `api.request_timeout`.
pub const ENV_REQUEST_TIMEOUT: &str = "RICKDEX_REQUEST_TIMEOUT";
/// Overrides `api.user_agent`.
pub const ENV_USER_AGENT: &str = "RICKDEX_USER_AGENT";
/// Overrides `query.debounce`.
pub const ENV_DEBOUNCE: &str = "RICKDEX_DEBOUNCE";
/// Overrides `query.fetch_on_start`.
pub const ENV_FETCH_ON_START: &str = "RICKDEX_FETCH_ON_START";
/// Overrides `query.result_buffer`.
pub const ENV_RESULT_BUFFER: &str = "RICKDEX_RESULT_BUFFER";
/// Overrides `table.filter_field`.
pub const ENV_FILTER_FIELD: &str = "RICKDEX_FILTER_FIELD";

/// Raw environment overrides. Values stay unparsed until composition so
/// errors can name the offending variable.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    /// Value of `RICKDEX_CONFIG`.
    pub config_path: Option<PathBuf>,
    /// Value of `RICKDEX_API_BASE_URL`.
    pub api_base_url: Option<String>,
    /// Value of `RICKDEX_REQUEST_TIMEOUT`.
    pub request_timeout: Option<String>,
    /// Value of `RICKDEX_USER_AGENT`.
    pub user_agent: Option<String>,
    /// Value of `RICKDEX_DEBOUNCE`.
    pub debounce: Option<String>,
    /// Value of `RICKDEX_FETCH_ON_START`.
    pub fetch_on_start: Option<String>,
    /// Value of `RICKDEX_RESULT_BUFFER`.
    pub result_buffer: Option<String>,
    /// Value of `RICKDEX_FILTER_FIELD`.
    pub filter_field: Option<String>,
}

impl EnvConfig {
    /// Read every `RICKDEX_*` variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));
        Self {
            config_path: get(ENV_CONFIG_PATH).map(PathBuf::from),
            api_base_url: get(ENV_API_BASE_URL),
            request_timeout: get(ENV_REQUEST_TIMEOUT),
            user_agent: get(ENV_USER_AGENT),
            debounce: get(ENV_DEBOUNCE),
            fetch_on_start: get(ENV_FETCH_ON_START),
            result_buffer: get(ENV_RESULT_BUFFER),
            filter_field: get(ENV_FILTER_FIELD),
        }
    }
}
