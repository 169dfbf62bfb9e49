//! Compose a [`Config`] from defaults, an optional TOML file and the
//! environment.
//!
//! Precedence, highest first: environment variables, the TOML file, built-in
//! defaults. An optional `.env` file is loaded into the process environment
//! before the environment is read.

/// Errors raised while loading.
pub mod error;

use std::path::{Path, PathBuf};

use rickdex_model::FilterField;
use tracing::debug;

use crate::models::{
    ApiConfig, Config, ConfigMetadata, QueryConfig, TableConfig,
};
use crate::sources::{
    ENV_DEBOUNCE, ENV_FETCH_ON_START, ENV_FILTER_FIELD, ENV_REQUEST_TIMEOUT,
    ENV_RESULT_BUFFER, EnvConfig, FileConfig,
};
use crate::util::{normalize_base_url, parse_bool, parse_duration};
use crate::validation::{ConfigWarnings, apply_guard_rails};

use self::error::ConfigLoadError;

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    /// Effective configuration.
    pub config: Config,
    /// Non-fatal findings from the guard rails.
    pub warnings: ConfigWarnings,
}

/// Builder for a single configuration load.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    env: Option<EnvConfig>,
}

impl ConfigLoader {
    /// Loader that reads the process environment and `RICKDEX_CONFIG`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this TOML file instead of the one named by `RICKDEX_CONFIG`.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Load a `.env` file into the process environment before reading it.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Use these overrides instead of reading the process environment.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    /// Run every layer, apply guard rails and return the result.
    pub fn load(self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match self.env_file.as_deref() {
            Some(path) => {
                dotenvy::from_path(path)?;
                debug!(path = %path.display(), "loaded env file");
                true
            }
            None => false,
        };

        let env = self.env.unwrap_or_else(EnvConfig::from_env);
        let config_file = self.file.or_else(|| env.config_path.clone());
        let file = match config_file.as_deref() {
            Some(path) => read_file(path)?,
            None => FileConfig::default(),
        };

        let mut config = compose(file, &env)?;
        config.metadata = ConfigMetadata {
            config_file,
            env_file_loaded,
        };

        let warnings = apply_guard_rails(&config)?;
        Ok(ConfigLoad { config, warnings })
    }
}

fn read_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let file = FileConfig::from_path(path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(file)
}

/// Merge file values and environment overrides over the defaults.
pub fn compose(
    file: FileConfig,
    env: &EnvConfig,
) -> Result<Config, ConfigLoadError> {
    let api_defaults = ApiConfig::default();
    let query_defaults = QueryConfig::default();

    let base_url = match env.api_base_url.clone().or(file.api.base_url) {
        Some(raw) => normalize_base_url(&raw).map_err(|source| {
            ConfigLoadError::InvalidUrl { value: raw, source }
        })?,
        None => api_defaults.base_url,
    };

    let request_timeout = resolve_duration(
        ENV_REQUEST_TIMEOUT,
        env.request_timeout.as_deref(),
        file.api.request_timeout.as_deref(),
    )?
    .unwrap_or(api_defaults.request_timeout);

    let user_agent = env
        .user_agent
        .clone()
        .or(file.api.user_agent)
        .unwrap_or(api_defaults.user_agent);

    let debounce = resolve_duration(
        ENV_DEBOUNCE,
        env.debounce.as_deref(),
        file.query.debounce.as_deref(),
    )?
    .unwrap_or(query_defaults.debounce);

    let fetch_on_start = match env.fetch_on_start.as_deref() {
        Some(raw) => {
            parse_bool(raw).ok_or_else(|| ConfigLoadError::InvalidBool {
                key: ENV_FETCH_ON_START,
                value: raw.to_string(),
            })?
        }
        None => file
            .query
            .fetch_on_start
            .unwrap_or(query_defaults.fetch_on_start),
    };

    let result_buffer = match env.result_buffer.as_deref() {
        Some(raw) => raw.trim().parse::<usize>().map_err(|source| {
            ConfigLoadError::InvalidNumber {
                key: ENV_RESULT_BUFFER,
                value: raw.to_string(),
                source,
            }
        })?,
        None => file
            .query
            .result_buffer
            .unwrap_or(query_defaults.result_buffer),
    };

    let filter_field = match env.filter_field.as_deref() {
        Some(raw) => raw.parse::<FilterField>().map_err(|source| {
            ConfigLoadError::InvalidFilterField {
                key: ENV_FILTER_FIELD,
                source,
            }
        })?,
        None => file.table.filter_field.unwrap_or_default(),
    };

    Ok(Config {
        api: ApiConfig {
            base_url,
            request_timeout,
            user_agent,
        },
        query: QueryConfig {
            debounce,
            fetch_on_start,
            result_buffer,
        },
        table: TableConfig { filter_field },
        metadata: ConfigMetadata::default(),
    })
}

fn resolve_duration(
    key: &'static str,
    env_value: Option<&str>,
    file_value: Option<&str>,
) -> Result<Option<std::time::Duration>, ConfigLoadError> {
    let Some(raw) = env_value.or(file_value) else {
        return Ok(None);
    };
    parse_duration(raw)
        .map(Some)
        .map_err(|source| ConfigLoadError::InvalidDuration {
            key,
            value: raw.to_string(),
            source,
        })
}
