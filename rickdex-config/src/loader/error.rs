use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

/// Failure to produce a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The config file could not be read.
    #[error("failed to read config file {path}")]
    ReadFile {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file {path}")]
    ParseFile {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error with location.
        #[source]
        source: toml::de::Error,
    },
    /// The API base URL does not parse.
    #[error("invalid API base URL '{value}'")]
    InvalidUrl {
        /// Value as supplied.
        value: String,
        /// Underlying URL error.
        #[source]
        source: url::ParseError,
    },
    /// A duration is not in humantime syntax.
    #[error("invalid duration '{value}' for {key}")]
    InvalidDuration {
        /// Setting or environment variable name.
        key: &'static str,
        /// Value as supplied.
        value: String,
        /// Underlying parse error.
        #[source]
        source: humantime::DurationError,
    },
    /// An integer setting does not parse.
    #[error("invalid number '{value}' for {key}")]
    InvalidNumber {
        /// Setting or environment variable name.
        key: &'static str,
        /// Value as supplied.
        value: String,
        /// Underlying parse error.
        #[source]
        source: std::num::ParseIntError,
    },
    /// A boolean setting is not one of the accepted spellings.
    #[error("invalid boolean '{value}' for {key}")]
    InvalidBool {
        /// Setting or environment variable name.
        key: &'static str,
        /// Value as supplied.
        value: String,
    },
    /// The filter field names no known record field.
    #[error("invalid filter field for {key}")]
    InvalidFilterField {
        /// Setting or environment variable name.
        key: &'static str,
        /// Underlying parse error.
        #[source]
        source: rickdex_model::ModelError,
    },
    /// The composed values violate a guard rail.
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    /// The `.env` file could not be loaded.
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
