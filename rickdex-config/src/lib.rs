//! Shared configuration library for rickdex.
//!
//! This crate owns config defaults, TOML/environment loading and validation
//! rules. The core library only ever receives a fully composed [`Config`];
//! hosts such as `rickdexctl` decide where it comes from.

/// Layered loading: defaults, TOML file, environment.
pub mod loader;
/// Composed configuration types and their defaults.
pub mod models;
/// Raw file and environment layers.
pub mod sources;
/// Parsing helpers shared by the loader.
pub mod util;
/// Guard rails applied to a composed [`Config`].
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::{
    ApiConfig, Config, ConfigMetadata, QueryConfig, TableConfig,
};
pub use sources::{EnvConfig, FileConfig};
pub use util::normalize_base_url;
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
