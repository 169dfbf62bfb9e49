use thiserror::Error;

use super::models::Config;

/// A composed configuration that must not be used.
#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    /// The base URL is not http or https.
    #[error("API base URL must use http or https, got '{scheme}'")]
    UnsupportedScheme {
        /// Scheme that was supplied.
        scheme: String,
    },
    /// The base URL cannot have routes joined onto it.
    #[error("API base URL '{url}' cannot carry a path")]
    OpaqueBaseUrl {
        /// URL that was supplied.
        url: String,
    },
    /// Requests would time out immediately.
    #[error("request timeout must be greater than zero")]
    ZeroRequestTimeout,
    /// The results channel would have no capacity.
    #[error("result buffer must hold at least one outcome")]
    ZeroResultBuffer,
}

/// A non-fatal finding.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// What looks wrong.
    pub message: String,
    /// How to fix it, when there is an obvious fix.
    pub hint: Option<String>,
}

/// Warnings collected during one load.
#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    /// Warnings in the order they were raised.
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    /// Record a warning without a hint.
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    /// Record a warning with a suggested fix.
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    /// True when nothing was flagged.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate over the warnings.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Reject unusable values and collect warnings for suspicious ones.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let base = &config.api.base_url;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigGuardRailError::UnsupportedScheme {
            scheme: base.scheme().to_string(),
        });
    }
    if base.cannot_be_a_base() {
        return Err(ConfigGuardRailError::OpaqueBaseUrl {
            url: base.to_string(),
        });
    }
    if base.scheme() == "http"
        && !matches!(base.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"))
    {
        warnings.push_with_hint(
            format!("API base URL {base} is not using TLS"),
            "Use https:// unless this is a local test server",
        );
    }

    if config.api.request_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroRequestTimeout);
    }

    if config.query.result_buffer == 0 {
        return Err(ConfigGuardRailError::ZeroResultBuffer);
    }

    if config.query.debounce.is_zero() {
        warnings.push_with_hint(
            "search debounce is zero; every keystroke will issue a request",
            "Set RICKDEX_DEBOUNCE (e.g. 400ms) to coalesce typing",
        );
    }

    if config.api.user_agent.trim().is_empty() {
        warnings.push("API requests will be sent with an empty User-Agent");
    }

    Ok(warnings)
}
