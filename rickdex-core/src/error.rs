use thiserror::Error;

/// Failure of a single request to the remote API.
///
/// This is the only error kind that reaches the results stream. It is
/// `Clone` so one failure can be broadcast to every subscriber.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request did not finish within the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// Connection or protocol failure before a response arrived.
    #[error("request failed: {0}")]
    Transport(String),
    /// The API answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// The API's `error` text, or the status reason when absent.
        message: String,
    },
    /// The response body is not a character page.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// HTTP status for [`FetchError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The API answers `404` when a name filter matches nothing or the page
    /// is past the end.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

/// Errors from building or driving the core services.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The base URL cannot have routes joined onto it.
    #[error("invalid API base URL '{value}'")]
    InvalidBaseUrl {
        /// URL that was supplied.
        value: String,
        /// Underlying URL error.
        #[source]
        source: url::ParseError,
    },
    /// The coordinator task has stopped accepting commands.
    #[error("query coordinator has shut down")]
    CoordinatorClosed,
}

/// Result alias for [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
