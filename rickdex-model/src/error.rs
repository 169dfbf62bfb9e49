use std::fmt::{self, Display};

/// Errors produced when parsing model values from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownStatus(String),
    UnknownFilterField(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownStatus(raw) => {
                write!(f, "unknown character status '{raw}'")
            }
            ModelError::UnknownFilterField(raw) => {
                write!(f, "unknown filter field '{raw}'")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
