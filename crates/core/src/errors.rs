use thiserror::Error;

use crate::config::ConfigError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("record index {index} is out of range for a store of {len} records")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("the quote store is empty")]
    EmptyStore,
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("catalog failure: {0}")]
    Catalog(String),
    #[error(transparent)]
    Configuration(#[from] ConfigError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, user_message: &'static str },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { user_message, .. } => *user_message,
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl From<DomainError> for InterfaceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(message) => Self::BadRequest {
                message,
                user_message: "Please provide both a quote and an author.",
            },
            DomainError::EmptyStore => Self::BadRequest {
                message: DomainError::EmptyStore.to_string(),
                user_message: "There are no quotes to show yet. Add one first.",
            },
            DomainError::IndexOutOfRange { .. } | DomainError::InvariantViolation(_) => {
                Self::Internal { message: value.to_string() }
            }
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => error.into(),
            ApplicationError::Catalog(message) => Self::BadRequest {
                message,
                user_message: "The quote catalog could not be loaded. Check the seed file.",
            },
            ApplicationError::Configuration(error) => Self::Internal { message: error.to_string() },
        }
    }
}
