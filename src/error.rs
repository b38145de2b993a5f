//! Error types for the operator

use crate::layer::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configuration option failed validation. Handled inside the
    /// reconciler by moving the unit to a blocked status.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Workload container API failure. Not handled locally; the host
    /// runtime owns retry for the failed notification.
    #[error("container error: {0}")]
    Container(String),

    #[error("state store error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether the host runtime may usefully retry the notification that
    /// produced this error. Validation errors are deterministic.
    pub fn is_retriable(&self) -> bool {
        !matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::ValidationError;

    #[test]
    fn validation_errors_are_not_retriable() {
        let err = Error::from(ValidationError::InvalidUsername);
        assert!(!err.is_retriable());

        let err = Error::Container("service missing".to_string());
        assert!(err.is_retriable());
    }

    #[test]
    fn validation_error_display_is_verbatim() {
        let err = Error::from(ValidationError::InvalidTimezone);
        assert_eq!(err.to_string(), "Invalid timezone defined.");
    }
}
