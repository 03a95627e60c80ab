use thiserror::Error;

#[derive(Error, Debug)]
pub enum MenuError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Backend returned {status}: {body}")]
    BackendError { status: u16, body: String },

    #[error("Not found: {what}")]
    NotFoundError { what: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Backend,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a failed command. Low is still non-zero: a
    /// missing row means the requested change did not happen.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 4,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl MenuError {
    pub fn validation(message: impl Into<String>) -> Self {
        MenuError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MenuError::ApiError(_) | MenuError::UrlError(_) => ErrorCategory::Network,
            MenuError::BackendError { .. } | MenuError::NotFoundError { .. } => {
                ErrorCategory::Backend
            }
            MenuError::ZipError(_) | MenuError::IoError(_) => ErrorCategory::Storage,
            MenuError::ConfigError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MenuError::CsvError(_)
            | MenuError::SerializationError(_)
            | MenuError::ValidationError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MenuError::NotFoundError { .. } => ErrorSeverity::Low,
            MenuError::ApiError(_) => ErrorSeverity::Medium,
            MenuError::BackendError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            MenuError::BackendError { .. }
            | MenuError::ValidationError { .. }
            | MenuError::CsvError(_)
            | MenuError::SerializationError(_) => ErrorSeverity::High,
            MenuError::ZipError(_)
            | MenuError::IoError(_)
            | MenuError::UrlError(_)
            | MenuError::ConfigError { .. }
            | MenuError::InvalidConfigValueError { .. }
            | MenuError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the backend URL and your network connection, then retry",
            ErrorCategory::Backend => match self {
                MenuError::BackendError { status: 401 | 403, .. } => {
                    "Check that the anon key is valid and row-level policies allow this operation"
                }
                MenuError::NotFoundError { .. } => "Verify the id exists in the backend",
                _ => "Inspect the backend response body and table schema",
            },
            ErrorCategory::Storage => "Make sure the output directory exists and is writable",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Data => "Check the input values and the snapshot file format",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MenuError::ApiError(_) => "Could not reach the menu backend".to_string(),
            MenuError::BackendError { status, .. } => {
                format!("The menu backend rejected the request (HTTP {})", status)
            }
            MenuError::NotFoundError { what } => format!("{} was not found", what),
            MenuError::ValidationError { message } => message.clone(),
            MenuError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            MenuError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MenuError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_row_exits_non_zero() {
        let err = MenuError::NotFoundError {
            what: "menu_items row '42'".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.severity().exit_code(), 4);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }

    #[test]
    fn test_backend_error_severity_depends_on_status() {
        let server_side = MenuError::BackendError {
            status: 503,
            body: String::new(),
        };
        let client_side = MenuError::BackendError {
            status: 400,
            body: String::new(),
        };

        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.severity(), ErrorSeverity::High);
        assert_eq!(client_side.category(), ErrorCategory::Backend);
    }

    #[test]
    fn test_auth_failure_suggestion() {
        let err = MenuError::BackendError {
            status: 401,
            body: "JWT expired".to_string(),
        };
        assert!(err.recovery_suggestion().contains("anon key"));
        assert_eq!(
            err.user_friendly_message(),
            "The menu backend rejected the request (HTTP 401)"
        );
    }

    #[test]
    fn test_validation_message_is_passed_through() {
        let err = MenuError::validation("Price must not be negative");
        assert_eq!(err.user_friendly_message(), "Price must not be negative");
        assert_eq!(err.category(), ErrorCategory::Data);
    }
}
