use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiTestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Schema validation failed for {model}: {message}")]
    SchemaValidationError { model: String, message: String },

    #[error("{description}: expected {expected}, got {actual}")]
    AssertionError {
        description: String,
        expected: String,
        actual: String,
    },

    #[error("Test case '{name}' aborted: {reason}")]
    CaseAborted { name: String, reason: String },
}

/// Reason prefix of a [`ApiTestError::CaseAborted`] raised by the attempt timeout.
pub const TIMED_OUT: &str = "timed out after";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Contract,
    Assertion,
    Io,
    Execution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ApiTestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::HttpError(_) => ErrorCategory::Network,
            Self::IoError(_) | Self::CsvError(_) => ErrorCategory::Io,
            Self::SerializationError(_) | Self::SchemaValidationError { .. } => {
                ErrorCategory::Contract
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::AssertionError { .. } => ErrorCategory::Assertion,
            Self::CaseAborted { .. } => ErrorCategory::Execution,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Contract | ErrorCategory::Assertion => ErrorSeverity::High,
            ErrorCategory::Execution => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    /// Transient failures: the network, or an attempt that hit its timeout.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::HttpError(_) => true,
            Self::CaseAborted { reason, .. } => reason.starts_with(TIMED_OUT),
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check BASE_URL and network access, or raise REQUEST_TIMEOUT_SECONDS"
            }
            ErrorCategory::Configuration => {
                "Check the .env file and autotests.toml (BASE_URL, API_KEY, runner settings)"
            }
            ErrorCategory::Contract => {
                "The API response no longer matches the model; compare the payload with the model definition"
            }
            ErrorCategory::Assertion => "Inspect the response data logged with --verbose",
            ErrorCategory::Io => "Check that the report directory is writable",
            ErrorCategory::Execution => "Re-run with --verbose to see the failing step",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::HttpError(e) if e.is_timeout() => "The API did not answer in time".to_string(),
            Self::HttpError(e) if e.is_connect() => "Could not connect to the API".to_string(),
            Self::MissingConfigError { field } => {
                format!("Required setting {} is not set", field)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting {} is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiTestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_critical() {
        let err = ApiTestError::MissingConfigError {
            field: "BASE_URL".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.user_friendly_message(), "Required setting BASE_URL is not set");
    }

    #[test]
    fn test_retryable_errors() {
        let config = ApiTestError::InvalidConfigValueError {
            field: "workers".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert!(!config.is_retryable());

        let contract = ApiTestError::SchemaValidationError {
            model: "SingleUserResponse".to_string(),
            message: "missing field `email`".to_string(),
        };
        assert!(!contract.is_retryable());

        let timed_out = ApiTestError::CaseAborted {
            name: "list-users".to_string(),
            reason: format!("{} 5s", TIMED_OUT),
        };
        assert!(timed_out.is_retryable());

        let panicked = ApiTestError::CaseAborted {
            name: "list-users".to_string(),
            reason: "panicked".to_string(),
        };
        assert!(!panicked.is_retryable());
    }

    #[tokio::test]
    async fn test_network_errors_are_retryable() {
        let err: ApiTestError = reqwest::get("http://127.0.0.1:9/").await.unwrap_err().into();
        assert_eq!(err.category(), ErrorCategory::Network);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_assertion_error_display() {
        let err = ApiTestError::AssertionError {
            description: "page number".to_string(),
            expected: "2".to_string(),
            actual: "1".to_string(),
        };
        assert_eq!(err.to_string(), "page number: expected 2, got 1");
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_aborted_case_category() {
        let err = ApiTestError::CaseAborted {
            name: "get-users".to_string(),
            reason: "timed out after 1s".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Execution);
    }
}
