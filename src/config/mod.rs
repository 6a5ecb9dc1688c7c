#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{ApiTestError, Result};
use crate::utils::validation::{self, Validate};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Connection and account settings for the API under test, read from the
/// environment (optionally seeded from a `.env` file).
#[derive(Clone)]
pub struct Settings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub test_user_email: Option<String>,
    pub test_user_password: Option<String>,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            test_user_email: None,
            test_user_password: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECONDS),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_credentials(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.test_user_email = Some(email.into());
        self.test_user_password = Some(password.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Loads a `.env` file, then reads the process environment.
    ///
    /// An explicit `env_file` must exist. Without one, `./.env` is used when
    /// present. Variables already set in the environment are never overwritten.
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| ApiTestError::ConfigValidationError {
                    field: "env_file".to_string(),
                    message: format!("cannot load {}: {}", path.display(), e),
                })?;
                tracing::debug!("Loaded environment from {}", path.display());
            }
            None => match dotenvy::dotenv() {
                Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
                Err(e) if e.not_found() => tracing::debug!("No .env file found, using process environment"),
                Err(e) => {
                    return Err(ApiTestError::ConfigValidationError {
                        field: "env_file".to_string(),
                        message: e.to_string(),
                    })
                }
            },
        }

        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = get("BASE_URL").ok_or_else(|| ApiTestError::MissingConfigError {
            field: "BASE_URL".to_string(),
        })?;

        let timeout_secs = match get("REQUEST_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ApiTestError::InvalidConfigValueError {
                    field: "REQUEST_TIMEOUT_SECONDS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECONDS,
        };

        let settings = Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: get("API_KEY"),
            test_user_email: get("TEST_USER_EMAIL"),
            test_user_password: get("TEST_USER_PASSWORD"),
            request_timeout: Duration::from_secs(timeout_secs),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Headers sent with every request.
    pub fn headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        if let Some(key) = &self.api_key {
            headers.insert("x-api-key".to_string(), key.clone());
        }
        headers
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.test_user_email, &self.test_user_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("BASE_URL", &self.base_url)?;
        validation::validate_positive_number("REQUEST_TIMEOUT_SECONDS", self.request_timeout.as_secs(), 1)?;
        if let Some(key) = &self.api_key {
            validation::validate_non_empty_string("API_KEY", key)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("test_user_email", &self.test_user_email)
            .field("test_user_password", &self.test_user_password.as_ref().map(|_| "***"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
