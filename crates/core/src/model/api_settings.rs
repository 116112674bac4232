use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Validated connection settings for the quiz backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiSettings {
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
}

#[derive(Clone, Debug, Default)]
pub struct ApiSettingsDraft {
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiSettingsError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("base URL must use http or https")]
    UnsupportedScheme,
    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

impl ApiSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft.
    ///
    /// Blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ApiSettingsError` if the base URL does not parse, is not
    /// http(s), or the timeout is zero.
    pub fn validate(self) -> Result<ApiSettings, ApiSettingsError> {
        let raw_url = normalize_optional(self.base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let base_url = Url::parse(raw_url.trim_end_matches('/'))
            .map_err(|_| ApiSettingsError::InvalidBaseUrl(raw_url.clone()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiSettingsError::UnsupportedScheme);
        }

        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_API_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(ApiSettingsError::ZeroTimeout);
        }

        Ok(ApiSettings {
            base_url,
            token: normalize_optional(self.token),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ApiSettings {
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join a path below the base URL, keeping the base path prefix.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiSettings {
    /// Local backend with no token and the default timeout.
    ///
    /// # Panics
    ///
    /// Panics if `DEFAULT_API_BASE_URL` is not a valid URL.
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            token: None,
            timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
