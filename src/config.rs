//! Configuration handling for snapshot-classifier.
//!
//! The only setting is the classifier base URL, read from `PREDICT_API_URL`
//! (a `.env` file in the working directory is honored).

/// Environment variable holding the classifier base URL.
pub const BASE_URL_ENV: &str = "PREDICT_API_URL";

/// Base URL used when [`BASE_URL_ENV`] is unset or empty.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Classifier base URL, without trailing slash
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Loads `.env` first if present; a missing `.env` is not an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(BASE_URL_ENV) {
            Some(value) if !value.trim().is_empty() => Self::with_base_url(&value),
            _ => {
                log::debug!("{} not set, using {}", BASE_URL_ENV, DEFAULT_BASE_URL);
                Ok(Self::default())
            }
        }
    }

    /// Build a configuration for an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
        })
    }
}

/// Trim whitespace and trailing slashes, and require an http(s) URL.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');

    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.to_string())
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidBaseUrl { url: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidBaseUrl { url, reason } => {
                write!(
                    f,
                    "Invalid {} value '{}': {}",
                    BASE_URL_ENV, url, reason
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url() {
        assert_eq!(Config::default().base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_unset_variable_uses_default() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_empty_variable_uses_default() {
        let config = Config::from_lookup(|_| Some("  ".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_variable_overrides_default() {
        let config = Config::from_lookup(|key| {
            assert_eq!(key, BASE_URL_ENV);
            Some("https://classifier.internal:9000/".to_string())
        })
        .unwrap();
        assert_eq!(config.base_url, "https://classifier.internal:9000");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = Config::with_base_url("not a url");
        assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let err = Config::with_base_url("ftp://example.com").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme 'ftp'"));
    }
}
