use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{PeonyAdminError, Result};

/// Header carrying the auth token on both requests and the login response.
pub const DEFAULT_AUTH_HEADER: &str = "x-peony-admin-auth";

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Configuration for the admin API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Base URL of the admin API, e.g. `https://example.com/admin`
    pub api_base_url: String,

    /// Name of the header carrying the auth token
    #[serde(default = "default_auth_header")]
    pub auth_header: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Optional User-Agent value for outgoing requests
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_auth_header() -> String {
    DEFAULT_AUTH_HEADER.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl AdminConfig {
    /// Create a configuration with defaults for everything but the base URL
    pub fn new<S: Into<String>>(api_base_url: S) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            auth_header: default_auth_header(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(PeonyAdminError::ConfigNotFound {
                path: path_ref.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path_ref).map_err(PeonyAdminError::Io)?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            PeonyAdminError::invalid_config(format!(
                "Failed to parse TOML in {}: {}",
                path_ref.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.api_base_url).map_err(|e| {
            PeonyAdminError::invalid_config(format!(
                "api_base_url '{}' is not a valid URL: {}",
                self.api_base_url, e
            ))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PeonyAdminError::invalid_config(format!(
                "api_base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.auth_header.trim().is_empty() {
            return Err(PeonyAdminError::invalid_config(
                "auth_header must not be empty",
            ));
        }

        if self.timeout_seconds == 0 {
            return Err(PeonyAdminError::invalid_config(
                "timeout_seconds must be at least 1",
            ));
        }

        Ok(())
    }

    /// Build the absolute URL for an API path like `/posts` or `/auth`
    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        let joined = format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AdminConfig::new("https://api.example.com/admin");
        assert_eq!(config.auth_header, DEFAULT_AUTH_HEADER);
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.user_agent.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = AdminConfig::new("not a url");
        assert!(config.validate().is_err());

        let config = AdminConfig::new("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_auth_header() {
        let mut config = AdminConfig::new("https://api.example.com");
        config.auth_header = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = AdminConfig::new("https://api.example.com");
        config.timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_endpoint_url_joins_slashes() {
        let config = AdminConfig::new("https://api.example.com/admin/");
        let url = config.endpoint_url("/posts").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/admin/posts");

        let url = config.endpoint_url("posts/abc").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/admin/posts/abc");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("peony-admin.toml");
        std::fs::write(
            &path,
            r#"api_base_url = "https://api.example.com/admin"
auth_header = "x-custom-auth"
timeout_seconds = 5
"#,
        )
        .unwrap();

        let config = AdminConfig::load_from_file(&path).unwrap();
        assert_eq!(config.auth_header, "x-custom-auth");
        assert_eq!(config.timeout_seconds, 5);
    }

    #[test]
    fn test_load_from_missing_file() {
        let error = AdminConfig::load_from_file("/definitely/not/here.toml").unwrap_err();
        assert!(error.to_string().contains("not found"));
    }
}
