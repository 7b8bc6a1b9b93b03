//! Client configuration.
//!
//! Configuration can be built programmatically, from environment variables
//! with [`ClientConfig::from_env`], or from command line arguments since the
//! struct derives [`clap::Parser`].
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `YARU_API_SERVER` | https://api-yaru.yandex.ru | API base URL |
//! | `YARU_ACCESS_TOKEN` | (none) | OAuth access token |
//! | `YARU_TOKEN_FILE` | (none) | JSON file holding `access_token` |
//! | `YARU_LOG_LEVEL` | info | Log level |
//! | `YARU_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `YARU_MAX_REDIRECTS` | 10 | Redirect hops followed per request |
//! | `YARU_USER_AGENT` | yaru-client/\<version\> | User-Agent header |
//!
//! # Example
//!
//! ```rust
//! use yaru_client::ClientConfig;
//!
//! let config = ClientConfig {
//!     access_token: Some("secret".to_string()),
//!     request_timeout: 10,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Default API base URL.
pub const DEFAULT_API_SERVER: &str = "https://api-yaru.yandex.ru";

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str = concat!("yaru-client/", env!("CARGO_PKG_VERSION"));

/// Configuration of the API client.
#[derive(Debug, Clone, Parser)]
#[command(name = "yaru")]
#[command(about = "Ya.ru resource API client")]
pub struct ClientConfig {
    /// API base URL that relative identifiers resolve against.
    #[arg(long, env = "YARU_API_SERVER", default_value = DEFAULT_API_SERVER)]
    pub api_server: String,

    /// OAuth access token sent with every request.
    #[arg(long, env = "YARU_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// JSON file with an `access_token` field, used when no token is given.
    #[arg(long, env = "YARU_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "YARU_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "YARU_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Maximum number of redirects followed for one request.
    #[arg(long, env = "YARU_MAX_REDIRECTS", default_value = "10")]
    pub max_redirects: usize,

    /// User-Agent header value.
    #[arg(long, env = "YARU_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_server: DEFAULT_API_SERVER.to_string(),
            access_token: None,
            token_file: None,
            log_level: "info".to_string(),
            request_timeout: 30,
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    access_token: String,
}

impl ClientConfig {
    /// Creates a configuration from environment variables only.
    ///
    /// Command line arguments of the running process are ignored.
    pub fn from_env() -> Self {
        Self::try_parse_from(["yaru"]).unwrap_or_default()
    }

    /// Returns the access token to send, reading the token file if needed.
    ///
    /// An explicit token takes precedence over the file.
    pub fn resolve_access_token(&self) -> Result<Option<String>> {
        if let Some(token) = &self.access_token {
            return Ok(Some(token.clone()));
        }
        let Some(path) = &self.token_file else {
            return Ok(None);
        };

        let raw = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read token file {}: {}", path.display(), e))
        })?;
        let file: TokenFile = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!("invalid token file {}: {}", path.display(), e))
        })?;
        Ok(Some(file.access_token))
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.api_server) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "API server must use http or https, got {}",
                url.scheme()
            )),
            Err(e) => errors.push(format!("API server is not a valid URL: {}", e)),
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            errors.push("User agent cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            api_server: "https://api-yaru.test".to_string(),
            access_token: None,
            token_file: None,
            log_level: "debug".to_string(),
            request_timeout: 5,
            max_redirects: 3,
            user_agent: "yaru-client-tests".to_string(),
        }
    }
}
