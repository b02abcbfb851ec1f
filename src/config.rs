use anyhow::{Context, Result};
use std::env;

pub const DEFAULT_ERROR_MESSAGE: &str = "uh oh, something went wrong, please try again later";

#[derive(Debug, Clone)]
pub struct Config {
    pub responder: ResponderConfig,
    pub server: ServerConfig,
}

/// Controls how errors are turned into responses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponderConfig {
    /// Status used for missing or unclassified errors
    pub default_status_code: u16,
    /// Message used for missing or unclassified errors
    pub default_error_message: String,
    /// Include the internal error text as `rawError`. Keep off in production.
    pub return_raw_error: bool,
    /// Wrap bodies in `{status, data}` / `{status, error}` envelopes
    pub use_envelopes: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: u64,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            default_status_code: 500,
            default_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            return_raw_error: false,
            use_envelopes: false,
        }
    }
}

impl ResponderConfig {
    pub fn with_default_status_code(mut self, status_code: u16) -> Self {
        self.default_status_code = status_code;
        self
    }

    pub fn with_default_error_message(mut self, message: impl Into<String>) -> Self {
        self.default_error_message = message.into();
        self
    }

    pub fn with_raw_errors(mut self, enabled: bool) -> Self {
        self.return_raw_error = enabled;
        self
    }

    pub fn with_envelopes(mut self, enabled: bool) -> Self {
        self.use_envelopes = enabled;
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from `lookup`, which returns the value of a `REPLY_*` variable if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(ResponderConfig {
            default_status_code: lookup("REPLY_DEFAULT_STATUS_CODE")
                .unwrap_or_else(|| defaults.default_status_code.to_string())
                .parse()
                .context("REPLY_DEFAULT_STATUS_CODE must be a valid status code")?,
            default_error_message: lookup("REPLY_DEFAULT_ERROR_MESSAGE")
                .unwrap_or(defaults.default_error_message),
            return_raw_error: lookup("REPLY_RETURN_RAW_ERROR")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("REPLY_RETURN_RAW_ERROR must be true or false")?,
            use_envelopes: lookup("REPLY_USE_ENVELOPES")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .context("REPLY_USE_ENVELOPES must be true or false")?,
        })
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            responder: ResponderConfig::from_env()?,
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("API_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .context("API_PORT must be a valid port number")?,
                max_body_bytes: env::var("API_MAX_BODY_BYTES")
                    .unwrap_or_else(|_| "1048576".to_string())
                    .parse()
                    .context("API_MAX_BODY_BYTES must be a valid number")?,
            },
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
