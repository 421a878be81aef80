//! Configuration management for taskgen.
//!
//! Configuration is read once at startup from environment variables, after
//! loading a `.env` file from the working directory if one exists:
//! - `OPENAI_API_KEY` - Optional. Without it every generation returns the fallback task.
//! - `OPENAI_API_URL` - Optional. Chat-completions endpoint. Defaults to the OpenAI API.
//! - `TASKGEN_MODEL` - Optional. Model identifier. Defaults to `gpt-4o-mini`.
//! - `HOST` - Optional. Server host. Defaults to `0.0.0.0`.
//! - `PORT` - Optional. Server port. Defaults to `5001`.
//! - `DEBUG` - Optional. Verbose logging. Defaults to `false`.
//! - `REQUEST_TIMEOUT_SECS` - Optional. Timeout for completion calls. Defaults to `30`.

use std::time::Duration;
use thiserror::Error;

use crate::llm::OPENAI_API_URL;
use crate::util::parse_bool;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenAI API key, `None` when unset or empty
    pub api_key: Option<String>,

    /// Chat-completions endpoint
    pub api_url: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Verbose logging
    pub debug: bool,

    /// Timeout applied to each completion call
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `PORT` or `REQUEST_TIMEOUT_SECS`
    /// is not a valid number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Load configuration for a single CLI generation.
    ///
    /// `HOST` and `PORT` are ignored since nothing is bound.
    pub fn one_shot_from_env() -> Result<Self, ConfigError> {
        Self::one_shot_from_vars(|name| std::env::var(name).ok())
    }

    pub fn one_shot_from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_vars(|name| match name {
            "HOST" | "PORT" => None,
            other => lookup(other),
        })
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENAI_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let api_url = lookup("OPENAI_API_URL").unwrap_or_else(|| OPENAI_API_URL.to_string());

        let model = lookup("TASKGEN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?,
            None => DEFAULT_PORT,
        };

        let debug = lookup("DEBUG").map(|v| parse_bool(&v)).unwrap_or(false);

        let timeout_secs: u64 = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|e| {
                ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), format!("{}", e))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_url,
            model,
            host,
            port,
            debug,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn api_key_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// `host:port` to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
