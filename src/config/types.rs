//! Configuration types and CLI options.
//!
//! `Config` is the library configuration and can be built without any CLI
//! dependency. `Opt` is the `clap` front-end used by the binary.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use thiserror::Error;

use crate::config::constants::{
    COOKIE_ENV_VAR, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    MAX_MODEL_CONCURRENCY,
};

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// A configuration value that failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is accepted
    pub message: String,
}

impl ConfigValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Library configuration.
///
/// Supplied at the start of every refresh cycle and never mutated by it.
///
/// # Examples
///
/// ```no_run
/// use makerworld_stats::Config;
///
/// let config = Config {
///     user: "@alice".to_string(),
///     cookie: "Cookie: session=abc".to_string(),
///     max_models: 25,
///     ..Default::default()
/// };
/// assert_eq!(config.subject(), "alice");
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// MakerWorld handle, with or without a leading `@`
    pub user: String,

    /// Raw Cookie header value (normalized before use)
    pub cookie: String,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Maximum number of models fetched per refresh (0 = all)
    pub max_models: usize,

    /// Number of model pages fetched at once (1 = sequential)
    pub model_concurrency: usize,

    /// Upstream origin, without trailing slash
    pub base_url: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: String::new(),
            cookie: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_models: 0,
            model_concurrency: 1,
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// The user handle with any leading `@` removed.
    pub fn subject(&self) -> &str {
        self.user.trim().trim_start_matches('@')
    }

    /// Upstream origin with any trailing slash removed.
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// The model cap, if one is configured.
    pub fn model_limit(&self) -> Option<usize> {
        (self.max_models > 0).then_some(self.max_models)
    }

    /// Checks every field and reports the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.subject().is_empty() {
            return Err(ConfigValidationError::new(
                "user",
                "must name a MakerWorld user (e.g. @alice)",
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigValidationError::new(
                "timeout_seconds",
                "must be greater than 0",
            ));
        }
        if self.model_concurrency == 0 {
            return Err(ConfigValidationError::new(
                "model_concurrency",
                "must be greater than 0",
            ));
        }
        if self.model_concurrency > MAX_MODEL_CONCURRENCY {
            return Err(ConfigValidationError::new(
                "model_concurrency",
                format!(
                    "must be at most {} to avoid hammering MakerWorld",
                    MAX_MODEL_CONCURRENCY
                ),
            ));
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigValidationError::new("user_agent", "must not be empty"));
        }
        match url::Url::parse(self.origin()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => {
                return Err(ConfigValidationError::new(
                    "base_url",
                    format!("expected an http(s):// origin, got '{}'", self.base_url),
                ))
            }
        }
        Ok(())
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Human-readable summary
/// makerworld_stats --user @alice --cookie-file cookie.txt
///
/// # Full JSON, only the 10 oldest models
/// makerworld_stats --user alice --cookie "$COOKIE" --max-models 10 --json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "makerworld_stats",
    about = "Fetches MakerWorld profile statistics and prints a summary."
)]
pub struct Opt {
    /// MakerWorld username (with or without @)
    #[arg(long)]
    pub user: String,

    /// Raw Cookie header value
    #[arg(long, env = COOKIE_ENV_VAR, hide_env_values = true)]
    pub cookie: Option<String>,

    /// Path to a file containing the raw Cookie header value
    #[arg(long, value_parser)]
    pub cookie_file: Option<PathBuf>,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Maximum models to scan (0 = all)
    #[arg(long, default_value_t = 0)]
    pub max_models: usize,

    /// Model pages fetched at once
    #[arg(long = "concurrency", default_value_t = 1)]
    pub model_concurrency: usize,

    /// Upstream origin
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Print full JSON output
    #[arg(long)]
    pub json: bool,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Resolves the cookie source and builds a validated library `Config`.
    ///
    /// `--cookie` (or `MAKERWORLD_COOKIE`) wins over `--cookie-file`.
    pub fn into_config(self) -> Result<Config, ConfigValidationError> {
        let cookie = match (self.cookie, &self.cookie_file) {
            (Some(cookie), _) if !cookie.is_empty() => cookie,
            (_, Some(path)) => std::fs::read_to_string(path)
                .map(|s| s.trim().to_string())
                .map_err(|e| {
                    ConfigValidationError::new(
                        "cookie_file",
                        format!("cannot read {}: {}", path.display(), e),
                    )
                })?,
            _ => {
                return Err(ConfigValidationError::new(
                    "cookie",
                    "Provide --cookie or --cookie-file",
                ))
            }
        };

        let config = Config {
            user: self.user,
            cookie,
            user_agent: self.user_agent,
            timeout_seconds: self.timeout_seconds,
            max_models: self.max_models,
            model_concurrency: self.model_concurrency,
            base_url: self.base_url,
            log_level: self.log_level,
            log_format: self.log_format,
        };
        config.validate()?;
        Ok(config)
    }
}
