//! The settings record and its environment loader.

use super::env_file::{merge_env_file, EnvFileStatus};
use super::ConfigError;

use serde::Serialize;
use std::env;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_APP_NAME: &str = "FastAPI Docker Production";
pub const DEFAULT_DEBUG: bool = false;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///./test.db";
pub const DEFAULT_WORKERS: u32 = 4;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Service settings loaded from environment variables.
///
/// Constructed once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Settings {
    /// Application name (always "FastAPI Docker Production")
    pub app_name: String,
    /// Debug mode, set only by `DEBUG=true` (any case)
    pub debug: bool,
    /// Address the web server binds to (default: "0.0.0.0")
    pub host: String,
    /// Port the web server listens on (default: 8000)
    pub port: u16,
    /// Database connection URL (default: "sqlite:///./test.db")
    pub database_url: String,
    /// Number of worker processes (default: 4)
    pub workers: u32,
    /// Process manager log level (default: "info")
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            debug: DEFAULT_DEBUG,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            workers: DEFAULT_WORKERS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings, merging the nearest `.env` file first.
    ///
    /// Environment variables:
    /// - `DEBUG`: debug mode (default: false)
    /// - `HOST`: bind host (default: "0.0.0.0")
    /// - `PORT`: bind port (default: 8000)
    /// - `DATABASE_URL`: database URL (default: "sqlite:///./test.db")
    /// - `WORKERS`: worker count (default: 4)
    /// - `LOG_LEVEL`: log level (default: "info")
    ///
    /// Variables already set in the process environment win over the file.
    /// Returns what happened to the env file alongside the settings.
    pub fn load() -> Result<(Self, EnvFileStatus), ConfigError> {
        let status = merge_env_file(None);
        Ok((Self::from_env()?, status))
    }

    /// Load settings, merging the env file at `path` first.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<(Self, EnvFileStatus), ConfigError> {
        let status = merge_env_file(Some(path.as_ref()));
        Ok((Self::from_env()?, status))
    }

    /// Build settings from the process environment alone.
    ///
    /// Values that are not valid UTF-8 are decoded lossily, so a mangled
    /// `PORT` or `WORKERS` fails to parse instead of falling back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            env::var_os(key).map(|value| value.to_string_lossy().into_owned())
        })
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = lookup("DEBUG")
            .map(|value| parse_flag(&value))
            .unwrap_or(DEFAULT_DEBUG);
        let port = parse_number("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let workers = parse_number("WORKERS", lookup("WORKERS"), DEFAULT_WORKERS)?;

        Ok(Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            debug,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            workers,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        })
    }

    /// True whenever debug mode is off.
    pub fn is_production(&self) -> bool {
        !self.debug
    }

    /// `host:port` for the web server listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Map `LOG_LEVEL` onto a `tracing` level directive.
    ///
    /// Accepts the process manager's names (`critical`, `warning`, ...) as
    /// well as the `tracing` ones. Anything unrecognised becomes `info`.
    pub fn tracing_directive(&self) -> &'static str {
        match self.log_level.trim().to_ascii_lowercase().as_str() {
            "critical" | "error" => "error",
            "warning" | "warn" => "warn",
            "debug" => "debug",
            "trace" => "trace",
            _ => "info",
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

fn parse_number<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidNumber { key, value, source }),
        None => Ok(default),
    }
}
