//! Settings for the containerised web service.
//!
//! Loads configuration from environment variables (optionally merged from a
//! local `.env` file) into an immutable [`config::Settings`] value.

pub mod config;
pub mod logging;

pub use config::{ConfigError, Settings};
