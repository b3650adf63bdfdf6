//! Process-wide settings slot.

use super::{ConfigError, Settings};
use std::sync::OnceLock;

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Bind `settings` as the process-wide instance.
///
/// Can succeed only once per process; later calls return
/// [`ConfigError::AlreadyInitialized`] and leave the bound value untouched.
pub fn init_global(settings: Settings) -> Result<&'static Settings, ConfigError> {
    let mut pending = Some(settings);
    let bound = SETTINGS.get_or_init(|| pending.take().unwrap_or_default());
    match pending {
        None => Ok(bound),
        Some(_) => Err(ConfigError::AlreadyInitialized),
    }
}

/// The process-wide settings, if [`init_global`] has run.
pub fn global() -> Option<&'static Settings> {
    SETTINGS.get()
}
