//! Startup routine: load the service settings, set up logging and report the
//! effective configuration.

use service_settings::config::{self, EnvFileStatus, Settings};
use service_settings::logging;

use serde::Serialize;
use std::process::ExitCode;

/// Settings as printed on stdout, with the derived flag included.
#[derive(Serialize)]
struct EffectiveSettings<'a> {
    #[serde(flatten)]
    settings: &'a Settings,
    is_production: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration before anything else runs
    let (settings, env_file) = Settings::load()?;

    // Initialize logging
    logging::init(&settings)?;
    match &env_file {
        EnvFileStatus::Loaded { path, skipped: 0 } => {
            tracing::info!("Using environment file {}", path.display())
        }
        EnvFileStatus::Loaded { path, skipped } => tracing::warn!(
            "Using environment file {} ({} statements skipped)",
            path.display(),
            skipped
        ),
        EnvFileStatus::NotFound => tracing::info!("No environment file found"),
        EnvFileStatus::Unreadable(e) => tracing::warn!("Environment file not loaded: {}", e),
    }

    config::init_global(settings)?;
    report()
}

/// Log and print the process-wide settings.
fn report() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = config::global().ok_or("settings were not initialized")?;
    tracing::info!(
        "Loaded settings for {} (bind {}, {} workers, production: {}, log level {})",
        settings.app_name,
        settings.bind_address(),
        settings.workers,
        settings.is_production(),
        settings.log_level,
    );

    let effective = EffectiveSettings {
        settings,
        is_production: settings.is_production(),
    };
    println!("{}", serde_json::to_string_pretty(&effective)?);

    Ok(())
}
