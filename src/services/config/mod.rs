pub mod models;

pub use models::*;

use anyhow::Context;
use std::path::Path;

use crate::cli::CliArgs;

/// Build the effective settings: JSON file (when given) or defaults, then
/// command-line overrides.
pub fn load_settings(args: &CliArgs) -> anyhow::Result<ExtractSettings> {
    let mut settings = match args.config.as_deref() {
        Some(path) => {
            let settings = ExtractSettings::from_file(path)?;
            log::info!("[Config] Loaded settings from {}", path.display());
            settings
        }
        None => ExtractSettings::default(),
    };
    settings.merge_cli(args);
    Ok(settings)
}

/// Write `settings` as pretty JSON, readable again through `--config`.
pub fn save_settings(settings: &ExtractSettings, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write settings file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
