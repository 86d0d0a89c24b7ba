//! Config command - inspect configuration.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use crate::error::{Result, SanseError};

/// Run a config action.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let content = toml::to_string_pretty(&settings)
                .map_err(|e| SanseError::Config(e.to_string()))?;
            println!("{}", content);
        }
        ConfigAction::Path => {
            let path = Settings::default_config_path();
            Output::kv("config path", &path.to_string_lossy());
            if !path.exists() {
                Output::info("File does not exist yet; defaults are in effect.");
            }
        }
    }

    Ok(())
}
