use std::path::Path;

use tracing::warn;

use shared_types::AppConfig;

/// Path to the config file, relative to the working directory.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` from the working directory. Missing or unparseable
/// files fall back to defaults rather than failing startup.
pub fn load_config() -> AppConfig {
    load_config_from(CONFIG_PATH)
}

pub fn load_config_from(path: impl AsRef<Path>) -> AppConfig {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}
