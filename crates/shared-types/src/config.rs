use serde::{Deserialize, Serialize};

/// Top-level configuration, parsed from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    /// Actor recorded as `created_by` on new cases until real
    /// authentication is wired in.
    #[serde(default = "default_actor")]
    pub actor: String,
}

/// Storage tuning. Defaults mirror the original deployment: a 4 MiB
/// collection cap and a two-year retention window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_max_bytes() -> u64 {
    4 * 1024 * 1024
}

fn default_retention_days() -> u32 {
    730
}

fn default_actor() -> String {
    "hospital-staff-001".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            actor: default_actor(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_bytes: default_max_bytes(),
            retention_days: default_retention_days(),
        }
    }
}
