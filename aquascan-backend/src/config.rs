use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub static CONFIG: OnceLock<BackendConfig> = OnceLock::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Log files older than this are deleted by the cleanup task
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub recognition: RecognitionConfig,
}

/// Bundled static data files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_regulations_path")]
    pub regulations_path: String,

    #[serde(default = "default_species_names_path")]
    pub species_names_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_path")]
    pub path: String,

    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

/// Remote image-recognition service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Identification is disabled when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Best guesses below this accuracy count as "no identification"
    #[serde(default)]
    pub min_accuracy: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_retention_days() -> u64 {
    3
}

fn default_regulations_path() -> String {
    "data/zone_regulations.json".to_string()
}

fn default_species_names_path() -> String {
    "data/species_names.json".to_string()
}

fn default_history_path() -> String {
    "data/history.json".to_string()
}

fn default_history_capacity() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_retention_days: default_log_retention_days(),
            data: DataConfig::default(),
            history: HistoryConfig::default(),
            recognition: RecognitionConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            regulations_path: default_regulations_path(),
            species_names_path: default_species_names_path(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: default_history_path(),
            capacity: default_history_capacity(),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            min_accuracy: 0.0,
        }
    }
}

impl BackendConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: BackendConfig = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the config file into [`CONFIG`]; later calls keep the first value.
pub fn read_config(path: &str) -> anyhow::Result<&'static BackendConfig> {
    let config = BackendConfig::from_file(path)?;
    Ok(CONFIG.get_or_init(|| config))
}
