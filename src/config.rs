use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/esporteon.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite file backing the durable slots.
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Display name of the simulated chat peer.
    #[serde(default = "default_peer_name")]
    pub peer_name: String,
    /// Lower bound of the simulated reply delay, in milliseconds.
    #[serde(default = "default_reply_delay_min_ms")]
    pub reply_delay_min_ms: u64,
    /// Upper bound of the simulated reply delay, in milliseconds.
    #[serde(default = "default_reply_delay_max_ms")]
    pub reply_delay_max_ms: u64,
    /// Fake round-trip time for auth and recovery calls, in milliseconds.
    #[serde(default = "default_simulated_latency_ms")]
    pub simulated_latency_ms: u64,
}

fn default_database_path() -> String {
    "data/esporteon.db".to_string()
}

fn default_peer_name() -> String {
    "Cazé tv".to_string()
}

fn default_reply_delay_min_ms() -> u64 {
    1000
}

fn default_reply_delay_max_ms() -> u64 {
    3000
}

fn default_simulated_latency_ms() -> u64 {
    1000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            peer_name: default_peer_name(),
            reply_delay_min_ms: default_reply_delay_min_ms(),
            reply_delay_max_ms: default_reply_delay_max_ms(),
            simulated_latency_ms: default_simulated_latency_ms(),
        }
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = load_config("does/not/exist.json");
        assert_eq!(config.peer_name, "Cazé tv");
        assert_eq!(config.reply_delay_min_ms, 1000);
        assert_eq!(config.reply_delay_max_ms, 3000);
    }

    #[test]
    fn test_unparsable_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let config = load_config(path.to_str().unwrap());
        assert_eq!(config.database_path, "data/esporteon.db");
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/esporteon.json");
        let path = path.to_str().unwrap();

        let config = AppConfig {
            peer_name: "Narrador".to_string(),
            reply_delay_min_ms: 10,
            reply_delay_max_ms: 20,
            ..AppConfig::default()
        };
        save_config(path, &config).unwrap();

        let loaded = load_config(path);
        assert_eq!(loaded.peer_name, "Narrador");
        assert_eq!(loaded.reply_delay_min_ms, 10);
        assert_eq!(loaded.reply_delay_max_ms, 20);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"peer_name": "Galvão"}"#).unwrap();

        let config = load_config(path.to_str().unwrap());
        assert_eq!(config.peer_name, "Galvão");
        assert_eq!(config.simulated_latency_ms, 1000);
    }
}
