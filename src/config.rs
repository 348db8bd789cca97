//! Runtime configuration, loadable from a TOML or JSON file. Every field
//! has a default so the service also runs with no file at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Name this instance reports in logs.
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Explicit entity-store path; resolved under the per-user data
    /// directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// TCP endpoint of the detection stream.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Live events stay session-only unless this is set.
    #[serde(default)]
    pub persist_live_events: bool,
}

fn default_instance_name() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().to_string(),
        Err(_) => "sentinel".to_string(),
    }
}

fn default_endpoint() -> String {
    "127.0.0.1:8760".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instance_name: default_instance_name(),
            storage: StorageConfig::default(),
            ingest: IngestConfig::default(),
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            endpoint: default_endpoint(),
            persist_live_events: false,
        }
    }
}

/// Load configuration from a file or use defaults
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let Some(path) = config_path else {
        return Ok(Config::default());
    };

    let is_json = path.extension().map_or(false, |ext| ext == "json");
    let is_toml = path.extension().map_or(false, |ext| ext == "toml");
    if !is_json && !is_toml {
        return Err(Error::Config(format!(
            "unsupported config file format: {}",
            path.display()
        )));
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

    if is_json {
        serde_json::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse JSON config: {}", e)))
    } else {
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("failed to parse TOML config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let config = load_config(None).unwrap();
        assert_eq!(config.ingest.endpoint, "127.0.0.1:8760");
        assert!(!config.ingest.persist_live_events);
        assert!(config.storage.data_dir.is_none());
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let raw = r#"
            instance_name = "dockside"

            [ingest]
            persist_live_events = true
        "#;
        let config: Config = toml::from_str(raw).unwrap();

        assert_eq!(config.instance_name, "dockside");
        assert!(config.ingest.persist_live_events);
        assert_eq!(config.ingest.endpoint, "127.0.0.1:8760");
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_config(Some(Path::new("sentinel.yaml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
