use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

fn default_api_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_latency_ms() -> u64 {
    crate::api::store::DEFAULT_LATENCY.as_millis() as u64
}

fn default_owner_name() -> String {
    "Portfolio Owner".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Prefer the real JSON API over the mock store when it is reachable.
    #[serde(default)]
    pub use_real_api: bool,
    /// Artificial delay applied to every mock store operation.
    #[serde(default = "default_latency_ms")]
    pub simulated_latency_ms: u64,
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
    #[serde(default)]
    pub owner_tagline: String,
    #[serde(default)]
    pub contact_email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            use_real_api: false,
            simulated_latency_ms: default_latency_ms(),
            owner_name: default_owner_name(),
            owner_tagline: String::new(),
            contact_email: String::new(),
        }
    }
}

impl Config {
    /// Environment takes precedence over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("FOLIO_API_URL") {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        if let Ok(flag) = std::env::var("FOLIO_USE_REAL_API") {
            self.use_real_api = matches!(flag.trim(), "1" | "true" | "TRUE" | "True");
        }
    }
}

pub fn load_config(config_path: &Path) -> Config {
    if !config_path.exists() {
        info!("No config found, creating default config");
        let default = Config::default();
        if let Ok(json) = serde_json::to_string_pretty(&default) {
            let _ = std::fs::write(config_path, json);
        }
        return default;
    }
    let content = std::fs::read_to_string(config_path).unwrap_or_default();
    match serde_json::from_str::<Config>(&content) {
        Ok(c) => {
            info!("Config loaded from {:?}", config_path);
            c
        }
        Err(e) => {
            warn!("Config parse failed ({}), rewriting defaults", e);
            let default = Config::default();
            if let Ok(json) = serde_json::to_string_pretty(&default) {
                let _ = std::fs::write(config_path, json);
            }
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.api_base_url = "http://example.test/api".into();
        config.use_real_api = true;
        config.simulated_latency_ms = 0;

        let json = serde_json::to_string(&config).unwrap();
        let restored: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.api_base_url, "http://example.test/api");
        assert!(restored.use_real_api);
        assert_eq!(restored.simulated_latency_ms, 0);
    }

    #[test]
    fn test_config_backward_compat() {
        let minimal_json = r#"{ "api_base_url": "http://localhost:8080/api" }"#;
        let config: Config = serde_json::from_str(minimal_json).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert!(!config.use_real_api);
        assert_eq!(config.simulated_latency_ms, 300);
        assert_eq!(config.owner_name, "Portfolio Owner");
    }
}
