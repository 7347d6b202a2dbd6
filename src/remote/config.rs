use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::error::{Result, ServiceError};

/// Environment variable holding the service API key. The key never goes in
/// the config file.
pub const API_KEY_ENV: &str = "BLOOMWATCH_API_KEY";

// ---------------------------------------------------------------------------
// Service connection parameters
// ---------------------------------------------------------------------------

/// Connection parameters for the hosted imagery service, loadable from an
/// optional `bloomwatch.json` next to the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service endpoint root, including the API version segment.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Delay between attempts after a transport failure.
    pub retry_delay_secs: u64,

    /// Max retry attempts on transport failures. Status errors never retry.
    pub max_retry: u8,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://imagery.phenocloud.io/v1".to_string(),
            timeout_secs: 30,
            retry_delay_secs: 5,
            max_retry: 3,
        }
    }
}

impl ServiceConfig {
    /// Read the config file if present, falling back to defaults. A file that
    /// exists but fails to parse is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(config) => {
                    log::info!("loaded service config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("ignoring invalid config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    /// The API key from the environment.
    pub fn api_key(&self) -> Result<String> {
        std::env::var(API_KEY_ENV).map_err(|_| ServiceError::MissingApiKey(API_KEY_ENV))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_knobs() {
        let config = ServiceConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
        assert_eq!(config.max_retry, 3);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = ServiceConfig::load_or_default(Path::new("no_such_bloomwatch.json"));
        assert_eq!(config.base_url, ServiceConfig::default().base_url);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{ "base_url": "http://localhost:8080/v1" }"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.max_retry, ServiceConfig::default().max_retry);
    }
}
