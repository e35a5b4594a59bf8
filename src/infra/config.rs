// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::core::history::DEFAULT_HISTORY_CAPACITY;
use crate::infra::paths;

pub const DEFAULT_GREETING: &str = "Hello 👋! I'm your AI travel assistant. How can I help you?";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub itineraries: ItinerariesConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

/// Where replies come from. Only Ollama-compatible endpoints are supported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub base_url: String,
    pub name: String,
    pub timeout_seconds: u64,
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            name: "gpt-oss:20b".into(),
            timeout_seconds: 120,
            temperature: None,
        }
    }
}

impl ModelConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Number of turns kept in memory and sent to the model.
    pub history_capacity: usize,
    pub greeting: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            greeting: DEFAULT_GREETING.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItinerariesConfig {
    pub history_limit: u32,
}

impl Default for ItinerariesConfig {
    fn default() -> Self {
        Self { history_limit: 5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub port: u16,
    /// Bearer token required on every request when set.
    pub token: Option<String>,
    /// Sessions untouched for this long are dropped.
    pub session_ttl_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8787,
            token: None,
            session_ttl_seconds: 3600,
        }
    }
}

impl ApiConfig {
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds.max(1))
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.chat.history_capacity, 8);
        assert_eq!(c.model.base_url, "http://localhost:11434");
        assert_eq!(c.model.name, "gpt-oss:20b");
        assert_eq!(c.itineraries.history_limit, 5);
        assert_eq!(c.auth.min_password_len, 6);
        assert_eq!(c.api.port, 8787);
        assert!(c.api.token.is_none());
        assert_eq!(c.api.session_ttl(), Duration::from_secs(3600));
    }

    #[test]
    fn test_timeout_never_zero() {
        let m = ModelConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        assert_eq!(m.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.chat.history_capacity, 8);
        assert_eq!(config.chat.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_parse_partial_section() {
        let toml_str = r#"
[model]
name = "llama3.3"

[chat]
history_capacity = 4
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.name, "llama3.3");
        assert_eq!(config.model.base_url, "http://localhost:11434");
        assert_eq!(config.chat.history_capacity, 4);
        assert_eq!(config.chat.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[model]
base_url = "http://gpu-box:11434"
name = "qwen2.5"
timeout_seconds = 30
temperature = 0.2

[chat]
history_capacity = 12
greeting = "Xin chào!"

[itineraries]
history_limit = 10

[auth]
min_password_len = 10

[api]
port = 9000
token = "secret"
session_ttl_seconds = 600
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.base_url, "http://gpu-box:11434");
        assert_eq!(config.model.timeout(), Duration::from_secs(30));
        assert!((config.model.temperature.unwrap() - 0.2).abs() < 0.001);
        assert_eq!(config.chat.greeting, "Xin chào!");
        assert_eq!(config.itineraries.history_limit, 10);
        assert_eq!(config.auth.min_password_len, 10);
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.api.session_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\nport = 1234\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.port, 1234);
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nport = ").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
