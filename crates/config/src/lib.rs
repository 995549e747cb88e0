//! Configuration loading and validation for Persona.
//!
//! Loads configuration from a TOML file with environment variable
//! overrides, and validates all settings at load time. Storage location is
//! an explicit, required setting — there is no implicit default database
//! path, so behavior is deterministic and testable without environment
//! inspection.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The root configuration structure.
///
/// Maps directly to the service's `config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the LLM provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Conversation store configuration (storage path is required for
    /// durable backends — no silent fallback)
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("memory", &self.memory)
            .field("gateway", &self.gateway)
            .finish()
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider kind: "openai", "openrouter", "ollama", or "custom"
    #[serde(default = "default_provider_kind")]
    pub kind: String,

    /// Base URL for "custom" providers (or to override a built-in one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Model to use
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_provider_kind() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4.1-mini".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_max_tokens() -> u32 {
    1024
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_kind(),
            base_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Store backend: "sqlite" or "in_memory"
    #[serde(default = "default_memory_backend")]
    pub backend: String,

    /// Database file path. Required when the backend is "sqlite" — there is
    /// deliberately no default, so a misconfigured deployment fails at
    /// startup instead of writing to a surprise location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_memory_backend() -> String {
    "sqlite".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            backend: default_memory_backend(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Name reported by the health endpoint
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_service_name() -> String {
    "persona-agent".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            service_name: default_service_name(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl AppConfig {
    /// Load configuration from a specific file path.
    ///
    /// A missing file is an error: the service refuses to start on ambient
    /// defaults, because the storage location must be explicit.
    ///
    /// Environment variables override file values:
    /// - `PERSONA_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `PERSONA_MODEL`
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("PERSONA_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("PERSONA_MODEL") {
            config.provider.model = model;
        }

        config.validate()?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        match self.memory.backend.as_str() {
            "sqlite" => {
                if self.memory.path.is_none() {
                    return Err(ConfigError::ValidationError(
                        "memory.path is required when memory.backend is \"sqlite\"".into(),
                    ));
                }
            }
            "in_memory" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "unknown memory.backend \"{other}\" (expected \"sqlite\" or \"in_memory\")"
                )));
            }
        }

        if self.provider.kind == "custom" && self.provider.base_url.is_none() {
            return Err(ConfigError::ValidationError(
                "provider.base_url is required when provider.kind is \"custom\"".into(),
            ));
        }

        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            memory: MemoryConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_complete_config() {
        let file = write_config(
            r#"
            api_key = "sk-test"

            [provider]
            kind = "openai"
            model = "gpt-4.1-mini"

            [memory]
            backend = "sqlite"
            path = "/tmp/persona-test.db"

            [gateway]
            port = 3000
            "#,
        );

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.provider.model, "gpt-4.1-mini");
        assert_eq!(config.gateway.port, 3000);
        assert_eq!(
            config.memory.path.as_deref(),
            Some(Path::new("/tmp/persona-test.db"))
        );
    }

    #[test]
    fn sqlite_backend_without_path_is_rejected() {
        let file = write_config(
            r#"
            [memory]
            backend = "sqlite"
            "#,
        );

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("memory.path"));
    }

    #[test]
    fn in_memory_backend_needs_no_path() {
        let config = AppConfig {
            memory: MemoryConfig {
                backend: "in_memory".into(),
                path: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let config = AppConfig {
            memory: MemoryConfig {
                backend: "redis".into(),
                path: None,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let mut config = AppConfig::default();
        config.memory.backend = "in_memory".into();
        config.provider.temperature = 3.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load_from(Path::new("/nonexistent/persona.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn api_key_is_redacted_in_debug_output() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
