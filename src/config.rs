use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub session: SessionConfig,
}

/// Gemini endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key. The `GEMINI_API_KEY` environment variable takes precedence.
    pub api_key: Option<String>,
    /// Model id used for every content call.
    pub model: String,
}

/// Orchestration knobs for a discovery session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum retries for a rate-limited call.
    pub max_retries: u32,
    /// Initial backoff delay in milliseconds, doubled per retry.
    pub initial_backoff_ms: u64,
    /// Quiet period before a suggestion query fires, in milliseconds.
    pub suggest_debounce_ms: u64,
    /// Identification confidence below this is a hard rejection.
    pub confidence_reject_below: f64,
    /// Identification confidence below this (but accepted) raises a warning.
    pub confidence_warn_below: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 2000,
            suggest_debounce_ms: 500,
            confidence_reject_below: 40.0,
            confidence_warn_below: 50.0,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/tripsight/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e} — using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {} — using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tripsight")
            .join("config.toml")
    }
}

impl GeminiConfig {
    /// Resolved API key: environment variable first, then the config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_policy() {
        let config = SessionConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.initial_backoff_ms, 2000);
        assert_eq!(config.suggest_debounce_ms, 500);
        assert_eq!(config.confidence_reject_below, 40.0);
        assert_eq!(config.confidence_warn_below, 50.0);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [gemini]
            model = "gemini-1.5-pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.gemini.model, "gemini-1.5-pro");
        assert_eq!(config.session.max_retries, 3);
    }
}
