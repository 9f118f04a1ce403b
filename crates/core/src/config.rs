//! Configuration management for shopqa.
//!
//! Configuration is merged from three sources, later sources winning:
//! - Built-in defaults
//! - An optional YAML config file (`shopqa.yaml`)
//! - Environment variables and command-line flags

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default sampling temperature for answer generation.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default number of documents retrieved per query.
pub const DEFAULT_TOP_K: usize = 3;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Chat model provider (e.g., "groq", "ollama")
    pub provider: String,

    /// Model identifier for question rewriting and answer generation
    pub model: String,

    /// Optional custom endpoint for the chat provider
    pub endpoint: Option<String>,

    /// API key for the chat provider
    pub api_key: Option<String>,

    /// Sampling temperature for answer generation
    pub temperature: f32,

    /// Embedding provider (e.g., "ollama", "trigram")
    pub embedding_provider: String,

    /// Embedding model identifier
    pub embedding_model: String,

    /// Number of documents retrieved per query
    pub top_k: usize,

    /// Path to the SQLite vector index
    pub index_path: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// YAML config file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RetrievalSection {
    #[serde(rename = "embeddingProvider")]
    embedding_provider: Option<String>,
    #[serde(rename = "embeddingModel")]
    embedding_model: Option<String>,
    #[serde(rename = "topK")]
    top_k: Option<usize>,
    #[serde(rename = "indexPath")]
    index_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            endpoint: None,
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            embedding_provider: "trigram".to_string(),
            embedding_model: "trigram-v1".to_string(),
            top_k: DEFAULT_TOP_K,
            index_path: PathBuf::from("shopqa.db"),
            config_file: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment and optional config file.
    ///
    /// Environment variables:
    /// - `SHOPQA_CONFIG`: Path to the YAML config file
    /// - `SHOPQA_PROVIDER`: Chat model provider
    /// - `SHOPQA_MODEL`: Model identifier
    /// - `SHOPQA_ENDPOINT`: Custom provider endpoint
    /// - `SHOPQA_API_KEY`: API key (falls back to the provider's own env var)
    /// - `SHOPQA_INDEX`: Path to the SQLite vector index
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("SHOPQA_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // YAML config file, when present
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("shopqa.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("SHOPQA_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("SHOPQA_MODEL") {
            config.model = model;
        }

        if let Ok(endpoint) = std::env::var("SHOPQA_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        if let Ok(index_path) = std::env::var("SHOPQA_INDEX") {
            config.index_path = PathBuf::from(index_path);
        }

        config.api_key = std::env::var("SHOPQA_API_KEY").ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
            if let Some(env_var) = llm.api_key_env {
                if let Ok(key) = std::env::var(&env_var) {
                    result.api_key = Some(key);
                }
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(provider) = retrieval.embedding_provider {
                result.embedding_provider = provider;
            }
            if let Some(model) = retrieval.embedding_model {
                result.embedding_model = model;
            }
            if let Some(top_k) = retrieval.top_k {
                result.top_k = top_k;
            }
            if let Some(index_path) = retrieval.index_path {
                result.index_path = PathBuf::from(index_path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables and the
    /// config file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        model: Option<String>,
        endpoint: Option<String>,
        index_path: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(index_path) = index_path {
            self.index_path = index_path;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the API key for the active provider.
    ///
    /// `SHOPQA_API_KEY` wins; otherwise the provider's conventional
    /// environment variable is consulted.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        let env_var = match self.provider.as_str() {
            "groq" => Some("GROQ_API_KEY"),
            "openai" => Some("OPENAI_API_KEY"),
            _ => None,
        };

        env_var.and_then(|var| std::env::var(var).ok())
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["groq", "ollama"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.provider == "groq" && self.resolve_api_key().is_none() {
            return Err(AppError::Config(
                "Groq provider requires an API key (GROQ_API_KEY or SHOPQA_API_KEY)".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default();
        let overridden = config.with_overrides(
            Some("ollama".to_string()),
            Some("llama3.2".to_string()),
            None,
            None,
            None,
            true,
            false,
        );

        assert_eq!(overridden.provider, "ollama");
        assert_eq!(overridden.model, "llama3.2");
        assert!(overridden.verbose);
        assert_eq!(overridden.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ollama() {
        let config = AppConfig {
            provider: "ollama".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = AppConfig {
            api_key: Some("sk-test".to_string()),
            ..AppConfig::default()
        };
        assert_eq!(config.resolve_api_key(), Some("sk-test".to_string()));
    }
}
