//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatcherError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub embedding: EmbeddingConfig,
    pub processing: ProcessingConfig,
    pub retrieval: RetrievalConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub suggestions: SuggestionsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// HuggingFace repo id or local directory of a Model2Vec model
    pub model: String,
    pub normalize: bool,
    pub hashing_dimension: usize,
    pub batch_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Model2vec,
    Hashing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

/// Text-completion backend for tailoring suggestions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsConfig {
    /// Shell command that reads a prompt on stdin and prints the completion.
    /// Unset means template suggestions only.
    pub command: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Model2vec,
            model: "minishlab/potion-base-8M".to_string(),
            normalize: true,
            hashing_dimension: 512,
            batch_size: 32,
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit configuration file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let processing = &self.processing;
        if processing.chunk_size == 0 {
            return Err(ResumeMatcherError::Configuration(
                "processing.chunk_size must be greater than zero".to_string(),
            ));
        }
        if processing.chunk_overlap >= processing.chunk_size {
            return Err(ResumeMatcherError::Configuration(format!(
                "processing.chunk_overlap ({}) must be smaller than chunk_size ({})",
                processing.chunk_overlap, processing.chunk_size
            )));
        }
        if self.embedding.hashing_dimension == 0 {
            return Err(ResumeMatcherError::Configuration(
                "embedding.hashing_dimension must be greater than zero".to_string(),
            ));
        }
        if matches!(&self.suggestions.command, Some(command) if command.trim().is_empty()) {
            return Err(ResumeMatcherError::Configuration(
                "suggestions.command must not be empty".to_string(),
            ));
        }
        if self.embedding.batch_size == 0 {
            return Err(ResumeMatcherError::Configuration(
                "embedding.batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.processing.chunk_size, 500);
        assert_eq!(config.processing.chunk_overlap, 50);
        assert_eq!(config.retrieval.top_k, 5);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.embedding.backend = EmbeddingBackend::Hashing;
        config.output.format = OutputFormat::Markdown;
        config.suggestions.command = Some("ollama run llama3".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk_size() {
        let mut config = Config::default();
        config.processing.chunk_overlap = config.processing.chunk_size;
        assert!(matches!(config.validate(), Err(ResumeMatcherError::Configuration(_))));
    }

    #[test]
    fn test_malformed_file_is_a_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "embedding = 3").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ResumeMatcherError::Configuration(_))));
    }

    #[test]
    fn test_suggestions_section_is_optional() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.save_to(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let trimmed: String = content
            .split("[suggestions]")
            .next()
            .unwrap()
            .to_string();
        std::fs::write(&path, trimmed).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.suggestions.command, None);

        config.suggestions.command = Some("   ".to_string());
        assert!(matches!(config.validate(), Err(ResumeMatcherError::Configuration(_))));
    }
}
