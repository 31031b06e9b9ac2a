//! Chain model configuration
//!
//! One [`ChainConfig`] value describes a single logical model: its window
//! widths, its namespace in the shared store, and the codec constants.
//! There is no process-wide default state; every operation receives the
//! configuration explicitly or through a [`crate::Chain`] handle.

use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ChainError;

fn default_key_length() -> usize {
    2
}

fn default_completion_length() -> usize {
    1
}

fn default_namespace() -> String {
    "markov".to_string()
}

fn default_separator() -> String {
    ":".to_string()
}

fn default_stop_token() -> String {
    "\u{0002}".to_string()
}

fn default_punctuation() -> Vec<String> {
    [",", ".", ";", "!", "?", "(", ")", "...", "....", "....."]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Configuration for one chain model.
///
/// All fields have serde defaults, so a partial TOML file only needs to
/// name the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Number of tokens in a lookup key window
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    /// Number of tokens in a completion window
    #[serde(default = "default_completion_length")]
    pub completion_length: usize,
    /// Prefix isolating this model's keys in a shared store
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Separator used when encoding token windows into keys
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Synthesized completion marking end-of-sequence
    #[serde(default = "default_stop_token")]
    pub stop_token: String,
    /// Tokens treated as punctuation for seed rejection and word counting
    #[serde(default = "default_punctuation")]
    pub punctuation: Vec<String>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            key_length: default_key_length(),
            completion_length: default_completion_length(),
            namespace: default_namespace(),
            separator: default_separator(),
            stop_token: default_stop_token(),
            punctuation: default_punctuation(),
        }
    }
}

impl ChainConfig {
    /// A default configuration under the given namespace.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    /// Check the structural invariants the engine relies on.
    ///
    /// The namespace must not contain the separator so that stripping it
    /// from a decoded key stays unambiguous.
    pub fn validate(&self) -> std::result::Result<(), ChainError> {
        if self.key_length == 0 {
            return Err(ChainError::Config("key_length must be at least 1".into()));
        }
        if self.completion_length == 0 {
            return Err(ChainError::Config(
                "completion_length must be at least 1".into(),
            ));
        }
        if self.separator.is_empty() {
            return Err(ChainError::Config("separator must not be empty".into()));
        }
        if self.namespace.is_empty() {
            return Err(ChainError::Config("namespace must not be empty".into()));
        }
        if self.namespace.contains(&self.separator) {
            return Err(ChainError::Config(format!(
                "namespace '{}' must not contain the separator '{}'",
                self.namespace, self.separator
            )));
        }
        if self.stop_token.is_empty() || self.stop_token.contains(&self.separator) {
            return Err(ChainError::Config(
                "stop_token must be non-empty and must not contain the separator".into(),
            ));
        }
        Ok(())
    }

    /// Whether a token belongs to the punctuation class.
    pub fn is_punctuation(&self, token: &str) -> bool {
        self.punctuation.iter().any(|p| p == token)
    }

    /// Load a configuration from a TOML file, validated.
    /// Unspecified fields fall back to their defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading chain config from {:?}", path);
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration to a TOML file.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ChainConfig::default();
        assert_eq!(config.key_length, 2);
        assert_eq!(config.completion_length, 1);
        assert_eq!(config.namespace, "markov");
        assert_eq!(config.separator, ":");
        assert_eq!(config.stop_token, "\u{0002}");
        assert!(config.is_punctuation(","));
        assert!(!config.is_punctuation("peach"));
        config.validate().unwrap();
    }

    #[test]
    fn test_with_namespace() {
        let config = ChainConfig::with_namespace("lyrics");
        assert_eq!(config.namespace, "lyrics");
        assert_eq!(config.key_length, 2);
    }

    #[test]
    fn test_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
key_length = 3
namespace = "songs"
"#
        )
        .unwrap();

        let config = ChainConfig::load_from(file.path()).unwrap();
        assert_eq!(config.key_length, 3);
        assert_eq!(config.namespace, "songs");
        // Unspecified values keep their defaults
        assert_eq!(config.completion_length, 1);
        assert_eq!(config.separator, ":");
    }

    #[test]
    fn test_save_and_load() {
        let mut config = ChainConfig::default();
        config.key_length = 4;
        config.namespace = "corpus".to_string();

        let file = NamedTempFile::new().unwrap();
        config.save_to(file.path()).unwrap();

        let loaded = ChainConfig::load_from(file.path()).unwrap();
        assert_eq!(loaded.key_length, 4);
        assert_eq!(loaded.namespace, "corpus");
    }

    #[test]
    fn test_zero_key_length_rejected() {
        let config = ChainConfig {
            key_length: 0,
            ..ChainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_completion_length_rejected() {
        let config = ChainConfig {
            completion_length: 0,
            ..ChainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_namespace_with_separator_rejected() {
        let config = ChainConfig {
            namespace: "a:b".to_string(),
            ..ChainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_namespace_rejected() {
        let config = ChainConfig {
            namespace: String::new(),
            ..ChainConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "key_length = 0").unwrap();
        assert!(ChainConfig::load_from(file.path()).is_err());
    }
}
