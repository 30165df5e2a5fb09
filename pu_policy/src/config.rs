use crate::store::DEFAULT_POLICY_FILE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label key prefixes that select a policy index, checked in order
pub const DEFAULT_INDEX_LABEL_PREFIXES: [&str; 3] =
    ["user-policy-index", "@usr:PolicyIndex", "@usr:user"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Startup configuration for the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// JSON policy cache to load at startup
    pub policy_file: PathBuf,

    /// Networks handed to the controller with every policy
    pub target_networks: Vec<String>,

    pub index_label_prefixes: Vec<String>,

    /// Default filter for the subscriber; `RUST_LOG` takes precedence
    pub log_level: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            policy_file: PathBuf::from(DEFAULT_POLICY_FILE),
            target_networks: Vec::new(),
            index_label_prefixes: DEFAULT_INDEX_LABEL_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            log_level: "info".to_string(),
        }
    }
}

impl ResolverConfig {
    /// Read and validate a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ResolverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index_label_prefixes.is_empty() {
            return Err(ConfigError::Invalid(
                "index_label_prefixes cannot be empty".to_string(),
            ));
        }
        if self.index_label_prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::Invalid(
                "index_label_prefixes cannot contain an empty prefix".to_string(),
            ));
        }
        if self.target_networks.iter().any(|n| n.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "target_networks cannot contain an empty network".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ResolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResolverConfig::default());
        assert_eq!(config.policy_file, PathBuf::from("policy.json"));
        assert_eq!(config.index_label_prefixes[0], "user-policy-index");
    }

    #[test]
    fn test_partial_document() {
        let config = ResolverConfig::from_toml_str(
            r#"
            policy_file = "/etc/pu/policy.json"
            target_networks = ["10.0.0.0/8", "172.17.0.0/16"]
            "#,
        )
        .unwrap();

        assert_eq!(config.policy_file, PathBuf::from("/etc/pu/policy.json"));
        assert_eq!(config.target_networks.len(), 2);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_prefixes_rejected() {
        let result = ResolverConfig::from_toml_str("index_label_prefixes = []");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = ResolverConfig::from_toml_str(r#"index_label_prefixes = ["team", ""]"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml() {
        let result = ResolverConfig::from_toml_str("policy_file = [");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"log_level = "debug""#).unwrap();

        let config = ResolverConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");

        let missing = ResolverConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
