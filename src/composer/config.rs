// SPDX-License-Identifier: MIT

//! Runtime configuration read from the environment
//!
//! The binary loads `.env` with `dotenv` before calling `from_env`.

use std::path::PathBuf;

use crate::error::ComposerError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    pub host: String,
    pub port: u16,
    /// Where saved workflow documents are written
    pub output_dir: PathBuf,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            output_dir: std::env::temp_dir(),
        }
    }
}

impl ComposerConfig {
    /// Read `COMPOSER_HOST`, `COMPOSER_PORT` and `COMPOSER_OUTPUT_DIR`
    pub fn from_env() -> Result<Self, ComposerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ComposerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("COMPOSER_HOST").filter(|h| !h.is_empty()) {
            config.host = host;
        }

        if let Some(port) = lookup("COMPOSER_PORT") {
            config.port = port.parse().map_err(|_| {
                ComposerError::config(format!("COMPOSER_PORT must be a port number, got '{}'", port))
            })?;
        }

        if let Some(dir) = lookup("COMPOSER_OUTPUT_DIR").filter(|d| !d.is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ComposerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ComposerConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_overrides() {
        let config = ComposerConfig::from_lookup(lookup(&[
            ("COMPOSER_HOST", "0.0.0.0"),
            ("COMPOSER_PORT", "8088"),
            ("COMPOSER_OUTPUT_DIR", "/tmp/workflows"),
        ]))
        .unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8088);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/workflows"));
    }

    #[test]
    fn test_invalid_port() {
        let result = ComposerConfig::from_lookup(lookup(&[("COMPOSER_PORT", "http")]));
        match result {
            Err(ComposerError::Config(msg)) => assert!(msg.contains("'http'")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}
