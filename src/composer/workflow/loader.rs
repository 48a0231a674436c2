// SPDX-License-Identifier: MIT

//! Workflow loader - graph and plan file loading and parsing
//!
//! `.json` files are parsed as JSON, `.yaml`/`.yml` files as YAML.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

use super::types::{GraphDocument, PlanDefinition};
use crate::error::{ComposerError, WorkflowError};

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, WorkflowError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match ext.as_str() {
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            _ => Err(WorkflowError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Loads graph and plan files
pub struct WorkflowLoader;

impl WorkflowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load an editor graph from a file
    pub fn load_graph<P: AsRef<Path>>(&self, path: P) -> Result<GraphDocument, ComposerError> {
        Self::load(path.as_ref())
    }

    /// Load a wizard plan from a file
    pub fn load_plan<P: AsRef<Path>>(&self, path: P) -> Result<PlanDefinition, ComposerError> {
        Self::load(path.as_ref())
    }

    /// Parse content in the given format
    pub fn parse<T: DeserializeOwned>(content: &str, format: FileFormat) -> Result<T, ComposerError> {
        let value = match format {
            FileFormat::Json => serde_json::from_str(content)?,
            FileFormat::Yaml => serde_yaml::from_str(content)?,
        };
        Ok(value)
    }

    fn load<T: DeserializeOwned>(path: &Path) -> Result<T, ComposerError> {
        let format = FileFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        log::debug!("Loading {:?} file {}", format, path.display());
        Self::parse(&content, format)
    }
}

impl Default for WorkflowLoader {
    fn default() -> Self {
        Self::new()
    }
}
