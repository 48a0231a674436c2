// SPDX-License-Identifier: MIT

//! Typed error handling for composer-rs
//!
//! Structural problems in a workflow graph are reported as values
//! (`ValidationReport`); the types here cover everything that stops a
//! compile request from producing a document.

use thiserror::Error;

use crate::composer::workflow::graph::{NodeType, ValidationReport};

/// Top-level error type for composer-rs
#[derive(Debug, Error)]
pub enum ComposerError {
    /// Workflow-specific errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// Configuration errors (invalid env vars, bad flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Workflow-specific errors
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The graph failed structural validation
    #[error("Invalid workflow graph: {}", .0.messages().join("; "))]
    InvalidGraph(ValidationReport),

    /// A step-group node lists no agents
    #[error("Step group '{title}' has no agents")]
    EmptyStepGroup { title: String },

    /// A step-group node lists more agents than a step may hold
    #[error("Step group '{title}' has {count} agents; at most {max} are allowed")]
    OversizedStepGroup {
        title: String,
        count: usize,
        max: usize,
    },

    /// Workflow file with an extension we cannot parse
    #[error("Unsupported workflow file format: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised while turning an editor node into a typed `Node`
#[derive(Debug, Error)]
pub enum NodeError {
    /// The `data` payload does not match the node type
    #[error("Node '{id}' has an invalid {node_type} payload: {source}")]
    InvalidPayload {
        id: String,
        node_type: NodeType,
        #[source]
        source: serde_json::Error,
    },

    /// Agent nodes must name the agent they invoke
    #[error("Agent node '{0}' requires a non-empty agentName")]
    MissingAgentName(String),
}

impl ComposerError {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The validation report, when this error came from an invalid graph
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Workflow(WorkflowError::InvalidGraph(report)) => Some(report),
            _ => None,
        }
    }
}
