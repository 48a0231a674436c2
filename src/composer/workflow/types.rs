// SPDX-License-Identifier: MIT

//! File schema types for workflow graphs and wizard plans
//!
//! Both file kinds carry the workflow metadata at the top level, in the
//! same camelCase spelling the generated document uses.

use serde::{Deserialize, Serialize};

use super::document::WorkflowMetadata;
use super::graph::types::{AgentRef, StepMode, WorkflowGraph};

/// A saved editor graph: metadata plus nodes and edges
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct GraphDocument {
    #[serde(flatten)]
    pub metadata: WorkflowMetadata,
    #[serde(flatten)]
    pub graph: WorkflowGraph,
}

/// Answers collected by the terminal wizard: an ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlanDefinition {
    #[serde(flatten)]
    pub metadata: WorkflowMetadata,
    #[serde(default)]
    pub steps: Vec<PlanStep>,
}

/// One step of a wizard plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlanStep {
    pub title: Option<String>,
    #[serde(default)]
    pub mode: StepMode,
    pub purpose: Option<String>,
    #[serde(default)]
    pub agents: Vec<AgentRef>,
}
