// SPDX-License-Identifier: MIT

//! Graph-based workflow compilation
//!
//! Data flows one way: nodes and edges are indexed, the index is validated,
//! and a valid index is compiled into an ordered list of steps.

pub mod compiler;
pub mod index;
mod normalizer;
pub mod types;
pub mod validator;

pub use compiler::{compile, StepDescriptor};
pub use index::GraphIndex;
pub use normalizer::normalize_plan;
pub use types::{
    AgentData, AgentRef, Edge, Node, NodeId, NodeKind, NodeType, StartData, StepGroupData,
    StepMode, WorkflowGraph, MAX_GROUP_AGENTS,
};
pub use validator::{validate, GraphIssue, ValidationReport};
