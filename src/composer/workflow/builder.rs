// SPDX-License-Identifier: MIT

//! Workflow builder - orchestrates workflow compilation
//!
//! This module provides the high-level Builder that runs a graph through
//! indexing, validation and step compilation, and wraps the result with the
//! caller's metadata.

use serde::Serialize;
use std::path::Path;

use crate::composer::workflow::document::{WorkflowDocument, WorkflowMetadata};
use crate::composer::workflow::graph::{
    compile, normalize_plan, validate, GraphIndex, NodeKind, ValidationReport, WorkflowGraph,
    MAX_GROUP_AGENTS,
};
use crate::composer::workflow::loader::WorkflowLoader;
use crate::composer::workflow::types::PlanDefinition;
use crate::error::{ComposerError, WorkflowError};

/// Live-preview result: the validation report, plus the document when the
/// graph compiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub validation: ValidationReport,
    /// Step-group problem that kept a structurally valid graph from compiling
    #[serde(rename = "stepGroupError", skip_serializing_if = "Option::is_none")]
    pub step_group_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<WorkflowDocument>,
}

/// High-level builder for compiling workflow graphs into documents
pub struct Builder {
    loader: WorkflowLoader,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            loader: WorkflowLoader::new(),
        }
    }

    /// Run the structural checks only
    pub fn validate(&self, graph: &WorkflowGraph) -> ValidationReport {
        validate(&GraphIndex::build(&graph.nodes, &graph.edges))
    }

    /// Validate and compile a graph
    pub fn compile(
        &self,
        metadata: &WorkflowMetadata,
        graph: &WorkflowGraph,
    ) -> Result<WorkflowDocument, ComposerError> {
        let index = GraphIndex::build(&graph.nodes, &graph.edges);

        let report = validate(&index);
        if !report.is_valid {
            log::info!(
                "Rejected workflow '{}': {} issues",
                metadata.workflow_name.as_deref().unwrap_or_default(),
                report.errors.len()
            );
            return Err(WorkflowError::InvalidGraph(report).into());
        }

        check_step_groups(&index)?;

        let steps = compile(&index);
        log::info!(
            "Compiled workflow '{}' with {} steps",
            metadata.workflow_name.as_deref().unwrap_or_default(),
            steps.len()
        );

        Ok(WorkflowDocument::new(metadata, steps))
    }

    /// Validate and, when valid, compile for display
    pub fn preview(
        &self,
        metadata: &WorkflowMetadata,
        graph: &WorkflowGraph,
    ) -> Result<Preview, ComposerError> {
        match self.compile(metadata, graph) {
            Ok(document) => Ok(Preview {
                validation: ValidationReport::valid(),
                step_group_error: None,
                document: Some(document),
            }),
            Err(ComposerError::Workflow(WorkflowError::InvalidGraph(validation))) => {
                Ok(Preview {
                    validation,
                    step_group_error: None,
                    document: None,
                })
            }
            Err(ComposerError::Workflow(
                e @ (WorkflowError::EmptyStepGroup { .. }
                | WorkflowError::OversizedStepGroup { .. }),
            )) => Ok(Preview {
                validation: ValidationReport::valid(),
                step_group_error: Some(e.to_string()),
                document: None,
            }),
            Err(e) => Err(e),
        }
    }

    /// Compile and render the JSON text
    pub fn render(
        &self,
        metadata: &WorkflowMetadata,
        graph: &WorkflowGraph,
    ) -> Result<String, ComposerError> {
        Ok(self.compile(metadata, graph)?.to_json()?)
    }

    /// Compile a wizard plan
    pub fn compile_plan(&self, plan: &PlanDefinition) -> Result<WorkflowDocument, ComposerError> {
        let graph = normalize_plan(plan);
        log::info!(
            "Normalized plan '{}' to graph with {} nodes",
            plan.metadata.workflow_name.as_deref().unwrap_or_default(),
            graph.nodes.len()
        );
        self.compile(&plan.metadata, &graph)
    }

    /// Load a graph file and compile it, applying metadata overrides
    pub fn compile_file<P: AsRef<Path>>(
        &self,
        path: P,
        overrides: WorkflowMetadata,
    ) -> Result<WorkflowDocument, ComposerError> {
        let doc = self.loader.load_graph(path)?;
        let metadata = doc.metadata.merge(overrides);
        self.compile(&metadata, &doc.graph)
    }

    /// Load a plan file and compile it
    pub fn compile_plan_file<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<WorkflowDocument, ComposerError> {
        let plan = self.loader.load_plan(path)?;
        self.compile_plan(&plan)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

/// Step-groups must hold between one and `MAX_GROUP_AGENTS` agents
fn check_step_groups(index: &GraphIndex<'_>) -> Result<(), WorkflowError> {
    for node in index.nodes() {
        if let NodeKind::StepGroup(group) = &node.kind {
            if group.agents.is_empty() {
                return Err(WorkflowError::EmptyStepGroup {
                    title: group.title.clone(),
                });
            }
            if group.agents.len() > MAX_GROUP_AGENTS {
                return Err(WorkflowError::OversizedStepGroup {
                    title: group.title.clone(),
                    count: group.agents.len(),
                    max: MAX_GROUP_AGENTS,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::workflow::graph::{AgentRef, Edge, GraphIssue, Node, StepMode};
    use crate::composer::workflow::types::PlanStep;

    fn linear(nodes: Vec<Node>) -> WorkflowGraph {
        let edges = nodes
            .windows(2)
            .map(|pair| Edge::connect(pair[0].id.clone(), pair[1].id.clone()))
            .collect();
        WorkflowGraph::new(nodes, edges)
    }

    fn group(id: &str, count: usize) -> Node {
        Node::step_group(
            id,
            "Fan out",
            StepMode::Parallel,
            (0..count).map(|i| AgentRef::new(format!("agent{}", i))).collect(),
        )
    }

    #[test]
    fn test_compile_valid_graph() {
        let graph = linear(vec![
            Node::start("start"),
            Node::agent("a1", "Agent1"),
            Node::end("end"),
        ]);
        let metadata = WorkflowMetadata {
            workflow_name: Some("one".to_string()),
            ..Default::default()
        };

        let doc = Builder::new().compile(&metadata, &graph).unwrap();
        assert_eq!(doc.workflow_name, "one");
        assert_eq!(doc.workflow_steps.len(), 1);
        assert_eq!(doc.workflow_steps[0].agents, vec!["Agent1"]);
    }

    #[test]
    fn test_compile_invalid_graph_returns_report() {
        let graph = linear(vec![Node::agent("a1", "Agent1"), Node::end("end")]);

        let err = Builder::new()
            .compile(&WorkflowMetadata::default(), &graph)
            .unwrap_err();
        let report = err.validation_report().unwrap();
        assert_eq!(report.errors, vec![GraphIssue::MissingStart]);
    }

    #[test]
    fn test_empty_group_rejected() {
        let graph = linear(vec![Node::start("s"), group("g", 0), Node::end("e")]);

        let err = Builder::new()
            .compile(&WorkflowMetadata::default(), &graph)
            .unwrap_err();
        assert!(matches!(
            err,
            ComposerError::Workflow(WorkflowError::EmptyStepGroup { .. })
        ));
    }

    #[test]
    fn test_group_size_limit() {
        let builder = Builder::new();
        let metadata = WorkflowMetadata::default();

        let full = linear(vec![Node::start("s"), group("g", 10), Node::end("e")]);
        assert!(builder.compile(&metadata, &full).is_ok());

        let over = linear(vec![Node::start("s"), group("g", 11), Node::end("e")]);
        assert!(matches!(
            builder.compile(&metadata, &over),
            Err(ComposerError::Workflow(WorkflowError::OversizedStepGroup { count: 11, .. }))
        ));
    }

    #[test]
    fn test_preview_invalid_graph() {
        let graph = WorkflowGraph::new(vec![Node::start("s")], vec![]);

        let preview = Builder::new()
            .preview(&WorkflowMetadata::default(), &graph)
            .unwrap();
        assert!(!preview.validation.is_valid);
        assert_eq!(preview.validation.messages(), vec!["End node is required"]);
        assert!(preview.document.is_none());
    }

    #[test]
    fn test_preview_empty_group_is_not_an_error() {
        let graph = linear(vec![Node::start("s"), group("g", 0), Node::end("e")]);

        let preview = Builder::new()
            .preview(&WorkflowMetadata::default(), &graph)
            .unwrap();
        assert!(preview.validation.is_valid);
        assert_eq!(
            preview.step_group_error.as_deref(),
            Some("Step group 'Fan out' has no agents")
        );
        assert!(preview.document.is_none());
    }

    #[test]
    fn test_preview_valid_graph() {
        let graph = linear(vec![Node::start("s"), Node::end("e")]);

        let preview = Builder::new()
            .preview(&WorkflowMetadata::default(), &graph)
            .unwrap();
        assert!(preview.validation.is_valid);
        assert!(preview.document.unwrap().workflow_steps.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let graph = linear(vec![
            Node::start("s"),
            Node::agent("a", "A"),
            group("g", 2),
            Node::end("e"),
        ]);
        let metadata = WorkflowMetadata::default();
        let builder = Builder::new();

        let first = builder.render(&metadata, &graph).unwrap();
        let second = builder.render(&metadata, &graph).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"workflowModel\": \"default\""));
    }

    #[test]
    fn test_compile_plan() {
        let plan = PlanDefinition {
            metadata: WorkflowMetadata::default(),
            steps: vec![
                PlanStep {
                    agents: vec![AgentRef::new("A")],
                    ..Default::default()
                },
                PlanStep {
                    mode: StepMode::Parallel,
                    agents: vec![AgentRef::new("B"), AgentRef::new("C")],
                    ..Default::default()
                },
            ],
        };

        let doc = Builder::new().compile_plan(&plan).unwrap();
        assert_eq!(doc.workflow_steps.len(), 2);
        assert_eq!(doc.workflow_steps[0].title, "A");
        assert_eq!(doc.workflow_steps[1].title, "Step 2");
        assert_eq!(doc.workflow_steps[1].mode, StepMode::Parallel);
    }
}
