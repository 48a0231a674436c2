// SPDX-License-Identifier: MIT

//! Structural validation of workflow graphs
//!
//! Checks run in a fixed order and every failing check contributes an issue:
//! 1. exactly one Start node
//! 2. exactly one End node
//! 3. End reachable from Start
//! 4. no disconnected nodes
//! 5. no directed cycles
//!
//! Checks 3-5 need both anchors and are skipped when either is missing or
//! ambiguous.

use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use super::index::GraphIndex;
use super::types::{Node, NodeType};

/// A structural problem found in a workflow graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphIssue {
    #[error("Start node is required")]
    MissingStart,

    #[error("Only one Start node is allowed (found {0})")]
    MultipleStarts(usize),

    #[error("End node is required")]
    MissingEnd,

    #[error("Only one End node is allowed (found {0})")]
    MultipleEnds(usize),

    #[error("End node is not reachable from Start node")]
    EndUnreachable,

    #[error("{} disconnected nodes found: {}", .labels.len(), .labels.join(", "))]
    Disconnected { labels: Vec<String> },

    #[error("Cycle detected in workflow graph")]
    Cycle,
}

impl Serialize for GraphIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of validating a graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphIssue>,
    /// Nodes flagged by the connectivity check, for highlighting
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub disconnected_nodes: Vec<Node>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            disconnected_nodes: Vec::new(),
        }
    }

    pub fn from_issues(errors: Vec<GraphIssue>, disconnected_nodes: Vec<Node>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            disconnected_nodes,
        }
    }

    /// Issue messages in check order
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Validate the indexed graph, collecting every applicable issue
pub fn validate(index: &GraphIndex<'_>) -> ValidationReport {
    let mut errors = Vec::new();

    let starts = index.nodes_of_type(NodeType::Start);
    match starts.len() {
        0 => errors.push(GraphIssue::MissingStart),
        1 => {}
        n => errors.push(GraphIssue::MultipleStarts(n)),
    }

    let ends = index.nodes_of_type(NodeType::End);
    match ends.len() {
        0 => errors.push(GraphIssue::MissingEnd),
        1 => {}
        n => errors.push(GraphIssue::MultipleEnds(n)),
    }

    let (start, end) = match (starts.as_slice(), ends.as_slice()) {
        ([start], [end]) => (*start, *end),
        _ => {
            log::debug!("Skipping graph checks: Start/End anchors are missing or ambiguous");
            return ValidationReport::from_issues(errors, Vec::new());
        }
    };

    let reachable: HashSet<&str> = index.traverse_from(&start.id).into_iter().collect();
    if !reachable.contains(end.id.as_str()) {
        errors.push(GraphIssue::EndUnreachable);
    }

    let disconnected: Vec<Node> = index
        .nodes()
        .iter()
        .filter(|n| !index.has_edges(&n.id) && !reachable.contains(n.id.as_str()))
        .cloned()
        .collect();
    if !disconnected.is_empty() {
        errors.push(GraphIssue::Disconnected {
            labels: disconnected.iter().map(|n| n.label().to_string()).collect(),
        });
    }

    if has_cycle(index) {
        errors.push(GraphIssue::Cycle);
    }

    ValidationReport::from_issues(errors, disconnected)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    /// On the current DFS path
    Gray,
    /// Fully explored
    Black,
}

/// Iterative white/gray/black DFS rooted at every unvisited node
fn has_cycle(index: &GraphIndex<'_>) -> bool {
    let mut marks: HashMap<&str, Mark> = HashMap::with_capacity(index.len());

    for root in index.nodes() {
        if marks.contains_key(root.id.as_str()) {
            continue;
        }

        marks.insert(root.id.as_str(), Mark::Gray);
        let mut stack: Vec<(&str, usize)> = vec![(root.id.as_str(), 0)];

        while let Some((node, cursor)) = stack.last_mut() {
            let node = *node;
            match index.successors(node).get(*cursor) {
                Some(&next) => {
                    *cursor += 1;
                    match marks.get(next) {
                        Some(Mark::Gray) => {
                            log::debug!("Back edge {} -> {} closes a cycle", node, next);
                            return true;
                        }
                        Some(Mark::Black) => {}
                        None => {
                            marks.insert(next, Mark::Gray);
                            stack.push((next, 0));
                        }
                    }
                }
                None => {
                    marks.insert(node, Mark::Black);
                    stack.pop();
                }
            }
        }
    }

    false
}
