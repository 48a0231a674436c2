// SPDX-License-Identifier: MIT

//! Step compiler - flattens a validated graph into an ordered step list

use serde::{Deserialize, Serialize};

use super::index::GraphIndex;
use super::types::{AgentData, Node, NodeKind, NodeType, StepGroupData, StepMode};

/// One compiled unit of execution
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepDescriptor {
    pub title: String,
    pub mode: StepMode,
    pub purpose: String,
    pub agents: Vec<String>,
}

impl From<&AgentData> for StepDescriptor {
    fn from(agent: &AgentData) -> Self {
        Self {
            title: agent
                .step_title
                .clone()
                .unwrap_or_else(|| agent.agent_name.clone()),
            mode: StepMode::Sequential,
            purpose: agent.step_purpose.clone().unwrap_or_default(),
            agents: vec![agent.agent_name.clone()],
        }
    }
}

impl From<&StepGroupData> for StepDescriptor {
    fn from(group: &StepGroupData) -> Self {
        Self {
            title: group.title.clone(),
            mode: group.mode,
            purpose: group.purpose.clone().unwrap_or_default(),
            agents: group.agents.iter().map(|a| a.name.clone()).collect(),
        }
    }
}

/// Compile the graph into steps in breadth-first order from Start
///
/// The graph must already have passed validation. Sibling branches are
/// interleaved by depth; a node reached along several paths is emitted once,
/// at the earliest depth it is seen.
pub fn compile(index: &GraphIndex<'_>) -> Vec<StepDescriptor> {
    let Some(start) = index.nodes_of_type(NodeType::Start).into_iter().next() else {
        log::debug!("No Start node to compile from");
        return Vec::new();
    };

    let steps: Vec<StepDescriptor> = index
        .traverse_from(&start.id)
        .into_iter()
        .filter_map(|id| index.get(id))
        .filter_map(step_for)
        .collect();

    log::debug!("Compiled {} steps from {} nodes", steps.len(), index.len());
    steps
}

fn step_for(node: &Node) -> Option<StepDescriptor> {
    match &node.kind {
        NodeKind::Start(_) | NodeKind::End => None,
        NodeKind::Agent(agent) => Some(agent.into()),
        NodeKind::StepGroup(group) => Some(group.into()),
    }
}
