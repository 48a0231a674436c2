// SPDX-License-Identifier: MIT

//! Plan normalization - converts wizard plans to graph format

use super::types::{
    AgentData, Edge, Node, NodeKind, StartData, StepGroupData, StepMode, WorkflowGraph,
};
use crate::composer::workflow::types::{PlanDefinition, PlanStep};

const START_ID: &str = "start";
const END_ID: &str = "end";

/// Normalize a wizard plan into a linear `Start -> steps -> End` graph
pub fn normalize_plan(plan: &PlanDefinition) -> WorkflowGraph {
    let mut nodes = Vec::with_capacity(plan.steps.len() + 2);
    let mut edges = Vec::with_capacity(plan.steps.len() + 1);

    nodes.push(Node::new(
        START_ID,
        NodeKind::Start(StartData {
            workflow_name: plan.metadata.workflow_name.clone(),
            workflow_purpose: plan.metadata.workflow_purpose.clone(),
        }),
    ));

    // Each node connects to the previous one
    let mut prev_id = START_ID.to_string();
    for (i, step) in plan.steps.iter().enumerate() {
        let id = format!("step_{}", i);
        nodes.push(Node::new(id.clone(), step_kind(i, step)));
        edges.push(Edge::connect(prev_id, id.clone()));
        prev_id = id;
    }

    nodes.push(Node::end(END_ID));
    edges.push(Edge::connect(prev_id, END_ID));

    WorkflowGraph::new(nodes, edges)
}

fn step_kind(i: usize, step: &PlanStep) -> NodeKind {
    match (step.mode, step.agents.as_slice()) {
        (StepMode::Sequential, [agent]) => NodeKind::Agent(AgentData {
            agent_name: agent.name.clone(),
            step_title: step.title.clone(),
            step_purpose: step.purpose.clone(),
            step_mode: StepMode::Sequential,
        }),
        _ => NodeKind::StepGroup(StepGroupData {
            title: step
                .title
                .clone()
                .unwrap_or_else(|| format!("Step {}", i + 1)),
            purpose: step.purpose.clone(),
            mode: step.mode,
            agents: step.agents.clone(),
        }),
    }
}
