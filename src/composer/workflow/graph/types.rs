// SPDX-License-Identifier: MIT

//! Graph workflow type definitions
//!
//! Nodes and edges in the shape the editor produces them. A node's payload
//! depends on its `type`; it is normalized into the `NodeKind` sum type when
//! the node is deserialized, so nothing downstream inspects raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::NodeError;

/// Upper bound on the agents a single step-group may hold
pub const MAX_GROUP_AGENTS: usize = 10;

pub type NodeId = String;

/// How the agents of a step run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// One agent after another (default)
    #[default]
    Sequential,
    /// All agents at once
    Parallel,
}

impl StepMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepMode::Sequential => "sequential",
            StepMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of a node, as written in the editor's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Start,
    End,
    Agent,
    StepGroup,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeType::Start => "start",
            NodeType::End => "end",
            NodeType::Agent => "agent",
            NodeType::StepGroup => "step-group",
        })
    }
}

/// Display-only echo of the workflow metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentData {
    pub agent_name: String,
    /// Defaults to the agent name when compiled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_purpose: Option<String>,
    /// Always sequential for a single agent
    #[serde(default)]
    pub step_mode: StepMode,
}

impl AgentData {
    pub fn new(agent_name: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            step_title: None,
            step_purpose: None,
            step_mode: StepMode::Sequential,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepGroupData {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default = "default_group_mode")]
    pub mode: StepMode,
    #[serde(default)]
    pub agents: Vec<AgentRef>,
}

fn default_group_mode() -> StepMode {
    StepMode::Parallel
}

/// An agent listed in a step-group
///
/// The editor sends either a bare name or `{ name, category }`; both
/// collapse into this struct. The category is display metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "AgentEntry")]
pub struct AgentRef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl AgentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
        }
    }

    pub fn with_category(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: Some(category.into()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AgentEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        category: Option<String>,
    },
}

impl From<AgentEntry> for AgentRef {
    fn from(entry: AgentEntry) -> Self {
        match entry {
            AgentEntry::Name(name) => AgentRef::new(name),
            AgentEntry::Detailed { name, category } => AgentRef { name, category },
        }
    }
}

/// Kind-specific payload of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Start(StartData),
    End,
    Agent(AgentData),
    StepGroup(StepGroupData),
}

/// A vertex in the workflow graph
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    pub fn start(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Start(StartData::default()))
    }

    pub fn end(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::End)
    }

    pub fn agent(id: impl Into<NodeId>, agent_name: impl Into<String>) -> Self {
        Self::new(id, NodeKind::Agent(AgentData::new(agent_name)))
    }

    pub fn step_group(
        id: impl Into<NodeId>,
        title: impl Into<String>,
        mode: StepMode,
        agents: Vec<AgentRef>,
    ) -> Self {
        Self::new(
            id,
            NodeKind::StepGroup(StepGroupData {
                title: title.into(),
                purpose: None,
                mode,
                agents,
            }),
        )
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Start(_) => NodeType::Start,
            NodeKind::End => NodeType::End,
            NodeKind::Agent(_) => NodeType::Agent,
            NodeKind::StepGroup(_) => NodeType::StepGroup,
        }
    }

    /// Human-readable name used in diagnostics
    pub fn label(&self) -> &str {
        match &self.kind {
            NodeKind::Start(_) => "Start",
            NodeKind::End => "End",
            NodeKind::Agent(agent) => &agent.agent_name,
            NodeKind::StepGroup(group) => &group.title,
        }
    }
}

/// Wire shape of a node: `{ id, type, data }` (extra UI fields such as
/// `position` are ignored)
#[derive(Deserialize, Serialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type")]
    node_type: NodeType,
    #[serde(default)]
    data: Value,
}

impl TryFrom<RawNode> for Node {
    type Error = NodeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNode { id, node_type, data } = raw;
        let data = match data {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };
        let invalid = |source| NodeError::InvalidPayload {
            id: id.clone(),
            node_type,
            source,
        };

        let kind = match node_type {
            NodeType::Start => NodeKind::Start(serde_json::from_value(data).map_err(invalid)?),
            NodeType::End => NodeKind::End,
            NodeType::Agent => {
                let agent: AgentData = serde_json::from_value(data).map_err(invalid)?;
                if agent.agent_name.trim().is_empty() {
                    return Err(NodeError::MissingAgentName(id));
                }
                NodeKind::Agent(agent)
            }
            NodeType::StepGroup => {
                NodeKind::StepGroup(serde_json::from_value(data).map_err(invalid)?)
            }
        };

        Ok(Node { id, kind })
    }
}

impl From<Node> for RawNode {
    fn from(node: Node) -> Self {
        let node_type = node.node_type();
        let data = match node.kind {
            NodeKind::Start(start) => serde_json::to_value(start),
            NodeKind::End => Ok(Value::Object(Map::new())),
            NodeKind::Agent(agent) => serde_json::to_value(agent),
            NodeKind::StepGroup(group) => serde_json::to_value(group),
        };

        RawNode {
            id: node.id,
            node_type,
            data: data.unwrap_or_default(),
        }
    }
}

/// A directed connection between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// Edge whose id is derived from its endpoints
    pub fn connect(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}->{}", source, target),
            source,
            target,
        }
    }
}

/// Caller-owned node and edge collections
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkflowGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}
