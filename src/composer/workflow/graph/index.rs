// SPDX-License-Identifier: MIT

//! Adjacency index over a caller-owned node/edge list

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{Edge, Node, NodeType};

/// Lookup tables borrowed from a graph's nodes and edges
///
/// `forward` and `backward` keep edge-array order. Every node has an entry in
/// both maps, possibly empty. `touched` holds every id named by any edge,
/// including edges whose other end is unknown.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    nodes: &'a [Node],
    by_id: HashMap<&'a str, &'a Node>,
    forward: HashMap<&'a str, Vec<&'a str>>,
    backward: HashMap<&'a str, Vec<&'a str>>,
    touched: HashSet<&'a str>,
}

impl<'a> GraphIndex<'a> {
    /// Build the index in O(|V| + |E|)
    ///
    /// Node ids are assumed unique. Edges pointing at unknown ids stay out of
    /// the adjacency maps but still mark their endpoints as touched.
    pub fn build(nodes: &'a [Node], edges: &'a [Edge]) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut forward: HashMap<&'a str, Vec<&'a str>> = HashMap::with_capacity(nodes.len());
        let mut backward: HashMap<&'a str, Vec<&'a str>> = HashMap::with_capacity(nodes.len());
        let mut touched: HashSet<&'a str> = HashSet::with_capacity(nodes.len());

        for node in nodes {
            by_id.insert(node.id.as_str(), node);
            forward.entry(node.id.as_str()).or_default();
            backward.entry(node.id.as_str()).or_default();
        }

        for edge in edges {
            let (source, target) = (edge.source.as_str(), edge.target.as_str());
            touched.insert(source);
            touched.insert(target);
            if !by_id.contains_key(source) || !by_id.contains_key(target) {
                log::warn!(
                    "Skipping edge '{}': {} -> {} references an unknown node",
                    edge.id,
                    source,
                    target
                );
                continue;
            }
            forward.entry(source).or_default().push(target);
            backward.entry(target).or_default().push(source);
        }

        Self {
            nodes,
            by_id,
            forward,
            backward,
            touched,
        }
    }

    /// Nodes in their original order
    pub fn nodes(&self) -> &'a [Node] {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).copied()
    }

    pub fn successors(&self, id: &str) -> &[&'a str] {
        self.forward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: &str) -> &[&'a str] {
        self.backward.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether at least one edge starts or ends at this node
    pub fn has_edges(&self, id: &str) -> bool {
        self.touched.contains(id)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<&'a Node> {
        self.nodes
            .iter()
            .filter(|n| n.node_type() == node_type)
            .collect()
    }

    /// Breadth-first visitation order from `start`, each node once
    pub fn traverse_from(&self, start: &str) -> Vec<&'a str> {
        let Some(start) = self.get(start) else {
            return Vec::new();
        };

        let mut order = Vec::with_capacity(self.nodes.len());
        let mut visited: HashSet<&'a str> = HashSet::with_capacity(self.nodes.len());
        let mut queue = VecDeque::new();

        visited.insert(start.id.as_str());
        queue.push_back(start.id.as_str());

        while let Some(id) = queue.pop_front() {
            order.push(id);
            for &next in self.successors(id) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        order
    }
}
