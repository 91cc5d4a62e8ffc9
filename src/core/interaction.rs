//! Star-shaped sender network.
//!
//! Every sender becomes a node sized by their message count and is linked to
//! a single hub node, [`HUB_NODE`], with an edge of weight 1. Notifications
//! are not senders and never appear. Only the data is produced; callers that
//! want a picture can feed [`InteractionGraph::to_dot`] to Graphviz.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::parser::Corpus;

/// Name of the hub every sender connects to.
pub const HUB_NODE: &str = "Group";

/// A node and its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub name: String,
    pub size: usize,
}

/// Undirected edge between two named nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionGraph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

impl InteractionGraph {
    /// Builds the graph from the sender-attributed records of `corpus`.
    ///
    /// Nodes are ordered by message count (descending, first appearance on
    /// ties), with the hub last. A sender that is itself called `Group`
    /// shares the hub node.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in corpus.messages() {
            let sender = record.sender();
            let count = counts.entry(sender).or_insert_with(|| {
                order.push(sender);
                0
            });
            *count += 1;
        }

        let mut ranked: Vec<(usize, &str)> = order.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| counts[b.1].cmp(&counts[a.1]).then(a.0.cmp(&b.0)));

        let mut nodes: Vec<GraphNode> = ranked
            .iter()
            .map(|&(_, name)| GraphNode {
                name: name.to_string(),
                size: counts[name],
            })
            .collect();
        if !order.is_empty() && !counts.contains_key(HUB_NODE) {
            nodes.push(GraphNode {
                name: HUB_NODE.to_string(),
                size: 1,
            });
        }

        let edges = order
            .iter()
            .map(|&sender| GraphEdge {
                source: sender.to_string(),
                target: HUB_NODE.to_string(),
                weight: 1,
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Graphviz rendering, node width scaled by size.
    pub fn to_dot(&self) -> String {
        fn escape(s: &str) -> String {
            s.replace('\\', "\\\\").replace('"', "\\\"")
        }

        let mut out = String::from("graph interactions {\n");
        out.push_str("  node [shape=circle, style=filled, fillcolor=lightblue];\n");
        for node in &self.nodes {
            let _ = writeln!(
                out,
                "  \"{}\" [label=\"{}\\n{}\"];",
                escape(&node.name),
                escape(&node.name),
                node.size
            );
        }
        for edge in &self.edges {
            let _ = writeln!(
                out,
                "  \"{}\" -- \"{}\" [weight={}];",
                escape(&edge.source),
                escape(&edge.target),
                edge.weight
            );
        }
        out.push_str("}\n");
        out
    }
}
