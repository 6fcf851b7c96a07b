//! Graph description input.
//!
//! Structured documents (JSON, YAML, TOML) carry an ordered `nodes` list and
//! an `adjacency` table. The plain-text format is one statement per line:
//!
//! ```text
//! # comment
//! a -> b, c          edges a→b and a→c
//! b -> d -> a        chains: b→d, d→a
//! c: d               same as c -> d
//! e                  declares a node with no edges
//! a = Start          attaches a payload, drawn as the label
//! ```
//!
//! In the text format nodes are ordered by first appearance, so the first
//! node mentioned becomes the root.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::error::LayoutError;
use crate::graph::{AdjacencyList, Graph};

/// Input syntax of a graph description
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphFormat {
    Json,
    Yaml,
    Toml,
    Text,
}

impl GraphFormat {
    /// Guess the format from a file extension, falling back to plain text.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => GraphFormat::Json,
            Some("yaml") | Some("yml") => GraphFormat::Yaml,
            Some("toml") => GraphFormat::Toml,
            _ => GraphFormat::Text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphDocument {
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    adjacency: AdjacencyList,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NodeEntry {
    Key(String),
    Full {
        key: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl NodeEntry {
    fn into_pair(self) -> (String, Option<String>) {
        match self {
            NodeEntry::Key(key) => (key, None),
            NodeEntry::Full { key, value } => (key, value),
        }
    }
}

/// Parse a graph description and build the graph.
pub fn parse_graph(input: &str, format: GraphFormat) -> Result<Graph, LayoutError> {
    let document = match format {
        GraphFormat::Json => serde_json::from_str(input)
            .map_err(|e| LayoutError::Parse(format!("Failed to parse JSON graph: {}", e)))?,
        GraphFormat::Yaml => serde_yaml::from_str(input)
            .map_err(|e| LayoutError::Parse(format!("Failed to parse YAML graph: {}", e)))?,
        GraphFormat::Toml => toml::from_str(input)
            .map_err(|e| LayoutError::Parse(format!("Failed to parse TOML graph: {}", e)))?,
        GraphFormat::Text => parse_text(input)?,
    };

    let GraphDocument { nodes, adjacency } = document;
    Graph::with_values(adjacency, nodes.into_iter().map(NodeEntry::into_pair))
}

fn parse_text(input: &str) -> Result<GraphDocument, LayoutError> {
    let mut order = NodeOrder::default();
    let mut values: HashMap<String, String> = HashMap::new();
    let mut adjacency = AdjacencyList::new();

    for (line_no, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let err = |msg: String| LayoutError::Parse(format!("line {}: {}", line_no + 1, msg));

        if let Some((key, value)) = payload_statement(line) {
            check_key(key).map_err(err)?;
            order.declare(key);
            values.insert(key.to_string(), value.to_string());
        } else if line.contains("->") || line.contains(':') {
            let segments: Vec<Vec<&str>> = if line.contains("->") {
                line.split("->").map(split_targets).collect()
            } else {
                line.splitn(2, ':').map(split_targets).collect()
            };

            for segment in &segments {
                if segment.is_empty() {
                    return Err(err("edge is missing a node".to_string()));
                }
                for key in segment {
                    check_key(key).map_err(err)?;
                    order.declare(key);
                }
            }
            for pair in segments.windows(2) {
                for from in &pair[0] {
                    let targets = adjacency.entry(from.to_string()).or_default();
                    targets.extend(pair[1].iter().map(|t| t.to_string()));
                }
            }
        } else {
            check_key(line).map_err(err)?;
            order.declare(line);
        }
    }

    let nodes = order
        .keys
        .into_iter()
        .map(|key| {
            let value = values.remove(&key);
            NodeEntry::Full { key, value }
        })
        .collect();

    Ok(GraphDocument { nodes, adjacency })
}

/// Node keys in order of first appearance.
#[derive(Default)]
struct NodeOrder {
    keys: Vec<String>,
    seen: HashSet<String>,
}

impl NodeOrder {
    fn declare(&mut self, key: &str) {
        if self.seen.insert(key.to_string()) {
            self.keys.push(key.to_string());
        }
    }
}

/// `key = value`, unless the `=` sits on the right of an edge arrow or colon.
fn payload_statement(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.contains("->") || key.contains(':') {
        return None;
    }
    Some((key.trim(), value.trim()))
}

fn split_targets(segment: &str) -> Vec<&str> {
    segment
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("empty node name".to_string());
    }
    if key.chars().any(char::is_whitespace) {
        return Err(format!("node name '{}' contains whitespace", key));
    }
    Ok(())
}
