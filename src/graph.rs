use std::collections::{BTreeMap, HashMap};

use crate::error::LayoutError;

/// Node identity to ordered outgoing neighbours. Duplicates and self-loops are allowed.
pub type AdjacencyList = BTreeMap<String, Vec<String>>;

/// A node in a graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: String,
    pub value: Option<String>,
    neighbours: Vec<usize>,
}

impl Node {
    /// Text drawn next to the node: the payload if there is one, the key otherwise.
    pub fn label(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.key)
    }
}

/// An immutable directed graph built from an adjacency list and a node ordering.
///
/// The node ordering is canonical: it decides the root (first node), the
/// iteration order of [`Graph::nodes`] and the draw order of the renderer.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    adjacency: AdjacencyList,
}

impl Graph {
    /// Build a graph whose nodes carry no payload.
    pub fn new(adjacency: AdjacencyList, nodes: Vec<String>) -> Result<Self, LayoutError> {
        Self::with_values(adjacency, nodes.into_iter().map(|key| (key, None)))
    }

    /// Build a graph from `(key, payload)` pairs.
    ///
    /// Fails if there are no nodes, if a key repeats, or if the adjacency list
    /// mentions a key (as source or target) that is not in `nodes`.
    pub fn with_values<I>(adjacency: AdjacencyList, nodes: I) -> Result<Self, LayoutError>
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut graph_nodes: Vec<Node> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (key, value) in nodes {
            if index.contains_key(&key) {
                return Err(LayoutError::DuplicateNode(key));
            }
            index.insert(key.clone(), graph_nodes.len());
            graph_nodes.push(Node {
                key,
                value,
                neighbours: Vec::new(),
            });
        }

        if graph_nodes.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }

        for (from, targets) in &adjacency {
            let Some(&from_idx) = index.get(from) else {
                return Err(LayoutError::UnknownNode {
                    node: from.clone(),
                    referenced_by: "adjacency list".to_string(),
                });
            };
            for target in targets {
                let Some(&to_idx) = index.get(target) else {
                    return Err(LayoutError::UnknownNode {
                        node: target.clone(),
                        referenced_by: from.clone(),
                    });
                };
                graph_nodes[from_idx].neighbours.push(to_idx);
            }
        }

        Ok(Self {
            nodes: graph_nodes,
            index,
            adjacency,
        })
    }

    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Nodes in canonical order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&idx| &self.nodes[idx])
    }

    pub fn node_keys(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.key.as_str())
    }

    pub fn adjacency(&self) -> &AdjacencyList {
        &self.adjacency
    }

    /// Outgoing neighbours of `node`, in adjacency order.
    pub fn neighbours<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.neighbours.iter().map(|&idx| &self.nodes[idx])
    }

    /// Every edge as `(from, to)`, following node order and then neighbour order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().flat_map(move |node| {
            node.neighbours
                .iter()
                .map(move |&idx| (node.key.as_str(), self.nodes[idx].key.as_str()))
        })
    }

    /// Edges as positions in node order, for callers that keep per-node data in a `Vec`.
    pub fn edge_indices(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .flat_map(|(from, node)| node.neighbours.iter().map(move |&to| (from, to)))
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbours.len()).sum()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }
}

#[cfg(test)]
pub(crate) fn adjacency(edges: &[(&str, &str)]) -> AdjacencyList {
    let mut adjacency = AdjacencyList::new();
    for (from, to) in edges {
        adjacency
            .entry(from.to_string())
            .or_default()
            .push(to.to_string());
    }
    adjacency
}

#[cfg(test)]
pub(crate) fn keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

/// Four nodes: a cycle `a→b→d→a`, `a→c→d`.
#[cfg(test)]
pub(crate) fn diamond() -> Graph {
    Graph::new(
        adjacency(&[("a", "b"), ("a", "c"), ("c", "d"), ("b", "d"), ("d", "a")]),
        keys(&["a", "b", "c", "d"]),
    )
    .expect("diamond graph is well formed")
}
