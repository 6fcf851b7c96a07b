//! Directed graph layout by generational search.
//!
//! Candidate layouts are bred from random seeds, scored by a spring model
//! (edges attract, every node pair repels) and the fittest survive into the
//! next generation. [`compute_layout`] is the one-call entry point; the
//! pieces it is built from are public for callers that want to drive the
//! search themselves.
//!
//! ```no_run
//! use evograph::{AdjacencyList, Graph, compute_layout};
//!
//! let mut adjacency = AdjacencyList::new();
//! adjacency.insert("a".into(), vec!["b".into(), "c".into()]);
//! adjacency.insert("b".into(), vec!["c".into()]);
//! let graph = Graph::new(adjacency, vec!["a".into(), "b".into(), "c".into()])?;
//!
//! let layout = compute_layout(&graph, 512)?;
//! assert_eq!(layout.len(), 3);
//! # Ok::<(), evograph::LayoutError>(())
//! ```

pub mod config;
pub mod crossover;
pub mod error;
pub mod export;
pub mod fitness;
pub mod genetic;
pub mod graph;
pub mod layout;
pub mod parser;
pub mod render;
pub mod select;
mod xml;

pub use config::{LayoutConfig, LayoutStrategy};
pub use error::LayoutError;
pub use fitness::Fitness;
pub use genetic::{Evolution, GeneticLayout, compute_layout, compute_layout_with};
pub use graph::{AdjacencyList, Graph, Node};
pub use layout::{Layout, Point, arc_layout, random_layout};
pub use render::{RenderStyle, render_svg};
