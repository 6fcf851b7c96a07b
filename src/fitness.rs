use crate::error::LayoutError;
use crate::graph::Graph;
use crate::layout::{Layout, Point};

pub const DEFAULT_ATTRACTION: f64 = 0.001;
pub const DEFAULT_REPULSION: f64 = 100.0;

/// Spring-and-charge fitness: edges pull their endpoints together, every pair
/// of nodes pushes apart. Higher scores are better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fitness {
    pub attraction: f64,
    pub repulsion: f64,
}

impl Default for Fitness {
    fn default() -> Self {
        Self {
            attraction: DEFAULT_ATTRACTION,
            repulsion: DEFAULT_REPULSION,
        }
    }
}

impl Fitness {
    pub fn new(attraction: f64, repulsion: f64) -> Self {
        Self {
            attraction,
            repulsion,
        }
    }

    /// Score `layout` against the edges of `graph`.
    ///
    /// Every edge `u → v` costs `attraction · |v − u|²` and every ordered pair
    /// of distinct nodes costs `repulsion / |a − b|²`. Distances are squared on
    /// purpose; no square root is taken anywhere.
    ///
    /// The pair loop is quadratic in the node count, so graphs past a few
    /// hundred nodes get slow quickly.
    ///
    /// Two nodes on the same point make repulsion undefined; that is reported
    /// as [`LayoutError::CoincidentNodes`] instead of yielding an infinite or
    /// NaN score.
    pub fn rank(&self, layout: &Layout, graph: &Graph) -> Result<f64, LayoutError> {
        let points = positions_in_node_order(layout, graph)?;

        let mut attraction = 0.0;
        for (u, v) in graph.edge_indices() {
            attraction -= self.attraction * points[v].squared_distance(&points[u]);
        }

        // (a, b) and (b, a) are both counted, hence the factor of two.
        let mut repulsion = 0.0;
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                let d2 = a.squared_distance(b);
                if d2 == 0.0 {
                    let nodes = graph.nodes();
                    return Err(LayoutError::CoincidentNodes {
                        a: nodes[i].key.clone(),
                        b: nodes[j].key.clone(),
                    });
                }
                repulsion += 2.0 * self.repulsion / d2;
            }
        }

        let score = attraction - repulsion;
        if score.is_finite() {
            Ok(score)
        } else {
            Err(LayoutError::NonFiniteScore(score))
        }
    }
}

fn positions_in_node_order(layout: &Layout, graph: &Graph) -> Result<Vec<Point>, LayoutError> {
    if layout.len() != graph.len() {
        return Err(LayoutError::LayoutMismatch(format!(
            "layout has {} positions but graph has {} nodes",
            layout.len(),
            graph.len()
        )));
    }

    graph
        .node_keys()
        .map(|key| {
            layout.get(key).ok_or_else(|| {
                LayoutError::LayoutMismatch(format!("no position for node '{}'", key))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AdjacencyList, adjacency, diamond, keys};
    use proptest::prelude::*;

    fn layout_of(points: &[(&str, f64, f64)]) -> Layout {
        points
            .iter()
            .map(|(k, x, y)| (k.to_string(), Point::new(*x, *y)))
            .collect()
    }

    #[test]
    fn two_nodes_one_edge() {
        let graph = Graph::new(adjacency(&[("a", "b")]), keys(&["a", "b"])).unwrap();
        let layout = layout_of(&[("a", 0.0, 0.0), ("b", 3.0, 4.0)]);

        let score = Fitness::default().rank(&layout, &graph).unwrap();
        // attraction: -0.001 * 25, repulsion: 2 * 100 / 25
        assert!((score - (-0.025 - 8.0)).abs() < 1e-12, "score = {score}");
    }

    #[test]
    fn duplicate_edges_pull_twice() {
        let single = Graph::new(adjacency(&[("a", "b")]), keys(&["a", "b"])).unwrap();
        let double = Graph::new(adjacency(&[("a", "b"), ("a", "b")]), keys(&["a", "b"])).unwrap();
        let fitness = Fitness::new(1.0, 0.0);
        let layout = layout_of(&[("a", 0.0, 0.0), ("b", 0.0, 2.0)]);

        assert_eq!(fitness.rank(&layout, &single).unwrap(), -4.0);
        assert_eq!(fitness.rank(&layout, &double).unwrap(), -8.0);
    }

    #[test]
    fn single_node_scores_exactly_zero() {
        let graph = Graph::new(AdjacencyList::new(), keys(&["solo"])).unwrap();
        let layout = layout_of(&[("solo", 12.0, 34.0)]);
        assert_eq!(Fitness::default().rank(&layout, &graph).unwrap(), 0.0);
    }

    #[test]
    fn coincident_nodes_are_an_error() {
        let graph = diamond();
        let layout = layout_of(&[
            ("a", 5.0, 5.0),
            ("b", 5.0, 5.0),
            ("c", 5.0, 5.0),
            ("d", 5.0, 5.0),
        ]);

        let err = Fitness::default().rank(&layout, &graph).unwrap_err();
        assert_eq!(
            err,
            LayoutError::CoincidentNodes {
                a: "a".to_string(),
                b: "b".to_string(),
            }
        );
    }

    #[test]
    fn non_finite_positions_are_an_error() {
        let graph = Graph::new(AdjacencyList::new(), keys(&["a", "b"])).unwrap();
        let layout = layout_of(&[("a", f64::NAN, 0.0), ("b", 1.0, 1.0)]);
        assert!(matches!(
            Fitness::default().rank(&layout, &graph),
            Err(LayoutError::NonFiniteScore(_))
        ));
    }

    #[test]
    fn layout_must_cover_graph_exactly() {
        let graph = diamond();
        let short = layout_of(&[("a", 0.0, 0.0), ("b", 1.0, 0.0), ("c", 2.0, 0.0)]);
        let wrong = layout_of(&[
            ("a", 0.0, 0.0),
            ("b", 1.0, 0.0),
            ("c", 2.0, 0.0),
            ("x", 3.0, 0.0),
        ]);

        assert!(matches!(
            Fitness::default().rank(&short, &graph),
            Err(LayoutError::LayoutMismatch(_))
        ));
        assert!(matches!(
            Fitness::default().rank(&wrong, &graph),
            Err(LayoutError::LayoutMismatch(msg)) if msg.contains("'d'")
        ));
    }

    #[test]
    fn shorter_edges_score_higher() {
        let graph = Graph::new(adjacency(&[("a", "b")]), keys(&["a", "b", "c"])).unwrap();
        let fitness = Fitness::default();
        let near = layout_of(&[("a", 0.0, 0.0), ("b", 50.0, 0.0), ("c", 0.0, 400.0)]);
        let far = layout_of(&[("a", 0.0, 0.0), ("b", 400.0, 0.0), ("c", 0.0, 400.0)]);

        assert!(fitness.rank(&near, &graph).unwrap() > fitness.rank(&far, &graph).unwrap());
    }

    proptest! {
        #[test]
        fn translation_does_not_change_score(
            coords in proptest::collection::vec((0i32..1000, 0i32..1000), 4),
            dx in -500i32..500,
            dy in -500i32..500,
        ) {
            let graph = diamond();
            let names = ["a", "b", "c", "d"];
            let original: Layout = names
                .iter()
                .zip(&coords)
                .map(|(k, (x, y))| (k.to_string(), Point::new(*x as f64, *y as f64)))
                .collect();
            let moved: Layout = original
                .iter()
                .map(|(k, p)| (k.to_string(), Point::new(p.x + dx as f64, p.y + dy as f64)))
                .collect();

            let fitness = Fitness::default();
            prop_assert_eq!(fitness.rank(&original, &graph), fitness.rank(&moved, &graph));
        }
    }
}
