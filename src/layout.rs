use std::collections::BTreeMap;

use rand::Rng;

use crate::graph::Graph;

/// A 2-D coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance. The fitness function works on this directly.
    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Bounding box of a layout
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

/// Node key to position.
///
/// Ordered by key so that iterating a layout, and therefore consuming random
/// numbers while crossing two of them, is reproducible under a seeded RNG.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    positions: BTreeMap<String, Point>,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, point: Point) {
        self.positions.insert(key.into(), point);
    }

    pub fn get(&self, key: &str) -> Option<Point> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.positions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.positions.iter().map(|(k, p)| (k.as_str(), *p))
    }

    /// True when the layout has a position for every node of `graph` and nothing else.
    pub fn matches(&self, graph: &Graph) -> bool {
        self.len() == graph.len() && graph.node_keys().all(|k| self.contains(k))
    }

    /// Smallest box holding every point; `None` for an empty layout.
    pub fn bounds(&self) -> Option<BBox> {
        let mut points = self.positions.values();
        let first = points.next()?;

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        Some(BBox::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }
}

impl FromIterator<(String, Point)> for Layout {
    fn from_iter<I: IntoIterator<Item = (String, Point)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Place every node independently and uniformly in `[0, scale) × [0, scale)`.
pub fn random_layout<R: Rng>(graph: &Graph, scale: f64, rng: &mut R) -> Layout {
    graph
        .node_keys()
        .map(|key| {
            let x = scale * rng.random::<f64>();
            let y = scale * rng.random::<f64>();
            (key.to_string(), Point::new(x, y))
        })
        .collect()
}

/// Space nodes evenly along the horizontal midline, in node order.
pub fn arc_layout(graph: &Graph, scale: f64) -> Layout {
    let dx = scale / (graph.len() + 1) as f64;
    let y = scale / 2.0;

    graph
        .node_keys()
        .enumerate()
        .map(|(i, key)| (key.to_string(), Point::new(dx * (i + 1) as f64, y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::diamond;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_layout_covers_every_node_within_bounds() {
        let graph = diamond();
        let mut rng = StdRng::seed_from_u64(7);
        let bounds = BBox::new(0.0, 0.0, 512.0, 512.0);

        for _ in 0..50 {
            let layout = random_layout(&graph, 512.0, &mut rng);
            assert!(layout.matches(&graph));
            for (_, p) in layout.iter() {
                assert!(bounds.contains(p), "{p:?} escaped the canvas");
                assert!(p.x < 512.0 && p.y < 512.0);
            }
        }
    }

    #[test]
    fn random_layout_is_reproducible_with_same_seed() {
        let graph = diamond();
        let a = random_layout(&graph, 100.0, &mut StdRng::seed_from_u64(1));
        let b = random_layout(&graph, 100.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn arc_layout_spaces_nodes_evenly() {
        let graph = diamond();
        let layout = arc_layout(&graph, 500.0);

        assert_eq!(layout.get("a"), Some(Point::new(100.0, 250.0)));
        assert_eq!(layout.get("b"), Some(Point::new(200.0, 250.0)));
        assert_eq!(layout.get("c"), Some(Point::new(300.0, 250.0)));
        assert_eq!(layout.get("d"), Some(Point::new(400.0, 250.0)));
    }

    #[test]
    fn bounds_spans_all_points() {
        let layout: Layout = [
            ("a".to_string(), Point::new(10.0, 40.0)),
            ("b".to_string(), Point::new(-5.0, 20.0)),
            ("c".to_string(), Point::new(30.0, 25.0)),
        ]
        .into_iter()
        .collect();

        let bbox = layout.bounds().unwrap();
        assert_eq!(bbox, BBox::new(-5.0, 20.0, 35.0, 20.0));
        assert!(Layout::new().bounds().is_none());
    }

    #[test]
    fn squared_distance_is_not_square_rooted() {
        assert_eq!(Point::new(0.0, 0.0).squared_distance(&Point::new(3.0, 4.0)), 25.0);
    }
}
