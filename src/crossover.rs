use rand::Rng;
use tracing::debug;

use crate::layout::Layout;

/// Uniform crossover: each node independently takes its position from `a` or `b`.
///
/// Only nodes placed by both parents survive; a key missing from either side
/// is dropped from the child.
pub fn cross<R: Rng>(a: &Layout, b: &Layout, rng: &mut R) -> Layout {
    let mut child = Layout::new();
    let mut dropped = 0usize;

    for (key, from_a) in a.iter() {
        let Some(from_b) = b.get(key) else {
            dropped += 1;
            continue;
        };
        let point = if rng.random_bool(0.5) { from_a } else { from_b };
        child.insert(key, point);
    }

    if dropped > 0 || child.len() != b.len() {
        debug!(
            dropped,
            left = a.len(),
            right = b.len(),
            "crossover parents have different key sets"
        );
    }

    child
}

/// The next candidate pool: every seed unchanged, then two independent
/// children for every unordered pair of seeds.
///
/// `S` seeds yield `S + S·(S − 1)` candidates.
pub fn generate_layouts<R: Rng>(seeds: &[Layout], rng: &mut R) -> Vec<Layout> {
    let n = seeds.len();
    let mut pool = Vec::with_capacity(n * n);
    pool.extend_from_slice(seeds);

    for i in 0..n {
        for j in (i + 1)..n {
            pool.push(cross(&seeds[i], &seeds[j], rng));
            pool.push(cross(&seeds[i], &seeds[j], rng));
        }
    }

    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::diamond;
    use crate::layout::{Point, random_layout};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout_of(points: &[(&str, f64, f64)]) -> Layout {
        points
            .iter()
            .map(|(k, x, y)| (k.to_string(), Point::new(*x, *y)))
            .collect()
    }

    #[test]
    fn child_takes_each_position_from_a_parent() {
        let graph = diamond();
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_layout(&graph, 512.0, &mut rng);
        let b = random_layout(&graph, 512.0, &mut rng);

        for _ in 0..20 {
            let child = cross(&a, &b, &mut rng);
            assert!(child.matches(&graph));
            for (key, p) in child.iter() {
                assert!(p == a.get(key).unwrap() || p == b.get(key).unwrap());
            }
        }
    }

    #[test]
    fn both_parents_contribute_over_many_draws() {
        let a = layout_of(&[("n", 0.0, 0.0)]);
        let b = layout_of(&[("n", 1.0, 1.0)]);
        let mut rng = StdRng::seed_from_u64(11);

        let from_a = (0..200)
            .filter(|_| cross(&a, &b, &mut rng).get("n") == a.get("n"))
            .count();
        assert!(from_a > 50 && from_a < 150, "from_a = {from_a}");
    }

    #[test]
    fn child_keys_are_the_intersection() {
        let a = layout_of(&[("x", 0.0, 0.0), ("y", 1.0, 0.0), ("only_a", 2.0, 0.0)]);
        let b = layout_of(&[("x", 5.0, 5.0), ("y", 6.0, 5.0), ("only_b", 7.0, 5.0)]);
        let mut rng = StdRng::seed_from_u64(0);

        let child = cross(&a, &b, &mut rng);
        assert_eq!(child.keys().collect::<Vec<_>>(), vec!["x", "y"]);
        let child = cross(&b, &a, &mut rng);
        assert_eq!(child.keys().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn pool_size_is_seeds_plus_two_children_per_pair() {
        let graph = diamond();
        let mut rng = StdRng::seed_from_u64(5);

        for s in [0usize, 1, 2, 3, 10] {
            let seeds: Vec<Layout> = (0..s)
                .map(|_| random_layout(&graph, 64.0, &mut rng))
                .collect();
            let pool = generate_layouts(&seeds, &mut rng);
            assert_eq!(pool.len(), s + s * s.saturating_sub(1));
            assert_eq!(&pool[..s], &seeds[..]);
        }
    }
}
