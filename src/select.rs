use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f64,
    index: usize,
}

// Greater means fitter; equal scores favour the earlier candidate.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Indices of the `k` highest scores, best first.
///
/// A min-heap holding at most `k` candidates is swept over `scores`, evicting
/// the weakest entry whenever it overflows, then drained in descending order.
/// Ties keep input order, so the lower index wins.
///
/// Asking for more survivors than there are scores is an error, not a silent
/// truncation. NaN scores are rejected.
pub fn select_top(scores: &[f64], k: usize) -> Result<Vec<usize>, LayoutError> {
    if k > scores.len() {
        return Err(LayoutError::SelectionTooLarge {
            requested: k,
            available: scores.len(),
        });
    }
    if let Some(&nan) = scores.iter().find(|s| s.is_nan()) {
        return Err(LayoutError::NonFiniteScore(nan));
    }
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::with_capacity(k + 1);
    for (index, &score) in scores.iter().enumerate() {
        heap.push(Reverse(Candidate { score, index }));
        if heap.len() > k {
            heap.pop();
        }
    }

    Ok(heap
        .into_sorted_vec()
        .into_iter()
        .map(|Reverse(c)| c.index)
        .collect())
}
