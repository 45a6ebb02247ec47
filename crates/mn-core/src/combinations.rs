//! Lazy k-subset enumeration

use crate::PartyId;

/// Iterator over the k-subsets of `0..n`.
///
/// Subsets come out as strictly increasing index vectors in lexicographic
/// order, the same order a depth-first search fixing the smallest index first
/// would produce. Cloning the iterator snapshots its position.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<PartyId>,
    exhausted: bool,
}

/// All `k`-subsets of `0..n`
pub fn combinations(n: usize, k: usize) -> Combinations {
    Combinations {
        n,
        indices: (0..k).collect(),
        exhausted: k > n,
    }
}

impl Combinations {
    /// Move `indices` to the next subset, or mark the iterator exhausted
    fn advance(&mut self) {
        let k = self.indices.len();

        // rightmost slot that can still move right
        let Some(slot) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            self.exhausted = true;
            return;
        };

        self.indices[slot] += 1;
        for i in slot + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<PartyId>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let current = self.indices.clone();
        self.advance();
        Some(current)
    }
}

impl std::iter::FusedIterator for Combinations {}

/// Binomial coefficient C(n, k), `None` on overflow
pub fn binomial(n: usize, k: usize) -> Option<usize> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        // result == C(n, i) here, so the division is exact
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}
