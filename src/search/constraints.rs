//! Forced-different constraints between color classes
//!
//! A pair is recorded with the representatives current at insertion time.
//! Later unions may change representatives, so every query maps stored
//! endpoints through the partition first.

use super::partition::Partition;
use std::collections::BTreeSet;

/// Set of class pairs that must never be merged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    pairs: BTreeSet<(usize, usize)>,
}

impl ConstraintSet {
    /// Empty constraint set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if nothing has been forced apart
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Record that the classes of `a` and `b` differ. Returns false if the
    /// exact pair was already present.
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        self.pairs.insert(ordered(a, b))
    }

    /// True if the exact pair was recorded
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Recorded pairs as stored
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    /// Recorded pairs mapped to current representatives
    pub fn resolved<'a>(
        &'a self,
        partition: &'a Partition,
    ) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.pairs
            .iter()
            .map(move |&(a, b)| ordered(partition.find(a), partition.find(b)))
    }

    /// True if merging the classes of `u` and `v` would violate a constraint
    pub fn forbids(&self, partition: &Partition, u: usize, v: usize) -> bool {
        let target = ordered(partition.find(u), partition.find(v));
        self.resolved(partition).any(|pair| pair == target)
    }
}

#[inline]
fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_unordered() {
        let mut c = ConstraintSet::new();
        assert!(c.insert(4, 1));
        assert!(!c.insert(1, 4));
        assert!(c.contains(1, 4));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_forbids_follows_unions() {
        let mut p = Partition::new(5);
        let mut c = ConstraintSet::new();
        c.insert(0, 3);

        assert!(c.forbids(&p, 3, 0));
        assert!(!c.forbids(&p, 1, 3));

        // Once 1 joins 0's class the constraint covers it too
        p.union(1, 0);
        assert!(c.forbids(&p, 1, 3));
        p.union(4, 3);
        assert!(c.forbids(&p, 1, 4));
        assert!(!c.forbids(&p, 2, 4));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut parent = ConstraintSet::new();
        parent.insert(0, 1);

        let mut child = parent.clone();
        child.insert(2, 3);

        assert!(!parent.contains(2, 3));
        parent.insert(1, 2);
        assert!(!child.contains(1, 2));
        assert_eq!(child.len(), 2);
    }
}
