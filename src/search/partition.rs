//! Disjoint-set partition of vertices into color classes
//!
//! `find` never mutates: union by size keeps trees logarithmically shallow,
//! which lets a node hold its partition behind a shared reference while
//! heuristics query it.

/// Union-find over vertices `0..n`; each set is one color class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    parent: Vec<usize>,
    size: Vec<usize>,
    classes: usize,
}

impl Partition {
    /// Every vertex in its own class
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            classes: n,
        }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True if the partition covers no vertices
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of distinct classes
    pub fn class_count(&self) -> usize {
        self.classes
    }

    /// Representative of `v`'s class
    #[inline]
    pub fn find(&self, mut v: usize) -> usize {
        while self.parent[v] != v {
            v = self.parent[v];
        }
        v
    }

    /// True if `u` and `v` are in the same class
    #[inline]
    pub fn same_class(&self, u: usize, v: usize) -> bool {
        self.find(u) == self.find(v)
    }

    /// Merge the classes of `u` and `v`. Returns false if already merged.
    pub fn union(&mut self, u: usize, v: usize) -> bool {
        let (mut ru, mut rv) = (self.find(u), self.find(v));
        if ru == rv {
            return false;
        }
        if self.size[ru] < self.size[rv] {
            std::mem::swap(&mut ru, &mut rv);
        }
        self.parent[rv] = ru;
        self.size[ru] += self.size[rv];
        self.classes -= 1;
        true
    }

    /// Representatives of all classes, ascending
    pub fn representatives(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(move |&v| self.parent[v] == v)
    }

    /// Members of `v`'s class, ascending
    pub fn members(&self, v: usize) -> Vec<usize> {
        let root = self.find(v);
        (0..self.len()).filter(|&w| self.find(w) == root).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_partition_is_discrete() {
        let p = Partition::new(5);
        assert_eq!(p.class_count(), 5);
        for v in 0..5 {
            assert_eq!(p.find(v), v);
        }
    }

    #[test]
    fn test_union_is_transitive() {
        let mut p = Partition::new(6);
        assert!(p.union(0, 1));
        assert!(p.union(2, 3));
        assert!(p.union(1, 3));
        assert!(!p.union(0, 2));

        assert!(p.same_class(0, 3));
        assert!(!p.same_class(0, 4));
        assert_eq!(p.class_count(), 3);
        assert_eq!(p.members(2), vec![0, 1, 2, 3]);

        // find is idempotent
        for v in 0..6 {
            assert_eq!(p.find(p.find(v)), p.find(v));
        }
        assert_eq!(p.representatives().count(), 3);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = Partition::new(4);
        original.union(0, 1);

        let mut copy = original.clone();
        copy.union(2, 3);
        copy.union(0, 2);

        assert!(!original.same_class(2, 3));
        assert!(!original.same_class(0, 2));
        assert_eq!(original.class_count(), 3);
        assert_eq!(copy.class_count(), 1);

        let snapshot = original.clone();
        let mut sibling = original.clone();
        sibling.union(1, 3);
        assert_eq!(original, snapshot);
        assert_ne!(sibling, snapshot);
    }
}
