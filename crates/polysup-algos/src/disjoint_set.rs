//! Disjoint-set (union-find) over item indices
//!
//! Union by size with path compression, giving effectively constant time
//! `find` and `union`.

/// Disjoint-set forest over the indices `0..len`
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    num_sets: usize,
}

impl DisjointSet {
    /// Create `len` singleton sets
    pub fn new(len: usize) -> Self {
        DisjointSet {
            parent: (0..len).collect(),
            size: vec![1; len],
            num_sets: len,
        }
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// Check if there are no items
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Number of disjoint sets
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Representative of the set containing `item`
    ///
    /// # Panics
    ///
    /// Panics if `item` is out of range.
    pub fn find(&mut self, item: usize) -> usize {
        let mut root = item;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = item;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// Returns `false` if they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        let (big, small) = if self.size[root_a] >= self.size[root_b] {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.num_sets -= 1;
        true
    }

    /// Check whether `a` and `b` are in the same set
    pub fn connected(&mut self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Size of the set containing `item`
    pub fn set_size(&mut self, item: usize) -> usize {
        let root = self.find(item);
        self.size[root]
    }

    /// Members of each set, each sorted ascending, sets ordered by smallest member
    pub fn sets(&mut self) -> Vec<Vec<usize>> {
        let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); self.len()];
        for item in 0..self.len() {
            let root = self.find(item);
            by_root[root].push(item);
        }
        let mut sets: Vec<Vec<usize>> = by_root.into_iter().filter(|s| !s.is_empty()).collect();
        sets.sort_by_key(|s| s[0]);
        sets
    }
}
