//! Full binary trees with a given number of internal nodes (Knuth's Algorithm B).

/// Binary tree with internal nodes `0..len()` numbered in preorder; node 0 is
/// the root. A missing child is a leaf.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BinaryTree {
    left: Vec<Option<usize>>,
    right: Vec<Option<usize>>,
}

impl BinaryTree {
    /// Number of internal nodes.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn left(&self, node: usize) -> Option<usize> {
        self.left[node]
    }

    pub fn right(&self, node: usize) -> Option<usize> {
        self.right[node]
    }

    /// Number of leaves.
    pub fn leaves(&self) -> usize {
        self.len() + 1
    }
}

/// All binary trees with `n` internal nodes, in Algorithm B order.
///
/// Links are 1-based with 0 for "no child", as in the original formulation;
/// `BinaryTree` converts them to 0-based node indices.
#[derive(Clone, Debug)]
pub struct BinaryTrees {
    n: usize,
    l: Vec<usize>,
    r: Vec<usize>,
    done: bool,
}

impl BinaryTrees {
    pub fn new(n: usize) -> Self {
        let mut l = vec![0; n + 2];
        let r = vec![0; n + 2];
        for (k, link) in l.iter_mut().enumerate().take(n).skip(1) {
            *link = k + 1;
        }
        l[n + 1] = 1;
        Self {
            n,
            l,
            r,
            done: false,
        }
    }

    fn snapshot(&self) -> BinaryTree {
        let link = |x: usize| (x != 0).then(|| x - 1);
        BinaryTree {
            left: (1..=self.n).map(|k| link(self.l[k])).collect(),
            right: (1..=self.n).map(|k| link(self.r[k])).collect(),
        }
    }

    /// Algorithm B steps B3 to B5; false once the last tree was visited.
    fn advance(&mut self) -> bool {
        let (l, r) = (&mut self.l, &mut self.r);
        let mut j = 1;
        while j <= self.n && l[j] == 0 {
            r[j] = 0;
            l[j] = j + 1;
            j += 1;
        }
        if j > self.n {
            return false;
        }
        let mut y = l[j];
        let mut k = 0;
        while r[y] > 0 {
            k = y;
            y = r[y];
        }
        if k > 0 {
            r[k] = 0;
        } else {
            l[j] = 0;
        }
        r[y] = r[j];
        r[j] = y;
        true
    }
}

impl Iterator for BinaryTrees {
    type Item = BinaryTree;

    fn next(&mut self) -> Option<BinaryTree> {
        if self.done {
            return None;
        }
        let tree = self.snapshot();
        if self.n == 0 || !self.advance() {
            self.done = true;
        }
        Some(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_preorder(t: &BinaryTree) -> bool {
        // walking left-first from the root must visit 0, 1, 2, ...
        let mut order = Vec::new();
        let mut stack = vec![0];
        while let Some(v) = stack.pop() {
            order.push(v);
            if let Some(c) = t.right(v) {
                stack.push(c);
            }
            if let Some(c) = t.left(v) {
                stack.push(c);
            }
        }
        order == (0..t.len()).collect::<Vec<_>>()
    }

    #[test]
    fn catalan_counts() {
        let catalan = [1, 1, 2, 5, 14, 42, 132, 429];
        for (n, &expected) in catalan.iter().enumerate() {
            let trees: Vec<BinaryTree> = BinaryTrees::new(n).collect();
            assert_eq!(trees.len(), expected, "n = {n}");
            let distinct: HashSet<BinaryTree> = trees.iter().cloned().collect();
            assert_eq!(distinct.len(), expected);
            if n > 0 {
                assert!(trees.iter().all(is_preorder));
            }
        }
    }

    #[test]
    fn first_tree_is_a_left_path() {
        let first = BinaryTrees::new(3).next().unwrap();
        assert_eq!(first.left(0), Some(1));
        assert_eq!(first.left(1), Some(2));
        assert_eq!(first.left(2), None);
        assert!((0..3).all(|v| first.right(v).is_none()));
    }
}
