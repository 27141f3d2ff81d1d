//! Permutation helpers: sign, lexicographic successor, bucket-wise odometer.

/// Sign of a permutation of `0..p.len()` (+1 even, -1 odd).
pub fn permutation_sign(p: &[usize]) -> i32 {
    let mut seen = vec![false; p.len()];
    let mut sign = 1;
    for start in 0..p.len() {
        if seen[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = p[i];
            len += 1;
        }
        if len % 2 == 0 {
            sign = -sign;
        }
    }
    sign
}

/// Advance to the next lexicographic arrangement (repeated items allowed).
/// Returns `false` and resets to ascending order after the last one.
pub fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut i = items.len() - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        items.reverse();
        return false;
    }
    let mut j = items.len() - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}

/// All vertex maps sending each source bucket bijectively onto the target
/// bucket of the same key; buckets are never mixed.
///
/// Yields `map` with `map[source_vertex] = target_vertex`, first bucket varying fastest.
#[derive(Clone, Debug)]
pub struct BucketPermutations {
    sources: Vec<Vec<usize>>,
    targets: Vec<Vec<usize>>,
    size: usize,
    started: bool,
    done: bool,
}

impl BucketPermutations {
    /// `buckets` pairs source and target vertex lists of equal length.
    pub fn new(buckets: Vec<(Vec<usize>, Vec<usize>)>) -> Self {
        let done = buckets.iter().any(|(s, t)| s.len() != t.len());
        let size = buckets.iter().map(|(s, _)| s.len()).sum();
        let (sources, mut targets): (Vec<_>, Vec<_>) = buckets.into_iter().unzip();
        for t in &mut targets {
            t.sort_unstable();
        }
        Self {
            sources,
            targets,
            size,
            started: false,
            done,
        }
    }

    fn current(&self) -> Vec<usize> {
        let mut map = vec![0; self.size];
        for (s, t) in self.sources.iter().zip(&self.targets) {
            for (&v, &w) in s.iter().zip(t) {
                map[v] = w;
            }
        }
        map
    }
}

impl Iterator for BucketPermutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        for t in &mut self.targets {
            if next_permutation(t) {
                return Some(self.current());
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_of_small_permutations() {
        assert_eq!(permutation_sign(&[]), 1);
        assert_eq!(permutation_sign(&[0, 1, 2]), 1);
        assert_eq!(permutation_sign(&[1, 0, 2]), -1);
        assert_eq!(permutation_sign(&[1, 2, 0]), 1);
        assert_eq!(permutation_sign(&[3, 2, 1, 0]), 1);
        assert_eq!(permutation_sign(&[1, 2, 3, 0]), -1);
    }

    #[test]
    fn next_permutation_handles_repeats() {
        let mut items = vec![0, 0, 1, 1];
        let mut count = 1;
        while next_permutation(&mut items) {
            count += 1;
        }
        assert_eq!(count, 6);
        assert_eq!(items, vec![0, 0, 1, 1]);
    }

    #[test]
    fn bucket_permutations_stay_in_buckets() {
        let maps: Vec<Vec<usize>> =
            BucketPermutations::new(vec![(vec![0, 2], vec![2, 0]), (vec![1], vec![1])]).collect();
        assert_eq!(maps, vec![vec![0, 1, 2], vec![2, 1, 0]]);
        let maps: Vec<Vec<usize>> =
            BucketPermutations::new(vec![(vec![0, 1, 2], vec![0, 1, 2]), (vec![3, 4], vec![3, 4])])
                .collect();
        assert_eq!(maps.len(), 12);
        assert!(maps.iter().all(|m| m[3] >= 3 && m[4] >= 3));
        assert_eq!(BucketPermutations::new(vec![(vec![0], vec![])]).count(), 0);
    }
}
