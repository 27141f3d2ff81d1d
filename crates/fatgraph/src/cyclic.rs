//! Cyclic sequences of edge labels.
//!
//! Purpose
//! - Represent the cyclic order of half-edges around a vertex (and the edge
//!   sequence traversed by a boundary cycle) as a linear sequence that is
//!   compared only up to rotation.
//! - Provide the rotation-aware primitives used by the canonical-form test and
//!   by the isomorphism search: maximal rotation, canonicalization and the
//!   repetition pattern.
//!
//! Repetition pattern
//! - Edge labels are arbitrary between graphs, so alignment uses the label-free
//!   *shape* of a sequence: for each position, the forward distance to the next
//!   occurrence of the same label (0 when the label occurs once). Loops at a
//!   vertex show up as non-zero entries.
//! - The pattern stores the offset of the maximal rotation of the shape, that
//!   canonical shape, and its rotational period. Two sequences can only be
//!   aligned by rotations that match their patterns, and those rotations form a
//!   single coset of the period, so no rotation has to be tested one by one.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::OnceLock;

/// Label-free rotation class of a sequence (see module docs).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RepetitionPattern {
    /// Rotation that brings the raw shape into its maximal (canonical) form.
    pub base: usize,
    /// Canonical shape: forward repeat distances, maximally rotated.
    pub shape: Vec<usize>,
    /// Smallest rotation leaving `shape` unchanged (divides the length).
    pub period: usize,
}

impl RepetitionPattern {
    /// Compute the pattern of a linear sequence.
    pub fn of<T: PartialEq>(items: &[T]) -> Self {
        let raw = repeat_distances(items);
        let len = raw.len();
        if len == 0 {
            return Self {
                base: 0,
                shape: Vec::new(),
                period: 1,
            };
        }
        let base = max_rotation_offset(&raw);
        let shape = rotated_vec(&raw, base);
        let period = (1..=len)
            .find(|&p| len % p == 0 && (0..len).all(|i| shape[(i + p) % len] == shape[i]))
            .unwrap_or(len);
        Self {
            base,
            shape,
            period,
        }
    }
}

/// For each position, forward distance to the next occurrence of the same item (0 if none).
pub fn repeat_distances<T: PartialEq>(items: &[T]) -> Vec<usize> {
    let len = items.len();
    (0..len)
        .map(|i| {
            (1..len)
                .find(|&k| items[(i + k) % len] == items[i])
                .unwrap_or(0)
        })
        .collect()
}

/// Lexicographic comparison of the rotations starting at `a` and `b`.
fn cmp_rotations<T: Ord>(items: &[T], a: usize, b: usize) -> Ordering {
    let len = items.len();
    (0..len)
        .map(|i| items[(a + i) % len].cmp(&items[(b + i) % len]))
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Smallest shift whose rotation is lexicographically maximal.
pub fn max_rotation_offset<T: Ord>(items: &[T]) -> usize {
    let mut best = 0;
    for shift in 1..items.len() {
        if cmp_rotations(items, shift, best) == Ordering::Greater {
            best = shift;
        }
    }
    best
}

fn rotated_vec<T: Clone>(items: &[T], shift: usize) -> Vec<T> {
    let len = items.len();
    (0..len).map(|i| items[(i + shift) % len].clone()).collect()
}

/// Ordered sequence of edge labels, equal up to rotation.
///
/// Invariants:
/// - The repetition pattern is a function of the content; it is computed on
///   first use and dropped whenever the content is rotated or relabeled.
/// - Indexing is modulo the length.
#[derive(Clone, Debug, Default)]
pub struct CyclicSequence {
    items: Vec<usize>,
    pattern: OnceLock<RepetitionPattern>,
}

impl CyclicSequence {
    pub fn new(items: Vec<usize>) -> Self {
        Self {
            items,
            pattern: OnceLock::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Linear representation at the current alignment.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.items.iter().copied()
    }

    /// Number of occurrences of `label`.
    pub fn count(&self, label: usize) -> usize {
        self.items.iter().filter(|&&x| x == label).count()
    }

    /// First position holding `label`.
    pub fn position(&self, label: usize) -> Option<usize> {
        self.items.iter().position(|&x| x == label)
    }

    /// Copy starting at position `shift`: `rotated(s)[i] == self[i + s]`.
    pub fn rotated(&self, shift: usize) -> Self {
        Self::new(rotated_vec(&self.items, shift))
    }

    /// Rotate in place; the cached pattern is invalidated.
    pub fn rotate(&mut self, shift: usize) {
        if self.items.is_empty() {
            return;
        }
        let len = self.items.len();
        self.items.rotate_left(shift % len);
        self.pattern = OnceLock::new();
    }

    /// Copy with every label passed through `f`.
    pub fn relabeled(&self, f: impl Fn(usize) -> usize) -> Self {
        Self::new(self.items.iter().map(|&x| f(x)).collect())
    }

    /// Shift of the lexicographically maximal rotation (smallest such shift).
    pub fn max_rotation_offset(&self) -> usize {
        max_rotation_offset(&self.items)
    }

    /// True iff no rotation is lexicographically greater than the current alignment.
    pub fn is_maximal_rotation(&self) -> bool {
        (1..self.items.len()).all(|shift| cmp_rotations(&self.items, shift, 0) != Ordering::Greater)
    }

    /// Rotate into maximal form; returns the shift applied.
    pub fn canonicalize(&mut self) -> usize {
        let shift = self.max_rotation_offset();
        if shift != 0 {
            self.rotate(shift);
        }
        shift
    }

    /// Maximal rotation as a new sequence.
    pub fn canonical(&self) -> Self {
        self.rotated(self.max_rotation_offset())
    }

    /// Repetition pattern, computed once per content.
    pub fn repetition_pattern(&self) -> &RepetitionPattern {
        self.pattern
            .get_or_init(|| RepetitionPattern::of(&self.items))
    }

    /// True iff `self[i + shift] == other[i]` for all `i`.
    pub fn equals_rotated(&self, other: &CyclicSequence, shift: usize) -> bool {
        let len = self.len();
        len == other.len() && (0..len).all(|i| self.items[(i + shift) % len] == other.items[i])
    }

    /// Rotations `s` of `self` whose repetition pattern lines up with `other`'s,
    /// i.e. `repeat_distances(self.rotated(s)) == repeat_distances(other)`.
    ///
    /// Empty when the canonical shapes differ. Only these shifts can carry the
    /// loop structure of one vertex onto the other.
    pub fn shifts_for_equality(&self, other: &CyclicSequence) -> Vec<usize> {
        let len = self.len();
        if len != other.len() {
            return Vec::new();
        }
        if len == 0 {
            return vec![0];
        }
        let mine = self.repetition_pattern();
        let theirs = other.repetition_pattern();
        if mine.shape != theirs.shape {
            return Vec::new();
        }
        let first = (mine.base + len - theirs.base) % len;
        let mut shifts: Vec<usize> = (0..len / mine.period)
            .map(|k| (first + k * mine.period) % len)
            .collect();
        shifts.sort_unstable();
        shifts
    }
}

impl From<Vec<usize>> for CyclicSequence {
    fn from(items: Vec<usize>) -> Self {
        Self::new(items)
    }
}

impl Index<usize> for CyclicSequence {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        &self.items[i % self.items.len()]
    }
}

impl PartialEq for CyclicSequence {
    fn eq(&self, other: &Self) -> bool {
        let len = self.len();
        len == other.len() && (len == 0 || (0..len).any(|s| self.equals_rotated(other, s)))
    }
}

impl Eq for CyclicSequence {}

impl Hash for CyclicSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let base = self.max_rotation_offset();
        state.write_usize(self.len());
        for i in 0..self.len() {
            state.write_usize(self.items[(i + base) % self.len()]);
        }
    }
}

impl fmt::Display for CyclicSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.items)
    }
}
