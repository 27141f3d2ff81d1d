//! Lazy isomorphism search (seeded propagation and exhaustive fallback).

use super::{BucketPermutations, IsoCfg, Isomorphism};
use crate::graph::{HalfEdge, RibbonGraph, Vertex};

const UNSET: usize = usize::MAX;

fn rotation_candidates(source: &Vertex, target: &Vertex, cfg: IsoCfg) -> Vec<usize> {
    if source.len() != target.len() {
        return Vec::new();
    }
    if cfg.use_pattern_prune {
        source.shifts_for_equality(target)
    } else {
        (0..source.len()).collect()
    }
}

fn compatible(source: &RibbonGraph, target: &RibbonGraph) -> bool {
    let buckets = |g: &RibbonGraph| -> Vec<(usize, usize)> {
        g.valence_spectrum().iter().map(|(&k, v)| (k, v.len())).collect()
    };
    source.num_edges() == target.num_edges()
        && source.num_vertices() == target.num_vertices()
        && source.is_numbered() == target.is_numbered()
        && buckets(source) == buckets(target)
        && source.num_boundary_cycles() == target.num_boundary_cycles()
}

/// Vertex map plus an odometer over per-vertex rotation candidates.
#[derive(Debug)]
struct Odometer {
    map: Vec<usize>,
    candidates: Vec<Vec<usize>>,
    digits: Vec<usize>,
}

impl Odometer {
    fn rotations(&self) -> Vec<usize> {
        self.digits
            .iter()
            .zip(&self.candidates)
            .map(|(&d, c)| c[d])
            .collect()
    }

    /// Step to the next combination; false once all were visited.
    fn advance(&mut self) -> bool {
        for (d, c) in self.digits.iter_mut().zip(&self.candidates) {
            *d += 1;
            if *d < c.len() {
                return true;
            }
            *d = 0;
        }
        false
    }
}

#[derive(Debug)]
enum State {
    Seeded {
        seed: usize,
        candidates: Vec<(usize, usize)>,
        cursor: usize,
    },
    Exhaustive {
        maps: BucketPermutations,
        current: Option<Odometer>,
    },
    Done,
}

/// Iterator over all isomorphisms from `source` to `target`.
#[derive(Debug)]
pub struct Isomorphisms<'a> {
    source: &'a RibbonGraph,
    target: &'a RibbonGraph,
    cfg: IsoCfg,
    state: State,
}

impl<'a> Isomorphisms<'a> {
    pub(crate) fn new(source: &'a RibbonGraph, target: &'a RibbonGraph, cfg: IsoCfg) -> Self {
        if source.num_vertices() > 0 && source.is_connected() {
            Self::seeded(source, target, cfg)
        } else {
            Self::exhaustive(source, target, cfg)
        }
    }

    fn seeded(source: &'a RibbonGraph, target: &'a RibbonGraph, cfg: IsoCfg) -> Self {
        let mut state = State::Done;
        if compatible(source, target) {
            let smallest = source
                .valence_spectrum()
                .iter()
                .min_by_key(|(_, vs)| vs.len());
            if let Some((valence, vs)) = smallest {
                let seed = vs[0];
                let mut candidates = Vec::new();
                for &t in target.valence_spectrum().get(valence).into_iter().flatten() {
                    for r in rotation_candidates(source.vertex(seed), target.vertex(t), cfg) {
                        candidates.push((t, r));
                    }
                }
                state = State::Seeded {
                    seed,
                    candidates,
                    cursor: 0,
                };
            }
        }
        Self {
            source,
            target,
            cfg,
            state,
        }
    }

    /// Bucket permutations × rotations; complete for any pair of graphs.
    pub(crate) fn exhaustive(
        source: &'a RibbonGraph,
        target: &'a RibbonGraph,
        cfg: IsoCfg,
    ) -> Self {
        let state = if compatible(source, target) {
            let buckets = source
                .valence_spectrum()
                .iter()
                .map(|(val, vs)| {
                    let ts = target.valence_spectrum().get(val).cloned().unwrap_or_default();
                    (vs.clone(), ts)
                })
                .collect();
            State::Exhaustive {
                maps: BucketPermutations::new(buckets),
                current: None,
            }
        } else {
            State::Done
        };
        Self {
            source,
            target,
            cfg,
            state,
        }
    }

    /// Extend `seed ↦ (t, r)` along edges; at most one isomorphism results.
    fn propagate(&self, seed: usize, t: usize, r: usize) -> Option<Isomorphism> {
        let (src, tgt) = (self.source, self.target);
        let nv = src.num_vertices();
        let ne = src.num_edges();
        let mut vertices = vec![UNSET; nv];
        let mut rotations = vec![0; nv];
        let mut used = vec![false; nv];
        let mut edges = vec![UNSET; ne];
        let mut inverse = vec![UNSET; ne];

        vertices[seed] = t;
        rotations[seed] = r;
        used[t] = true;
        let mut stack = vec![seed];
        while let Some(v) = stack.pop() {
            let (w, rot, len) = (vertices[v], rotations[v], src.valence(v));
            for p in 0..len {
                let h = HalfEdge::new(v, p);
                let image = HalfEdge::new(w, (p + len - rot) % len);
                let (e, f) = (src.label(h), tgt.label(image));
                if edges[e] == UNSET && inverse[f] == UNSET {
                    edges[e] = f;
                    inverse[f] = e;
                } else if edges[e] != f || inverse[f] != e {
                    return None;
                }
                let (h2, i2) = (src.partner(h), tgt.partner(image));
                let len2 = src.valence(h2.vertex);
                if tgt.valence(i2.vertex) != len2 {
                    return None;
                }
                let r2 = (h2.position + len2 - i2.position) % len2;
                if vertices[h2.vertex] == UNSET {
                    if used[i2.vertex] {
                        return None;
                    }
                    vertices[h2.vertex] = i2.vertex;
                    rotations[h2.vertex] = r2;
                    used[i2.vertex] = true;
                    stack.push(h2.vertex);
                } else if vertices[h2.vertex] != i2.vertex || rotations[h2.vertex] != r2 {
                    return None;
                }
            }
        }
        if vertices.contains(&UNSET) {
            return None;
        }
        let iso = Isomorphism {
            vertices,
            rotations,
            edges,
        };
        self.verify(&iso).then_some(iso)
    }

    /// Induced edge map of a full vertex/rotation assignment, if consistent.
    fn assignment(&self, map: &[usize], rotations: Vec<usize>) -> Option<Isomorphism> {
        let (src, tgt) = (self.source, self.target);
        let ne = src.num_edges();
        let mut edges = vec![UNSET; ne];
        let mut inverse = vec![UNSET; ne];
        for (v, &w) in map.iter().enumerate() {
            let len = src.valence(v);
            for p in 0..len {
                let e = src.label(HalfEdge::new(v, p));
                let f = tgt.label(HalfEdge::new(w, (p + len - rotations[v]) % len));
                if edges[e] == UNSET && inverse[f] == UNSET {
                    edges[e] = f;
                    inverse[f] = e;
                } else if edges[e] != f || inverse[f] != e {
                    return None;
                }
            }
        }
        let iso = Isomorphism {
            vertices: map.to_vec(),
            rotations,
            edges,
        };
        self.verify(&iso).then_some(iso)
    }

    /// Endpoint relation and numbering are carried over exactly.
    fn verify(&self, iso: &Isomorphism) -> bool {
        let (src, tgt) = (self.source, self.target);
        let pairs = |g: &RibbonGraph, f: &dyn Fn(usize) -> usize| {
            let mut out: Vec<(usize, usize)> = (0..g.num_edges())
                .map(|e| {
                    let (a, b) = g.endpoints(e);
                    let (a, b) = (f(a), f(b));
                    (a.min(b), a.max(b))
                })
                .collect();
            out.sort_unstable();
            out
        };
        if pairs(src, &|v| iso.vertices[v]) != pairs(tgt, &|v| v) {
            return false;
        }
        match (src.numbering(), tgt.numbering()) {
            (None, None) => true,
            (Some(ls), Some(lt)) => src.boundary_cycles().iter().zip(ls).all(|(c, &label)| {
                c.half_edges.first().map_or(true, |&h| {
                    let image = iso.map_half_edge(src, h);
                    lt[tgt.boundary_cycle_of(image)] == label
                })
            }),
            _ => false,
        }
    }
}

impl Iterator for Isomorphisms<'_> {
    type Item = Isomorphism;

    fn next(&mut self) -> Option<Isomorphism> {
        loop {
            match &mut self.state {
                State::Done => return None,
                State::Seeded {
                    seed,
                    candidates,
                    cursor,
                } => {
                    let Some(&(t, r)) = candidates.get(*cursor) else {
                        self.state = State::Done;
                        return None;
                    };
                    *cursor += 1;
                    let seed = *seed;
                    if let Some(iso) = self.propagate(seed, t, r) {
                        return Some(iso);
                    }
                }
                State::Exhaustive { maps, current } => {
                    if current.is_none() {
                        let Some(map) = maps.next() else {
                            self.state = State::Done;
                            return None;
                        };
                        let candidates: Vec<Vec<usize>> = map
                            .iter()
                            .enumerate()
                            .map(|(v, &w)| {
                                rotation_candidates(
                                    self.source.vertex(v),
                                    self.target.vertex(w),
                                    self.cfg,
                                )
                            })
                            .collect();
                        if candidates.iter().any(Vec::is_empty) {
                            continue;
                        }
                        let digits = vec![0; map.len()];
                        *current = Some(Odometer {
                            map,
                            candidates,
                            digits,
                        });
                    }
                    let Some(odo) = current.as_mut() else {
                        continue;
                    };
                    let rotations = odo.rotations();
                    let map = odo.map.clone();
                    if !odo.advance() {
                        *current = None;
                    }
                    if let Some(iso) = self.assignment(&map, rotations) {
                        return Some(iso);
                    }
                }
            }
        }
    }
}
