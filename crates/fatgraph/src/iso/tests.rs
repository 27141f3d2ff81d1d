use super::*;
use crate::graph::{PlainVertices, RibbonGraph};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn graph(vertices: &[&[usize]]) -> RibbonGraph {
    RibbonGraph::new(vertices.iter().map(|v| v.to_vec()).collect()).unwrap()
}

/// Relabel edges, rotate every vertex and shuffle the vertex order.
fn scramble(g: &RibbonGraph, seed: u64) -> RibbonGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut relabel: Vec<usize> = (0..g.num_edges()).collect();
    relabel.shuffle(&mut rng);
    let mut vertices: Vec<Vec<usize>> = g
        .vertices()
        .iter()
        .map(|v| {
            let shift = rng.gen_range(0..v.len());
            v.rotated(shift).iter().map(|x| relabel[x]).collect()
        })
        .collect();
    vertices.shuffle(&mut rng);
    RibbonGraph::new(vertices).unwrap()
}

fn check_is_isomorphism(source: &RibbonGraph, target: &RibbonGraph, iso: &Isomorphism) {
    for v in 0..source.num_vertices() {
        for p in 0..source.valence(v) {
            let h = HalfEdge::new(v, p);
            let image = iso.map_half_edge(source, h);
            assert_eq!(target.label(image), iso.edges[source.label(h)]);
        }
    }
}

#[test]
fn automorphism_groups_of_small_graphs() {
    let cases: [(&[&[usize]], usize, bool); 6] = [
        (&[&[0, 1, 2], &[0, 1, 2]], 6, true),
        (&[&[0, 1, 2], &[2, 1, 0]], 6, false),
        (&[&[0, 1, 0, 1]], 4, false),
        (&[&[0, 0, 1, 1]], 2, false),
        (&[&[0, 1, 1], &[0, 2, 2]], 2, false),
        (&[&[0, 1, 2, 0, 1, 2]], 6, true),
    ];
    for (vertices, order, oriented) in cases {
        let g = graph(vertices);
        let auts: Vec<Isomorphism> = g.automorphisms().collect();
        assert_eq!(auts.len(), order, "{g}");
        assert_eq!(g.is_oriented(), oriented, "{g}");
        assert!(auts.iter().any(Isomorphism::is_identity));
        for a in &auts {
            check_is_isomorphism(&g, &g, a);
            assert_eq!(a.vertex_rotation_sign(&g).abs(), 1);
        }
    }
}

#[test]
fn numbering_restricts_automorphisms() {
    let g = graph(&[&[0, 1, 2], &[2, 1, 0]]).with_numbering(vec![0, 1, 2]).unwrap();
    assert_eq!(g.automorphisms().count(), 1);
    assert!(g.is_oriented());
    // any relabeling of the three faces is realised by a symmetry
    let h = g.unnumbered().with_numbering(vec![2, 0, 1]).unwrap();
    assert!(g.is_isomorphic(&h));
    // numbered and un-numbered graphs never compare equal
    assert!(!g.is_isomorphic(&g.unnumbered()));
}

#[test]
fn numbered_roses_distinguish_cycles() {
    let g = graph(&[&[0, 0, 1, 1]]);
    let a = g.with_numbering(vec![0, 1, 2]).unwrap();
    let b = g.with_numbering(vec![1, 0, 2]).unwrap();
    let c = g.with_numbering(vec![0, 2, 1]).unwrap();
    assert!(!a.is_isomorphic(&b));
    // the two loops are swapped by the rotation by two
    assert!(a.is_isomorphic(&c));
}

#[test]
fn different_cyclic_orders_are_not_isomorphic() {
    let torus = graph(&[&[0, 1, 2], &[0, 1, 2]]);
    let planar = graph(&[&[0, 1, 2], &[2, 1, 0]]);
    assert!(!torus.is_isomorphic(&planar));
    assert_ne!(torus, planar);
    assert_eq!(torus, graph(&[&[2, 0, 1], &[1, 2, 0]]));
}

#[test]
fn disconnected_graphs_use_bucket_search() {
    let g = graph(&[&[0, 0, 1], &[1, 2, 2], &[3, 3, 4], &[4, 5, 5]]);
    assert!(!g.is_connected());
    let h = scramble(&g, 3);
    let isos: Vec<Isomorphism> = g.isomorphisms_to(&h).collect();
    assert!(!isos.is_empty());
    for iso in &isos {
        check_is_isomorphism(&g, &h, iso);
    }
    // swap the components, and flip each dumbbell
    assert_eq!(g.automorphisms().count(), 8);
    let empty = RibbonGraph::new(vec![]).unwrap();
    assert_eq!(empty.automorphisms().count(), 1);
}

#[test]
fn seeded_and_exhaustive_search_agree() {
    let mut rng = StdRng::seed_from_u64(11);
    let profiles: [&[usize]; 3] = [&[3, 3, 3, 3], &[4, 4], &[3, 3, 4]];
    for round in 0..30u64 {
        for profile in profiles {
            let edges = profile.iter().sum::<usize>() / 2;
            let mut labels: Vec<usize> = (0..edges).flat_map(|e| [e, e]).collect();
            labels.shuffle(&mut rng);
            let g = RibbonGraph::from_profile(profile, &labels, &PlainVertices).unwrap();
            if !g.is_connected() {
                continue;
            }
            let h = scramble(&g, round);
            let mut seeded: Vec<Isomorphism> = g.isomorphisms_to(&h).collect();
            let mut full: Vec<Isomorphism> =
                Isomorphisms::exhaustive(&g, &h, IsoCfg::default()).collect();
            let mut unpruned: Vec<Isomorphism> = g
                .isomorphisms_to_with(&h, IsoCfg { use_pattern_prune: false })
                .collect();
            for list in [&mut seeded, &mut full, &mut unpruned] {
                list.sort_by(|a, b| {
                    (&a.edges, &a.vertices, &a.rotations).cmp(&(&b.edges, &b.vertices, &b.rotations))
                });
            }
            assert!(!seeded.is_empty());
            assert_eq!(seeded, full);
            assert_eq!(seeded, unpruned);
        }
    }
}

#[test]
fn isomorphism_is_an_equivalence_on_samples() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut sample = Vec::new();
    while sample.len() < 12 {
        let mut labels: Vec<usize> = (0..4).flat_map(|e| [e, e]).collect();
        labels.shuffle(&mut rng);
        let g = RibbonGraph::from_profile(&[4, 4], &labels, &PlainVertices).unwrap();
        if g.is_connected() {
            sample.push(g);
        }
    }
    for a in &sample {
        assert!(a.is_isomorphic(a));
        for b in &sample {
            assert_eq!(a.is_isomorphic(b), b.is_isomorphic(a));
            if a.is_isomorphic(b) {
                assert_eq!(a.invariant(), b.invariant());
                for c in &sample {
                    if b.is_isomorphic(c) {
                        assert!(a.is_isomorphic(c));
                    }
                }
            }
        }
    }
}

#[test]
fn rose_with_eight_symmetries_is_not_oriented() {
    let g = graph(&[&[0, 1, 2, 3, 0, 1, 2, 3]]);
    let auts: Vec<Isomorphism> = g.automorphisms().collect();
    assert_eq!(auts.len(), 8);
    let odd = auts.iter().filter(|a| a.orientation_sign() == -1).count();
    assert_eq!(odd, 4);
    assert!(!g.is_oriented());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn scrambled_copies_are_isomorphic(seed in 0u64..10_000, shuffle_seed in 0u64..10_000) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut labels: Vec<usize> = (0..6).flat_map(|e| [e, e]).collect();
        labels.shuffle(&mut rng);
        let g = RibbonGraph::from_profile(&[3, 3, 3, 3], &labels, &PlainVertices).unwrap();
        let h = scramble(&g, shuffle_seed);
        prop_assert!(g.is_isomorphic(&h));
        prop_assert!(h.is_isomorphic(&g));
        prop_assert_eq!(g.automorphisms().count(), h.automorphisms().count());
        prop_assert_eq!(g.is_oriented(), h.is_oriented());
    }
}
