use super::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn graph(vertices: &[&[usize]]) -> RibbonGraph {
    RibbonGraph::new(vertices.iter().map(|v| v.to_vec()).collect()).unwrap()
}

fn malformed(vertices: Vec<Vec<usize>>) -> bool {
    matches!(RibbonGraph::new(vertices), Err(GraphError::Malformed { .. }))
}

#[test]
fn construction_rejects_bad_label_multisets() {
    assert!(malformed(vec![vec![0, 1], vec![0]]));
    assert!(malformed(vec![vec![0, 0], vec![1, 2]]));
    assert!(malformed(vec![vec![0, 0, 0, 1]]));
    assert!(malformed(vec![vec![0, 0], vec![]]));
    assert!(RibbonGraph::new(vec![]).is_ok());
}

#[test]
fn from_profile_cuts_windows() {
    let g = RibbonGraph::from_profile(&[3, 3], &[0, 1, 2, 0, 2, 1], &PlainVertices).unwrap();
    assert_eq!(g.num_vertices(), 2);
    assert_eq!(g.vertex(1).as_slice(), &[0, 2, 1]);
    let err = RibbonGraph::from_profile(&[3, 2], &[0, 1, 2, 0, 2, 1], &PlainVertices);
    assert!(matches!(err, Err(GraphError::Malformed { .. })));
}

#[test]
fn theta_graphs_by_cyclic_order() {
    // Same cyclic order at both ends: a torus with one hole.
    let torus = graph(&[&[0, 1, 2], &[0, 1, 2]]);
    assert_eq!(torus.classify(), (1, 1));
    // Reversed order: the planar theta, three boundary cycles.
    let planar = graph(&[&[0, 1, 2], &[2, 1, 0]]);
    assert_eq!(planar.classify(), (0, 3));
    let lens: Vec<usize> = planar.boundary_cycles().iter().map(|c| c.len()).collect();
    assert_eq!(lens, vec![2, 2, 2]);
}

#[test]
fn roses_and_loops() {
    assert_eq!(graph(&[&[0, 1, 0, 1]]).classify(), (1, 1));
    let g = graph(&[&[0, 0, 1, 1]]);
    assert_eq!(g.classify(), (0, 3));
    assert!(g.is_loop(0) && g.is_loop(1));
    assert_eq!(g.boundary_cycle_of(HalfEdge::new(0, 2)), 0);
    assert_eq!(g.boundary_cycle_of(HalfEdge::new(0, 1)), 1);
}

#[test]
fn boundary_cycles_follow_successor() {
    let g = graph(&[&[0, 1, 1], &[0, 2, 2]]);
    let first = &g.boundary_cycles()[0];
    assert_eq!(
        first.half_edges,
        vec![
            HalfEdge::new(0, 0),
            HalfEdge::new(1, 1),
            HalfEdge::new(1, 0),
            HalfEdge::new(0, 1)
        ]
    );
    assert_eq!(first.edges.as_slice(), &[0, 2, 0, 1]);
    for c in g.boundary_cycles() {
        for w in c.half_edges.windows(2) {
            assert_eq!(g.successor(w[0]), w[1]);
        }
    }
}

#[test]
fn connectivity_and_canonical_form() {
    let split = graph(&[&[0, 0], &[1, 1]]);
    assert!(!split.is_connected());
    assert!(split.is_canonical());
    assert!(!graph(&[&[1, 1], &[0, 0]]).is_canonical());
    assert!(graph(&[&[2, 0, 1], &[2, 0, 1]]).is_canonical());
    assert!(!graph(&[&[0, 1, 2], &[2, 0, 1]]).is_canonical());
    // shorter vertices first regardless of content
    assert!(graph(&[&[2, 0, 1], &[3, 3, 0, 2, 1]]).is_canonical());
    assert!(graph(&[&[0, 1, 2], &[2, 1, 0]]).is_connected());
}

#[test]
fn contraction_merges_endpoints() {
    let g = graph(&[&[0, 1, 2], &[0, 2, 1]]);
    let h = g.contract(0).unwrap();
    assert_eq!(h.num_vertices(), 1);
    assert_eq!(h.vertex(0).as_slice(), &[0, 1, 1, 0]);
    assert_eq!(h.classify(), g.classify());
    // memoized per edge
    assert!(Arc::ptr_eq(&h, &g.contract(0).unwrap()));
}

#[test]
fn contraction_misuse() {
    let g = graph(&[&[0, 1, 1], &[0, 2, 2]]);
    assert_eq!(g.contract(1).unwrap_err(), GraphError::LoopContraction { edge: 1 });
    assert_eq!(
        g.contract(3).unwrap_err(),
        GraphError::NoSuchEdge { edge: 3, edges: 3 }
    );
}

#[test]
fn numbering_is_validated() {
    let g = graph(&[&[0, 1, 2], &[2, 1, 0]]);
    assert!(g.with_numbering(vec![2, 0, 1]).is_ok());
    assert!(g.with_numbering(vec![0, 0, 1]).is_err());
    assert!(g.with_numbering(vec![0, 1]).is_err());
    assert!(g.with_numbering(vec![0, 1, 3]).is_err());
}

#[test]
fn contraction_carries_numbering() {
    let g = graph(&[&[0, 1, 1], &[0, 2, 2]]).with_numbering(vec![2, 0, 1]).unwrap();
    let before = g.invariant().boundary_lengths;
    let h = g.contract(0).unwrap();
    let after = h.invariant().boundary_lengths;
    // edge 0 runs twice along the cycle labelled 2 and nowhere else
    assert_eq!(before, vec![1, 1, 4]);
    assert_eq!(after, vec![1, 1, 2]);
}

fn random_graph(rng: &mut StdRng, profile: &[usize]) -> RibbonGraph {
    let edges = profile.iter().sum::<usize>() / 2;
    let mut labels: Vec<usize> = (0..edges).flat_map(|e| [e, e]).collect();
    labels.shuffle(rng);
    RibbonGraph::from_profile(profile, &labels, &PlainVertices).unwrap()
}

#[test]
fn euler_formula_and_contraction_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(7);
    let profiles: [&[usize]; 4] = [&[3, 3], &[3, 3, 3, 3], &[3, 4, 5], &[4, 4, 3, 3, 4]];
    for _ in 0..50 {
        for profile in profiles {
            let g = random_graph(&mut rng, profile);
            if !g.is_connected() {
                continue;
            }
            let (e, v, n) = (g.num_edges(), g.num_vertices(), g.num_boundary_cycles());
            assert_eq!((e + 2 - v - n) % 2, 0);
            assert_eq!(v + n, e + 2 - 2 * g.genus());
            let numbered = g.with_numbering((0..n).collect()).unwrap();
            for edge in (0..e).filter(|&x| !g.is_loop(x)) {
                let h = numbered.contract(edge).unwrap();
                assert_eq!(h.num_edges(), e - 1);
                assert_eq!(h.num_vertices(), v - 1);
                assert_eq!(h.classify(), g.classify());
                // cycles through the edge shrink by the number of passes
                let mut expect = numbered.invariant().boundary_lengths;
                for half in g.half_edges(edge) {
                    let k = numbered.boundary_cycle_of(half);
                    expect[numbered.numbering().unwrap()[k]] -= 1;
                }
                assert_eq!(h.invariant().boundary_lengths, expect);
            }
        }
    }
}

fn same_boundary(carried: &RibbonGraph) -> bool {
    let fresh = boundary::trace(carried);
    let stored = carried.boundary();
    stored.owner == fresh.owner
        && stored.cycles.len() == fresh.cycles.len()
        && stored.cycles.iter().zip(&fresh.cycles).all(|(c, f)| {
            c.half_edges == f.half_edges && c.edges.as_slice() == f.edges.as_slice()
        })
}

#[test]
fn contraction_carries_boundary_cycles() {
    let g = graph(&[&[0, 1, 2], &[0, 2, 1]]);
    let h = g.contract(0).unwrap();
    // filled in by the contraction, not traced on demand
    assert!(h.boundary.get().is_some());
    assert!(same_boundary(&h));

    let mut rng = StdRng::seed_from_u64(19);
    let profiles: [&[usize]; 3] = [&[1, 3, 4], &[3, 3, 3, 3], &[2, 4, 5, 3]];
    for _ in 0..40 {
        for profile in profiles {
            let g = random_graph(&mut rng, profile);
            let n = g.num_boundary_cycles();
            let numbered = g.with_numbering((0..n).rev().collect()).unwrap();
            for edge in (0..g.num_edges()).filter(|&x| !g.is_loop(x)) {
                let plain = g.contract(edge).unwrap();
                assert!(same_boundary(&plain));
                assert!(!plain.is_numbered());
                let h = numbered.contract(edge).unwrap();
                assert!(same_boundary(&h));
                let mut labels = h.numbering().unwrap().to_vec();
                labels.sort_unstable();
                assert_eq!(labels, (0..n).collect::<Vec<_>>());
            }
        }
    }
}

#[test]
fn interned_vertices_are_shared() {
    let pool = InternedVertices::new();
    let g = RibbonGraph::from_profile(&[2, 2, 2], &[0, 1, 0, 1, 2, 2], &pool).unwrap();
    assert!(Arc::ptr_eq(&g.vertices()[0], &g.vertices()[1]));
    assert_eq!(pool.len(), 2);
}

#[test]
fn display_lists_vertices_and_numbering() {
    let g = graph(&[&[0, 1, 2], &[2, 1, 0]]);
    assert_eq!(g.to_string(), "[[0, 1, 2], [2, 1, 0]]");
    let numbered = g.with_numbering(vec![1, 2, 0]).unwrap();
    assert_eq!(numbered.to_string(), "[[0, 1, 2], [2, 1, 0]] numbering [1, 2, 0]");
}
