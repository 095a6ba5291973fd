//! Invariants of prestige-biased partner selection.

use prestige::error::PrestigeError;
use prestige::graph::Graph;
use prestige::prestige::{prestige_step, select_partner};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn test_selection_increments_source_degree() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xC0FFEE);
    let mut g = Graph::torus(5, 5).unwrap();

    for round in 1..=10 {
        let partner = prestige_step(&mut g, 7, 2.0, &mut rng).unwrap();
        assert_eq!(
            g.degree(7),
            4 + round,
            "source degree must grow by exactly one per step"
        );
        assert_ne!(partner, 7, "source must never link to itself");
    }
}

#[test]
fn test_partner_is_never_a_current_neighbour() {
    let mut rng = ChaCha20Rng::seed_from_u64(0xDEADBEEF);
    let g = Graph::torus(5, 5).unwrap();

    for _ in 0..100 {
        let partner = select_partner(&g, 0, 2.0, &mut rng).unwrap();
        assert_ne!(partner, 0);
        assert!(
            !g.neighbors(0).contains(&partner),
            "selection returned an existing neighbour: {partner}"
        );
    }
}

#[test]
fn test_nearby_nodes_dominate_the_draw() {
    // On a 30-cycle every node has the same centrality, so the exp(-2 d)
    // distance factor alone decides. Distance-2 candidates then carry about
    // 86% of the total weight.
    let mut rng = ChaCha20Rng::seed_from_u64(0xFACADE);
    let g = Graph::torus(1, 30).unwrap();

    let mut close_wins = 0;
    for _ in 0..200 {
        let p = select_partner(&g, 0, 2.0, &mut rng).unwrap();
        let ring_distance = p.min(30 - p);
        assert!(ring_distance >= 2, "candidates start two hops out");
        if ring_distance == 2 {
            close_wins += 1;
        }
    }
    assert!(
        close_wins > 150,
        "distance bias too weak: {close_wins}/200 distance-2 picks"
    );
}

#[test]
fn test_complete_graph_selection_is_degenerate() {
    let mut rng = ChaCha20Rng::seed_from_u64(7);
    let mut g = Graph::complete(6);
    let edges = g.m();

    let err = prestige_step(&mut g, 0, 2.0, &mut rng).unwrap_err();
    assert_eq!(err, PrestigeError::DegenerateSelection);
    assert_eq!(g.m(), edges, "failed step must leave the graph untouched");
    assert!(!g.has_edge(0, 0), "no self-loop may appear");
}
