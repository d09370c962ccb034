//! Invariants that must hold after every growth step.

mod common;

use common::random_error;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uf_common::LatticeSize;
use uf_core::GrowthEngine;
use uf_core::Phase;
use uf_core::state::{EdgeStatus, VertexStatus};

fn edge_snapshot(engine: &GrowthEngine) -> Vec<EdgeStatus> {
    let size = engine.lattice().size();
    (0..size.num_edges())
        .map(|q| engine.lattice().edge_status(size.edge_at(q)))
        .collect()
}

fn random_engine(size: LatticeSize, seed: u64) -> GrowthEngine {
    let mut rng = StdRng::seed_from_u64(seed);
    let error = random_error(size, 0.1, &mut rng);
    GrowthEngine::new(size, &size.syndrome_of(&error)).unwrap()
}

fn check_forest(engine: &GrowthEngine) {
    let forest = engine.forest();
    let lattice = engine.lattice();

    for (key, cluster) in engine.clusters() {
        assert_eq!(forest.coord(cluster.root()), *key);
        assert_eq!(forest.root_of(cluster.root()), cluster.root());
        for bridge in cluster.bridges() {
            assert_eq!(forest.root_of(bridge.fst), cluster.root());
            assert_eq!(forest.root_of(bridge.snd), cluster.root());
        }
    }

    for id in forest.ids() {
        let coord = forest.coord(id);
        assert_eq!(lattice.owner(coord), Some(id));
        assert_ne!(lattice.vertex_status(coord), VertexStatus::Dark);

        let root = forest.root_of(id);
        let cluster = &engine.clusters()[&forest.coord(root)];
        assert_eq!(cluster.boundary().contains(&id), lattice.is_boundary(coord));

        if let Some(link) = forest.node(id).growth() {
            assert_eq!(forest.root_of(link.towards), root);
            assert_eq!(lattice.edge_status(link.edge), EdgeStatus::Grown);
        }
    }

    let absorbed: usize = engine.clusters().values().map(|c| c.size()).sum();
    assert_eq!(absorbed, forest.len());
}

#[test]
fn edge_statuses_never_move_backwards() {
    for seed in 0..10 {
        let mut engine = random_engine(LatticeSize::planar(6, 7), seed);
        let mut before = edge_snapshot(&engine);
        while engine.step().unwrap() == Phase::HasOddClusters {
            let after = edge_snapshot(&engine);
            assert!(before.iter().zip(&after).all(|(b, a)| b <= a));
            before = after;
        }
    }
}

#[test]
fn forest_and_boundaries_stay_consistent() {
    for seed in 0..10 {
        let mut engine = random_engine(LatticeSize::cubic(3, 4, 3), seed);
        check_forest(&engine);
        while engine.step().unwrap() == Phase::HasOddClusters {
            check_forest(&engine);
        }
        check_forest(&engine);
    }
}

#[test]
fn converged_engine_has_only_even_clusters() {
    for seed in 20..30 {
        let mut engine = random_engine(LatticeSize::planar(8, 8), seed);
        engine.run().unwrap();
        assert_eq!(engine.phase(), Phase::Converged);
        assert!(engine.clusters().values().all(|c| !c.is_odd()));
    }
}

#[test]
fn decoding_twice_gives_the_same_correction() {
    let size = LatticeSize::planar(7, 7);
    for seed in 0..5 {
        let mut first = random_engine(size, seed);
        let mut second = random_engine(size, seed);
        first.run().unwrap();
        second.run().unwrap();
        assert_eq!(first.steps(), second.steps());
        assert_eq!(first.peel().unwrap(), second.peel().unwrap());
    }
}
