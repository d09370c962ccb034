//! Peeling: turning converged clusters into a correction.
//!
//! Each even cluster carries a spanning tree made of the edges its vertices
//! were absorbed through plus one bridging fusion edge per union. Peeling
//! removes leaves from that tree one at a time. A leaf that still owes a
//! defect pushes it to its neighbour by flipping the edge between them; a
//! leaf that owes nothing is just dropped. When only one vertex is left the
//! whole cluster has been paired up, because it held an even number of
//! defects.

use crate::DecodeError;
use crate::correction::Correction;
use crate::dsu::{ClusterForest, NodeId};
use crate::state::{ClusterIndex, LatticeState};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::vec;
use alloc::vec::Vec;
use log::trace;
use uf_common::Coord;

struct SpanningForest {
    adjacency: Vec<Vec<(NodeId, Coord)>>,
    degree: Vec<usize>,
    removed: Vec<bool>,
    pending: Vec<bool>,
}

impl SpanningForest {
    fn build(lattice: &LatticeState, forest: &ClusterForest, clusters: &ClusterIndex) -> Self {
        let mut adjacency = vec![Vec::new(); forest.len()];
        let mut link = |a: NodeId, b: NodeId, edge: Coord| {
            adjacency[a.index()].push((b, edge));
            adjacency[b.index()].push((a, edge));
        };
        for id in forest.ids() {
            if let Some(growth) = forest.node(id).growth() {
                link(id, growth.towards, growth.edge);
            }
        }
        for cluster in clusters.values() {
            for bridge in cluster.bridges() {
                link(bridge.fst, bridge.snd, bridge.edge);
            }
        }

        let degree = adjacency.iter().map(Vec::len).collect();
        let pending = forest
            .ids()
            .map(|id| lattice.is_defect(forest.coord(id)))
            .collect();
        Self {
            adjacency,
            degree,
            removed: vec![false; forest.len()],
            pending,
        }
    }

    /// Peels one tree, flipping the selected edges in `correction`.
    fn peel_tree(
        &mut self,
        lattice: &LatticeState,
        members: &[NodeId],
        correction: &mut Correction,
    ) -> Result<(), DecodeError> {
        let mut leaves: VecDeque<NodeId> = members
            .iter()
            .copied()
            .filter(|v| self.degree[v.index()] <= 1)
            .collect();

        while let Some(leaf) = leaves.pop_front() {
            if self.removed[leaf.index()] {
                continue;
            }
            self.removed[leaf.index()] = true;

            let next = self.adjacency[leaf.index()]
                .iter()
                .find(|(nb, _)| !self.removed[nb.index()])
                .copied();
            let Some((next, edge)) = next else {
                // Last vertex of the tree; an even cluster leaves nothing owed.
                debug_assert!(!self.pending[leaf.index()]);
                continue;
            };

            if self.pending[leaf.index()] {
                let q = lattice
                    .size()
                    .edge_index(edge)
                    .ok_or(DecodeError::DetachedEdgeAccess { edge })?;
                correction.flip(q);
                self.pending[next.index()] ^= true;
            }
            self.degree[next.index()] -= 1;
            if self.degree[next.index()] == 1 {
                leaves.push_back(next);
            }
        }
        Ok(())
    }
}

/// Extracts the correction from a converged cluster set.
///
/// # Arguments
///
/// * `lattice` - Final status grids, used to look up defects and qubit indices
/// * `forest` - Node arena built during growth
/// * `clusters` - Live clusters, all of which must be even
///
/// # Returns
///
/// One flip flag per qubit whose syndrome equals the seeded defects, or
/// `UnresolvableParity` if an odd cluster is still present.
pub fn peel(
    lattice: &LatticeState,
    forest: &mut ClusterForest,
    clusters: &ClusterIndex,
) -> Result<Correction, DecodeError> {
    if clusters.values().any(|c| c.is_odd()) {
        return Err(DecodeError::UnresolvableParity);
    }

    let mut members: BTreeMap<NodeId, Vec<NodeId>> = BTreeMap::new();
    for id in forest.ids() {
        members.entry(forest.find_root(id)).or_default().push(id);
    }

    let mut spanning = SpanningForest::build(lattice, forest, clusters);
    let mut correction = Correction::new(lattice.size().num_edges());

    for (key, cluster) in clusters {
        let nodes = members
            .get(&cluster.root())
            .ok_or(DecodeError::MissingCluster { root: *key })?;
        spanning.peel_tree(lattice, nodes, &mut correction)?;
        trace!("peeled cluster at {} ({} vertices)", key, nodes.len());
    }

    Ok(correction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::GrowthEngine;
    use uf_common::LatticeSize;

    fn engine_with(size: LatticeSize, defects: &[Coord]) -> GrowthEngine {
        let mut syndrome = vec![0u8; size.num_vertices()];
        for &d in defects {
            syndrome[size.vertex_index(d)] = 1;
        }
        GrowthEngine::new(size, &syndrome).unwrap()
    }

    #[test]
    fn refuses_odd_clusters() {
        let size = LatticeSize::planar(3, 3);
        let mut engine = engine_with(size, &[Coord::new2(0, 0)]);
        assert_eq!(engine.peel(), Err(DecodeError::UnresolvableParity));
    }

    #[test]
    fn straight_pair_flips_the_path_between_them() {
        let size = LatticeSize::planar(6, 6);
        let a = Coord::new2(2, 2);
        let b = Coord::new2(2, 6);
        let mut engine = engine_with(size, &[a, b]);
        engine.run().unwrap();
        let correction = engine.peel().unwrap();

        let expected: Vec<usize> = [Coord::new2(2, 3), Coord::new2(2, 5)]
            .iter()
            .map(|&e| size.edge_index(e).unwrap())
            .collect();
        assert_eq!(correction.flipped().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn each_tree_matches_its_own_defects() {
        let size = LatticeSize::planar(8, 8);
        let defects = [
            Coord::new2(0, 0),
            Coord::new2(0, 2),
            Coord::new2(8, 8),
            Coord::new2(10, 8),
        ];
        let mut engine = engine_with(size, &defects);
        engine.run().unwrap();
        let correction = engine.peel().unwrap();

        assert_eq!(correction.weight(), 2);
        let syndrome = size.syndrome_of(&correction.to_bools());
        for v in size.vertices() {
            assert_eq!(syndrome[size.vertex_index(v)] == 1, defects.contains(&v));
        }
    }
}
