use crate::DecodeError;
use crate::cluster::Cluster;
use crate::correction::Correction;
use crate::dsu::ClusterForest;
use crate::peeling;
use crate::state::{ClusterIndex, FusionEdge, LatticeState};
use alloc::vec::Vec;
use log::{debug, trace, warn};
use uf_common::{Coord, LatticeSize};

/// Sink for the qubit flips a decode produces.
pub trait CorrectionBuffer {
    fn push_flip(&mut self, qubit: usize);
    fn clear_buffer(&mut self);
}

impl CorrectionBuffer for Vec<usize> {
    fn push_flip(&mut self, qubit: usize) {
        self.push(qubit);
    }
    fn clear_buffer(&mut self) {
        self.clear();
    }
}

impl CorrectionBuffer for Correction {
    fn push_flip(&mut self, qubit: usize) {
        self.flip(qubit);
    }
    fn clear_buffer(&mut self) {
        *self = Correction::new(self.num_qubits());
    }
}

/// Convergence state of the growth engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    HasOddClusters,
    Converged,
}

/// Grows odd clusters until every cluster holds an even number of defects.
///
/// Owns all per-call state: the lattice status grids, the node arena, and the
/// live-cluster index keyed by root coordinate. Each [`GrowthEngine::step`]
/// grows one cluster by a half-edge, so the engine can be driven and
/// inspected one step at a time.
#[derive(Debug)]
pub struct GrowthEngine {
    lattice: LatticeState,
    forest: ClusterForest,
    clusters: ClusterIndex,
    steps: usize,
    merges: usize,
}

impl GrowthEngine {
    /// Validates the syndrome and seeds one cluster per defect.
    pub fn new(size: LatticeSize, syndrome: &[u8]) -> Result<Self, DecodeError> {
        let (lattice, forest, clusters) = LatticeState::initialize(size, syndrome)?;
        Ok(Self {
            lattice,
            forest,
            clusters,
            steps: 0,
            merges: 0,
        })
    }

    pub fn lattice(&self) -> &LatticeState {
        &self.lattice
    }

    pub fn forest(&self) -> &ClusterForest {
        &self.forest
    }

    /// Live clusters keyed by root coordinate.
    pub fn clusters(&self) -> &ClusterIndex {
        &self.clusters
    }

    /// Number of growth steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of unions applied so far.
    pub fn merges(&self) -> usize {
        self.merges
    }

    pub fn phase(&self) -> Phase {
        if self.clusters.values().any(Cluster::is_odd) {
            Phase::HasOddClusters
        } else {
            Phase::Converged
        }
    }

    /// Key of the odd cluster to grow next: smallest size, then smallest
    /// root coordinate.
    fn smallest_odd(&self) -> Option<Coord> {
        self.clusters
            .iter()
            .filter(|(_, c)| c.is_odd())
            .min_by_key(|(key, c)| (c.size(), **key))
            .map(|(key, _)| *key)
    }

    /// Runs one growth step.
    ///
    /// Grows the smallest odd cluster, applies every fusion it produced, and
    /// refreshes the boundary of the resulting cluster. Calling this on a
    /// converged engine changes nothing.
    ///
    /// # Returns
    ///
    /// The phase after the step, or `UnresolvableParity` when the cluster to
    /// grow has no boundary left, which means it already spans the lattice.
    pub fn step(&mut self) -> Result<Phase, DecodeError> {
        let Some(key) = self.smallest_odd() else {
            return Ok(Phase::Converged);
        };
        let mut cluster = self
            .clusters
            .remove(&key)
            .ok_or(DecodeError::MissingCluster { root: key })?;

        if cluster.boundary().is_empty() {
            warn!(
                "odd cluster at {} covers the lattice ({} of {} edges grown)",
                key,
                self.lattice.grown_edges(),
                self.lattice.size().num_edges()
            );
            self.clusters.insert(key, cluster);
            return Err(DecodeError::UnresolvableParity);
        }

        trace!("step {}: growing cluster at {} (size {})", self.steps, key, cluster.size());
        let fusions = cluster.grow(&mut self.lattice, &mut self.forest)?;
        let grown_root = cluster.root();
        self.clusters.insert(key, cluster);
        self.steps += 1;

        for fusion in fusions {
            self.fuse(fusion)?;
        }

        let root = self.forest.find_root(grown_root);
        let root_key = self.forest.coord(root);
        let cluster = self
            .clusters
            .get_mut(&root_key)
            .ok_or(DecodeError::MissingCluster { root: root_key })?;
        cluster.update_boundary(&self.lattice, &self.forest);

        Ok(self.phase())
    }

    /// Applies one fusion edge, merging the two clusters if they differ.
    fn fuse(&mut self, fusion: FusionEdge) -> Result<(), DecodeError> {
        let a = self.forest.find_root(fusion.fst);
        let b = self.forest.find_root(fusion.snd);
        if a == b {
            return Ok(());
        }

        let key_a = self.forest.coord(a);
        let key_b = self.forest.coord(b);
        let first = self
            .clusters
            .remove(&key_a)
            .ok_or(DecodeError::MissingCluster { root: key_a })?;
        let second = self
            .clusters
            .remove(&key_b)
            .ok_or(DecodeError::MissingCluster { root: key_b })?;

        let (mut winner, loser, key) = if first.absorbs(&second, &self.forest) {
            (first, second, key_a)
        } else {
            (second, first, key_b)
        };
        trace!(
            "fusing over {}: cluster at {} absorbs {} vertices",
            fusion.edge,
            key,
            loser.size()
        );
        winner.merge(loser, fusion, &mut self.forest);
        self.clusters.insert(key, winner);
        self.merges += 1;
        Ok(())
    }

    /// Steps until no odd cluster remains.
    pub fn run(&mut self) -> Result<(), DecodeError> {
        while self.step()? == Phase::HasOddClusters {}
        Ok(())
    }

    /// Extracts the correction from the converged clusters.
    pub fn peel(&mut self) -> Result<Correction, DecodeError> {
        peeling::peel(&self.lattice, &mut self.forest, &self.clusters)
    }
}

/// Union-find decoder for one periodic lattice.
///
/// Holds only the lattice shape; every decode call builds its own
/// [`GrowthEngine`], so one decoder can be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct UnionFindDecoder {
    size: LatticeSize,
}

impl UnionFindDecoder {
    /// Creates a decoder, rejecting degenerate lattices up front.
    pub fn new(size: LatticeSize) -> Result<Self, DecodeError> {
        if !size.is_valid() {
            return Err(DecodeError::InvalidLatticeSize);
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> LatticeSize {
        self.size
    }

    /// Number of qubits a correction covers.
    pub fn num_qubits(&self) -> usize {
        self.size.num_edges()
    }

    /// Decodes `syndrome` into a correction.
    ///
    /// # Arguments
    ///
    /// * `syndrome` - One 0/1 entry per vertex stabilizer, in vertex order
    ///
    /// # Returns
    ///
    /// A correction whose syndrome equals `syndrome`, or a [`DecodeError`]
    /// for malformed input or an odd-weight syndrome.
    pub fn decode(&self, syndrome: &[u8]) -> Result<Correction, DecodeError> {
        let mut correction = Correction::new(self.num_qubits());
        self.solve_into(syndrome, &mut correction)?;
        Ok(correction)
    }

    /// Decodes `syndrome` and writes the flipped qubits into `out_buffer`.
    ///
    /// The buffer is cleared first, so it holds nothing from a previous
    /// call even when decoding fails.
    pub fn solve_into<CB: CorrectionBuffer>(
        &self,
        syndrome: &[u8],
        out_buffer: &mut CB,
    ) -> Result<(), DecodeError> {
        out_buffer.clear_buffer();

        let mut engine = GrowthEngine::new(self.size, syndrome)?;
        let defects = engine.clusters().len();
        engine.run()?;
        let correction = engine.peel()?;

        debug!(
            "decoded {} defects in {} steps ({} merges), correction weight {}",
            defects,
            engine.steps(),
            engine.merges(),
            correction.weight()
        );
        for q in correction.flipped() {
            out_buffer.push_flip(q);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::EdgeStatus;
    use alloc::vec;

    fn syndrome_with(size: LatticeSize, defects: &[Coord]) -> Vec<u8> {
        let mut syndrome = vec![0u8; size.num_vertices()];
        for &d in defects {
            syndrome[size.vertex_index(d)] = 1;
        }
        syndrome
    }

    #[test]
    fn adjacent_pair_fuses_across_one_edge() {
        let size = LatticeSize::planar(4, 4);
        let a = Coord::new2(2, 2);
        let b = Coord::new2(4, 2);
        let mut engine = GrowthEngine::new(size, &syndrome_with(size, &[a, b])).unwrap();

        assert_eq!(engine.step(), Ok(Phase::HasOddClusters));
        assert_eq!(engine.lattice().edge_status(Coord::new2(3, 2)), EdgeStatus::HalfGrown);
        assert_eq!(engine.step(), Ok(Phase::Converged));
        assert_eq!(engine.merges(), 1);
        assert_eq!(engine.clusters().len(), 1);

        let correction = engine.peel().unwrap();
        let connecting = size.edge_index(Coord::new2(3, 2)).unwrap();
        assert_eq!(correction.flipped().collect::<Vec<_>>(), [connecting]);
    }

    #[test]
    fn smallest_odd_prefers_lower_root_on_ties() {
        let size = LatticeSize::planar(6, 6);
        let defects = [Coord::new2(6, 6), Coord::new2(0, 0), Coord::new2(0, 6)];
        let engine = GrowthEngine::new(size, &syndrome_with(size, &defects)).unwrap();
        assert_eq!(engine.smallest_odd(), Some(Coord::new2(0, 0)));
    }

    #[test]
    fn converged_engine_is_left_untouched() {
        let size = LatticeSize::planar(5, 5);
        let defects = [Coord::new2(0, 0), Coord::new2(4, 4)];
        let mut engine = GrowthEngine::new(size, &syndrome_with(size, &defects)).unwrap();
        engine.run().unwrap();

        let steps = engine.steps();
        let grown = engine.lattice().grown_edges();
        let nodes = engine.forest().len();
        assert_eq!(engine.step(), Ok(Phase::Converged));
        engine.run().unwrap();
        assert_eq!(engine.steps(), steps);
        assert_eq!(engine.lattice().grown_edges(), grown);
        assert_eq!(engine.forest().len(), nodes);
    }

    #[test]
    fn lone_defect_exhausts_the_torus() {
        let size = LatticeSize::planar(3, 3);
        let mut engine =
            GrowthEngine::new(size, &syndrome_with(size, &[Coord::new2(2, 2)])).unwrap();
        assert_eq!(engine.run(), Err(DecodeError::UnresolvableParity));
        assert!(engine.lattice().is_exhausted());
        assert_eq!(engine.forest().len(), size.num_vertices());
    }

    #[test]
    fn solve_into_clears_the_buffer() {
        let size = LatticeSize::planar(4, 4);
        let decoder = UnionFindDecoder::new(size).unwrap();
        let mut flips = vec![1usize, 2, 3];
        decoder
            .solve_into(&vec![0u8; size.num_vertices()], &mut flips)
            .unwrap();
        assert!(flips.is_empty());

        let defects = [Coord::new2(0, 0), Coord::new2(0, 2)];
        decoder
            .solve_into(&syndrome_with(size, &defects), &mut flips)
            .unwrap();
        assert_eq!(flips, [size.edge_index(Coord::new2(0, 1)).unwrap()]);
    }

    #[test]
    fn rejects_degenerate_lattice() {
        assert_eq!(
            UnionFindDecoder::new(LatticeSize::cubic(2, 1, 2)).err(),
            Some(DecodeError::InvalidLatticeSize)
        );
    }
}
