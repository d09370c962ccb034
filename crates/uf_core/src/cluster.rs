//! Cluster records: growth, boundary maintenance, and union by size.

use crate::DecodeError;
use crate::dsu::{ClusterForest, GrowthLink, NodeId};
use crate::state::{EdgeEvent, FusionEdge, LatticeState};
use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use core::cmp::Ordering;

/// A growable region of the lattice.
///
/// The cluster is identified by its root node. It tracks how many vertices
/// it has absorbed, whether it holds an odd number of defects, which of its
/// vertices can still grow, and the fusion edges that joined it to other
/// clusters. Those bridges plus the growth links of its nodes form the
/// spanning tree peeling walks.
#[derive(Debug, Clone)]
pub struct Cluster {
    root: NodeId,
    size: usize,
    odd: bool,
    boundary: BTreeSet<NodeId>,
    bridges: Vec<FusionEdge>,
}

impl Cluster {
    /// Singleton cluster around one defect.
    pub fn seed(root: NodeId) -> Self {
        let mut boundary = BTreeSet::new();
        boundary.insert(root);
        Self {
            root,
            size: 1,
            odd: true,
            boundary,
            bridges: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of vertices absorbed so far, including seeded defects.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_odd(&self) -> bool {
        self.odd
    }

    pub fn boundary(&self) -> &BTreeSet<NodeId> {
        &self.boundary
    }

    /// Fusion edges that joined this cluster's sub-trees.
    pub fn bridges(&self) -> &[FusionEdge] {
        &self.bridges
    }

    /// Grows every boundary vertex by one half-edge in each direction.
    ///
    /// Unoccupied edges become half-grown. Half-grown edges become grown:
    /// a dark far vertex is absorbed as a child of the growing vertex and
    /// joins the boundary, while a far vertex that already has a node yields
    /// a fusion edge. Fusions are only reported here; unions happen after the
    /// whole step so that no status is observed mid-merge.
    ///
    /// # Arguments
    ///
    /// * `lattice` - Status grids for the current decode call
    /// * `forest` - Node arena receiving absorbed vertices
    ///
    /// # Returns
    ///
    /// Every fusion edge produced by this step, in boundary order.
    pub fn grow(
        &mut self,
        lattice: &mut LatticeState,
        forest: &mut ClusterForest,
    ) -> Result<Vec<FusionEdge>, DecodeError> {
        let mut fusions = Vec::new();
        let mut discovered = Vec::new();
        let frontier: Vec<NodeId> = self.boundary.iter().copied().collect();

        for vertex in frontier {
            let coord = forest.coord(vertex);
            let edges = lattice.incident_edges(coord);
            for &edge in &edges {
                match lattice.advance_edge(edge, vertex, coord)? {
                    EdgeEvent::Claimed | EdgeEvent::Saturated => {}
                    EdgeEvent::Discovered { far, defect } => {
                        let child = forest.spawn(far);
                        forest.attach(vertex, child);
                        forest.record_growth(
                            child,
                            GrowthLink {
                                towards: vertex,
                                edge,
                            },
                        );
                        lattice.absorb(edge, far, child);
                        self.size += 1;
                        if defect {
                            self.odd = !self.odd;
                        }
                        discovered.push(child);
                    }
                    EdgeEvent::Fusion(fusion) => fusions.push(fusion),
                }
            }
        }

        self.boundary.extend(discovered);
        Ok(fusions)
    }

    /// Drops boundary vertices whose incident edges are all grown.
    pub fn update_boundary(&mut self, lattice: &LatticeState, forest: &ClusterForest) {
        self.boundary.retain(|&v| lattice.is_boundary(forest.coord(v)));
    }

    /// Orders two clusters for union by size.
    ///
    /// The larger cluster absorbs the smaller one. Equal sizes are broken by
    /// the lattice coordinate of the roots: the lexicographically smaller
    /// root survives.
    pub fn absorbs(&self, other: &Cluster, forest: &ClusterForest) -> bool {
        match self.size.cmp(&other.size) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => forest.coord(self.root) < forest.coord(other.root),
        }
    }

    /// Absorbs `other` into this cluster through `bridge`.
    ///
    /// Attaches the other root under this root, adds sizes, XORs parities,
    /// and unions the boundaries. The caller is responsible for removing
    /// `other` from the live-cluster index.
    pub fn merge(&mut self, other: Cluster, bridge: FusionEdge, forest: &mut ClusterForest) {
        forest.attach(self.root, other.root);
        self.size += other.size;
        self.odd ^= other.odd;
        self.boundary.extend(other.boundary);
        self.bridges.extend(other.bridges);
        self.bridges.push(bridge);
    }
}
