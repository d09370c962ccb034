//! Growth status of every site on the lattice for one decode call.
//!
//! Edges move monotonically through UNOCCUPIED, HALF_GROWN and GROWN.
//! Vertices start DARK or SYNDROME and turn ACTIVE when growth absorbs them.
//! Each edge additionally remembers the node that first claimed it and, once
//! grown, the node at its other end; fusion processing reads both.

use crate::DecodeError;
use crate::cluster::Cluster;
use crate::dsu::{ClusterForest, NodeId};
use alloc::collections::BTreeMap;
use alloc::vec;
use alloc::vec::Vec;
use uf_common::{Coord, IncidentEdges, LatticeSize};

/// Growth status of an edge (qubit site).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EdgeStatus {
    Unoccupied,
    HalfGrown,
    Grown,
}

/// Status of a vertex (stabilizer site).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexStatus {
    Dark,
    Active,
    Syndrome,
}

/// An edge that turned GROWN with both endpoints already inside clusters.
///
/// `fst` is the node that claimed the edge first and `snd` the node at the
/// other end. The two may share a root; the growth engine filters those out
/// before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FusionEdge {
    pub edge: Coord,
    pub fst: NodeId,
    pub snd: NodeId,
}

/// Outcome of pushing growth across one edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEvent {
    /// UNOCCUPIED to HALF_GROWN.
    Claimed,
    /// HALF_GROWN to GROWN by the claiming vertex, reaching a vertex no
    /// cluster owns yet. `defect` reports whether that vertex is a syndrome.
    Discovered { far: Coord, defect: bool },
    /// HALF_GROWN to GROWN between two vertices that already have nodes.
    Fusion(FusionEdge),
    /// The edge was already GROWN.
    Saturated,
}

#[derive(Debug, Clone, Copy, Default)]
struct EdgeEnds {
    fst: Option<NodeId>,
    snd: Option<NodeId>,
}

/// Live clusters keyed by the coordinate of their root vertex.
pub type ClusterIndex = BTreeMap<Coord, Cluster>;

/// Status grids and edge endpoint records for one decode call.
#[derive(Debug, Clone)]
pub struct LatticeState {
    size: LatticeSize,
    edges: Vec<EdgeStatus>,
    ends: Vec<EdgeEnds>,
    vertices: Vec<VertexStatus>,
    owners: Vec<Option<NodeId>>,
    grown: usize,
}

impl LatticeState {
    /// Creates an all-DARK, all-UNOCCUPIED lattice.
    pub fn new(size: LatticeSize) -> Self {
        let num_edges = size.num_edges();
        let num_vertices = size.num_vertices();
        Self {
            size,
            edges: vec![EdgeStatus::Unoccupied; num_edges],
            ends: vec![EdgeEnds::default(); num_edges],
            vertices: vec![VertexStatus::Dark; num_vertices],
            owners: vec![None; num_vertices],
            grown: 0,
        }
    }

    /// Validates `syndrome` and seeds one singleton cluster per defect.
    ///
    /// Every flagged stabilizer becomes a SYNDROME vertex with its own node
    /// in a fresh forest and an odd cluster of size one in the index.
    ///
    /// # Arguments
    ///
    /// * `size` - Shape of the periodic lattice
    /// * `syndrome` - One entry per vertex stabilizer, in vertex order
    ///
    /// # Returns
    ///
    /// The seeded state, its node forest and the live-cluster index, or a
    /// validation error if the syndrome has the wrong length or an entry
    /// other than 0 or 1.
    pub fn initialize(
        size: LatticeSize,
        syndrome: &[u8],
    ) -> Result<(Self, ClusterForest, ClusterIndex), DecodeError> {
        if !size.is_valid() {
            return Err(DecodeError::InvalidLatticeSize);
        }
        if syndrome.len() != size.num_vertices() {
            return Err(DecodeError::InvalidSyndromeLength {
                expected: size.num_vertices(),
                actual: syndrome.len(),
            });
        }
        if let Some((index, &value)) = syndrome.iter().enumerate().find(|(_, s)| **s > 1) {
            return Err(DecodeError::NonBinaryEntry { index, value });
        }

        let mut state = Self::new(size);
        let defects = syndrome.iter().filter(|&&s| s == 1).count();
        let mut forest = ClusterForest::with_capacity(defects);
        let mut clusters = ClusterIndex::new();

        for (index, _) in syndrome.iter().enumerate().filter(|(_, s)| **s == 1) {
            let coord = size.vertex_at(index);
            let node = forest.spawn(coord);
            state.vertices[index] = VertexStatus::Syndrome;
            state.owners[index] = Some(node);
            clusters.insert(coord, Cluster::seed(node));
        }

        Ok((state, forest, clusters))
    }

    pub fn size(&self) -> LatticeSize {
        self.size
    }

    pub fn incident_edges(&self, vertex: Coord) -> IncidentEdges {
        self.size.incident_edges(vertex)
    }

    pub fn edge_status(&self, edge: Coord) -> EdgeStatus {
        self.edges[self.edge_slot(edge)]
    }

    pub fn vertex_status(&self, vertex: Coord) -> VertexStatus {
        self.vertices[self.size.vertex_index(vertex)]
    }

    /// Node that owns `vertex`, if any cluster has reached it.
    pub fn owner(&self, vertex: Coord) -> Option<NodeId> {
        self.owners[self.size.vertex_index(vertex)]
    }

    pub fn is_defect(&self, vertex: Coord) -> bool {
        self.vertex_status(vertex) == VertexStatus::Syndrome
    }

    /// True while `vertex` has at least one incident edge that is not GROWN.
    pub fn is_boundary(&self, vertex: Coord) -> bool {
        self.incident_edges(vertex)
            .as_slice()
            .iter()
            .any(|&e| self.edge_status(e) != EdgeStatus::Grown)
    }

    /// Number of GROWN edges.
    pub fn grown_edges(&self) -> usize {
        self.grown
    }

    /// True once every edge on the lattice is GROWN.
    pub fn is_exhausted(&self) -> bool {
        self.grown == self.edges.len()
    }

    /// Pushes growth from `from` across `edge`.
    ///
    /// A first touch claims the edge for `from`. A second touch grows it:
    /// if `from` is the claimant and the far vertex has no node yet, the
    /// caller is told to absorb it; otherwise both ends are recorded and a
    /// fusion edge is returned.
    ///
    /// # Arguments
    ///
    /// * `edge` - Edge incident to the growing vertex
    /// * `from` - Node of the growing vertex
    /// * `from_coord` - Lattice coordinate of `from`
    ///
    /// # Returns
    ///
    /// The resulting [`EdgeEvent`], or `DetachedEdgeAccess` if a half-grown
    /// edge has no recorded claimant.
    pub fn advance_edge(
        &mut self,
        edge: Coord,
        from: NodeId,
        from_coord: Coord,
    ) -> Result<EdgeEvent, DecodeError> {
        let slot = self.edge_slot(edge);
        match self.edges[slot] {
            EdgeStatus::Unoccupied => {
                self.edges[slot] = EdgeStatus::HalfGrown;
                self.ends[slot] = EdgeEnds {
                    fst: Some(from),
                    snd: None,
                };
                Ok(EdgeEvent::Claimed)
            }
            EdgeStatus::HalfGrown => {
                let fst = self.ends[slot]
                    .fst
                    .ok_or(DecodeError::DetachedEdgeAccess { edge })?;
                self.edges[slot] = EdgeStatus::Grown;
                self.grown += 1;

                let far = self.size.other_endpoint(edge, from_coord);
                if fst != from {
                    self.ends[slot].snd = Some(from);
                    return Ok(EdgeEvent::Fusion(FusionEdge {
                        edge,
                        fst,
                        snd: from,
                    }));
                }
                match self.owner(far) {
                    Some(snd) => {
                        self.ends[slot].snd = Some(snd);
                        Ok(EdgeEvent::Fusion(FusionEdge { edge, fst, snd }))
                    }
                    None => Ok(EdgeEvent::Discovered {
                        far,
                        defect: self.is_defect(far),
                    }),
                }
            }
            EdgeStatus::Grown => Ok(EdgeEvent::Saturated),
        }
    }

    /// Marks `vertex` as owned by `node`, reached through `edge`.
    pub fn absorb(&mut self, edge: Coord, vertex: Coord, node: NodeId) {
        let index = self.size.vertex_index(vertex);
        if self.vertices[index] == VertexStatus::Dark {
            self.vertices[index] = VertexStatus::Active;
        }
        self.owners[index] = Some(node);
        let slot = self.edge_slot(edge);
        self.ends[slot].snd = Some(node);
    }

    /// Both recorded endpoints of a grown edge.
    pub fn fusion_ends(&self, edge: Coord) -> Result<(NodeId, NodeId), DecodeError> {
        let ends = self.ends[self.edge_slot(edge)];
        match (ends.fst, ends.snd) {
            (Some(fst), Some(snd)) => Ok((fst, snd)),
            _ => Err(DecodeError::DetachedEdgeAccess { edge }),
        }
    }

    #[inline(always)]
    fn edge_slot(&self, edge: Coord) -> usize {
        // Callers only pass coordinates produced by the adjacency oracle.
        self.size.edge_index(edge).unwrap_or(usize::MAX)
    }
}
