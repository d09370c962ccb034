//! Union-find cluster-growth decoder for periodic stabilizer lattices.
//!
//! This crate turns the vertex syndrome of a toric-style code into a
//! syndrome-consistent correction. Defects seed clusters, odd clusters grow
//! one half-edge at a time and fuse on contact, and once every cluster holds
//! an even number of defects the spanning forest is peeled into a set of
//! edges to flip. All modules are `no_std` and allocate through `alloc` only,
//! so they run unchanged inside a batch driver or an embedded host.

#![no_std]

extern crate alloc;

use uf_common::Coord;

/// Bit manipulation utilities for packed qubit and syndrome vectors.
///
/// Stores one flag per bit in u64 words. Used by the correction and
/// binary-symplectic types to keep per-shot output compact.
pub mod bit_utils;

/// Cluster records and their growth, boundary, and merge operations.
///
/// A cluster owns the bookkeeping the decoder needs (size, parity, boundary
/// frontier, bridging edges) while membership itself is answered by the
/// node forest.
pub mod cluster;

/// Correction output and binary-symplectic conversion.
///
/// Holds the per-qubit flip flags produced by peeling and converts them to
/// the packed X/Z representation used by stabilizer simulators.
pub mod correction;

/// Growth engine and the top-level decoder facade.
///
/// Drives the smallest odd cluster until every cluster is even, applies the
/// resulting fusions, and hands the converged forest to the peeling stage.
pub mod decoder;

/// Arena of cluster nodes with union-find root queries.
///
/// Nodes are addressed by [`dsu::NodeId`]; parent and child relations are
/// plain indices into the arena, so the forest never forms ownership cycles.
pub mod dsu;

/// Leaf-inward extraction of a correction from converged clusters.
pub mod peeling;

/// Per-call growth status of every edge and vertex on the lattice.
///
/// Owns the status grids and edge endpoint records for a single decode call.
/// Nothing in it outlives the call.
pub mod state;

/// Error type returned by decoding operations.
///
/// Input validation failures are reported before any growth starts. An
/// unresolvable parity is an expected outcome for malformed syndromes and
/// should be counted by the caller. The remaining variants are invariant
/// violations in the growth bookkeeping and are never recoverable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The lattice has fewer than two vertices along some axis, or a
    /// dimension other than 2 or 3.
    InvalidLatticeSize,

    /// The syndrome does not have one entry per vertex stabilizer.
    InvalidSyndromeLength { expected: usize, actual: usize },

    /// A syndrome entry is neither 0 nor 1.
    NonBinaryEntry { index: usize, value: u8 },

    /// Growth covered the whole lattice while a cluster was still odd.
    ///
    /// Happens when the syndrome has odd total weight: no set of edges on a
    /// closed surface can produce it.
    UnresolvableParity,

    /// An edge reported as grown is missing one of its recorded endpoints.
    DetachedEdgeAccess { edge: Coord },

    /// A forest root has no live cluster record.
    MissingCluster { root: Coord },
}

impl DecodeError {
    /// True for bookkeeping failures that indicate a decoder defect rather
    /// than bad input.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            DecodeError::DetachedEdgeAccess { .. } | DecodeError::MissingCluster { .. }
        )
    }
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::InvalidLatticeSize => {
                write!(f, "lattice needs 2 or 3 axes with at least 2 vertices each")
            }
            DecodeError::InvalidSyndromeLength { expected, actual } => {
                write!(f, "syndrome has {actual} entries, lattice has {expected} stabilizers")
            }
            DecodeError::NonBinaryEntry { index, value } => {
                write!(f, "syndrome entry {index} is {value}, expected 0 or 1")
            }
            DecodeError::UnresolvableParity => {
                write!(f, "growth exhausted the lattice with an odd cluster remaining")
            }
            DecodeError::DetachedEdgeAccess { edge } => {
                write!(f, "edge {edge} was grown without two recorded endpoints")
            }
            DecodeError::MissingCluster { root } => {
                write!(f, "no live cluster is registered for root {root}")
            }
        }
    }
}

impl core::error::Error for DecodeError {}

pub use correction::{Correction, PauliAxis, SymplecticOperator};
pub use decoder::{GrowthEngine, Phase, UnionFindDecoder};
pub use uf_common::LatticeSize;
