//! Correction operators in per-qubit and binary-symplectic form.
//!
//! The decoder reports a correction as one flip flag per edge qubit. Callers
//! that track full Pauli operators convert it into a [`SymplecticOperator`],
//! which keeps separate X and Z registers packed into u64 words.

use crate::bit_utils::BitPack;
use alloc::vec;
use alloc::vec::Vec;

/// Per-qubit flip flags produced by peeling.
///
/// Indexed in the lattice's qubit order. A set bit means the correction acts
/// on that qubit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    flips: Vec<u64>,
    num_qubits: usize,
}

impl Correction {
    /// All-identity correction on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            flips: vec![0; BitPack::words_for(num_qubits)],
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Toggles the flag of qubit `q`.
    pub fn flip(&mut self, q: usize) {
        BitPack::toggle(&mut self.flips, q);
    }

    pub fn is_flipped(&self, q: usize) -> bool {
        BitPack::get(&self.flips, q)
    }

    /// Number of flipped qubits.
    pub fn weight(&self) -> usize {
        BitPack::count_ones(&self.flips)
    }

    pub fn is_trivial(&self) -> bool {
        self.flips.iter().all(|&w| w == 0)
    }

    /// Indices of flipped qubits in ascending order.
    pub fn flipped(&self) -> impl Iterator<Item = usize> + '_ {
        BitPack::iter_ones(&self.flips)
    }

    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.num_qubits).map(|q| self.is_flipped(q)).collect()
    }

    /// One byte per qubit, 0 or 1.
    pub fn to_bits(&self) -> Vec<u8> {
        (0..self.num_qubits).map(|q| self.is_flipped(q) as u8).collect()
    }

    /// Lifts the correction onto one Pauli axis.
    ///
    /// Vertex checks detect a single error type, so the correction lives
    /// entirely in the X or the Z register.
    pub fn to_symplectic(&self, axis: PauliAxis) -> SymplecticOperator {
        let mut op = SymplecticOperator::identity(self.num_qubits);
        match axis {
            PauliAxis::X => op.x_register.copy_from_slice(&self.flips),
            PauliAxis::Z => op.z_register.copy_from_slice(&self.flips),
        }
        op
    }
}

/// Pauli type a correction acts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauliAxis {
    X,
    Z,
}

/// Multi-qubit Pauli operator in binary-symplectic form.
///
/// Maintains two bit vectors (X and Z registers) where each bit indicates
/// whether the corresponding qubit carries an X or Z component. A qubit with
/// both bits set carries a Y.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymplecticOperator {
    /// Bit vector of X components, packed as u64 words.
    x_register: Vec<u64>,

    /// Bit vector of Z components, packed as u64 words.
    z_register: Vec<u64>,

    num_qubits: usize,
}

impl SymplecticOperator {
    /// The identity on `num_qubits` qubits.
    pub fn identity(num_qubits: usize) -> Self {
        let words = BitPack::words_for(num_qubits);
        Self {
            x_register: vec![0; words],
            z_register: vec![0; words],
            num_qubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Multiplies an X onto qubit `q`, ignoring global phase.
    pub fn apply_x(&mut self, q: usize) {
        BitPack::toggle(&mut self.x_register, q);
    }

    /// Multiplies a Z onto qubit `q`, ignoring global phase.
    pub fn apply_z(&mut self, q: usize) {
        BitPack::toggle(&mut self.z_register, q);
    }

    pub fn has_x(&self, q: usize) -> bool {
        BitPack::get(&self.x_register, q)
    }

    pub fn has_z(&self, q: usize) -> bool {
        BitPack::get(&self.z_register, q)
    }

    /// Product with `other`, ignoring global phase.
    ///
    /// # Panics
    ///
    /// If the operators act on different numbers of qubits.
    pub fn compose(&self, other: &SymplecticOperator) -> SymplecticOperator {
        assert_eq!(self.num_qubits, other.num_qubits);
        let xor = |a: &[u64], b: &[u64]| -> Vec<u64> {
            a.iter().zip(b).map(|(x, y)| x ^ y).collect()
        };
        SymplecticOperator {
            x_register: xor(&self.x_register, &other.x_register),
            z_register: xor(&self.z_register, &other.z_register),
            num_qubits: self.num_qubits,
        }
    }

    /// Flattens to `2n` bits: the X part followed by the Z part.
    pub fn to_bits(&self) -> Vec<u8> {
        let x = (0..self.num_qubits).map(|q| self.has_x(q) as u8);
        let z = (0..self.num_qubits).map(|q| self.has_z(q) as u8);
        x.chain(z).collect()
    }
}
