//! Shared helpers for decoder integration tests.

#![allow(dead_code)]

use rand::Rng;
use rand::rngs::StdRng;
use uf_common::{Coord, LatticeSize};

/// Syndrome with exactly the given vertices flagged.
pub fn syndrome_with(size: LatticeSize, defects: &[Coord]) -> Vec<u8> {
    let mut syndrome = vec![0u8; size.num_vertices()];
    for &d in defects {
        syndrome[size.vertex_index(d)] ^= 1;
    }
    syndrome
}

/// Independent edge flips with probability `p`.
pub fn random_error(size: LatticeSize, p: f64, rng: &mut StdRng) -> Vec<bool> {
    (0..size.num_edges()).map(|_| rng.gen_bool(p)).collect()
}

pub fn weight(syndrome: &[u8]) -> usize {
    syndrome.iter().filter(|&&s| s == 1).count()
}
