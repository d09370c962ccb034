use anyhow::{Context, Result, bail};
use bitvec::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads a Stim .b8 file (binary measurement data).
pub fn load_b8_file<P: AsRef<Path>>(path: P) -> Result<BitVec<u8, Lsb0>> {
    let path = path.as_ref();
    let mut file =
        File::open(path).with_context(|| format!("Failed to open .b8 file {}", path.display()))?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    // Stim packs each shot little-endian within a byte
    Ok(BitVec::<u8, Lsb0>::from_vec(buffer))
}

/// Splits packed bits into per-shot syndromes.
///
/// Every shot occupies a whole number of bytes; the padding bits after the
/// last vertex are dropped. Returns one 0/1 byte per vertex so the result
/// feeds straight into the decoder.
pub fn slice_shots(raw_bits: &BitVec<u8, Lsb0>, bits_per_shot: usize) -> Result<Vec<Vec<u8>>> {
    if bits_per_shot == 0 {
        bail!("shots must contain at least one syndrome bit");
    }
    let bytes_per_shot = bits_per_shot.div_ceil(8);
    let stride_bits = bytes_per_shot * 8;
    if raw_bits.len() % stride_bits != 0 {
        bail!(
            "{} bytes of shot data is not a multiple of the {}-byte shot size",
            raw_bits.len() / 8,
            bytes_per_shot
        );
    }

    let shots = raw_bits
        .chunks(stride_bits)
        .map(|shot| shot[..bits_per_shot].iter().map(|b| *b as u8).collect())
        .collect();
    Ok(shots)
}
