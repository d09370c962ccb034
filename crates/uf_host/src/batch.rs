use crate::stats::{BatchStats, ShotOutcome};
use anyhow::{Context, Result};
use log::{error, info};
use rayon::prelude::*;
use std::time::Instant;
use uf_common::LatticeSize;
use uf_core::{DecodeError, UnionFindDecoder};
use uf_io::loader;

/// Decodes one shot and checks the correction against its syndrome.
pub fn decode_shot(decoder: &UnionFindDecoder, syndrome: &[u8]) -> ShotOutcome {
    match decoder.decode(syndrome) {
        Ok(correction) => {
            let size = decoder.size();
            if size.syndrome_of(&correction.to_bools()) == syndrome {
                ShotOutcome::Converged {
                    weight: correction.weight(),
                }
            } else {
                ShotOutcome::Inconsistent
            }
        }
        Err(DecodeError::UnresolvableParity) => ShotOutcome::Unresolvable,
        Err(e) => {
            error!("decoder failure: {e}");
            ShotOutcome::Failed
        }
    }
}

pub fn run_batch(size: LatticeSize, b8_path: &str, threads: Option<usize>) -> Result<()> {
    if let Some(n) = threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .context("Failed to configure thread pool")?;
    }
    let decoder = UnionFindDecoder::new(size)?;

    info!("loading shots from {}", b8_path);
    let start_load = Instant::now();
    let raw_bits = loader::load_b8_file(b8_path)?;
    let shots = loader::slice_shots(&raw_bits, size.num_vertices())?;
    info!("loaded {} shots in {:?}", shots.len(), start_load.elapsed());

    let start = Instant::now();
    let stats = shots
        .par_iter()
        .map(|shot| decode_shot(&decoder, shot))
        .fold(BatchStats::default, BatchStats::record)
        .reduce(BatchStats::default, BatchStats::merge);

    stats.print_report(start.elapsed());
    Ok(())
}
