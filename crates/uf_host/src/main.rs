mod batch;
mod stats;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{LevelFilter, info};
use simple_logger::SimpleLogger;
use std::io::{self, Write};
use uf_common::LatticeSize;
use uf_core::{PauliAxis, UnionFindDecoder};
use uf_io::{parser, writer};

#[derive(Parser)]
#[command(name = "uf-host", about = "Union-find decoding of periodic lattice syndromes")]
struct Cli {
    /// Repeat to raise log verbosity (info, debug, trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    X,
    Z,
}

impl From<Axis> for PauliAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::X => PauliAxis::X,
            Axis::Z => PauliAxis::Z,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Decode syndromes given inline or in a text file.
    Decode {
        #[arg(short, long, value_parser = parser::parse_lattice_size)]
        size: LatticeSize,
        #[arg(long, conflicts_with = "file")]
        syndrome: Option<String>,
        #[arg(short, long)]
        file: Option<String>,
        /// Print the 2n-bit symplectic form with the correction on this axis.
        #[arg(long, value_enum)]
        axis: Option<Axis>,
    },
    /// Decode every shot of a .b8 file in parallel.
    Run {
        #[arg(short, long, value_parser = parser::parse_lattice_size)]
        size: LatticeSize,
        #[arg(short, long)]
        b8: String,
        #[arg(short, long)]
        threads: Option<usize>,
    },
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    SimpleLogger::new()
        .with_level(level)
        .init()
        .context("Failed to install logger")
}

fn decode_text(
    size: LatticeSize,
    syndrome: Option<String>,
    file: Option<String>,
    axis: Option<Axis>,
) -> Result<()> {
    let shots = match (syndrome, file) {
        (Some(line), None) => vec![parser::parse_syndrome(&line)?],
        (None, Some(path)) => parser::load_syndrome_file(&path)?,
        _ => bail!("pass exactly one of --syndrome or --file"),
    };
    info!(
        "decoding {} shot(s) on a {}D lattice with {} qubits",
        shots.len(),
        size.dim(),
        size.num_edges()
    );

    let decoder = UnionFindDecoder::new(size)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (i, syndrome) in shots.iter().enumerate() {
        let correction = decoder
            .decode(syndrome)
            .with_context(|| format!("shot {i}"))?;
        let bits = match axis {
            Some(axis) => correction.to_symplectic(axis.into()).to_bits(),
            None => correction.to_bits(),
        };
        writer::write_bits(&mut out, &bits)?;
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Decode {
            size,
            syndrome,
            file,
            axis,
        } => decode_text(size, syndrome, file, axis)?,
        Commands::Run { size, b8, threads } => batch::run_batch(size, &b8, threads)?,
    }
    Ok(())
}
