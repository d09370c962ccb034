//! I/O utilities for syndrome and correction data.
//!
//! Reads packed shot files (.b8) and plain-text syndrome files, parses
//! lattice-size strings given on the command line, and formats corrections
//! for output. Nothing here knows about cluster growth; the host crate
//! wires these readers to the decoder.

/// File loading utilities for packed measurement data.
///
/// Reads Stim-style .b8 files into a bit vector and slices them into
/// per-shot syndromes, one byte per vertex.
pub mod loader;

/// Text parsers for lattice sizes and syndromes.
///
/// Built on `nom`. Accepts `LxL` or `LxLxL` sizes and whitespace- or
/// comma-separated syndrome entries, one shot per line.
pub mod parser;

/// Formatting of correction output.
pub mod writer;
