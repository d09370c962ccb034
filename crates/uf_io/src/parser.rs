//! Parsers for the text formats accepted on the command line and in files.
//!
//! Lattice sizes are written `LxL` (planar torus) or `LxLxL` (cubic torus).
//! A syndrome is a list of small integers separated by whitespace or commas,
//! in vertex order. Entries other than 0 and 1 are kept so the decoder can
//! report exactly which one is malformed.

use anyhow::{Context, Result, anyhow, bail};
use nom::IResult;
use nom::branch::alt;
use nom::character::complete::{char, digit1, one_of, space0, space1};
use nom::combinator::{all_consuming, map_res, value};
use nom::multi::separated_list1;
use nom::sequence::delimited;
use std::fs;
use std::path::Path;
use uf_common::LatticeSize;

fn number<T: std::str::FromStr>(input: &str) -> IResult<&str, T> {
    map_res(digit1, str::parse)(input)
}

fn extent_list(input: &str) -> IResult<&str, Vec<usize>> {
    separated_list1(one_of("xX"), number)(input)
}

fn separator(input: &str) -> IResult<&str, ()> {
    alt((
        value((), delimited(space0, char(','), space0)),
        value((), space1),
    ))(input)
}

fn entries(input: &str) -> IResult<&str, Vec<u8>> {
    separated_list1(separator, number)(input)
}

/// Parses `LxL` or `LxLxL` into a lattice size.
pub fn parse_lattice_size(text: &str) -> Result<LatticeSize> {
    let (_, extents) = all_consuming(extent_list)(text.trim())
        .map_err(|e| anyhow!("invalid lattice size {text:?}: {e}"))?;
    let size = LatticeSize::from_extents(&extents)
        .with_context(|| format!("lattice size {text:?} needs two or three extents"))?;
    if !size.is_valid() {
        bail!("lattice size {text:?}: every extent must be at least 2");
    }
    Ok(size)
}

/// Parses one syndrome line.
pub fn parse_syndrome(line: &str) -> Result<Vec<u8>> {
    let (_, syndrome) = all_consuming(entries)(line.trim())
        .map_err(|e| anyhow!("invalid syndrome line: {e}"))?;
    Ok(syndrome)
}

/// Reads a syndrome file with one shot per line.
///
/// Blank lines and lines starting with `#` are skipped.
pub fn load_syndrome_file<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<u8>>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read syndrome file {}", path.display()))?;

    let mut shots = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let syndrome = parse_syndrome(trimmed)
            .with_context(|| format!("{}:{}", path.display(), lineno + 1))?;
        shots.push(syndrome);
    }
    Ok(shots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_planar_and_cubic_sizes() {
        assert_eq!(parse_lattice_size("4x5").unwrap(), LatticeSize::planar(4, 5));
        assert_eq!(
            parse_lattice_size(" 3X3x2 ").unwrap(),
            LatticeSize::cubic(3, 3, 2)
        );
    }

    #[test]
    fn rejects_malformed_sizes() {
        for text in ["4", "4x", "4x4x4x4", "1x4", "axb", "4 x 4"] {
            assert!(parse_lattice_size(text).is_err(), "{text}");
        }
    }

    #[test]
    fn syndrome_separators() {
        assert_eq!(parse_syndrome("0 1  1\t0").unwrap(), [0, 1, 1, 0]);
        assert_eq!(parse_syndrome("1,0 , 1").unwrap(), [1, 0, 1]);
        assert_eq!(parse_syndrome("0 2").unwrap(), [0, 2]);
        assert!(parse_syndrome("0 1 x").is_err());
        assert!(parse_syndrome("").is_err());
    }
}
