use anyhow::Result;
use std::io::Write;

/// Formats 0/1 entries as one space-separated line.
pub fn format_bits(bits: &[u8]) -> String {
    let mut line = String::with_capacity(bits.len() * 2);
    for (i, b) in bits.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push(char::from(b'0' + b));
    }
    line
}

/// Writes one correction per line.
pub fn write_bits<W: Write>(out: &mut W, bits: &[u8]) -> Result<()> {
    writeln!(out, "{}", format_bits(bits))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_the_syndrome_input() {
        assert_eq!(format_bits(&[0, 1, 1]), "0 1 1");
        assert_eq!(format_bits(&[]), "");

        let mut out = Vec::new();
        write_bits(&mut out, &[1, 0]).unwrap();
        assert_eq!(out, b"1 0\n");
    }
}
