use anyhow::{bail, Context, Result};
use std::path::Path;

/// A hex memory image as written by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub words: Vec<u32>,
}

impl Image {
    /// Number of words up to and including the last non-zero one.
    pub fn used_len(&self) -> usize {
        self.words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1)
    }
}

/// Parses one hex word per line. Blank lines are skipped; every other line
/// must be a hex number that fits in 32 bits.
pub fn parse_image(text: &str) -> Result<Image> {
    let mut words = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let t = line.trim();
        if t.is_empty() {
            continue;
        }
        match u32::from_str_radix(t, 16) {
            Ok(w) if !t.starts_with('+') => words.push(w),
            _ => bail!("line {}: `{}` is not a hex word", idx + 1, t),
        }
    }
    Ok(Image { words })
}

pub fn load_image(path: &Path) -> Result<Image> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_image(&text)
}
