use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AsmError;
use crate::machine::WORD_BITS;

/// Hex digits per line of the text image.
pub const HEX_DIGITS: usize = (WORD_BITS / 4) as usize;

/// The assembled program padded out to a fixed number of words.
/// Immutable once built; deserializing goes through [`MemoryImage::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawImage")]
pub struct MemoryImage {
    words: Vec<u32>,
    capacity: usize,
}

#[derive(Deserialize)]
struct RawImage {
    words: Vec<u32>,
    capacity: usize,
}

impl TryFrom<RawImage> for MemoryImage {
    type Error = AsmError;

    fn try_from(raw: RawImage) -> Result<Self, Self::Error> {
        Self::new(raw.words, raw.capacity)
    }
}

impl MemoryImage {
    pub fn new(words: Vec<u32>, capacity: usize) -> Result<Self, AsmError> {
        if words.len() > capacity {
            return Err(AsmError::ProgramTooLarge {
                words: words.len(),
                capacity,
            });
        }
        Ok(Self { words, capacity })
    }

    /// Words emitted by the program, without padding.
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All `capacity` words, program first, zeros after.
    pub fn padded(&self) -> impl Iterator<Item = u32> + '_ {
        self.words
            .iter()
            .copied()
            .chain(std::iter::repeat(0))
            .take(self.capacity)
    }

    /// One lowercase, zero-padded hex word per line; exactly `capacity` lines.
    pub fn write_hex<W: Write>(&self, mut out: W) -> io::Result<()> {
        for word in self.padded() {
            writeln!(out, "{word:0width$x}", width = HEX_DIGITS)?;
        }
        out.flush()
    }

    pub fn to_hex_string(&self) -> String {
        let mut buf = Vec::with_capacity(self.capacity * (HEX_DIGITS + 1));
        // writing into a Vec cannot fail
        let _ = self.write_hex(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn write_to_path(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_hex(BufWriter::new(file))
    }
}
