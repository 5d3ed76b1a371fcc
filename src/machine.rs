use std::collections::{HashMap, HashSet};
use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::IsaError;
use crate::instructions::{Format, OpcodeDesc};

/// Every instruction word is this wide.
pub const WORD_BITS: u32 = 32;

/// Default memory size in words.
pub const MEMORY_WORDS: usize = 256;

/// A contiguous bit range inside an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub shift: u32,
    pub width: u32,
}

impl Field {
    pub const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    /// Right-aligned mask covering `width` bits.
    pub const fn mask(self) -> u32 {
        if self.width >= WORD_BITS {
            u32::MAX
        } else {
            (1u32 << self.width) - 1
        }
    }

    /// Mask of the field's bits at their position in the word.
    pub const fn mask_in_place(self) -> u32 {
        self.mask() << self.shift
    }

    /// Truncates `value` to the field width and moves it into position.
    pub const fn place(self, value: u32) -> u32 {
        (value & self.mask()) << self.shift
    }

    pub const fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.mask()
    }

    /// Reads the field as a two's complement number.
    pub fn extract_signed(self, word: u32) -> i64 {
        let raw = self.extract(word) as i64;
        let sign = 1i64 << (self.width - 1);
        (raw ^ sign) - sign
    }

    pub const fn max_value(self) -> u32 {
        self.mask()
    }

    fn fits_word(self) -> bool {
        self.width >= 1 && self.shift + self.width <= WORD_BITS
    }

    fn overlaps(self, other: Field) -> bool {
        self.mask_in_place() & other.mask_in_place() != 0
    }
}

/// Bit layout shared by all formats of one instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub opcode: Field,
    pub rd: Field,
    pub rs: Field,
    pub rt: Field,
    pub imm: Field,
    /// Branch displacement, patched in by the fixup pass.
    pub disp: Field,
}

impl Layout {
    /// Fields a given format packs besides the opcode.
    pub fn fields(&self, format: Format) -> Vec<(&'static str, Field)> {
        match format {
            Format::Rrr => vec![("rd", self.rd), ("rs", self.rs), ("rt", self.rt)],
            Format::Rr => vec![("rs", self.rs), ("rt", self.rt)],
            Format::Rri => vec![("rd", self.rd), ("rs", self.rs), ("imm", self.imm)],
            Format::Ri => vec![("rs", self.rs), ("imm", self.imm)],
            Format::J => vec![("disp", self.disp)],
            Format::Mem => vec![("rd", self.rd), ("rs", self.rs), ("imm", self.imm)],
            Format::Trap => vec![("imm", self.imm)],
        }
    }

    fn all(&self) -> [(&'static str, Field); 6] {
        [
            ("opcode", self.opcode),
            ("rd", self.rd),
            ("rs", self.rs),
            ("rt", self.rt),
            ("imm", self.imm),
            ("disp", self.disp),
        ]
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsaFeatures: u32 {
const INDEXED_ADDRESSING = 1 << 0; // `offset(rN)` memory operands
}
}

/// Built-in instruction-set variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Variant {
    #[default]
    Basic,
    Extended,
}

/// A complete, parameterized instruction-set description: field layout,
/// source syntax details and the opcode table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionSet {
    pub name: String,
    pub comment: char,
    pub register_prefix: char,
    #[serde(default = "IsaFeatures::empty")]
    pub features: IsaFeatures,
    #[serde(default = "default_memory_words")]
    pub memory_words: usize,
    pub layout: Layout,
    pub opcodes: Vec<OpcodeDesc>,
}

fn default_memory_words() -> usize {
    MEMORY_WORDS
}

impl InstructionSet {
    pub fn basic() -> Self {
        crate::isa::basic::instruction_set()
    }

    pub fn extended() -> Self {
        crate::isa::extended::instruction_set()
    }

    pub fn variant(v: Variant) -> Self {
        match v {
            Variant::Basic => Self::basic(),
            Variant::Extended => Self::extended(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self, IsaError> {
        let isa: Self = serde_json::from_str(text)?;
        isa.validate()?;
        Ok(isa)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, IsaError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn lookup(&self, mnemonic: &str) -> Option<&OpcodeDesc> {
        self.opcodes.iter().find(|d| d.mnemonic == mnemonic)
    }

    pub fn by_opcode(&self, opcode: u32) -> Option<&OpcodeDesc> {
        self.opcodes.iter().find(|d| d.opcode == opcode)
    }

    pub fn indexed_addressing(&self) -> bool {
        self.features.contains(IsaFeatures::INDEXED_ADDRESSING)
    }

    pub fn with_capacity(mut self, memory_words: usize) -> Self {
        self.memory_words = memory_words;
        self
    }

    /// Checks that the description is self-consistent: every field fits the
    /// word, the fields of each used format are disjoint, and opcodes are
    /// unique and representable.
    pub fn validate(&self) -> Result<(), IsaError> {
        if self.memory_words == 0 {
            return Err(IsaError::ZeroCapacity);
        }
        let reserved = |ch: char| matches!(ch, ':' | ',' | '(' | ')' | '-' | '+' | '_') || ch.is_whitespace();
        if reserved(self.comment) || self.comment.is_ascii_alphanumeric() {
            return Err(IsaError::BadMarker {
                what: "comment marker",
                ch: self.comment,
            });
        }
        if !self.register_prefix.is_ascii_alphabetic() {
            return Err(IsaError::BadMarker {
                what: "register prefix",
                ch: self.register_prefix,
            });
        }

        let layout = &self.layout;
        for (name, field) in layout.all() {
            if !field.fits_word() {
                return Err(IsaError::FieldOutOfRange {
                    name,
                    shift: field.shift,
                    width: field.width,
                });
            }
        }
        if layout.opcode.shift + layout.opcode.width != WORD_BITS {
            return Err(IsaError::OpcodeNotLeading);
        }

        let mut mnemonics = HashSet::new();
        let mut opcodes: HashMap<u32, &str> = HashMap::new();
        for desc in &self.opcodes {
            if !mnemonics.insert(desc.mnemonic.as_str()) {
                return Err(IsaError::DuplicateMnemonic(desc.mnemonic.clone()));
            }
            if let Some(first) = opcodes.insert(desc.opcode, &desc.mnemonic) {
                return Err(IsaError::DuplicateOpcode {
                    opcode: desc.opcode,
                    first: first.to_string(),
                    second: desc.mnemonic.clone(),
                });
            }
            if desc.opcode > layout.opcode.max_value() {
                return Err(IsaError::OpcodeTooWide {
                    mnemonic: desc.mnemonic.clone(),
                    opcode: desc.opcode,
                });
            }
            if desc.format == Format::Mem && !self.indexed_addressing() {
                return Err(IsaError::IndexedDisabled(desc.mnemonic.clone()));
            }
        }

        let mut checked = Vec::new();
        for desc in &self.opcodes {
            if checked.contains(&desc.format) {
                continue;
            }
            checked.push(desc.format);
            let mut fields = vec![("opcode", layout.opcode)];
            fields.extend(layout.fields(desc.format));
            for (i, &(first, a)) in fields.iter().enumerate() {
                for &(second, b) in &fields[i + 1..] {
                    if a.overlaps(b) {
                        return Err(IsaError::Overlap {
                            format: desc.format,
                            first,
                            second,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
