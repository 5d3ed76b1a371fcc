use serde::{Deserialize, Serialize};

/// Shape of an instruction's non-opcode fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Format {
    /// rd, rs, rt
    Rrr,
    /// rs, rt (compare)
    Rr,
    /// rd, rs, imm
    Rri,
    /// rs, imm (compare-immediate)
    Ri,
    /// label, patched with a PC-relative displacement
    J,
    /// rd, offset(base)
    Mem,
    /// imm
    Trap,
}

/// What a single operand slot expects to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Register,
    Immediate,
    Label,
    Indexed,
}

impl Format {
    pub const fn operands(self) -> &'static [OperandKind] {
        use OperandKind::*;
        match self {
            Format::Rrr => &[Register, Register, Register],
            Format::Rr => &[Register, Register],
            Format::Rri => &[Register, Register, Immediate],
            Format::Ri => &[Register, Immediate],
            Format::J => &[Label],
            Format::Mem => &[Register, Indexed],
            Format::Trap => &[Immediate],
        }
    }

    pub const fn arity(self) -> usize {
        self.operands().len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpcodeDesc {
    pub mnemonic: String,
    pub opcode: u32,
    pub format: Format,
}

impl OpcodeDesc {
    pub fn new(mnemonic: &str, opcode: u32, format: Format) -> Self {
        Self {
            mnemonic: mnemonic.to_string(),
            opcode,
            format,
        }
    }
}

/// Builds an owned opcode table from a static `(mnemonic, opcode, format)` listing.
pub fn table(entries: &[(&str, u32, Format)]) -> Vec<OpcodeDesc> {
    entries
        .iter()
        .map(|&(mnemonic, opcode, format)| OpcodeDesc::new(mnemonic, opcode, format))
        .collect()
}
