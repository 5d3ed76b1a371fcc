use serde::{Deserialize, Serialize};

use crate::instructions::Format;
use crate::machine::{Field, InstructionSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodedOperand {
    Register(u32),
    Immediate(i64),
    /// Branch offset relative to the following word.
    Displacement(i64),
    Indexed { offset: i64, base: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub mnemonic: String,
    pub opcode: u32,
    pub format: Format,
    pub register_prefix: char,
    pub operands: Vec<DecodedOperand>,
}

pub trait Decoder {
    fn decode(&self, raw: u32) -> Option<Decoded>;
}

impl Decoder for InstructionSet {
    /// Reverses the encoder. Immediates, offsets and displacements come back
    /// sign-extended. Words with an unknown opcode, or with bits set outside
    /// the fields of their format, do not decode.
    fn decode(&self, raw: u32) -> Option<Decoded> {
        let l = &self.layout;
        let desc = self.by_opcode(l.opcode.extract(raw))?;

        let used = l
            .fields(desc.format)
            .iter()
            .fold(l.opcode.mask_in_place(), |acc, (_, f)| acc | f.mask_in_place());
        if raw & !used != 0 {
            return None;
        }

        use DecodedOperand::*;
        let reg = |f: Field| Register(f.extract(raw));
        let operands = match desc.format {
            Format::Rrr => vec![reg(l.rd), reg(l.rs), reg(l.rt)],
            Format::Rr => vec![reg(l.rs), reg(l.rt)],
            Format::Rri => vec![reg(l.rd), reg(l.rs), Immediate(l.imm.extract_signed(raw))],
            Format::Ri => vec![reg(l.rs), Immediate(l.imm.extract_signed(raw))],
            Format::J => vec![Displacement(l.disp.extract_signed(raw))],
            Format::Mem => vec![
                reg(l.rd),
                Indexed {
                    offset: l.imm.extract_signed(raw),
                    base: l.rs.extract(raw),
                },
            ],
            Format::Trap => vec![Immediate(l.imm.extract_signed(raw))],
        };

        Some(Decoded {
            mnemonic: desc.mnemonic.clone(),
            opcode: desc.opcode,
            format: desc.format,
            register_prefix: self.register_prefix,
            operands,
        })
    }
}
