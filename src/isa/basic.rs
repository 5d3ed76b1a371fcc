use crate::instructions::{table, Format};
use crate::machine::{Field, InstructionSet, IsaFeatures, Layout, MEMORY_WORDS};

/// 6-bit opcode, 32 registers, 16-bit immediates and displacements.
///
/// ```text
/// RRR: | opcode:6 | rd:5 | rs:5 | rt:5 |     0:11    |
/// RRI: | opcode:6 | rd:5 | rs:5 |      imm:16        |
/// J:   | opcode:6 |     0:10    |      disp:16       |
/// ```
pub const LAYOUT: Layout = Layout {
    opcode: Field::new(26, 6),
    rd: Field::new(21, 5),
    rs: Field::new(16, 5),
    rt: Field::new(11, 5),
    imm: Field::new(0, 16),
    disp: Field::new(0, 16),
};

pub const OPCODES: &[(&str, u32, Format)] = &[
    ("add", 0x00, Format::Rrr),
    ("sub", 0x01, Format::Rrr),
    ("and", 0x02, Format::Rrr),
    ("or", 0x03, Format::Rrr),
    ("xor", 0x04, Format::Rrr),
    ("nand", 0x05, Format::Rrr),
    ("shl", 0x06, Format::Rrr),
    ("shr", 0x07, Format::Rrr),
    ("addi", 0x08, Format::Rri),
    ("subi", 0x09, Format::Rri),
    ("andi", 0x0a, Format::Rri),
    ("ori", 0x0b, Format::Rri),
    ("xori", 0x0c, Format::Rri),
    ("nandi", 0x0d, Format::Rri),
    ("shli", 0x0e, Format::Rri),
    ("shri", 0x0f, Format::Rri),
    ("j", 0x10, Format::J),
];

pub fn instruction_set() -> InstructionSet {
    InstructionSet {
        name: "basic".to_string(),
        comment: '#',
        register_prefix: 'r',
        features: IsaFeatures::empty(),
        memory_words: MEMORY_WORDS,
        layout: LAYOUT,
        opcodes: table(OPCODES),
    }
}
