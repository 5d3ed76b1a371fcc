use crate::instructions::{table, Format};
use crate::machine::{Field, InstructionSet, IsaFeatures, Layout, MEMORY_WORDS};

/// 8-bit opcode, 16 registers, compares, loads/stores with `offset(rN)`
/// addressing, conditional branches and a trap instruction.
///
/// ```text
/// RRR: | opcode:8 | rd:4 | rs:4 | rt:4 |   0:12   |
/// RR:  | opcode:8 |  0:4 | rs:4 | rt:4 |   0:12   |
/// RRI: | opcode:8 | rd:4 | rs:4 |     imm:16      |
/// RI:  | opcode:8 |  0:4 | rs:4 |     imm:16      |
/// MEM: | opcode:8 | rd:4 | rb:4 |    offset:16    |
/// J:   | opcode:8 |     0:8     |     disp:16     |
/// TRAP:| opcode:8 |     0:8     |     imm:16      |
/// ```
pub const LAYOUT: Layout = Layout {
    opcode: Field::new(24, 8),
    rd: Field::new(20, 4),
    rs: Field::new(16, 4),
    rt: Field::new(12, 4),
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
    ("cmp", 0x10, Format::Rr),
    ("cmpi", 0x11, Format::Ri),
    ("ld", 0x18, Format::Mem),
    ("st", 0x19, Format::Mem),
    ("b", 0x20, Format::J),
    ("beq", 0x21, Format::J),
    ("bne", 0x22, Format::J),
    ("blt", 0x23, Format::J),
    ("bge", 0x24, Format::J),
    ("call", 0x25, Format::J),
    ("trap", 0x30, Format::Trap),
];

pub fn instruction_set() -> InstructionSet {
    InstructionSet {
        name: "extended".to_string(),
        comment: ';',
        register_prefix: 'r',
        features: IsaFeatures::INDEXED_ADDRESSING,
        memory_words: MEMORY_WORDS,
        layout: LAYOUT,
        opcodes: table(OPCODES),
    }
}
