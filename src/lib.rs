pub mod assembler;
pub mod decoder;
pub mod disasm;
pub mod encoder;
pub mod error;
pub mod image;
pub mod instructions;
pub mod labels;
pub mod machine;
pub mod parser;

pub mod isa {
    pub mod basic; // 6-bit opcodes, `#` comments
    pub mod extended; // 8-bit opcodes, `;` comments, indexed addressing
}

pub use assembler::{assemble, Assembler};
pub use decoder::Decoder;
pub use error::{AsmError, EncodeError, IsaError};
pub use image::MemoryImage;
pub use machine::{InstructionSet, Variant};
