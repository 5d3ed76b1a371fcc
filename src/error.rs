use crate::instructions::Format;

/// Failure to encode a single instruction. Carries no position; the
/// assembler attaches the line number when it wraps this in [`AsmError`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unrecognized instruction `{0}'")]
    UnknownInstruction(String),
    #[error("invalid number of operands for {mnemonic}: expected {expected}, found {found}")]
    Arity {
        mnemonic: String,
        expected: usize,
        found: usize,
    },
    #[error("invalid register `{0}'")]
    InvalidRegister(String),
    #[error("invalid immediate `{0}'")]
    InvalidImmediate(String),
    #[error("invalid label `{0}'")]
    InvalidLabel(String),
    #[error("invalid indexed address `{0}'")]
    InvalidIndexedAddress(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("syntax error in line {line}")]
    Syntax { line: usize },
    #[error("in line {line}: {source}")]
    Encode {
        line: usize,
        #[source]
        source: EncodeError,
    },
    #[error("in line {line}: label `{name}' already defined")]
    DuplicateLabel { line: usize, name: String },
    #[error("undefined label `{0}'")]
    UndefinedLabel(String),
    #[error("program needs {words} words but memory holds only {capacity}")]
    ProgramTooLarge { words: usize, capacity: usize },
}

impl AsmError {
    /// The encoding failure behind this error, if any.
    pub fn encode_error(&self) -> Option<&EncodeError> {
        match self {
            AsmError::Encode { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Problems with an instruction-set description, built in or loaded from JSON.
#[derive(thiserror::Error, Debug)]
pub enum IsaError {
    #[error("field `{name}` ({width} bits at bit {shift}) does not fit a 32-bit word")]
    FieldOutOfRange {
        name: &'static str,
        shift: u32,
        width: u32,
    },
    #[error("opcode field must occupy the most significant bits of the word")]
    OpcodeNotLeading,
    #[error("fields `{first}` and `{second}` overlap in {format:?} instructions")]
    Overlap {
        format: Format,
        first: &'static str,
        second: &'static str,
    },
    #[error("opcode {opcode:#x} of `{mnemonic}` does not fit the opcode field")]
    OpcodeTooWide { mnemonic: String, opcode: u32 },
    #[error("duplicate mnemonic `{0}`")]
    DuplicateMnemonic(String),
    #[error("opcode {opcode:#x} is assigned to both `{first}` and `{second}`")]
    DuplicateOpcode {
        opcode: u32,
        first: String,
        second: String,
    },
    #[error("`{0}` uses the MEM format but indexed addressing is disabled")]
    IndexedDisabled(String),
    #[error("memory capacity must be at least one word")]
    ZeroCapacity,
    #[error("{what} {ch:?} clashes with the source syntax")]
    BadMarker { what: &'static str, ch: char },
    #[error("failed to read instruction set: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed instruction set description: {0}")]
    Json(#[from] serde_json::Error),
}
