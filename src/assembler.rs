use tracing::{info, trace};

use crate::encoder::encode;
use crate::error::AsmError;
use crate::image::MemoryImage;
use crate::labels::{fixup, LabelTable, PendingRef};
use crate::machine::InstructionSet;
use crate::parser::parse_line;

/// State of a single assembly run. `assemble` consumes it, so label
/// bindings and pending references cannot carry over into another run.
#[derive(Debug)]
pub struct Assembler<'isa> {
    isa: &'isa InstructionSet,
    labels: LabelTable,
    pending: Vec<PendingRef>,
    words: Vec<u32>,
}

impl<'isa> Assembler<'isa> {
    pub fn new(isa: &'isa InstructionSet) -> Self {
        Self {
            isa,
            labels: LabelTable::new(),
            pending: Vec::new(),
            words: Vec::new(),
        }
    }

    /// Scans `source` line by line, then resolves branch targets.
    /// The first error aborts the run.
    pub fn assemble(mut self, source: &str) -> Result<MemoryImage, AsmError> {
        for (idx, text) in source.lines().enumerate() {
            self.line(text, idx + 1)?;
        }

        let Self {
            isa,
            labels,
            pending,
            mut words,
        } = self;
        let refs = pending.len();
        fixup(&mut words, pending, &labels, isa.layout.disp)?;
        info!(
            isa = %isa.name,
            words = words.len(),
            labels = labels.len(),
            branches = refs,
            "assembled"
        );
        MemoryImage::new(words, isa.memory_words)
    }

    fn line(&mut self, text: &str, line_no: usize) -> Result<(), AsmError> {
        let line = parse_line(text, line_no, self.isa)?;
        if let Some(label) = line.label {
            self.labels.define(label, self.words.len(), line_no)?;
        }
        if let Some(stmt) = line.statement {
            let address = self.words.len();
            let encoded = encode(self.isa, stmt.mnemonic, &stmt.operands, address)
                .map_err(|source| AsmError::Encode { line: line_no, source })?;
            trace!(line = line_no, address, word = encoded.word, mnemonic = stmt.mnemonic, "encoded");
            self.words.push(encoded.word);
            self.pending.extend(encoded.pending);
        }
        Ok(())
    }
}

/// Assembles `source` for `isa` in one call.
pub fn assemble(isa: &InstructionSet, source: &str) -> Result<MemoryImage, AsmError> {
    Assembler::new(isa).assemble(source)
}
