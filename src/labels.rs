use std::collections::HashMap;

use tracing::debug;

use crate::error::AsmError;
use crate::machine::Field;

/// A branch waiting for its target address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRef {
    pub label: String,
    /// Word address of the placeholder to patch.
    pub address: usize,
}

/// Label name -> word address, filled during the scan pass.
#[derive(Debug, Default)]
pub struct LabelTable {
    addrs: HashMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str, address: usize, line: usize) -> Result<(), AsmError> {
        if self.addrs.contains_key(name) {
            return Err(AsmError::DuplicateLabel {
                line,
                name: name.to_string(),
            });
        }
        debug!(label = name, address, line, "label defined");
        self.addrs.insert(name.to_string(), address);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.addrs.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }
}

/// Displacement from the word after `from` to `target`.
pub fn displacement(target: usize, from: usize) -> i64 {
    target as i64 - (from as i64 + 1)
}

/// Resolves every pending reference in recorded order and patches the
/// displacement into the placeholder word. The displacement bits are
/// cleared before the merge so the result never depends on what the
/// placeholder carried there.
pub fn fixup(
    words: &mut [u32],
    pending: Vec<PendingRef>,
    labels: &LabelTable,
    disp: Field,
) -> Result<(), AsmError> {
    for PendingRef { label, address } in pending {
        let target = labels
            .get(&label)
            .ok_or_else(|| AsmError::UndefinedLabel(label.clone()))?;
        let offset = displacement(target, address);
        let word = &mut words[address];
        *word = (*word & !disp.mask_in_place()) | disp.place(offset as u32);
        debug!(label = %label, address, target, offset, "patched branch");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DISP: Field = Field::new(0, 16);

    #[test]
    fn backward_and_forward_displacements() {
        assert_eq!(displacement(0, 1), -2);
        assert_eq!(displacement(3, 2), 0);
        assert_eq!(displacement(10, 2), 7);
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let mut labels = LabelTable::new();
        labels.define("top", 0, 1).unwrap();
        assert_eq!(
            labels.define("top", 5, 9),
            Err(AsmError::DuplicateLabel {
                line: 9,
                name: "top".to_string()
            })
        );
        assert_eq!(labels.get("top"), Some(0));
        assert_eq!(labels.len(), 1);
        assert!(!labels.is_empty());
    }

    #[test]
    fn fixup_patches_in_order_and_clears_stale_bits() {
        let mut labels = LabelTable::new();
        labels.define("a", 0, 1).unwrap();
        labels.define("b", 3, 4).unwrap();
        let mut words = vec![0, 0x4000_0000, 0x4000_ffff, 0];
        let pending = vec![
            PendingRef { label: "a".into(), address: 1 },
            PendingRef { label: "b".into(), address: 2 },
        ];
        fixup(&mut words, pending, &labels, DISP).unwrap();
        assert_eq!(words[1], 0x4000_fffe);
        assert_eq!(words[2], 0x4000_0000);
    }

    #[test]
    fn fixup_reports_first_undefined_label() {
        let labels = LabelTable::new();
        let mut words = vec![0; 2];
        let pending = vec![
            PendingRef { label: "nowhere".into(), address: 0 },
            PendingRef { label: "elsewhere".into(), address: 1 },
        ];
        assert_eq!(
            fixup(&mut words, pending, &labels, DISP),
            Err(AsmError::UndefinedLabel("nowhere".to_string()))
        );
    }
}
