use std::collections::BTreeSet;
use std::fmt::Write as _;

use serde::Serialize;
use tiny32_asm::decoder::Decoder;
use tiny32_asm::disasm::{branch_target, fmt_decoded};
use tiny32_asm::InstructionSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub address: usize,
    pub word: u32,
    /// Label generated for this address when some branch lands here.
    pub label: Option<String>,
    pub text: String,
    /// Absolute branch target, for branch instructions.
    pub target: Option<i64>,
}

fn label_for(addr: i64) -> String {
    format!("loc_{addr:04x}")
}

/// Decodes `words` into listing rows. Branch targets inside the listing get
/// a synthetic `loc_XXXX` label.
pub fn listing(isa: &InstructionSet, words: &[u32]) -> Vec<Row> {
    let decoded: Vec<_> = words.iter().map(|&w| isa.decode(w)).collect();

    let targets: BTreeSet<i64> = decoded
        .iter()
        .enumerate()
        .filter_map(|(addr, d)| branch_target(d.as_ref()?, addr))
        .filter(|&t| t >= 0 && (t as usize) < words.len())
        .collect();

    decoded
        .into_iter()
        .zip(words)
        .enumerate()
        .map(|(address, (d, &word))| {
            let (text, target) = match d {
                Some(d) => (fmt_decoded(&d), branch_target(&d, address)),
                None => (format!(".word {word:#010x}"), None),
            };
            Row {
                address,
                word,
                label: targets.contains(&(address as i64)).then(|| label_for(address as i64)),
                text,
                target,
            }
        })
        .collect()
}

pub fn render_text(rows: &[Row]) -> String {
    let mut buf = String::new();
    for row in rows {
        if let Some(lbl) = &row.label {
            let _ = writeln!(buf, "{lbl}:");
        }
        let _ = write!(buf, "  {:04x}: {:08x}  {}", row.address, row.word, row.text);
        if let Some(t) = row.target {
            let _ = write!(buf, "  ; -> {}", label_for(t));
        }
        buf.push('\n');
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_backward_branch_target() {
        let isa = InstructionSet::extended();
        let img = tiny32_asm::assemble(&isa, "loop: addi r1, r1, 1\nb loop\n").unwrap();
        let rows = listing(&isa, img.words());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label.as_deref(), Some("loc_0000"));
        assert_eq!(rows[0].text, "addi r1, r1, 1");
        assert_eq!(rows[1].text, "b -2");
        assert_eq!(rows[1].target, Some(0));
        assert_eq!(
            render_text(&rows),
            "loc_0000:\n  0000: 08110001  addi r1, r1, 1\n  0001: 2000fffe  b -2  ; -> loc_0000\n"
        );
    }

    #[test]
    fn undecodable_words_fall_back_to_data() {
        let isa = InstructionSet::basic();
        let rows = listing(&isa, &[0xffff_ffff]);
        assert_eq!(rows[0].text, ".word 0xffffffff");
        assert_eq!(rows[0].target, None);
    }
}
