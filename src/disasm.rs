use crate::decoder::{Decoded, DecodedOperand};

fn fmt_operand(op: &DecodedOperand, prefix: char) -> String {
    match *op {
        DecodedOperand::Register(r) => format!("{prefix}{r}"),
        DecodedOperand::Immediate(v) => v.to_string(),
        DecodedOperand::Displacement(d) => format!("{d:+}"),
        DecodedOperand::Indexed { offset: 0, base } => format!("({prefix}{base})"),
        DecodedOperand::Indexed { offset, base } => format!("{offset}({prefix}{base})"),
    }
}

/// Renders a decoded word back into source syntax, e.g. `ld r1, -4(r2)`.
/// Branch targets print as signed displacements (`b -2`).
pub fn fmt_decoded(d: &Decoded) -> String {
    let ops: Vec<String> = d
        .operands
        .iter()
        .map(|op| fmt_operand(op, d.register_prefix))
        .collect();
    if ops.is_empty() {
        d.mnemonic.clone()
    } else {
        format!("{} {}", d.mnemonic, ops.join(", "))
    }
}

/// Absolute target of a branch at word `address`, if `d` is one.
pub fn branch_target(d: &Decoded, address: usize) -> Option<i64> {
    d.operands.iter().find_map(|op| match op {
        DecodedOperand::Displacement(disp) => Some(address as i64 + 1 + disp),
        _ => None,
    })
}
