use crate::error::EncodeError;
use crate::instructions::{Format, OperandKind};
use crate::labels::PendingRef;
use crate::machine::{Field, InstructionSet};
use crate::parser::{is_identifier, RawOperand};

/// An operand after it has been checked against its expected kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Register(u32),
    Immediate(i64),
    Label(String),
    Indexed { offset: i64, base: u32 },
}

/// Result of encoding one instruction. Branches come back with an
/// opcode-only word and the reference the fixup pass must patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub word: u32,
    pub pending: Option<PendingRef>,
}

/// `r<digits>`; the index must fit the register field it is packed into.
pub fn parse_register(token: &str, prefix: char, field: Field) -> Option<u32> {
    let digits = token.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse::<u32>().ok()?;
    (index <= field.max_value()).then_some(index)
}

/// Signed integer literal. A trailing `h` selects base 16, a trailing `b`
/// base 2, anything else is decimal. Literals wider than 64 bits wrap; only
/// the low bits survive packing anyway.
pub fn parse_immediate(token: &str) -> Option<i64> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let (digits, radix) = if let Some(d) = body.strip_suffix('h') {
        (d, 16)
    } else if let Some(d) = body.strip_suffix('b') {
        (d, 2)
    } else {
        (body, 10)
    };
    if digits.is_empty() {
        return None;
    }
    let mut magnitude = 0u64;
    for c in digits.chars() {
        let d = c.to_digit(radix)?;
        magnitude = magnitude
            .wrapping_mul(u64::from(radix))
            .wrapping_add(u64::from(d));
    }
    let value = magnitude as i64;
    Some(if negative { value.wrapping_neg() } else { value })
}

fn parse_operand(
    isa: &InstructionSet,
    kind: OperandKind,
    raw: &RawOperand<'_>,
    field: Field,
) -> Result<Operand, EncodeError> {
    let prefix = isa.register_prefix;
    match (kind, *raw) {
        (OperandKind::Register, RawOperand::Plain(tok)) => parse_register(tok, prefix, field)
            .map(Operand::Register)
            .ok_or_else(|| EncodeError::InvalidRegister(tok.to_string())),
        (OperandKind::Immediate, RawOperand::Plain(tok)) => parse_immediate(tok)
            .map(Operand::Immediate)
            .ok_or_else(|| EncodeError::InvalidImmediate(tok.to_string())),
        (OperandKind::Label, RawOperand::Plain(tok)) if is_identifier(tok) => {
            Ok(Operand::Label(tok.to_string()))
        }
        (OperandKind::Indexed, RawOperand::Indexed { offset, base }) => {
            let offset = match offset {
                Some(tok) => parse_immediate(tok),
                None => Some(0),
            };
            let base = parse_register(base, prefix, isa.layout.rs);
            match (offset, base) {
                (Some(offset), Some(base)) => Ok(Operand::Indexed { offset, base }),
                _ => Err(EncodeError::InvalidIndexedAddress(raw.to_string())),
            }
        }
        (OperandKind::Register, _) => Err(EncodeError::InvalidRegister(raw.to_string())),
        (OperandKind::Immediate, _) => Err(EncodeError::InvalidImmediate(raw.to_string())),
        (OperandKind::Label, _) => Err(EncodeError::InvalidLabel(raw.to_string())),
        (OperandKind::Indexed, _) => Err(EncodeError::InvalidIndexedAddress(raw.to_string())),
    }
}

/// Two's complement truncation happens in [`Field::place`].
fn imm(field: Field, value: i64) -> u32 {
    field.place(value as u32)
}

/// Encodes one instruction found at word `address`. Every operand is
/// parsed before any bits are packed.
pub fn encode(
    isa: &InstructionSet,
    mnemonic: &str,
    operands: &[RawOperand<'_>],
    address: usize,
) -> Result<Encoded, EncodeError> {
    let desc = isa
        .lookup(mnemonic)
        .ok_or_else(|| EncodeError::UnknownInstruction(mnemonic.to_string()))?;
    let kinds = desc.format.operands();
    if operands.len() != kinds.len() {
        return Err(EncodeError::Arity {
            mnemonic: mnemonic.to_string(),
            expected: kinds.len(),
            found: operands.len(),
        });
    }

    let l = &isa.layout;
    let slots = l.fields(desc.format);
    let parsed = kinds
        .iter()
        .zip(operands)
        .zip(&slots)
        .map(|((&kind, raw), &(_, field))| parse_operand(isa, kind, raw, field))
        .collect::<Result<Vec<_>, _>>()?;

    use Operand::*;
    let mut pending = None;
    let fields = match (desc.format, parsed.as_slice()) {
        (Format::Rrr, [Register(rd), Register(rs), Register(rt)]) => {
            l.rd.place(*rd) | l.rs.place(*rs) | l.rt.place(*rt)
        }
        (Format::Rr, [Register(rs), Register(rt)]) => l.rs.place(*rs) | l.rt.place(*rt),
        (Format::Rri, [Register(rd), Register(rs), Immediate(v)]) => {
            l.rd.place(*rd) | l.rs.place(*rs) | imm(l.imm, *v)
        }
        (Format::Ri, [Register(rs), Immediate(v)]) => l.rs.place(*rs) | imm(l.imm, *v),
        (Format::J, [Label(name)]) => {
            pending = Some(PendingRef {
                label: name.clone(),
                address,
            });
            0
        }
        (Format::Mem, [Register(rd), Indexed { offset, base }]) => {
            l.rd.place(*rd) | l.rs.place(*base) | imm(l.imm, *offset)
        }
        (Format::Trap, [Immediate(v)]) => imm(l.imm, *v),
        (format, ops) => unreachable!("{format:?} operands parsed as {ops:?}"),
    };

    Ok(Encoded {
        word: l.opcode.place(desc.opcode) | fields,
        pending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_suffixes() {
        assert_eq!(parse_immediate("42"), Some(42));
        assert_eq!(parse_immediate("-42"), Some(-42));
        assert_eq!(parse_immediate("+7"), Some(7));
        assert_eq!(parse_immediate("ffh"), Some(0xff));
        assert_eq!(parse_immediate("1010b"), Some(0b1010));
        assert_eq!(parse_immediate("-10h"), Some(-16));
        assert_eq!(parse_immediate("bh"), Some(0xb));
    }

    #[test]
    fn oversized_literals_keep_their_low_bits() {
        let wide = parse_immediate("1ffffffffffffffffh").unwrap();
        assert_eq!(wide as u32 & 0xffff, 0xffff);
        let wide = parse_immediate("18446744073709551617").unwrap();
        assert_eq!(wide as u32 & 0xffff, 0x0001);
        let wide = parse_immediate("-18446744073709551617").unwrap();
        assert_eq!(wide as u32 & 0xffff, 0xffff);

        let isa = InstructionSet::basic();
        let raw = [
            RawOperand::Plain("r1"),
            RawOperand::Plain("r1"),
            RawOperand::Plain("1ffffffffffffffffh"),
        ];
        let enc = encode(&isa, "addi", &raw, 0).unwrap();
        assert_eq!(enc.word & 0xffff, 0xffff);
    }

    #[test]
    fn immediate_rejects_garbage() {
        for bad in ["", "-", "h", "b", "12x", "102b", "0x10", "r1", "1_0"] {
            assert_eq!(parse_immediate(bad), None, "{bad}");
        }
    }

    #[test]
    fn register_grammar_and_range() {
        let five = Field::new(21, 5);
        assert_eq!(parse_register("r0", 'r', five), Some(0));
        assert_eq!(parse_register("r31", 'r', five), Some(31));
        assert_eq!(parse_register("r32", 'r', five), None);
        assert_eq!(parse_register("r", 'r', five), None);
        assert_eq!(parse_register("x1", 'r', five), None);
        assert_eq!(parse_register("r-1", 'r', five), None);
        assert_eq!(parse_register("r1a", 'r', five), None);
    }

    #[test]
    fn branch_emits_opcode_only_placeholder() {
        let isa = InstructionSet::basic();
        let enc = encode(&isa, "j", &[RawOperand::Plain("done")], 4).unwrap();
        assert_eq!(enc.word, 0x10 << 26);
        assert_eq!(
            enc.pending,
            Some(PendingRef {
                label: "done".to_string(),
                address: 4
            })
        );
    }
}
