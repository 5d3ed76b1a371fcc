use std::fmt;

use crate::error::AsmError;
use crate::machine::InstructionSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// ASCII alphanumerics and `_`, optionally led by one `-` or `+`.
    Word(&'a str),
    Colon,
    Comma,
    LParen,
    RParen,
}

/// Operand text as written, before its expected kind is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawOperand<'a> {
    Plain(&'a str),
    /// `offset(base)`; the offset may be omitted.
    Indexed {
        offset: Option<&'a str>,
        base: &'a str,
    },
}

impl fmt::Display for RawOperand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawOperand::Plain(s) => write!(f, "{s}"),
            RawOperand::Indexed { offset, base } => {
                write!(f, "{}({base})", offset.unwrap_or(""))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'a> {
    pub mnemonic: &'a str,
    pub operands: Vec<RawOperand<'a>>,
}

/// One parsed source line. Both parts are absent for blank and comment-only lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line<'a> {
    pub label: Option<&'a str>,
    pub statement: Option<Statement<'a>>,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Names (labels, mnemonics) are words without a sign.
pub fn is_identifier(word: &str) -> bool {
    !word.is_empty() && word.chars().all(is_word_char)
}

/// Splits a line into tokens, stopping at the comment marker.
/// Returns `None` on any character that cannot start a token.
pub fn tokenize(line: &str, comment: char) -> Option<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c == comment {
            break;
        }
        let tok = match c {
            ':' => Token::Colon,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_whitespace() => continue,
            c if is_word_char(c) || c == '-' || c == '+' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, next)) = chars.peek() {
                    if !is_word_char(next) {
                        break;
                    }
                    end = i + next.len_utf8();
                    chars.next();
                }
                let word = &line[start..end];
                if word == "-" || word == "+" {
                    return None;
                }
                Token::Word(word)
            }
            _ => return None,
        };
        tokens.push(tok);
    }
    Some(tokens)
}

fn parse_operand<'a>(tokens: &[Token<'a>], indexed: bool) -> Option<RawOperand<'a>> {
    match *tokens {
        [Token::Word(w)] => Some(RawOperand::Plain(w)),
        [Token::LParen, Token::Word(base), Token::RParen] if indexed => {
            Some(RawOperand::Indexed { offset: None, base })
        }
        [Token::Word(offset), Token::LParen, Token::Word(base), Token::RParen] if indexed => {
            Some(RawOperand::Indexed {
                offset: Some(offset),
                base,
            })
        }
        _ => None,
    }
}

fn parse_operands<'a>(tokens: &[Token<'a>], indexed: bool) -> Option<Vec<RawOperand<'a>>> {
    if tokens.is_empty() {
        return Some(Vec::new());
    }
    tokens
        .split(|t| *t == Token::Comma)
        .map(|group| parse_operand(group, indexed))
        .collect()
}

/// Parses one source line. `line_no` is 1-based and only used for errors.
pub fn parse_line<'a>(text: &'a str, line_no: usize, isa: &InstructionSet) -> Result<Line<'a>, AsmError> {
    let syntax = AsmError::Syntax { line: line_no };
    let tokens = tokenize(text, isa.comment).ok_or_else(|| syntax.clone())?;

    let (label, rest) = match tokens.as_slice() {
        [Token::Word(name), Token::Colon, rest @ ..] if is_identifier(name) => (Some(*name), rest),
        rest => (None, rest),
    };

    let statement = match rest {
        [] => None,
        [Token::Word(mnemonic), operands @ ..] if is_identifier(mnemonic) => {
            let operands = parse_operands(operands, isa.indexed_addressing()).ok_or(syntax)?;
            Some(Statement {
                mnemonic: *mnemonic,
                operands,
            })
        }
        _ => return Err(syntax),
    };

    Ok(Line { label, statement })
}
