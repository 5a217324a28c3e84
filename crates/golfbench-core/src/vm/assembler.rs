//! Two-pass assembler: source text → [`Bytecode`].
//!
//! Syntax: one instruction per line, `#` or `;` start a comment, `name:`
//! defines a label (alone or before an instruction). Mnemonics are
//! case-insensitive; labels are case-sensitive.

use std::collections::HashMap;
use std::str::FromStr;

use num_bigint::BigInt;

use super::error::CompileError;
use super::opcode::{Op, OperandKind};
use super::Bytecode;

/// Largest program whose offsets fit a two-byte jump target.
pub const MAX_PROGRAM_SIZE: usize = u16::MAX as usize;

#[derive(Debug)]
enum Operand {
    None,
    Int(Vec<u8>),
    Index(u8),
    Label(String),
}

#[derive(Debug)]
struct Instruction {
    line: usize,
    op: Op,
    operand: Operand,
}

impl Instruction {
    fn encoded_len(&self) -> usize {
        let operand = match &self.operand {
            Operand::Int(bytes) => 1 + bytes.len(),
            _ => self.op.operand().fixed_size().unwrap_or_default(),
        };
        1 + operand
    }
}

/// Compile `source` into bytecode.
pub fn assemble(source: &str) -> Result<Bytecode, CompileError> {
    let mut instructions = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();
    let mut offset = 0usize;

    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let mut rest = strip_comment(raw).trim();

        while let Some((label, tail)) = split_label(rest) {
            if !is_identifier(label) {
                return Err(CompileError::InvalidLabel {
                    line,
                    label: label.to_string(),
                });
            }
            if labels.insert(label.to_string(), offset).is_some() {
                return Err(CompileError::DuplicateLabel {
                    line,
                    label: label.to_string(),
                });
            }
            rest = tail.trim_start();
        }

        if rest.is_empty() {
            continue;
        }

        let instruction = parse_instruction(line, rest)?;
        offset += instruction.encoded_len();
        instructions.push(instruction);
    }

    if instructions.is_empty() {
        return Err(CompileError::EmptyProgram);
    }
    if offset > MAX_PROGRAM_SIZE {
        return Err(CompileError::ProgramTooLarge {
            size: offset,
            max: MAX_PROGRAM_SIZE,
        });
    }

    let mut bytes = Vec::with_capacity(offset);
    for instruction in instructions {
        bytes.push(instruction.op.byte());
        match instruction.operand {
            Operand::None => {}
            Operand::Int(literal) => {
                // Length fits: parse_int rejects literals over 255 bytes.
                bytes.push(literal.len() as u8);
                bytes.extend_from_slice(&literal);
            }
            Operand::Index(index) => bytes.push(index),
            Operand::Label(name) => {
                let target = *labels
                    .get(&name)
                    .ok_or_else(|| CompileError::UndefinedLabel {
                        line: instruction.line,
                        label: name.clone(),
                    })?;
                // Bounded by MAX_PROGRAM_SIZE above.
                bytes.extend_from_slice(&(target as u16).to_le_bytes());
            }
        }
    }

    Ok(Bytecode::from(bytes))
}

fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Split `label: rest` when the first token ends in a colon.
fn split_label(text: &str) -> Option<(&str, &str)> {
    let colon = text.find(':')?;
    let head = &text[..colon];
    if head.contains(char::is_whitespace) {
        return None;
    }
    Some((head, &text[colon + 1..]))
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_instruction(line: usize, text: &str) -> Result<Instruction, CompileError> {
    let mut tokens = text.split_whitespace();
    let mnemonic = tokens.next().unwrap_or_default();
    let op = Op::from_mnemonic(mnemonic).ok_or_else(|| CompileError::UnknownMnemonic {
        line,
        mnemonic: mnemonic.to_string(),
    })?;
    let operand_text = tokens.next();
    if let Some(extra) = tokens.next() {
        return Err(CompileError::TrailingInput {
            line,
            text: extra.to_string(),
        });
    }

    let operand = match (op.operand(), operand_text) {
        (OperandKind::None, None) => Operand::None,
        (OperandKind::None, Some(_)) => {
            return Err(CompileError::UnexpectedOperand {
                line,
                mnemonic: op.mnemonic().to_string(),
            })
        }
        (_, None) => {
            return Err(CompileError::MissingOperand {
                line,
                mnemonic: op.mnemonic().to_string(),
            })
        }
        (OperandKind::Int, Some(literal)) => Operand::Int(parse_int(line, literal)?),
        (OperandKind::Index, Some(value)) => {
            Operand::Index(value.parse::<u8>().map_err(|_| CompileError::IndexOutOfRange {
                line,
                value: value.to_string(),
            })?)
        }
        (OperandKind::Label, Some(label)) => {
            if !is_identifier(label) {
                return Err(CompileError::InvalidLabel {
                    line,
                    label: label.to_string(),
                });
            }
            Operand::Label(label.to_string())
        }
    };

    Ok(Instruction { line, op, operand })
}

fn parse_int(line: usize, literal: &str) -> Result<Vec<u8>, CompileError> {
    let value = BigInt::from_str(literal).map_err(|_| CompileError::InvalidInteger {
        line,
        literal: literal.to_string(),
    })?;
    let bytes = value.to_signed_bytes_le();
    if bytes.len() > u8::MAX as usize {
        return Err(CompileError::LiteralTooLarge { line });
    }
    Ok(bytes)
}
