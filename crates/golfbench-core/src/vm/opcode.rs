//! Instruction set.

/// Operand carried by an instruction in source and bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    None,
    /// Length byte followed by signed little-endian two's-complement bytes.
    Int,
    /// One byte, 0-255.
    Index,
    /// Two-byte little-endian absolute byte offset.
    Label,
}

impl OperandKind {
    /// Encoded operand size, when fixed.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            OperandKind::None => Some(0),
            OperandKind::Index => Some(1),
            OperandKind::Label => Some(2),
            OperandKind::Int => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Op {
    Push = 0x01,
    Pop = 0x02,
    Dup = 0x03,
    Swap = 0x04,
    Over = 0x05,
    Rot = 0x06,
    Arg = 0x07,
    Load = 0x08,
    Store = 0x09,
    Add = 0x10,
    Sub = 0x11,
    Mul = 0x12,
    Div = 0x13,
    Mod = 0x14,
    Neg = 0x15,
    Eq = 0x18,
    Lt = 0x19,
    Gt = 0x1a,
    Jmp = 0x20,
    Jz = 0x21,
    Jnz = 0x22,
    Ret = 0x3f,
}

impl Op {
    pub const ALL: [Op; 22] = [
        Op::Push,
        Op::Pop,
        Op::Dup,
        Op::Swap,
        Op::Over,
        Op::Rot,
        Op::Arg,
        Op::Load,
        Op::Store,
        Op::Add,
        Op::Sub,
        Op::Mul,
        Op::Div,
        Op::Mod,
        Op::Neg,
        Op::Eq,
        Op::Lt,
        Op::Gt,
        Op::Jmp,
        Op::Jz,
        Op::Jnz,
        Op::Ret,
    ];

    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Push => "push",
            Op::Pop => "pop",
            Op::Dup => "dup",
            Op::Swap => "swap",
            Op::Over => "over",
            Op::Rot => "rot",
            Op::Arg => "arg",
            Op::Load => "load",
            Op::Store => "store",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Mod => "mod",
            Op::Neg => "neg",
            Op::Eq => "eq",
            Op::Lt => "lt",
            Op::Gt => "gt",
            Op::Jmp => "jmp",
            Op::Jz => "jz",
            Op::Jnz => "jnz",
            Op::Ret => "ret",
        }
    }

    pub fn operand(self) -> OperandKind {
        match self {
            Op::Push => OperandKind::Int,
            Op::Arg | Op::Load | Op::Store => OperandKind::Index,
            Op::Jmp | Op::Jz | Op::Jnz => OperandKind::Label,
            _ => OperandKind::None,
        }
    }

    /// Case-insensitive mnemonic lookup.
    pub fn from_mnemonic(text: &str) -> Option<Op> {
        Op::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
    }

    pub fn from_byte(byte: u8) -> Option<Op> {
        Op::ALL.iter().copied().find(|op| op.byte() == byte)
    }

    pub fn byte(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_and_mnemonics_are_unique() {
        for a in Op::ALL {
            for b in Op::ALL {
                if a != b {
                    assert_ne!(a.byte(), b.byte());
                    assert_ne!(a.mnemonic(), b.mnemonic());
                }
            }
        }
    }

    #[test]
    fn operand_sizes() {
        assert_eq!(Op::Ret.operand().fixed_size(), Some(0));
        assert_eq!(Op::Store.operand().fixed_size(), Some(1));
        assert_eq!(Op::Jnz.operand().fixed_size(), Some(2));
        assert_eq!(Op::Push.operand().fixed_size(), None);
    }

    #[test]
    fn lookups_invert() {
        for op in Op::ALL {
            assert_eq!(Op::from_byte(op.byte()), Some(op));
            assert_eq!(Op::from_mnemonic(op.mnemonic()), Some(op));
            assert_eq!(Op::from_mnemonic(&op.mnemonic().to_uppercase()), Some(op));
        }
        assert_eq!(Op::from_byte(0x00), None);
        assert_eq!(Op::from_mnemonic("halt"), None);
    }
}
