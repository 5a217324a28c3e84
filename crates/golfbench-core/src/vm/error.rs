//! Error types for the stack VM.

/// Source rejected by the assembler. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("program contains no instructions")]
    EmptyProgram,

    #[error("line {line}: unknown instruction `{mnemonic}`")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("line {line}: `{mnemonic}` requires an operand")]
    MissingOperand { line: usize, mnemonic: String },

    #[error("line {line}: `{mnemonic}` takes no operand")]
    UnexpectedOperand { line: usize, mnemonic: String },

    #[error("line {line}: unexpected trailing input `{text}`")]
    TrailingInput { line: usize, text: String },

    #[error("line {line}: invalid integer literal `{literal}`")]
    InvalidInteger { line: usize, literal: String },

    #[error("line {line}: integer literal exceeds 255 bytes")]
    LiteralTooLarge { line: usize },

    #[error("line {line}: index {value} out of range 0-255")]
    IndexOutOfRange { line: usize, value: String },

    #[error("line {line}: invalid label `{label}`")]
    InvalidLabel { line: usize, label: String },

    #[error("line {line}: label `{label}` defined twice")]
    DuplicateLabel { line: usize, label: String },

    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel { line: usize, label: String },

    #[error("program is {size} bytes, jump targets address at most {max}")]
    ProgramTooLarge { size: usize, max: usize },
}

/// Trap raised while running a program for one input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmFault {
    #[error("stack underflow in `{op}` at offset {offset}")]
    StackUnderflow { op: &'static str, offset: usize },

    #[error("stack overflow: depth limit {limit}")]
    StackOverflow { limit: usize },

    #[error("value of {bits} bits exceeds the {limit}-bit limit")]
    ValueTooLarge { bits: u64, limit: u64 },

    #[error("program returned with an empty stack")]
    EmptyResult,

    #[error("argument {index} not supplied")]
    MissingArgument { index: u8 },

    #[error("division by zero at offset {offset}")]
    DivisionByZero { offset: usize },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("invalid opcode 0x{byte:02x} at offset {offset}")]
    InvalidOpcode { byte: u8, offset: usize },

    #[error("truncated instruction at offset {offset}")]
    Truncated { offset: usize },

    #[error("jump target {target} outside program")]
    JumpOutOfBounds { target: usize },
}
