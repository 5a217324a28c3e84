//! VM collaborator contract and the reference stack-VM backend.
//!
//! The executor only sees [`VmBackend`] (compile once, hand out fresh
//! machines) and [`Machine`] (run, then report instructions executed).
//!
//! # Modules
//!
//! - [`opcode`]: `Op` table, mnemonics and operand kinds
//! - [`assembler`]: source text → [`Bytecode`]
//! - [`machine`]: `StackMachine` interpreter
//! - [`error`]: `CompileError` / `VmFault`

pub mod assembler;
pub mod error;
pub mod machine;
pub mod opcode;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

pub use assembler::assemble;
pub use error::{CompileError, VmFault};
pub use machine::StackMachine;
pub use opcode::{Op, OperandKind};

/// Compiled, VM-executable program. Its byte length is the golf metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bytecode(Vec<u8>);

impl Bytecode {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for Bytecode {
    fn from(bytes: Vec<u8>) -> Self {
        Bytecode(bytes)
    }
}

/// Per-run resource ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmLimits {
    /// Instruction ceiling per run; `None` disables the bound.
    pub max_steps: Option<u64>,
    /// Operand stack ceiling.
    pub max_stack_depth: usize,
    /// Largest magnitude, in bits, any stack or register value may reach.
    pub max_value_bits: u64,
}

impl Default for VmLimits {
    fn default() -> Self {
        Self {
            max_steps: Some(1_000_000),
            max_stack_depth: 1024,
            max_value_bits: 4096,
        }
    }
}

/// One VM instance. A fresh instance is created per battery input.
pub trait Machine {
    /// Execute `bytecode` with `args`, returning the program's result.
    fn run(&mut self, bytecode: &Bytecode, args: &[BigInt]) -> Result<BigInt, VmFault>;

    /// Instructions executed by the last `run`, including a faulting one.
    /// Backends that cannot tell report zero.
    fn instructions_executed(&self) -> u64;
}

/// Compiler plus machine factory.
pub trait VmBackend: Send + Sync {
    type Machine: Machine;

    fn compile(&self, source: &str) -> Result<Bytecode, CompileError>;

    fn new_machine(&self) -> Self::Machine;
}

/// The reference stack VM.
#[derive(Debug, Clone, Default)]
pub struct StackVm {
    limits: VmLimits,
}

impl StackVm {
    pub fn new(limits: VmLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> VmLimits {
        self.limits
    }
}

impl VmBackend for StackVm {
    type Machine = StackMachine;

    fn compile(&self, source: &str) -> Result<Bytecode, CompileError> {
        assemble(source)
    }

    fn new_machine(&self) -> StackMachine {
        StackMachine::new(self.limits)
    }
}
