//! Stack machine interpreter.

use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::error::VmFault;
use super::opcode::Op;
use super::{Bytecode, Machine, VmLimits};

const REGISTER_COUNT: usize = 256;

/// Interpreter for assembled bytecode. Each executed instruction costs one.
#[derive(Debug)]
pub struct StackMachine {
    limits: VmLimits,
    executed: u64,
}

/// Per-run state; dropped when the run ends so nothing leaks between runs.
struct Frame<'a> {
    code: &'a [u8],
    pc: usize,
    stack: Vec<BigInt>,
    registers: Vec<BigInt>,
    max_depth: usize,
    max_value_bits: u64,
}

impl<'a> Frame<'a> {
    fn pop(&mut self, op: Op, offset: usize) -> Result<BigInt, VmFault> {
        self.stack.pop().ok_or(VmFault::StackUnderflow {
            op: op.mnemonic(),
            offset,
        })
    }

    fn peek(&self, depth: usize, op: Op, offset: usize) -> Result<&BigInt, VmFault> {
        self.stack
            .len()
            .checked_sub(depth + 1)
            .map(|idx| &self.stack[idx])
            .ok_or(VmFault::StackUnderflow {
                op: op.mnemonic(),
                offset,
            })
    }

    /// Every value produced by an instruction passes through here, so the
    /// size ceiling also covers register stores.
    fn push(&mut self, value: BigInt) -> Result<(), VmFault> {
        let bits = value.bits();
        if bits > self.max_value_bits {
            return Err(VmFault::ValueTooLarge {
                bits,
                limit: self.max_value_bits,
            });
        }
        if self.stack.len() >= self.max_depth {
            return Err(VmFault::StackOverflow {
                limit: self.max_depth,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn read_byte(&mut self, offset: usize) -> Result<u8, VmFault> {
        let byte = *self
            .code
            .get(self.pc)
            .ok_or(VmFault::Truncated { offset })?;
        self.pc += 1;
        Ok(byte)
    }

    fn read_target(&mut self, offset: usize) -> Result<usize, VmFault> {
        let lo = self.read_byte(offset)?;
        let hi = self.read_byte(offset)?;
        let target = u16::from_le_bytes([lo, hi]) as usize;
        if target > self.code.len() {
            return Err(VmFault::JumpOutOfBounds { target });
        }
        Ok(target)
    }

    fn read_int(&mut self, offset: usize) -> Result<BigInt, VmFault> {
        let len = self.read_byte(offset)? as usize;
        let end = self.pc + len;
        let bytes = self
            .code
            .get(self.pc..end)
            .ok_or(VmFault::Truncated { offset })?;
        self.pc = end;
        Ok(BigInt::from_signed_bytes_le(bytes))
    }

    fn binary(
        &mut self,
        op: Op,
        offset: usize,
        f: impl FnOnce(BigInt, BigInt) -> Result<BigInt, VmFault>,
    ) -> Result<(), VmFault> {
        let b = self.pop(op, offset)?;
        let a = self.pop(op, offset)?;
        let result = f(a, b)?;
        self.push(result)
    }
}

fn flag(value: bool) -> BigInt {
    if value {
        BigInt::one()
    } else {
        BigInt::zero()
    }
}

impl StackMachine {
    pub fn new(limits: VmLimits) -> Self {
        Self { limits, executed: 0 }
    }

    fn execute(&mut self, bytecode: &Bytecode, args: &[BigInt]) -> Result<BigInt, VmFault> {
        let mut frame = Frame {
            code: bytecode.as_bytes(),
            pc: 0,
            stack: Vec::new(),
            registers: vec![BigInt::zero(); REGISTER_COUNT],
            max_depth: self.limits.max_stack_depth,
            max_value_bits: self.limits.max_value_bits,
        };

        loop {
            if frame.pc == frame.code.len() {
                return frame.stack.pop().ok_or(VmFault::EmptyResult);
            }
            if let Some(limit) = self.limits.max_steps {
                if self.executed >= limit {
                    return Err(VmFault::StepLimitExceeded { limit });
                }
            }
            self.executed += 1;

            let offset = frame.pc;
            let byte = frame.read_byte(offset)?;
            let op = Op::from_byte(byte).ok_or(VmFault::InvalidOpcode { byte, offset })?;

            match op {
                Op::Push => {
                    let value = frame.read_int(offset)?;
                    frame.push(value)?;
                }
                Op::Pop => {
                    frame.pop(op, offset)?;
                }
                Op::Dup => {
                    let top = frame.peek(0, op, offset)?.clone();
                    frame.push(top)?;
                }
                Op::Swap => {
                    let b = frame.pop(op, offset)?;
                    let a = frame.pop(op, offset)?;
                    frame.push(b)?;
                    frame.push(a)?;
                }
                Op::Over => {
                    let second = frame.peek(1, op, offset)?.clone();
                    frame.push(second)?;
                }
                Op::Rot => {
                    let c = frame.pop(op, offset)?;
                    let b = frame.pop(op, offset)?;
                    let a = frame.pop(op, offset)?;
                    frame.push(b)?;
                    frame.push(c)?;
                    frame.push(a)?;
                }
                Op::Arg => {
                    let index = frame.read_byte(offset)?;
                    let value = args
                        .get(index as usize)
                        .cloned()
                        .ok_or(VmFault::MissingArgument { index })?;
                    frame.push(value)?;
                }
                Op::Load => {
                    let index = frame.read_byte(offset)? as usize;
                    let value = frame.registers[index].clone();
                    frame.push(value)?;
                }
                Op::Store => {
                    let index = frame.read_byte(offset)? as usize;
                    let value = frame.pop(op, offset)?;
                    frame.registers[index] = value;
                }
                Op::Add => frame.binary(op, offset, |a, b| Ok(a + b))?,
                Op::Sub => frame.binary(op, offset, |a, b| Ok(a - b))?,
                Op::Mul => frame.binary(op, offset, |a, b| Ok(a * b))?,
                Op::Div => frame.binary(op, offset, |a, b| {
                    if b.is_zero() {
                        Err(VmFault::DivisionByZero { offset })
                    } else {
                        Ok(a / b)
                    }
                })?,
                Op::Mod => frame.binary(op, offset, |a, b| {
                    if b.is_zero() {
                        Err(VmFault::DivisionByZero { offset })
                    } else {
                        Ok(a % b)
                    }
                })?,
                Op::Neg => {
                    let value = frame.pop(op, offset)?;
                    frame.push(-value)?;
                }
                Op::Eq => frame.binary(op, offset, |a, b| Ok(flag(a == b)))?,
                Op::Lt => frame.binary(op, offset, |a, b| Ok(flag(a < b)))?,
                Op::Gt => frame.binary(op, offset, |a, b| Ok(flag(a > b)))?,
                Op::Jmp => {
                    frame.pc = frame.read_target(offset)?;
                }
                Op::Jz | Op::Jnz => {
                    let target = frame.read_target(offset)?;
                    let cond = frame.pop(op, offset)?;
                    if cond.is_zero() == (op == Op::Jz) {
                        frame.pc = target;
                    }
                }
                Op::Ret => {
                    return frame.stack.pop().ok_or(VmFault::EmptyResult);
                }
            }
        }
    }
}

impl Machine for StackMachine {
    fn run(&mut self, bytecode: &Bytecode, args: &[BigInt]) -> Result<BigInt, VmFault> {
        self.executed = 0;
        self.execute(bytecode, args)
    }

    fn instructions_executed(&self) -> u64 {
        self.executed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::assemble;

    fn run(source: &str, args: &[i64]) -> (Result<BigInt, VmFault>, u64) {
        run_with(source, args, VmLimits::default())
    }

    fn run_with(source: &str, args: &[i64], limits: VmLimits) -> (Result<BigInt, VmFault>, u64) {
        let code = assemble(source).unwrap();
        let args: Vec<BigInt> = args.iter().map(|&a| BigInt::from(a)).collect();
        let mut machine = StackMachine::new(limits);
        let result = machine.run(&code, &args);
        (result, machine.instructions_executed())
    }

    #[test]
    fn returns_top_of_stack() {
        let (result, cost) = run("push 7\nret", &[]);
        assert_eq!(result, Ok(BigInt::from(7)));
        assert_eq!(cost, 2);
    }

    #[test]
    fn falling_off_the_end_returns_top() {
        let (result, cost) = run("push 1\npush 2", &[]);
        assert_eq!(result, Ok(BigInt::from(2)));
        assert_eq!(cost, 2);
    }

    #[test]
    fn arithmetic_operand_order() {
        assert_eq!(run("push 10\npush 3\nsub", &[]).0, Ok(BigInt::from(7)));
        assert_eq!(run("push 10\npush 3\ndiv", &[]).0, Ok(BigInt::from(3)));
        assert_eq!(run("push 10\npush 3\nmod", &[]).0, Ok(BigInt::from(1)));
        assert_eq!(run("push -7\npush 2\ndiv", &[]).0, Ok(BigInt::from(-3)));
        assert_eq!(run("push 6\npush 7\nmul\nneg", &[]).0, Ok(BigInt::from(-42)));
    }

    #[test]
    fn comparisons_push_flags() {
        assert_eq!(run("push 1\npush 2\nlt", &[]).0, Ok(BigInt::from(1)));
        assert_eq!(run("push 1\npush 2\ngt", &[]).0, Ok(BigInt::from(0)));
        assert_eq!(run("push 2\npush 2\neq", &[]).0, Ok(BigInt::from(1)));
    }

    #[test]
    fn stack_shuffles() {
        assert_eq!(run("push 1\npush 2\nswap", &[]).0, Ok(BigInt::from(1)));
        assert_eq!(run("push 1\npush 2\nover", &[]).0, Ok(BigInt::from(1)));
        // 1 2 3 rot -> 2 3 1
        assert_eq!(run("push 1\npush 2\npush 3\nrot", &[]).0, Ok(BigInt::from(1)));
        assert_eq!(
            run("push 1\npush 2\npush 3\nrot\npop", &[]).0,
            Ok(BigInt::from(3))
        );
        assert_eq!(run("push 5\ndup\nadd", &[]).0, Ok(BigInt::from(10)));
    }

    #[test]
    fn registers_start_at_zero() {
        assert_eq!(run("load 9", &[]).0, Ok(BigInt::from(0)));
        assert_eq!(run("push 4\nstore 9\nload 9", &[]).0, Ok(BigInt::from(4)));
    }

    #[test]
    fn arguments_are_readable() {
        assert_eq!(run("arg 1", &[10, 20]).0, Ok(BigInt::from(20)));
        assert_eq!(
            run("arg 2", &[10]).0,
            Err(VmFault::MissingArgument { index: 2 })
        );
    }

    #[test]
    fn conditional_jumps() {
        let source = "arg 0\njz zero\npush 1\nret\nzero:\npush 2\nret";
        assert_eq!(run(source, &[0]).0, Ok(BigInt::from(2)));
        assert_eq!(run(source, &[5]).0, Ok(BigInt::from(1)));

        let source = "arg 0\njnz nonzero\npush 1\nret\nnonzero:\npush 2\nret";
        assert_eq!(run(source, &[0]).0, Ok(BigInt::from(1)));
        assert_eq!(run(source, &[5]).0, Ok(BigInt::from(2)));
    }

    #[test]
    fn faults() {
        assert!(matches!(
            run("pop", &[]).0,
            Err(VmFault::StackUnderflow { op: "pop", .. })
        ));
        assert_eq!(run("push 1\npop\nret", &[]).0, Err(VmFault::EmptyResult));
        assert!(matches!(
            run("push 1\npush 0\ndiv", &[]).0,
            Err(VmFault::DivisionByZero { .. })
        ));
        assert!(matches!(
            run("push 1\npush 0\nmod", &[]).0,
            Err(VmFault::DivisionByZero { .. })
        ));
    }

    #[test]
    fn step_limit_bounds_infinite_loops() {
        let limits = VmLimits {
            max_steps: Some(100),
            max_stack_depth: 16,
            ..VmLimits::default()
        };
        let (result, cost) = run_with("top: jmp top", &[], limits);
        assert_eq!(result, Err(VmFault::StepLimitExceeded { limit: 100 }));
        assert_eq!(cost, 100);
    }

    #[test]
    fn stack_limit_bounds_growth() {
        let limits = VmLimits {
            max_steps: Some(10_000),
            max_stack_depth: 8,
            ..VmLimits::default()
        };
        let (result, cost) = run_with("push 1\ntop: dup\njmp top", &[], limits);
        assert_eq!(result, Err(VmFault::StackOverflow { limit: 8 }));
        assert!(cost > 0);
    }

    #[test]
    fn repeated_squaring_hits_value_ceiling() {
        let limits = VmLimits {
            max_steps: Some(1_000_000),
            ..VmLimits::default()
        };
        let start = std::time::Instant::now();
        let (result, cost) = run_with("push 3\ntop: dup\nmul\njmp top", &[], limits);
        assert!(matches!(
            result,
            Err(VmFault::ValueTooLarge { limit: 4096, .. })
        ));
        // 3^(2^k) passes 4096 bits after a dozen squarings.
        assert!(cost < 60, "cost {cost}");
        assert!(start.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn value_ceiling_is_configurable() {
        let limits = VmLimits {
            max_value_bits: 8,
            ..VmLimits::default()
        };
        assert_eq!(
            run_with("push 255", &[], limits).0,
            Ok(BigInt::from(255))
        );
        assert_eq!(
            run_with("push 255\npush 1\nadd", &[], limits).0,
            Err(VmFault::ValueTooLarge { bits: 9, limit: 8 })
        );
        assert_eq!(
            run_with("push 16\nneg\npush 16\nmul", &[], limits).0,
            Err(VmFault::ValueTooLarge { bits: 9, limit: 8 })
        );
    }

    #[test]
    fn large_fibonacci_values_fit_default_ceiling() {
        let bits = crate::oracle::fibonacci(560).bits();
        assert!(bits < VmLimits::default().max_value_bits);
    }

    #[test]
    fn malformed_bytecode_faults() {
        let mut machine = StackMachine::new(VmLimits::default());
        let bad = Bytecode::from(vec![0xee]);
        assert_eq!(
            machine.run(&bad, &[]),
            Err(VmFault::InvalidOpcode {
                byte: 0xee,
                offset: 0
            })
        );

        let truncated = Bytecode::from(vec![0x01, 0x04, 0x01]);
        assert_eq!(
            machine.run(&truncated, &[]),
            Err(VmFault::Truncated { offset: 0 })
        );

        let wild_jump = Bytecode::from(vec![0x20, 0xff, 0x00]);
        assert_eq!(
            machine.run(&wild_jump, &[]),
            Err(VmFault::JumpOutOfBounds { target: 255 })
        );
    }

    #[test]
    fn counter_resets_between_runs() {
        let code = assemble("push 1\npush 2\nadd").unwrap();
        let mut machine = StackMachine::new(VmLimits::default());
        machine.run(&code, &[]).unwrap();
        machine.run(&code, &[]).unwrap();
        assert_eq!(machine.instructions_executed(), 3);
    }

    #[test]
    fn big_literals_survive_encoding() {
        let literal = "-123456789012345678901234567890123456789";
        let (result, _) = run(&format!("push {literal}"), &[]);
        assert_eq!(result.unwrap().to_string(), literal);
    }
}
