//! Per-submission execution loop.
//!
//! Compiles once, then runs every battery input on a fresh machine and
//! compares the result with the oracle. A faulting run is a non-pass whose
//! cost is still counted; the whole battery is always traversed.

use std::sync::Arc;

use num_bigint::BigInt;

use crate::domain::{CaseOutcome, Evaluation, TestBattery};
use crate::metrics::METRICS;
use crate::obs;
use crate::oracle::Oracle;
use crate::vm::{CompileError, Machine, VmBackend};

/// Drives a [`VmBackend`] across a [`TestBattery`].
pub struct Executor<B: VmBackend> {
    backend: B,
    battery: Arc<TestBattery>,
    oracle: Arc<Oracle>,
}

impl<B: VmBackend> Executor<B> {
    pub fn new(backend: B, battery: Arc<TestBattery>, oracle: Arc<Oracle>) -> Self {
        Self {
            backend,
            battery,
            oracle,
        }
    }

    pub fn battery(&self) -> &TestBattery {
        &self.battery
    }

    pub fn oracle(&self) -> &Oracle {
        &self.oracle
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Evaluate `source` against the battery.
    ///
    /// Returns `Err` only when compilation fails; no input is run then.
    pub fn evaluate(&self, source: &str) -> Result<Evaluation, CompileError> {
        let bytecode = match self.backend.compile(source) {
            Ok(code) => code,
            Err(err) => {
                METRICS.inc_compile_failures();
                obs::emit_compile_failed(&err);
                return Err(err);
            }
        };

        obs::emit_evaluation_started(self.battery.len(), &self.battery.digest());

        let mut passed_count = 0u32;
        let mut total_cost = 0u64;
        let mut cases = Vec::with_capacity(self.battery.len());

        for input in self.battery.iter() {
            let mut machine = self.backend.new_machine();
            let result = machine.run(&bytecode, &[BigInt::from(input)]);
            let cost = machine.instructions_executed();
            total_cost = total_cost.saturating_add(cost);

            let outcome = match result {
                Ok(value) => {
                    let passed = value == self.oracle.reference(input);
                    if passed {
                        passed_count += 1;
                    }
                    CaseOutcome {
                        input,
                        passed,
                        cost,
                        fault: None,
                    }
                }
                Err(fault) => {
                    METRICS.inc_execution_faults();
                    obs::emit_case_fault(input, &fault);
                    CaseOutcome {
                        input,
                        passed: false,
                        cost,
                        fault: Some(fault.to_string()),
                    }
                }
            };
            cases.push(outcome);
        }

        METRICS.inc_battery_runs();

        let evaluation = Evaluation {
            passed_count,
            code_length: bytecode.len() as u64,
            total_cost,
            cases,
        };
        obs::emit_evaluation_finished(
            evaluation.passed_count,
            evaluation.total_tests(),
            evaluation.code_length,
            evaluation.total_cost,
            evaluation.fault_count(),
        );
        Ok(evaluation)
    }
}

impl<B: VmBackend + std::fmt::Debug> std::fmt::Debug for Executor<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("backend", &self.backend)
            .field("battery_len", &self.battery.len())
            .field("oracle", &self.oracle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::{Bytecode, StackVm, VmFault};

    fn executor(inputs: Vec<u64>) -> Executor<StackVm> {
        Executor::new(
            StackVm::default(),
            Arc::new(TestBattery::new(inputs)),
            Arc::new(Oracle::unbounded()),
        )
    }

    #[test]
    fn always_zero_passes_only_input_zero() {
        let eval = executor(vec![0, 1, 2, 3, 4, 5])
            .evaluate("push 0\nret")
            .unwrap();
        assert_eq!(eval.passed_count, 1);
        assert_eq!(eval.code_length, 4);
        assert_eq!(eval.total_cost, 12);
        assert!(eval.cases[0].passed);
        assert!(eval.cases[1..].iter().all(|c| !c.passed));
    }

    #[test]
    fn identity_matches_small_fixed_points() {
        // f(0)=0, f(1)=1, f(5)=5
        let eval = executor(vec![0, 1, 2, 5, 10]).evaluate("arg 0").unwrap();
        assert_eq!(eval.passed_count, 3);
        assert_eq!(eval.total_cost, 5);
    }

    #[test]
    fn compile_failure_runs_nothing() {
        let err = executor(vec![0, 1]).evaluate("bogus").unwrap_err();
        assert!(matches!(err, CompileError::UnknownMnemonic { .. }));
    }

    #[test]
    fn faults_are_absorbed_per_input() {
        // `pop` on an empty stack traps immediately after one instruction.
        let eval = executor(vec![0, 1, 2]).evaluate("pop\nret").unwrap();
        assert_eq!(eval.passed_count, 0);
        assert_eq!(eval.total_tests(), 3);
        assert_eq!(eval.fault_count(), 3);
        assert_eq!(eval.total_cost, 3);
    }

    #[test]
    fn case_outcomes_follow_battery_order() {
        let eval = executor(vec![9, 0, 4]).evaluate("push 0").unwrap();
        let inputs: Vec<u64> = eval.cases.iter().map(|c| c.input).collect();
        assert_eq!(inputs, vec![9, 0, 4]);
    }

    /// Backend whose machines fault on every run and report no counter.
    struct Broken;

    struct BrokenMachine;

    impl Machine for BrokenMachine {
        fn run(&mut self, _: &Bytecode, _: &[BigInt]) -> Result<BigInt, VmFault> {
            Err(VmFault::EmptyResult)
        }

        fn instructions_executed(&self) -> u64 {
            0
        }
    }

    impl VmBackend for Broken {
        type Machine = BrokenMachine;

        fn compile(&self, _: &str) -> Result<Bytecode, CompileError> {
            Ok(Bytecode::from(vec![0x3f]))
        }

        fn new_machine(&self) -> BrokenMachine {
            BrokenMachine
        }
    }

    #[test]
    fn unknown_cost_counts_as_zero() {
        let exec = Executor::new(
            Broken,
            Arc::new(TestBattery::standard()),
            Arc::new(Oracle::unbounded()),
        );
        let eval = exec.evaluate("anything").unwrap();
        assert_eq!(eval.passed_count, 0);
        assert_eq!(eval.total_cost, 0);
        assert_eq!(eval.code_length, 1);
        assert_eq!(eval.cases.len(), 35);
    }
}
