//! Executor results.

use serde::{Deserialize, Serialize};

/// Outcome of a single battery input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub input: u64,
    pub passed: bool,
    /// Instructions executed for this run (zero if the VM could not say).
    pub cost: u64,
    /// VM fault message, if the run trapped.
    pub fault: Option<String>,
}

/// Aggregate outcome of running one program over the whole battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub passed_count: u32,
    /// Compiled bytecode size in bytes.
    pub code_length: u64,
    pub total_cost: u64,
    /// One entry per battery input, in battery order.
    pub cases: Vec<CaseOutcome>,
}

impl Evaluation {
    pub fn total_tests(&self) -> usize {
        self.cases.len()
    }

    /// Number of runs that ended in a VM fault.
    pub fn fault_count(&self) -> usize {
        self.cases.iter().filter(|c| c.fault.is_some()).count()
    }

    pub fn all_passed(&self) -> bool {
        self.passed_count as usize == self.cases.len()
    }
}
