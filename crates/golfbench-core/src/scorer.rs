//! Packages evaluation metrics into an immutable [`ScoreRecord`].

use golfbench_store::ScoreRecord;

use crate::domain::Evaluation;

/// Build a score record. Pure construction; the record gets a fresh id and
/// timestamp but is not stored.
pub fn score(
    name: &str,
    source: &str,
    passed_count: u32,
    compiled_length: u64,
    total_cost: u64,
) -> ScoreRecord {
    ScoreRecord::new(name, source, passed_count, compiled_length, total_cost)
}

/// [`score`] over an executor result.
pub fn score_evaluation(name: &str, source: &str, evaluation: &Evaluation) -> ScoreRecord {
    score(
        name,
        source,
        evaluation.passed_count,
        evaluation.code_length,
        evaluation.total_cost,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_copies_every_metric() {
        let record = score("alice", "push 0\nret", 1, 4, 12);
        assert_eq!(record.submitter_name(), "alice");
        assert_eq!(record.source_code(), "push 0\nret");
        assert_eq!(record.passed_count(), 1);
        assert_eq!(record.code_length(), 4);
        assert_eq!(record.execution_cost(), 12);
    }

    #[test]
    fn identical_inputs_give_equal_but_distinct_records() {
        let a = score("bob", "arg 0", 3, 2, 5);
        let b = score("bob", "arg 0", 3, 2, 5);
        assert_eq!(a, b);
        assert_ne!(a.score_id(), b.score_id());
    }

    #[test]
    fn cost_takes_part_in_equality() {
        let a = score("bob", "arg 0", 3, 2, 5);
        let b = score("bob", "arg 0", 3, 2, 6);
        assert_ne!(a, b);
    }

    #[test]
    fn from_evaluation() {
        let evaluation = Evaluation {
            passed_count: 2,
            code_length: 9,
            total_cost: 40,
            cases: Vec::new(),
        };
        let record = score_evaluation("carol", "src", &evaluation);
        assert_eq!(record.passed_count(), 2);
        assert_eq!(record.code_length(), 9);
        assert_eq!(record.execution_cost(), 40);
    }
}
