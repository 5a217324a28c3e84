//! Leaderboard ranking order.
//!
//! 1. `passed_count` descending
//! 2. `code_length` ascending
//! 3. `execution_cost` ascending
//!
//! The same order drives the storage query that selects the candidate window
//! ([`ORDER_BY`]) and the in-memory sort that finalizes display order
//! ([`sort_ranked`]). Records tied on all three keys keep submission order.

use std::cmp::{Ordering, Reverse};

use crate::storage_traits::ScoreRecord;

/// SurrealQL ordering clause equivalent to [`window_order`].
pub(crate) const ORDER_BY: &str =
    "passed_count DESC, code_length ASC, execution_cost ASC, submitted_at ASC";

/// Explicit multi-key sort key. Smaller keys rank better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RankKey {
    pub passed: Reverse<u32>,
    pub code_length: u64,
    pub execution_cost: u64,
}

/// Build the sort key for a record.
pub fn rank_key(record: &ScoreRecord) -> RankKey {
    RankKey {
        passed: Reverse(record.passed_count()),
        code_length: record.code_length(),
        execution_cost: record.execution_cost(),
    }
}

/// Ranking comparator. `Less` means `a` ranks ahead of `b`.
pub fn compare(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    rank_key(a).cmp(&rank_key(b))
}

/// Ranking comparator extended with submission time, used to pick which
/// fully tied records enter a limited window.
pub fn window_order(a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    compare(a, b).then_with(|| a.submitted_at().cmp(&b.submitted_at()))
}

/// Stable in-place sort by [`rank_key`].
pub fn sort_ranked(records: &mut [ScoreRecord]) {
    records.sort_by_key(rank_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, passed: u32, len: u64, cost: u64) -> ScoreRecord {
        ScoreRecord::new(name, format!("# {name}"), passed, len, cost)
    }

    #[test]
    fn more_passes_rank_first() {
        let a = rec("a", 6, 12, 90);
        let b = rec("b", 1, 12, 90);
        assert_eq!(compare(&a, &b), Ordering::Less);
        assert_eq!(compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn shorter_code_breaks_pass_ties() {
        let c = rec("c", 6, 10, 100);
        let d = rec("d", 6, 20, 100);
        assert_eq!(compare(&c, &d), Ordering::Less);
    }

    #[test]
    fn cheaper_execution_breaks_length_ties() {
        let c = rec("c", 6, 10, 100);
        let d = rec("d", 6, 10, 50);
        assert_eq!(compare(&d, &c), Ordering::Less);
    }

    #[test]
    fn passes_dominate_length_and_cost() {
        let long_but_correct = rec("a", 6, 500, 9_000);
        let short_but_wrong = rec("b", 5, 2, 1);
        assert_eq!(compare(&long_but_correct, &short_but_wrong), Ordering::Less);
    }

    #[test]
    fn full_tie_is_equal() {
        let a = rec("a", 3, 7, 7);
        let b = rec("b", 3, 7, 7);
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn rank_key_agrees_with_compare() {
        let records = [
            rec("a", 6, 10, 100),
            rec("b", 6, 10, 50),
            rec("c", 6, 20, 10),
            rec("d", 5, 1, 1),
            rec("e", 6, 10, 100),
        ];
        for a in &records {
            for b in &records {
                assert_eq!(rank_key(a).cmp(&rank_key(b)), compare(a, b));
            }
        }
    }

    #[test]
    fn compare_is_a_strict_weak_order() {
        let mut records = Vec::new();
        for passed in [0, 1, 6] {
            for len in [5, 10] {
                for cost in [50, 100] {
                    records.push(rec("x", passed, len, cost));
                }
            }
        }
        for a in &records {
            assert_eq!(compare(a, a), Ordering::Equal);
            for b in &records {
                assert_eq!(compare(a, b), compare(b, a).reverse());
                for c in &records {
                    if compare(a, b) == Ordering::Less && compare(b, c) == Ordering::Less {
                        assert_eq!(compare(a, c), Ordering::Less);
                    }
                    if compare(a, b) == Ordering::Equal && compare(b, c) == Ordering::Equal {
                        assert_eq!(compare(a, c), Ordering::Equal);
                    }
                }
            }
        }
    }

    #[test]
    fn sort_is_stable_for_full_ties() {
        let mut records = vec![
            rec("first", 2, 8, 8),
            rec("best", 6, 8, 8),
            rec("second", 2, 8, 8),
            rec("third", 2, 8, 8),
        ];
        sort_ranked(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.submitter_name()).collect();
        assert_eq!(names, vec!["best", "first", "second", "third"]);
    }

    #[test]
    fn sort_orders_partially_overlapping_keys() {
        let mut records = vec![
            rec("d", 6, 20, 10),
            rec("b", 6, 10, 50),
            rec("e", 1, 1, 1),
            rec("a", 6, 10, 20),
            rec("c", 6, 10, 100),
        ];
        sort_ranked(&mut records);
        let names: Vec<_> = records.iter().map(|r| r.submitter_name()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn window_order_prefers_earlier_submission_on_full_tie() {
        let early = rec("early", 4, 4, 4);
        let mut late = rec("late", 4, 4, 4);
        late.submitted_at = early.submitted_at() + chrono::Duration::milliseconds(5);
        assert_eq!(window_order(&early, &late), Ordering::Less);
        assert_eq!(compare(&early, &late), Ordering::Equal);
    }
}
