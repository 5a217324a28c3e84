//! The test battery.
//!
//! Values and order are part of the competition contract: scores are only
//! comparable when produced against the same battery.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Inputs of the standard competition battery.
pub const STANDARD_INPUTS: [u64; 35] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 75, 90, 100, 150,
    200, 250, 300, 350, 400, 450, 500, 550, 555, 560,
];

/// Ordered, immutable sequence of non-negative inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestBattery {
    inputs: Vec<u64>,
}

impl TestBattery {
    /// The standard 35-input battery.
    pub fn standard() -> Self {
        Self::new(STANDARD_INPUTS.to_vec())
    }

    /// A custom battery. Order is preserved as given.
    pub fn new(inputs: Vec<u64>) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &[u64] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.inputs.iter().copied()
    }

    /// Largest input, if any.
    pub fn max_input(&self) -> Option<u64> {
        self.inputs.iter().copied().max()
    }

    /// SHA-256 hex digest over the inputs in order (little-endian u64s).
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for input in &self.inputs {
            hasher.update(input.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

impl Default for TestBattery {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_battery_shape() {
        let battery = TestBattery::standard();
        assert_eq!(battery.len(), 35);
        assert_eq!(battery.inputs()[0], 0);
        assert_eq!(battery.max_input(), Some(560));
    }

    #[test]
    fn order_is_preserved() {
        let battery = TestBattery::new(vec![5, 0, 3]);
        assert_eq!(battery.iter().collect::<Vec<_>>(), vec![5, 0, 3]);
    }

    #[test]
    fn digest_depends_on_order() {
        let a = TestBattery::new(vec![1, 2]);
        let b = TestBattery::new(vec![2, 1]);
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest(), TestBattery::new(vec![1, 2]).digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn empty_battery() {
        let battery = TestBattery::new(Vec::new());
        assert!(battery.is_empty());
        assert_eq!(battery.max_input(), None);
    }
}
