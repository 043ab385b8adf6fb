//! Balance readings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of reading a scope's balance.
///
/// Allow-listed accounts read as `Unbounded` — consumption never decrements
/// them and grants are unnecessary, so callers must not treat the sentinel
/// as a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceReading {
    Credits(i64),
    Unbounded,
}

impl BalanceReading {
    /// Whether this reading covers a cost (`Unbounded` covers everything).
    pub fn covers(&self, cost: u32) -> bool {
        match self {
            BalanceReading::Credits(n) => *n >= i64::from(cost),
            BalanceReading::Unbounded => true,
        }
    }

    /// The numeric balance, if bounded.
    pub fn credits(&self) -> Option<i64> {
        match self {
            BalanceReading::Credits(n) => Some(*n),
            BalanceReading::Unbounded => None,
        }
    }
}

impl fmt::Display for BalanceReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceReading::Credits(n) => write!(f, "{n}"),
            BalanceReading::Unbounded => write!(f, "∞"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_compares_against_cost() {
        assert!(BalanceReading::Credits(5).covers(5));
        assert!(!BalanceReading::Credits(4).covers(5));
        assert!(BalanceReading::Unbounded.covers(u32::MAX));
    }
}
