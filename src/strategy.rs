//! Split strategies and their resolution from numeric method codes.

use crate::error::{PayoutError, Result};
use std::fmt;

/// How a total is divided into sub-transactions.
///
/// Each variant carries the parameters it needs, so callers cannot pass a
/// count to a strategy that ignores it or forget one where it is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// Fewest possible items, amounts spread evenly under the ceiling.
    EqualCapped,

    /// Fixed count, or a count drawn from a small range when `shuffle` is set,
    /// amounts spread evenly.
    RandomizedCount { shuffle: bool },

    /// Random count above the minimum, random amounts inside feasibility windows.
    BoundedRandomAuto,

    /// Caller-chosen count, random amounts inside feasibility windows.
    BoundedRandomExplicit { count: u32 },
}

impl SplitStrategy {
    /// Resolves a request's method code (1-4) and optional parameters.
    ///
    /// `payment_count` is only consulted for method 4, `shuffle` only for method 2.
    pub fn from_method(method: i64, payment_count: Option<i64>, shuffle: bool) -> Result<Self> {
        match method {
            1 => Ok(SplitStrategy::EqualCapped),
            2 => Ok(SplitStrategy::RandomizedCount { shuffle }),
            3 => Ok(SplitStrategy::BoundedRandomAuto),
            4 => {
                let count = payment_count.ok_or_else(|| {
                    PayoutError::InvalidParameter(
                        "payment_count must be specified for method 4".to_string(),
                    )
                })?;
                if count <= 0 {
                    return Err(PayoutError::InvalidParameter(
                        "payment_count must be greater than zero".to_string(),
                    ));
                }
                let count = u32::try_from(count).map_err(|_| {
                    PayoutError::InvalidParameter(format!("payment_count {} is too large", count))
                })?;
                Ok(SplitStrategy::BoundedRandomExplicit { count })
            }
            _ => Err(PayoutError::InvalidParameter(
                "Invalid method. Use 1, 2, 3, or 4.".to_string(),
            )),
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::EqualCapped => write!(f, "equal-capped"),
            SplitStrategy::RandomizedCount { shuffle } => {
                write!(f, "randomized-count(shuffle={})", shuffle)
            }
            SplitStrategy::BoundedRandomAuto => write!(f, "bounded-random-auto"),
            SplitStrategy::BoundedRandomExplicit { count } => {
                write!(f, "bounded-random-explicit({})", count)
            }
        }
    }
}
