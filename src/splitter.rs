//! The splitting engine.
//!
//! Turns a payout total into an ordered list of sub-amounts, none above the
//! configured ceiling, that add back up to the total. All arithmetic runs on
//! whole cents so every rounding step is explicit and the final sum is exact.
//!
//! # Invariants
//!
//! For every successful split:
//! - each item is in `(0, ceiling]`
//! - `|sum(items) - total| <= tolerance`
//!
//! Both are checked again before returning; a failure there means a strategy
//! is broken and is reported as an error instead of being patched over.

use crate::config::SplitterConfig;
use crate::decimal::Amount;
use crate::error::{PayoutError, Result};
use crate::strategy::SplitStrategy;
use log::debug;
use rand::Rng;
use std::cmp::Ordering;

/// Smallest amount a single item may carry, in cents.
const MIN_UNIT: i64 = 1;

/// Splits totals under a fixed per-transaction ceiling.
///
/// Random strategies draw from the `Rng` passed to [`AmountSplitter::split`],
/// so a seeded generator gives reproducible batches.
#[derive(Debug, Clone)]
pub struct AmountSplitter {
    config: SplitterConfig,
    ceiling: i64,
}

impl AmountSplitter {
    /// Creates a splitter after validating its configuration.
    pub fn new(config: SplitterConfig) -> Result<Self> {
        config.validate()?;
        let ceiling = config.ceiling.to_cents().ok_or_else(|| {
            PayoutError::InvalidParameter(format!("ceiling {} is too large", config.ceiling))
        })?;
        Ok(AmountSplitter { config, ceiling })
    }

    /// The per-transaction ceiling.
    pub fn ceiling(&self) -> Amount {
        self.config.ceiling
    }

    /// Splits `total` according to `strategy`.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `total <= 0`
    /// - `InvalidParameter` for an explicit count of zero or above `max_payments`
    /// - `InfeasibleSplit` when no partition fits the ceiling and count
    /// - `ReconciliationMismatch` if the result does not add up (a defect)
    pub fn split<R: Rng + ?Sized>(
        &self,
        total: Amount,
        strategy: SplitStrategy,
        rng: &mut R,
    ) -> Result<Vec<Amount>> {
        let total_cents = positive_cents(total).ok_or(PayoutError::InvalidAmount)?;
        let min_payments = min_payments(total_cents, self.ceiling);

        let cents = match strategy {
            SplitStrategy::EqualCapped => {
                self.check_spread_count(total_cents, min_payments)?;
                spread_evenly(total_cents, self.ceiling, min_payments)
            }
            SplitStrategy::RandomizedCount { shuffle } => {
                let count = if shuffle {
                    rng.gen_range(self.config.shuffled_count_min..=self.config.shuffled_count_max)
                } else {
                    self.config.fixed_count
                };
                let count = u64::from(count);
                self.check_spread_count(total_cents, count)?;
                spread_evenly(total_cents, self.ceiling, count)
            }
            SplitStrategy::BoundedRandomAuto => {
                // Never more items than cents, so every drawn count can be filled.
                let max_payments = min_payments
                    .saturating_add(u64::from(self.config.extra_payments))
                    .min(u64::from(self.config.max_payments))
                    .min(total_cents as u64);
                if min_payments > max_payments {
                    return Err(PayoutError::InfeasibleSplit(format!(
                        "Minimum {} payments required but at most {} allowed per batch",
                        min_payments, max_payments
                    )));
                }
                let count = rng.gen_range(min_payments..=max_payments);
                self.draw_bounded(total_cents, count, rng)?
            }
            SplitStrategy::BoundedRandomExplicit { count } => {
                if count == 0 {
                    return Err(PayoutError::InvalidParameter(
                        "payment_count must be greater than zero".to_string(),
                    ));
                }
                if count > self.config.max_payments {
                    return Err(PayoutError::InvalidParameter(format!(
                        "Maximum {} payments allowed per batch",
                        self.config.max_payments
                    )));
                }
                let count = u64::from(count);
                if count < min_payments {
                    return Err(PayoutError::InfeasibleSplit(format!(
                        "Minimum {} payments required for this amount",
                        min_payments
                    )));
                }
                self.draw_bounded(total_cents, count, rng)?
            }
        };

        debug!("Split {} with {} into {} items", total, strategy, cents.len());
        self.verify(total, &cents)
    }

    /// Checks that `amounts` sum to `total` within the configured tolerance.
    pub fn reconcile(&self, total: Amount, amounts: &[Amount]) -> Result<()> {
        let actual: Amount = amounts.iter().sum();
        if actual.abs_diff(total) > self.config.tolerance {
            return Err(PayoutError::ReconciliationMismatch {
                expected: total,
                actual,
            });
        }
        Ok(())
    }

    /// Rejects counts the even-spread formula cannot fill without leaving an
    /// item at zero or pushing one over the ceiling.
    fn check_spread_count(&self, total: i64, count: u64) -> Result<()> {
        if count == 0 {
            return Err(PayoutError::InfeasibleSplit(
                "Cannot process zero payments".to_string(),
            ));
        }
        if count > self.config.max_split_count {
            return Err(PayoutError::InfeasibleSplit(format!(
                "{} payments exceed the limit of {}",
                count, self.config.max_split_count
            )));
        }
        // count <= max_split_count, which is far below i64::MAX.
        let count = count as i64;
        if total < count * MIN_UNIT {
            return Err(PayoutError::InfeasibleSplit(format!(
                "{} payments need at least {}",
                count,
                Amount::from_cents(count * MIN_UNIT)
            )));
        }
        if total > self.ceiling.saturating_mul(count) {
            return Err(PayoutError::InfeasibleSplit(format!(
                "{} payments cannot carry more than {}",
                count,
                Amount::from_cents(self.ceiling.saturating_mul(count))
            )));
        }
        Ok(())
    }

    /// Draws each item but the last uniformly from its feasibility window.
    ///
    /// The window `[min, max]` for item `i` keeps the rest solvable: the
    /// remaining items can still absorb what is left without exceeding the
    /// ceiling, and each of them can still get at least one cent.
    fn draw_bounded<R: Rng + ?Sized>(
        &self,
        total: i64,
        count: u64,
        rng: &mut R,
    ) -> Result<Vec<i64>> {
        let ceiling = self.ceiling;
        let mut remaining = total;
        let mut cents = Vec::with_capacity(count as usize);

        for i in 0..count.saturating_sub(1) {
            // Bounded by max_payments, fits in i64.
            let after = (count - i - 1) as i64;
            let min_val = MIN_UNIT.max(remaining.saturating_sub(ceiling.saturating_mul(after)));
            let max_val = ceiling.min(remaining - after * MIN_UNIT);
            if min_val > max_val {
                return Err(PayoutError::InfeasibleSplit(format!(
                    "no amount fits payment {} of {} (window {} to {})",
                    i + 1,
                    count,
                    Amount::from_cents(min_val),
                    Amount::from_cents(max_val)
                )));
            }

            let amount = rng.gen_range(min_val..=max_val);
            debug!(
                "Payment {}/{}: drew {} from [{}, {}]",
                i + 1,
                count,
                Amount::from_cents(amount),
                Amount::from_cents(min_val),
                Amount::from_cents(max_val)
            );
            cents.push(amount);
            remaining -= amount;
        }

        if remaining > ceiling || remaining < MIN_UNIT {
            return Err(PayoutError::InfeasibleSplit(format!(
                "Final payment {} exceeds maximum allowed amount or is not positive",
                Amount::from_cents(remaining)
            )));
        }
        cents.push(remaining);
        Ok(cents)
    }

    /// Final item and sum checks, then conversion back to amounts.
    fn verify(&self, total: Amount, cents: &[i64]) -> Result<Vec<Amount>> {
        if let Some(pos) = cents.iter().position(|&c| c < MIN_UNIT || c > self.ceiling) {
            return Err(PayoutError::InfeasibleSplit(format!(
                "payment {} of {} is {}, outside (0, {}]",
                pos + 1,
                cents.len(),
                Amount::from_cents(cents[pos]),
                self.config.ceiling
            )));
        }

        let amounts: Vec<Amount> = cents.iter().map(|&c| Amount::from_cents(c)).collect();
        self.reconcile(total, &amounts)?;
        Ok(amounts)
    }
}

/// Cent value of a strictly positive amount.
fn positive_cents(amount: Amount) -> Option<i64> {
    amount.to_cents().filter(|&cents| cents > 0)
}

/// `ceil(total / ceiling)` for positive inputs.
fn min_payments(total: i64, ceiling: i64) -> u64 {
    let whole = total / ceiling;
    let partial = if total % ceiling > 0 { 1 } else { 0 };
    (whole + partial) as u64
}

/// Average-of-remaining spread: each item takes the remaining total divided by
/// the items left, rounded to the cent and capped at the ceiling; the last item
/// takes whatever remains.
fn spread_evenly(total: i64, ceiling: i64, count: u64) -> Vec<i64> {
    let mut remaining = total;
    let mut cents = Vec::with_capacity(count as usize);

    for i in 0..count {
        let left = count - i;
        let amount = if left == 1 {
            remaining
        } else {
            ceiling.min(div_round_half_even(remaining, left as i64))
        };
        cents.push(amount);
        remaining -= amount;
    }

    cents
}

/// Integer division rounded to nearest, ties to even. `value >= 0`, `divisor > 0`.
fn div_round_half_even(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    let remainder = value % divisor;
    match (remainder * 2).cmp(&divisor) {
        Ordering::Greater => quotient + 1,
        Ordering::Equal if quotient % 2 != 0 => quotient + 1,
        _ => quotient,
    }
}
