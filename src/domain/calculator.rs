use super::fee_rule::FeeRule;
use crate::error::{FeeError, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places surcharges are charged in.
pub const FEE_SCALE: u32 = 2;

/// Computes the surcharge for `total` under `rule`.
///
/// `fee = fixed + total * percent / 100`, rounded up to whole cents so the
/// surcharge never falls short of the configured percentage. Totals too large
/// for the decimal range are rejected with [`FeeError::AmountOverflow`].
pub fn compute_fee(total: Decimal, rule: &FeeRule) -> Result<Decimal> {
    if rule.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let fee = total
        .checked_mul(rule.percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|variable| variable.checked_add(rule.fixed))
        .ok_or_else(|| {
            FeeError::AmountOverflow(format!(
                "fee on {total} with rule {}+{}% overflows",
                rule.fixed, rule.percent
            ))
        })?;
    Ok(fee.round_dp_with_strategy(FEE_SCALE, RoundingStrategy::ToPositiveInfinity))
}

/// Formats an amount with exactly two decimals and no grouping, e.g. `9.40`.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(FEE_SCALE))
}
