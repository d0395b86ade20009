use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};

/// Correction that moves a bill total onto a payable 5-cent denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundingAdjustment {
    /// Signed adjustment in currency units, always between -0.02 and +0.02.
    pub amount: BigDecimal,
    /// Signed two-decimal label, e.g. `"-0.01"`, `"0.00"`, `"+0.02"`.
    pub description: String,
}

/// Computes the adjustment needed to settle `amount` on a cent value ending in 0 or 5.
///
/// Only the last digit of the cents counts: .x1 and .x2 round down, .x3 to .x7 go to .x5, and
/// .x8 and .x9 round up to the next ten. The whole-currency part never matters, so
/// negative amounts use their Euclidean fraction.
pub fn rounding_adjustment(amount: &BigDecimal) -> RoundingAdjustment {
    let fraction = amount - amount.with_scale_round(0, RoundingMode::Floor);
    let cents = (fraction * BigDecimal::from(100)).with_scale_round(0, RoundingMode::HalfUp);
    // cents is in 0..=100
    let last_digit = i64::from(cents.to_u32().map_or(0, |c| c % 10));

    let adjustment_cents = match last_digit {
        0 | 5 => 0,
        1 | 2 => -last_digit,
        3..=7 => 5 - last_digit,
        // 8 or 9
        _ => 10 - last_digit,
    };

    RoundingAdjustment {
        amount: BigDecimal::new(adjustment_cents.into(), 2),
        description: describe(adjustment_cents),
    }
}

fn describe(adjustment_cents: i64) -> String {
    let sign = match adjustment_cents.signum() {
        1 => "+",
        -1 => "-",
        _ => "",
    };
    format!("{sign}0.{:02}", adjustment_cents.abs())
}
