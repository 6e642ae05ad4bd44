//! Price Math
//!
//! Discount labels and the two-installment split. Pure functions over cents.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::model::InstallmentBreakdown;

/// Installments are only ever split two ways
pub const SPLIT_PAYMENT_COUNT: u8 = 2;

/// Two whole-dollar halves
const WHOLE_DOLLAR_PAIR_CENTS: i64 = 200;
const CENTS_PER_DOLLAR: i64 = 100;

/// Percentage-off label such as `-20%`.
///
/// `None` when there is no valid prior price: missing, not positive, not above
/// `new_cents`, or `new_cents` negative. Rounds half up to a whole percent.
pub fn discount_label(old_cents: Option<i64>, new_cents: i64) -> Option<String> {
    let old_cents = old_cents.filter(|&old| old > 0)?;
    if new_cents < 0 || old_cents <= new_cents {
        return None;
    }

    let percent = Decimal::from(old_cents - new_cents) * dec!(100) / Decimal::from(old_cents);
    let rounded = percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    Some(format!("-{rounded}%"))
}

/// Split `total_cents` across `payment_count` payments.
///
/// Anything other than two payments is collected in full today. For two
/// payments an exact whole-dollar half is used when possible, otherwise the
/// first payment is rounded up to the next whole dollar and the remainder is
/// collected later. Totals too small to round up that way are not split, so the
/// second payment is never negative.
pub fn installment_split(total_cents: i64, payment_count: u8) -> InstallmentBreakdown {
    if payment_count != SPLIT_PAYMENT_COUNT || total_cents <= 0 {
        return InstallmentBreakdown::single(total_cents);
    }

    let first_cents = if total_cents % WHOLE_DOLLAR_PAIR_CENTS == 0 {
        total_cents / 2
    } else {
        // total_cents > 0 here, so this is ceil(total / 200) without overflow
        ((total_cents - 1) / WHOLE_DOLLAR_PAIR_CENTS + 1) * CENTS_PER_DOLLAR
    };

    if first_cents > total_cents {
        tracing::debug!(total_cents, "Total too small to split into installments");
        return InstallmentBreakdown::single(total_cents);
    }

    InstallmentBreakdown {
        has_installments: true,
        first_cents,
        second_cents: total_cents - first_cents,
    }
}
