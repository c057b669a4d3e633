use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to cents, halves away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `ceil(base * percentage / 100)` to the next whole currency unit.
pub fn percentage_of_ceil(base: Decimal, percentage: Decimal) -> Decimal {
    (base * percentage / Decimal::ONE_HUNDRED).ceil()
}

/// Human-readable percentage, e.g. `11%` or `0.5%`.
pub fn format_percentage(percentage: Decimal) -> String {
    format!("{}%", percentage.normalize())
}

pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount)
}
