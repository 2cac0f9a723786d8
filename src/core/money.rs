//! Cent rounding and BRL display helpers.
//!
//! The engine works on exact decimals. Every percentage application is
//! rounded to cents on the spot with [`round2`]; totals are sums of already
//! rounded terms.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Round to 2 decimal places, half away from zero (commercial rounding).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `round2(base × rate / 100)`.
pub fn percent_of(base: Decimal, rate: Decimal) -> Decimal {
    round2(base * rate / dec!(100))
}

/// Apply a percentage discount: `round2(gross × (1 − pct/100))`.
pub fn apply_discount(gross: Decimal, discount_pct: Decimal) -> Decimal {
    round2(gross * (Decimal::ONE - discount_pct / dec!(100)))
}

/// Format an amount as Brazilian reais for display, e.g. `R$ 1.282,50`.
///
/// Display only; never feed the result back into a computation.
pub fn format_brl(value: Decimal) -> String {
    let mut amount = round2(value).abs();
    amount.rescale(2);
    let digits = amount.to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if round2(value) < Decimal::ZERO { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac_part}")
}
