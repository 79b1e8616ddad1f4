//! Exact arithmetic utilities for monetary calculations.
//!
//! Every amount in the engine is a [`Decimal`]; binary floating point never
//! appears anywhere in the pipeline. All helpers here are pure and total for
//! finite, non-negative inputs — negative values are rejected by callers
//! during input validation, not here.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::error::{EngineError, EngineResult};

/// Rounds a value half-up to 2 decimal places (cents).
///
/// This is the rounding applied at every intermediate stage of the
/// calculation pipeline.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("10.005").unwrap();
/// assert_eq!(round_to_cents(value), Decimal::from_str("10.01").unwrap());
/// ```
pub fn round_to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a value half-up to the nearest $5.
///
/// This is the mandated final presentation rounding; intermediate sums use
/// cent rounding only.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::round_to_nearest_five;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("1232.50").unwrap();
/// assert_eq!(round_to_nearest_five(value), Decimal::from_str("1235").unwrap());
/// ```
pub fn round_to_nearest_five(value: Decimal) -> Decimal {
    let five = Decimal::from(5);
    (value / five).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * five
}

/// Rounds a value half-up to the nearest $10.
pub fn round_to_nearest_ten(value: Decimal) -> Decimal {
    let ten = Decimal::from(10);
    (value / ten).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * ten
}

/// Rounds a value down to the nearest $5.
pub fn round_down_to_five(value: Decimal) -> Decimal {
    let five = Decimal::from(5);
    (value / five).round_dp_with_strategy(0, RoundingStrategy::ToZero) * five
}

/// Rounds a value up to the nearest $5.
pub fn round_up_to_five(value: Decimal) -> Decimal {
    let five = Decimal::from(5);
    (value / five).round_dp_with_strategy(0, RoundingStrategy::AwayFromZero) * five
}

/// Calculates `base * percent / 100`, cent-rounded.
///
/// # Example
///
/// ```
/// use estimate_engine::calculation::percentage_of;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let base = Decimal::from_str("1000.00").unwrap();
/// let percent = Decimal::from_str("25.5").unwrap();
/// assert_eq!(percentage_of(base, percent), Decimal::from_str("255.00").unwrap());
/// ```
pub fn percentage_of(base: Decimal, percent: Decimal) -> Decimal {
    round_to_cents(base * percent / Decimal::ONE_HUNDRED)
}

/// Adds a percentage to a base amount, cent-rounded.
pub fn add_percentage(base: Decimal, percent: Decimal) -> Decimal {
    round_to_cents(base + percentage_of(base, percent))
}

/// Formats a value as a currency string, e.g. `$1,234.56`.
///
/// With `include_cents` set to `false` the value is first rounded half-up
/// to whole dollars and rendered without a fractional part.
pub fn format_currency(value: Decimal, include_cents: bool) -> String {
    let negative = value.is_sign_negative();
    let magnitude = value.abs();

    let (integer_part, fraction_part) = if include_cents {
        let cents = round_to_cents(magnitude);
        let rendered = format!("{cents:.2}");
        match rendered.split_once('.') {
            Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
            None => (rendered, Some("00".to_string())),
        }
    } else {
        let dollars = magnitude.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        (format!("{dollars:.0}"), None)
    };

    let grouped = group_thousands(&integer_part);
    let sign = if negative { "-" } else { "" };
    match fraction_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Parses a currency string such as `$1,234.56` or `1234.56` into a
/// [`Decimal`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] if the string is not a valid
/// decimal amount after stripping currency symbols and separators.
pub fn parse_currency(value: &str) -> EngineResult<Decimal> {
    let cleaned = value.replace(['$', ','], "");
    let cleaned = cleaned.trim();

    Decimal::from_str(cleaned).map_err(|_| EngineError::InvalidInput {
        field: "amount".to_string(),
        message: format!("cannot parse '{value}' as currency"),
    })
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
