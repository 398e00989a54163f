//! Display text for prices and percent changes.
//!
//! Prices: `$` prefix, comma thousands separators, 2 to 3 fraction digits
//! (`$67,123.45`, `$0.123`). Percents are always 2 fraction digits.
//! Rounding is half away from zero.

use crate::types::Tone;
use pulse_core::{Percent, Price};
use rust_decimal::{Decimal, RoundingStrategy};

const MAX_PRICE_DP: u32 = 3;
const MIN_PRICE_DP: u32 = 2;
const PERCENT_DP: u32 = 2;

/// Row and detail price: `$1,234.50`.
pub fn price_text(price: Price) -> String {
    format!("${}", group_thousands(&fixed_range(price.inner(), MIN_PRICE_DP, MAX_PRICE_DP)))
}

/// Top movers card price, no minimum fraction digits: `$1,234.5`.
pub fn card_price_text(price: Price) -> String {
    format!("${}", group_thousands(&fixed_range(price.inner(), 0, MAX_PRICE_DP)))
}

/// Row percent with arrow: `▲ 1.23%` / `▼ 1.23%`.
pub fn row_change_text(change: Percent) -> String {
    let arrow = if change.is_non_negative() { '▲' } else { '▼' };
    format!("{arrow} {}%", fixed(change.abs().inner(), PERCENT_DP))
}

/// Detail percent with explicit sign: `+1.23%` / `-1.23%`.
pub fn detail_change_text(change: Percent) -> String {
    let sign = if change.is_non_negative() { '+' } else { '-' };
    format!("{sign}{}%", fixed(change.abs().inner(), PERCENT_DP))
}

/// Top movers card percent: `1.23%` / `-1.23%`.
pub fn card_change_text(change: Percent) -> String {
    let sign = if change.is_non_negative() { "" } else { "-" };
    format!("{sign}{}%", fixed(change.abs().inner(), PERCENT_DP))
}

/// Badge color: zero counts as positive.
pub fn tone_for(change: Percent) -> Tone {
    if change.is_non_negative() {
        Tone::Positive
    } else {
        Tone::Negative
    }
}

fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Exactly `dp` fraction digits.
fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = round(value, dp);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Between `min_dp` and `max_dp` fraction digits, trailing zeros trimmed.
fn fixed_range(value: Decimal, min_dp: u32, max_dp: u32) -> String {
    let mut rounded = round(value, max_dp).normalize();
    if rounded.scale() < min_dp {
        rounded.rescale(min_dp);
    }
    rounded.to_string()
}

/// Insert `,` every three digits of the integer part.
fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
