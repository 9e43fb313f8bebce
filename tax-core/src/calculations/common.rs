//! Common utility functions for tax calculations.
//!
//! This module provides the amount coercion rule shared by every free-text
//! field, plus rounding and comparison helpers used across the pipeline.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

/// Largest magnitude accepted from a free-text field.
///
/// Seven fields at this size, taxed at any rate, still fit in [`Decimal`].
/// Larger values coerce to zero.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000000000000);

/// Coerces a free-text field into an amount. Never fails.
///
/// The rule, applied in order:
///
/// 1. Surrounding whitespace is trimmed; `,` thousands separators and `$`
///    signs are removed.
/// 2. The longest leading numeric prefix is taken
///    (`[+-]digits[.digits][e[+-]digits]`), so `"12.5kg"` reads as `12.5`
///    the same way a browser number field would.
/// 3. Empty input, input without a numeric prefix, and values whose magnitude
///    exceeds [`MAX_AMOUNT`] all become zero.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::coerce_amount;
///
/// assert_eq!(coerce_amount("60000"), dec!(60000));
/// assert_eq!(coerce_amount("$1,234.50"), dec!(1234.50));
/// assert_eq!(coerce_amount("1.5e3"), dec!(1500));
/// assert_eq!(coerce_amount(""), Decimal::ZERO);
/// assert_eq!(coerce_amount("n/a"), Decimal::ZERO);
/// ```
pub fn coerce_amount(input: &str) -> Decimal {
    let normalized: String = input
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    let prefix = numeric_prefix(&normalized);
    if prefix.is_empty() {
        warn!(input = %input, "not a number, using 0");
        return Decimal::ZERO;
    }
    if prefix.len() < normalized.len() {
        debug!(input = %input, used = %prefix, "ignoring trailing characters");
    }

    let parsed = match prefix.find(['e', 'E']) {
        Some(split) => parse_mantissa(&prefix[..split])
            .map(|mantissa| format!("{mantissa}e{}", &prefix[split + 1..]))
            .and_then(|s| Decimal::from_scientific(&s).ok()),
        None => parse_mantissa(prefix).and_then(|s| s.parse::<Decimal>().ok()),
    };

    match parsed {
        Some(value) if value.abs() <= MAX_AMOUNT => value.normalize(),
        Some(value) => {
            warn!(input = %input, %value, "amount out of range, using 0");
            Decimal::ZERO
        }
        None => {
            warn!(input = %input, "unparseable amount, using 0");
            Decimal::ZERO
        }
    }
}

/// Returns the longest prefix of `s` that forms a decimal number, optionally
/// followed by an exponent. Returns an empty slice when there is none.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Rewrites a sign/digits/point mantissa into a form [`Decimal`] parses:
/// no leading `+`, no bare leading or trailing `.`.
fn parse_mantissa(mantissa: &str) -> Option<String> {
    let (negative, unsigned) = match mantissa.as_bytes().first() {
        Some(b'-') => (true, &mantissa[1..]),
        Some(b'+') => (false, &mantissa[1..]),
        _ => (false, mantissa),
    };
    let unsigned = unsigned.strip_suffix('.').unwrap_or(unsigned);
    if unsigned.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(unsigned.len() + 2);
    if negative {
        out.push('-');
    }
    if unsigned.starts_with('.') {
        out.push('0');
    }
    out.push_str(unsigned);
    Some(out)
}

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero.
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Divides, returning zero when the denominator is zero or the quotient
/// does not fit.
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // coerce_amount tests
    // =========================================================================

    #[test]
    fn coerce_amount_parses_plain_integers() {
        assert_eq!(coerce_amount("60000"), dec!(60000));
    }

    #[test]
    fn coerce_amount_parses_decimals() {
        assert_eq!(coerce_amount("1234.56"), dec!(1234.56));
    }

    #[test]
    fn coerce_amount_treats_empty_as_zero() {
        assert_eq!(coerce_amount(""), Decimal::ZERO);
        assert_eq!(coerce_amount("   "), Decimal::ZERO);
    }

    #[test]
    fn coerce_amount_treats_garbage_as_zero() {
        assert_eq!(coerce_amount("abc"), Decimal::ZERO);
        assert_eq!(coerce_amount("-"), Decimal::ZERO);
        assert_eq!(coerce_amount("."), Decimal::ZERO);
        assert_eq!(coerce_amount("e5"), Decimal::ZERO);
    }

    #[test]
    fn coerce_amount_strips_currency_and_grouping() {
        assert_eq!(coerce_amount("$1,234,567.89"), dec!(1234567.89));
        assert_eq!(coerce_amount("  2,500 "), dec!(2500));
    }

    #[test]
    fn coerce_amount_keeps_sign() {
        assert_eq!(coerce_amount("-500"), dec!(-500));
        assert_eq!(coerce_amount("+500"), dec!(500));
    }

    #[test]
    fn coerce_amount_uses_leading_numeric_prefix() {
        assert_eq!(coerce_amount("12.5kg"), dec!(12.5));
        assert_eq!(coerce_amount("100 dollars"), dec!(100));
        assert_eq!(coerce_amount("3.14.15"), dec!(3.14));
    }

    #[test]
    fn coerce_amount_accepts_bare_point_forms() {
        assert_eq!(coerce_amount(".5"), dec!(0.5));
        assert_eq!(coerce_amount("5."), dec!(5));
        assert_eq!(coerce_amount("-.25"), dec!(-0.25));
    }

    #[test]
    fn coerce_amount_accepts_exponents() {
        assert_eq!(coerce_amount("1.5e3"), dec!(1500));
        assert_eq!(coerce_amount("25E-1"), dec!(2.5));
    }

    #[test]
    fn coerce_amount_ignores_incomplete_exponent() {
        assert_eq!(coerce_amount("7e"), dec!(7));
        assert_eq!(coerce_amount("7e+"), dec!(7));
    }

    #[test]
    fn coerce_amount_keeps_large_values() {
        assert_eq!(coerce_amount("2e15"), dec!(2000000000000000));
        assert_eq!(coerce_amount("2000000000000000"), dec!(2000000000000000));
        assert_eq!(coerce_amount("1e24"), MAX_AMOUNT);
    }

    #[test]
    fn coerce_amount_rejects_out_of_range_values() {
        assert_eq!(coerce_amount("1e25"), Decimal::ZERO);
        assert_eq!(coerce_amount("-1e25"), Decimal::ZERO);
        assert_eq!(coerce_amount("1e400"), Decimal::ZERO);
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    #[test]
    fn round_half_up_absorbs_division_residue() {
        let residue = dec!(45400.000000000000000000000002);

        assert_eq!(round_half_up(residue), dec!(45400.00));
    }

    // =========================================================================
    // non_negative / ratio_or_zero tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_at_zero() {
        assert_eq!(non_negative(dec!(-0.01)), Decimal::ZERO);
        assert_eq!(non_negative(dec!(12.34)), dec!(12.34));
    }

    #[test]
    fn ratio_or_zero_guards_zero_denominator() {
        assert_eq!(ratio_or_zero(dec!(14600), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn ratio_or_zero_divides() {
        assert_eq!(ratio_or_zero(dec!(200000), dec!(50000)), dec!(4));
    }
}
