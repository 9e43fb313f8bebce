use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as whole US dollars: `$1,234`, `-$50`.
///
/// Cents are rounded half away from zero.
pub fn currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "$0".to_string();
    }

    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

/// Formats a percentage with one decimal place: `12.3%`.
pub fn percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.0%".to_string();
    }
    format!("{rounded:.1}%")
}

/// Formats a rate stored as a fraction (`0.22`) as a percentage (`22%`).
pub fn rate(value: Decimal) -> String {
    let percent = (value * Decimal::ONE_HUNDRED).normalize();
    format!("{percent}%")
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
