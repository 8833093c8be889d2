//! Currency and number formatting for user entered amounts.
//!
//! Nothing here fails. Text which does not parse as a finite number is
//! treated as zero.

pub const ZERO_CURRENCY: &str = "$0";

/// Parse user entered text as a number.
///
/// Returns 0 for empty text, unparseable text and non-finite values
/// like `inf` or `NaN`.
pub fn safe_number(value: &str) -> f64 {
    parse_finite(value).unwrap_or(0.0)
}

/// Format user entered text as whole dollars with thousands separators.
///
/// Amounts are rounded to the nearest dollar with ties to even, so
/// `"1234567.89"` becomes `"$1,234,568"`. Empty, non-numeric and negative
/// values become `"$0"`.
pub fn format_currency(value: &str) -> String {
    match parse_finite(value) {
        Some(amount) => format_currency_amount(amount),
        None => ZERO_CURRENCY.to_string(),
    }
}

pub fn format_currency_amount(amount: f64) -> String {
    let whole = amount.round_ties_even();
    if !whole.is_finite() || whole <= 0.0 {
        return ZERO_CURRENCY.to_string();
    }

    // Fixed precision formatting prints every integer digit, also for
    // values which do not fit any integer type.
    let digits = format!("{whole:.0}");
    format!("${}", group_thousands(&digits))
}

fn parse_finite(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
