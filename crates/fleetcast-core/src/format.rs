//! Display formatting for forecast numbers.

use crate::projector::ForecastResult;

/// Insert `,` every three digits: `1234567` → `1,234,567`.
#[must_use]
pub fn group_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `12,345 Units`
#[must_use]
pub fn format_units(volume: u64) -> String {
    format!("{} Units", group_thousands(volume))
}

/// Whole-dollar currency: `$1,234,568`. Negative and NaN input shows `$0`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    let clamped = if amount > 0.0 { amount } else { 0.0 };
    let whole = format!("{clamped:.0}");
    format!("${}", group_digits(&whole))
}

/// `(volume, revenue)` as display strings.
#[must_use]
pub fn format_result(result: &ForecastResult) -> (String, String) {
    (format_units(result.volume), format_currency(result.revenue))
}
