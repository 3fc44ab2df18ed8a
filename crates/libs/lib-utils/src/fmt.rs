//! # Number Formatting
//!
//! Display formatting for prices and volumes.

/// Round to two decimals for display, e.g. `152.0` -> `"152.00"`.
pub fn format_fixed2(value: f64) -> String {
    format!("{:.2}", value)
}

/// Group an integer with comma thousands separators, e.g. `1234567` -> `"1,234,567"`.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
