//! Human-readable figures for conversion summaries.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Formats a byte count with a binary (1024) base: `1536` becomes `"1.5 KB"`.
///
/// At most two decimals are shown and trailing zeros are dropped.
/// Sizes past the gigabyte range stay in GB.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 B");
    }
    let mut unit = 0;
    let mut threshold = 1024_u64;
    while unit < UNITS.len() - 1 && bytes >= threshold {
        unit += 1;
        threshold = threshold.saturating_mul(1024);
    }
    let value = bytes as f64 / 1024_f64.powi(unit as i32);
    format!("{} {}", trim_decimals(&format!("{value:.2}")), UNITS[unit])
}

fn trim_decimals(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// `(1 - new/original) * 100`, rounded to one decimal.
///
/// Negative when the output grew. An empty original reports zero savings.
pub fn savings_percent(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    let ratio = new_size as f64 / original_size as f64;
    ((1.0 - ratio) * 1000.0).round() / 10.0
}
