//! Permissive coercion of free-form form text into numbers.
//!
//! Nothing here ever fails: empty, non-numeric, non-finite or negative input becomes 0
//! and the calculators run against that.

/// Currency amounts such as `"10,000,000"`.
pub fn parse_amount(raw: &str) -> f64 {
    non_negative(parse_leading_float(&strip_grouping(raw)))
}

/// A percentage as typed by the user (`"7"` means 7%), not yet divided by 100.
pub fn parse_rate_percent(raw: &str) -> f64 {
    non_negative(parse_leading_float(&strip_grouping(raw)))
}

/// Whole-number fields (ages, durations). Fractional input is truncated.
pub fn parse_whole(raw: &str) -> u32 {
    let cleaned = strip_grouping(raw);
    let text = cleaned.trim_start();
    let (sign_len, negative) = match text.as_bytes().first() {
        Some(b'-') => (1, true),
        Some(b'+') => (1, false),
        _ => (0, false),
    };
    let digits = &text[sign_len..];
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if negative || end == 0 {
        return 0;
    }
    match digits[..end].parse::<u64>() {
        Ok(v) => u32::try_from(v).unwrap_or(u32::MAX),
        Err(_) => u32::MAX,
    }
}

/// Coerces an already-numeric value with the same rules as the text parsers.
pub fn coerce_number(value: f64) -> f64 {
    non_negative(Some(value))
}

/// Truncating counterpart of [`coerce_number`] for whole-number fields.
pub fn coerce_whole(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    if value >= u32::MAX as f64 {
        return u32::MAX;
    }
    value.trunc() as u32
}

fn strip_grouping(raw: &str) -> String {
    raw.chars().filter(|c| *c != ',').collect()
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Parses the longest prefix that reads as a decimal float, ignoring leading
/// whitespace and any trailing garbage.
fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
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

    text[..end].parse::<f64>().ok()
}
