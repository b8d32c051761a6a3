//! Display helpers for won amounts and rates. Nothing in `core` depends on these.

const GROUP_UNITS: [&str; 5] = ["", "만", "억", "조", "경"];
const DIGIT_WORDS: [&str; 10] = ["", "일", "이", "삼", "사", "오", "육", "칠", "팔", "구"];
const PLACE_WORDS: [&str; 4] = ["", "십", "백", "천"];

/// Rounds to the won and groups thousands, e.g. `₩12,345,679`.
pub fn format_won(value: f64, with_symbol: bool) -> String {
    let rounded = value.round();
    let grouped = group_thousands(&format!("{:.0}", rounded.abs()));
    let sign = if rounded < 0.0 { "-" } else { "" };
    let symbol = if with_symbol { "₩" } else { "" };
    format!("{sign}{symbol}{grouped}")
}

/// Inserts a comma every three digits from the right. Non-digit input is returned as-is.
pub fn group_thousands(digits: &str) -> String {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Reads a number out in Korean words in groups of 10^4, e.g.
/// `123_456_789` → `일억 이천삼백사십오만 육천칠백팔십구`.
///
/// A leading 일 is dropped before 십, 백 and 천 (`1_000` → `천`), but kept before a
/// group unit (`10_000` → `일만`). Zero reads as an empty string.
pub fn korean_numeral(value: u64) -> String {
    let mut groups = Vec::new();
    let mut rest = value;
    let mut unit = 0;
    while rest > 0 {
        let chunk = (rest % 10_000) as usize;
        if chunk > 0 {
            groups.push(format!("{}{}", chunk_words(chunk), GROUP_UNITS[unit]));
        }
        rest /= 10_000;
        unit += 1;
    }
    groups.reverse();
    groups.join(" ")
}

/// Korean reading of a won amount, rounded to the unit; negative or non-finite amounts
/// read as empty.
pub fn korean_won(value: f64) -> String {
    if !value.is_finite() || value < 0.0 {
        return String::new();
    }
    korean_numeral(value.round().min(u64::MAX as f64) as u64)
}

/// Percent with two decimals, e.g. `9.87%`. `rate_percent` is already in percent.
pub fn format_rate_percent(rate_percent: f64) -> String {
    format!("{rate_percent:.2}%")
}

fn chunk_words(chunk: usize) -> String {
    let mut words = String::new();
    let mut rest = chunk;
    let mut place = 0;
    let mut parts = Vec::with_capacity(4);
    while rest > 0 {
        let digit = rest % 10;
        if digit > 0 {
            let word = if digit == 1 && place > 0 {
                ""
            } else {
                DIGIT_WORDS[digit]
            };
            parts.push((word, PLACE_WORDS[place]));
        }
        rest /= 10;
        place += 1;
    }
    for (digit, place) in parts.into_iter().rev() {
        words.push_str(digit);
        words.push_str(place);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn won_formatting_rounds_and_groups() {
        assert_eq!(format_won(12_345_678.5, true), "₩12,345,679");
        assert_eq!(format_won(999.4, false), "999");
        assert_eq!(format_won(0.0, true), "₩0");
        assert_eq!(format_won(-1_500_000.0, true), "-₩1,500,000");
        assert_eq!(format_won(-0.2, false), "0");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567"), "1,234,567");
        assert_eq!(group_thousands(""), "");
        assert_eq!(group_thousands("12a"), "12a");
    }

    #[test]
    fn korean_numeral_reads_groups_of_ten_thousand() {
        assert_eq!(korean_numeral(0), "");
        assert_eq!(korean_numeral(7), "칠");
        assert_eq!(korean_numeral(1_000), "천");
        assert_eq!(korean_numeral(1_111), "천백십일");
        assert_eq!(korean_numeral(10_000), "일만");
        assert_eq!(korean_numeral(12_345), "일만 이천삼백사십오");
        assert_eq!(korean_numeral(100_000_000), "일억");
        assert_eq!(korean_numeral(123_456_789), "일억 이천삼백사십오만 육천칠백팔십구");
        assert_eq!(korean_numeral(4_000_000), "사백만");
        assert_eq!(korean_numeral(1_300_000_005), "십삼억 오");
    }

    #[test]
    fn korean_won_handles_degenerate_values() {
        assert_eq!(korean_won(1_500_000.4), "백오십만");
        assert_eq!(korean_won(-5.0), "");
        assert_eq!(korean_won(f64::NAN), "");
    }

    #[test]
    fn rate_formatting() {
        assert_eq!(format_rate_percent(9.8765), "9.88%");
        assert_eq!(format_rate_percent(0.0), "0.00%");
    }
}
