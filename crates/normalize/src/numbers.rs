//! Digit extraction: prices, years and phone numbers.

use itertools::Itertools;

/// Keeps only the decimal digits of `text`. No digits at all (including a
/// missing value) gives `"0"`.
pub fn digits_only(text: Option<&str>) -> String {
    let digits: String = text
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        "0".to_string()
    } else {
        digits
    }
}

pub fn price(text: Option<&str>) -> String {
    digits_only(text)
}

pub fn year(text: Option<&str>) -> String {
    digits_only(text)
}

/// Formats a Russian phone number as `+7(XXX)XXXXXXX`.
///
/// A missing leading `7` is added, so ten-digit local numbers are accepted;
/// anything that does not end up with exactly eleven digits is rejected.
pub fn phone(text: Option<&str>) -> Option<String> {
    let mut digits: Vec<char> = text?.chars().filter(char::is_ascii_digit).collect();
    if digits.first().is_some_and(|&d| d != '7') {
        digits.insert(0, '7');
    }
    if digits.len() != 11 {
        return None;
    }
    Some(format!(
        "+{}({}){}",
        digits[0],
        digits[1..4].iter().join(""),
        digits[4..].iter().join("")
    ))
}
