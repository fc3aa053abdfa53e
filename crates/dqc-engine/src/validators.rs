//! Stateless value validators.
//!
//! Pure predicates over single string values. The dispatcher trims sampled
//! values before calling these, but each predicate is safe on raw input too.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email pattern")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9]\d{9,14}$").expect("valid phone pattern"));

/// Accepted date formats, tried in order. Deliberately permissive: overlapping
/// formats (e.g. `01/02/2020`) are accepted under whichever interpretation
/// parses first, without disambiguation.
const DATETIME_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%m-%d-%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y",
];

/// True iff the value parses as a decimal floating-point number.
pub fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Conservative email shape: local part, `@`, domain, dot, TLD of two or more
/// letters.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// International-style phone shape.
///
/// Everything except digits and `+` is stripped first; the remainder must be
/// 10 to 15 characters and match an optional leading `+` followed by a
/// significant first digit and 9 to 14 more digits.
pub fn is_valid_phone(value: &str) -> bool {
    let cleaned: String = value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();
    if cleaned.len() < 10 || cleaned.len() > 15 {
        return false;
    }
    PHONE_RE.is_match(&cleaned)
}

/// True iff the value parses under any of the accepted date/time formats,
/// including year-only (`2020`) and year-month (`2020-03`, `03/2020`) forms.
pub fn is_valid_date(value: &str) -> bool {
    let value = value.trim();
    if DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    if DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
    {
        return true;
    }
    if is_year_only(value) {
        return true;
    }
    // Month-precision forms: pin the day and reuse the full-date parsers.
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(&format!("01/{value}"), "%d/%m/%Y").is_ok()
}

fn is_year_only(value: &str) -> bool {
    !value.is_empty() && value.len() <= 4 && value.bytes().all(|b| b.is_ascii_digit())
}

/// True when the value contains characters outside the allowed set
/// (ASCII alphanumerics, whitespace, `. , @ _ -`). The empty string counts
/// as disallowed.
pub fn has_disallowed_characters(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    !value.chars().all(|c| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | ',' | '@' | '_' | '-')
    })
}

/// True iff the value cannot be encoded as 7-bit ASCII.
pub fn has_non_ascii(value: &str) -> bool {
    !value.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values() {
        assert!(is_numeric("42"));
        assert!(is_numeric("-3.25"));
        assert!(is_numeric("1e5"));
        assert!(is_numeric(" 7 "));
        assert!(!is_numeric("12,5"));
        assert!(!is_numeric("abc"));
        assert!(!is_numeric(""));
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("missing-at.example.com"));
        assert!(!is_valid_email("no-tld@example"));
        assert!(!is_valid_email("one-letter-tld@example.c"));
        assert!(!is_valid_email("spaces in@local.part"));
    }

    #[test]
    fn phone_shapes() {
        assert!(is_valid_phone("+31612345678"));
        assert!(is_valid_phone("(206) 555-98-44 ext"), "punctuation is stripped");
        assert!(is_valid_phone("4155552671890"));
        assert!(!is_valid_phone("12345"), "too short after cleaning");
        assert!(!is_valid_phone("+0612345678"), "significant digit cannot be 0");
        assert!(!is_valid_phone("12345678901234567"), "too long");
    }

    #[test]
    fn date_formats() {
        assert!(is_valid_date("2020-02-29"));
        assert!(is_valid_date("2020-02-29 13:45:00"));
        assert!(is_valid_date("12/31/2020"), "US order");
        assert!(is_valid_date("31/12/2020"), "EU order");
        assert!(is_valid_date("31-12-2020"));
        assert!(is_valid_date("2020/12/31"));
        assert!(is_valid_date("31.12.2020"));
        assert!(is_valid_date("2020"));
        assert!(is_valid_date("2020-03"));
        assert!(is_valid_date("03/2020"));
        // Ambiguous by design: valid under either slash interpretation.
        assert!(is_valid_date("01/02/2020"));
        assert!(!is_valid_date("2021-02-29"), "not a real date");
        assert!(!is_valid_date("13/2020"), "month 13");
        assert!(!is_valid_date("20201"));
        assert!(!is_valid_date("yesterday"));
    }

    #[test]
    fn disallowed_characters() {
        assert!(!has_disallowed_characters("Plain text, v1.0 @here_now-ok"));
        assert!(has_disallowed_characters("semi;colon"));
        assert!(has_disallowed_characters("caf\u{e9}"), "non-ASCII letters are disallowed");
        assert!(has_disallowed_characters(""), "empty value has no allowed characters");
    }

    #[test]
    fn non_ascii_detection() {
        assert!(!has_non_ascii("plain ascii 123"));
        assert!(has_non_ascii("caf\u{e9}"));
        assert!(has_non_ascii("\u{4f60}\u{597d}"));
    }
}
