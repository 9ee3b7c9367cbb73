//! Integer parsing for attribute and style values
//!
//! Markers such as `data-gotoslide="3"` and measured styles such as
//! `width: 320px` are read as base-10 integer prefixes: leading whitespace
//! and an optional sign are accepted, digits are consumed until the first
//! non-digit, and the remainder is ignored.

/// Parse the leading base-10 integer of `input`
///
/// Returns `None` when no digit follows the optional sign. Values beyond the
/// `i64` range saturate.
pub fn parse_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let mut value: i64 = 0;
    for digit in digits {
        seen = true;
        let d = i64::from(digit - b'0');
        value = value
            .checked_mul(10)
            .and_then(|v| if negative { v.checked_sub(d) } else { v.checked_add(d) })
            .unwrap_or(if negative { i64::MIN } else { i64::MAX });
    }

    seen.then_some(value)
}

/// Parse a CSS pixel length (`"320px"`, `"0"`, `"12.5px"`) to whole pixels
///
/// Fractional parts are truncated, matching the integer-prefix rule.
pub fn parse_px(value: &str) -> Option<i64> {
    parse_int(value)
}
