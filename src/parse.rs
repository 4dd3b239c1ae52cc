//! Row splitting and value parsing for `key;value` records.

use crate::error::MalformedRow;

/// Most fractional digits a value may carry.
pub const MAX_FRACTION_DIGITS: usize = 2;

const SCALE: [f64; MAX_FRACTION_DIGITS + 1] = [1.0, 10.0, 100.0];

/// Splits a record at its first `;`. The value has trailing `\r`/`\n` bytes removed.
/// Returns `None` if the line has no delimiter.
#[inline]
pub fn split_record(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = line.iter().position(|b| *b == b';')?;
    let (key, rest) = line.split_at(pos);
    Some((key, trim_line_end(&rest[1..])))
}

#[inline]
pub fn trim_line_end(mut bytes: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = bytes {
        bytes = rest;
    }
    bytes
}

/// Parses `-?[0-9]*(\.[0-9]*)?` with at most two fractional digits.
///
/// Digits are accumulated into an integer and scaled once at the end, so every value
/// with two or fewer fractional digits comes out as the nearest `f64`, exactly like
/// a general-purpose parser would produce.
///
/// The input is not validated: an empty slice, stray bytes or extra fractional digits
/// trip a debug assertion and produce an unspecified value in release builds.
#[inline]
pub fn parse_value(bytes: &[u8]) -> f64 {
    debug_assert!(!bytes.is_empty(), "empty value field");
    let (negative, digits) = match bytes.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, bytes),
    };

    let mut acc: u64 = 0;
    let mut fraction_digits = 0usize;
    let mut seen_point = false;
    for &b in digits {
        if b == b'.' {
            seen_point = true;
            continue;
        }
        acc = acc.wrapping_mul(10).wrapping_add(u64::from(b.wrapping_sub(b'0')));
        fraction_digits += usize::from(seen_point);
    }
    debug_assert!(
        fraction_digits <= MAX_FRACTION_DIGITS,
        "value {:?} has more than {MAX_FRACTION_DIGITS} fractional digits",
        String::from_utf8_lossy(bytes)
    );

    let value = acc as f64 / SCALE[fraction_digits.min(MAX_FRACTION_DIGITS)];
    if negative {
        -value
    } else {
        value
    }
}

/// Checked counterpart of [parse_value], used in strict mode.
pub fn try_parse_value(bytes: &[u8]) -> Result<f64, MalformedRow> {
    if bytes.is_empty() {
        return Err(MalformedRow::EmptyValue);
    }
    let digits = bytes.strip_prefix(b"-").unwrap_or(bytes);

    let mut acc: u64 = 0;
    let mut digit_count = 0usize;
    let mut fraction_digits = 0usize;
    let mut seen_point = false;
    for &b in digits {
        match b {
            b'.' if seen_point => return Err(MalformedRow::RepeatedDecimalPoint),
            b'.' => seen_point = true,
            b'0'..=b'9' => {
                acc = acc
                    .checked_mul(10)
                    .and_then(|a| a.checked_add(u64::from(b - b'0')))
                    .ok_or(MalformedRow::Overflow)?;
                digit_count += 1;
                if seen_point {
                    fraction_digits += 1;
                    if fraction_digits > MAX_FRACTION_DIGITS {
                        return Err(MalformedRow::TooManyFractionDigits);
                    }
                }
            }
            other => return Err(MalformedRow::InvalidByte(other)),
        }
    }
    if digit_count == 0 {
        return Err(MalformedRow::NoDigits);
    }

    let value = acc as f64 / SCALE[fraction_digits];
    Ok(if digits.len() < bytes.len() { -value } else { value })
}
