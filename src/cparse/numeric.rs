//! C numeric literal parsing.
//!
//! Turns the verbatim text of a C integer or floating literal into a typed
//! value, preserving radix and suffix information (including C23 decimal
//! floating suffixes).

use super::Error;

/// Decimal floating-point width selected by a `df`/`dd`/`dl` suffix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dfp {
    /// No decimal suffix.
    #[default]
    None,
    /// `_Decimal32` (`df`).
    D32,
    /// `_Decimal64` (`dd`).
    D64,
    /// `_Decimal128` (`dl`).
    D128,
}

/// A parsed C numeric literal.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericValue {
    /// Integer literal.
    Integer {
        /// Numeric value.
        value: i64,
        /// Radix: 2, 8, 10, or 16.
        base: u32,
        /// `u`/`U` suffix present.
        is_unsigned: bool,
        /// Exactly one `l`/`L`.
        is_long: bool,
        /// `ll`/`LL`.
        is_long_long: bool,
    },
    /// Floating literal.
    Float {
        /// Numeric value.
        value: f64,
        /// `f`/`F` suffix.
        is_float: bool,
        /// `l`/`L` suffix.
        is_long_double: bool,
        /// Decimal floating suffix, if any.
        decimal: Dfp,
    },
}

fn parse_int_suffix(suffix: &str) -> Result<(bool, bool, bool), Error> {
    let mut unsigned = false;
    let mut longs = 0u8;
    for c in suffix.chars() {
        match c {
            'u' | 'U' if !unsigned => unsigned = true,
            'l' | 'L' if longs < 2 => longs += 1,
            _ => return Err(Error::UnknownSuffix(suffix.to_owned())),
        }
    }
    Ok((unsigned, longs == 1, longs == 2))
}

fn integer(value: i64, base: u32, suffix: &str) -> Result<NumericValue, Error> {
    let (is_unsigned, is_long, is_long_long) = parse_int_suffix(suffix)?;
    Ok(NumericValue::Integer {
        value,
        base,
        is_unsigned,
        is_long,
        is_long_long,
    })
}

fn parse_radix_int(input: &str, digits: &str, base: u32, kind: &'static str, suffix_at: usize) -> Result<NumericValue, Error> {
    let (num, suffix) = digits.split_at(suffix_at);
    if num.is_empty() {
        return Err(Error::InvalidDigit(kind));
    }
    let value = i64::from_str_radix(num, base)
        .or_else(|_| u64::from_str_radix(num, base).map(|v| v as i64))
        .map_err(|_| Error::MalformedNumber(input.to_owned()))?;
    integer(value, base, suffix)
}

fn split_digits(s: &str, base: u32) -> usize {
    s.find(|c: char| !c.is_digit(base)).unwrap_or(s.len())
}

/// Parses a decimal float suffix: `f`, `l`, or a decimal pair.
fn parse_float_suffix(suffix: &str) -> Result<(bool, bool, Dfp), Error> {
    match suffix {
        "" => Ok((false, false, Dfp::None)),
        "f" | "F" => Ok((true, false, Dfp::None)),
        "l" | "L" => Ok((false, true, Dfp::None)),
        _ => {
            let lower = suffix.to_ascii_lowercase();
            let decimal = match lower.as_str() {
                "df" => Dfp::D32,
                "dd" => Dfp::D64,
                "dl" => Dfp::D128,
                _ => return Err(Error::UnknownSuffix(suffix.to_owned())),
            };
            Ok((false, false, decimal))
        }
    }
}

fn parse_decimal_float(input: &str, body: &str) -> Result<NumericValue, Error> {
    // Longest prefix matching digits [. digits] [e[+-]digits].
    let bytes = body.as_bytes();
    let mut i = split_digits(body, 10);
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        i += split_digits(&body[i..], 10);
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_digits = split_digits(&body[j..], 10);
        if exp_digits == 0 {
            return Err(Error::MalformedNumber(input.to_owned()));
        }
        i = j + exp_digits;
    }

    let (mantissa, suffix) = body.split_at(i);
    let value: f64 = mantissa
        .parse()
        .map_err(|_| Error::MalformedNumber(input.to_owned()))?;
    let (is_float, is_long_double, decimal) = parse_float_suffix(suffix)?;
    Ok(NumericValue::Float {
        value,
        is_float,
        is_long_double,
        decimal,
    })
}

fn parse_hex_float(input: &str, body: &str) -> Result<NumericValue, Error> {
    let bytes = body.as_bytes();
    let int_len = split_digits(body, 16);
    let mut i = int_len;
    let mut value = if int_len == 0 {
        0.0
    } else {
        u64::from_str_radix(&body[..int_len], 16)
            .map_err(|_| Error::MalformedNumber(input.to_owned()))? as f64
    };

    let mut frac_len = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        frac_len = split_digits(&body[i..], 16);
        if frac_len > 0 {
            let frac = u64::from_str_radix(&body[i..i + frac_len], 16)
                .map_err(|_| Error::MalformedNumber(input.to_owned()))?;
            value += frac as f64 / 16f64.powi(frac_len as i32);
        }
        i += frac_len;
    }
    if int_len == 0 && frac_len == 0 {
        return Err(Error::InvalidDigit("hexadecimal"));
    }

    // C requires a binary exponent on hex floats.
    if i >= bytes.len() || !matches!(bytes[i], b'p' | b'P') {
        return Err(Error::MalformedNumber(input.to_owned()));
    }
    i += 1;
    let mut exp_sign = 1i32;
    if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
        if bytes[i] == b'-' {
            exp_sign = -1;
        }
        i += 1;
    }
    let exp_len = split_digits(&body[i..], 10);
    if exp_len == 0 {
        return Err(Error::MalformedNumber(input.to_owned()));
    }
    let exp: i32 = body[i..i + exp_len]
        .parse()
        .map_err(|_| Error::MalformedNumber(input.to_owned()))?;
    value *= 2f64.powi(exp_sign * exp);
    i += exp_len;

    let (is_float, is_long_double, decimal) = parse_float_suffix(&body[i..])?;
    Ok(NumericValue::Float {
        value,
        is_float,
        is_long_double,
        decimal,
    })
}

/// Parses a C numeric literal string into a typed value.
///
/// Handles binary/octal/decimal/hex radixes, integer suffixes in any order
/// and case (`1LLU`), float suffixes including the decimal floating-point
/// pairs (`df`/`dd`/`dl`, case-insensitive), exponent forms, and hex floats
/// (`0x1.8p1`).
pub fn parse_numeric_literal(input: &str) -> Result<NumericValue, Error> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::EmptyLiteral);
    }

    if let Some(body) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if body.contains('.') || body.contains('p') || body.contains('P') {
            return parse_hex_float(s, body);
        }
        let digits = split_digits(body, 16);
        return parse_radix_int(s, body, 16, "hexadecimal", digits);
    }

    if let Some(body) = s.strip_prefix("0b").or_else(|| s.strip_prefix("0B")) {
        let digits = split_digits(body, 2);
        return parse_radix_int(s, body, 2, "binary", digits);
    }

    if s.contains('.') || s.contains('e') || s.contains('E') {
        return parse_decimal_float(s, s);
    }

    // Octal: leading zero followed by at least one more digit.
    if s.len() > 1 && s.starts_with('0') && s.as_bytes()[1].is_ascii_digit() {
        let body = &s[1..];
        let digits = split_digits(body, 8);
        // `09` is an invalid octal digit, not a suffix.
        if body[digits..].starts_with(|c: char| c.is_ascii_digit()) {
            return Err(Error::InvalidDigit("octal"));
        }
        return parse_radix_int(s, body, 8, "octal", digits);
    }

    let digits = split_digits(s, 10);
    parse_radix_int(s, s, 10, "decimal", digits)
}
