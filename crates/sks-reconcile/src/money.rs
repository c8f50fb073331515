//! Deterministic decimal-string ⇄ integer-micros conversion.
//!
//! Prices enter the system as decimal strings and live as integer micros
//! (1 currency unit = 1_000_000 micros). Conversion never touches floating
//! point: a string needing sub-micro precision is rejected, not rounded.

use std::fmt;

use crate::types::MICROS_SCALE;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by decimal-string parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyError {
    /// The input was empty or whitespace.
    Empty { field: &'static str },
    /// The input contained anything other than an optional sign, digits and
    /// at most one decimal point.
    Invalid { field: &'static str, raw: String },
    /// More than 6 decimal places: converting would require rounding.
    TooManyDecimalPlaces { field: &'static str, raw: String },
    /// The value does not fit in i64 micros.
    Overflow { field: &'static str, raw: String },
}

impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyError::Empty { field } => write!(f, "price field '{field}' is empty"),
            MoneyError::Invalid { field, raw } => {
                write!(f, "price field '{field}' is not a decimal number: '{raw}'")
            }
            MoneyError::TooManyDecimalPlaces { field, raw } => {
                write!(
                    f,
                    "price field '{field}' has more than 6 decimal places: '{raw}'"
                )
            }
            MoneyError::Overflow { field, raw } => {
                write!(f, "price field '{field}' overflows micros: '{raw}'")
            }
        }
    }
}

impl std::error::Error for MoneyError {}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Convert a decimal price string to integer micros.
///
/// Accepts an optional leading `+`/`-` and an optional fractional part of up
/// to 6 digits. `field` names the source field in error messages.
pub fn price_to_micros(s: &str, field: &'static str) -> Result<i64, MoneyError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(MoneyError::Empty { field });
    }

    let invalid = || MoneyError::Invalid {
        field,
        raw: trimmed.to_string(),
    };

    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if frac_part.len() > 6 {
        return Err(MoneyError::TooManyDecimalPlaces {
            field,
            raw: trimmed.to_string(),
        });
    }

    let overflow = || MoneyError::Overflow {
        field,
        raw: trimmed.to_string(),
    };

    let units: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse::<i64>().map_err(|_| overflow())?
    };

    // Scale the fraction to exactly 6 digits without string padding:
    // "5" -> 500_000, "123456" -> 123_456.
    let frac: i64 = if frac_part.is_empty() {
        0
    } else {
        let parsed = frac_part.parse::<i64>().map_err(|_| invalid())?;
        parsed * 10_i64.pow(6 - frac_part.len() as u32)
    };

    let micros = units
        .checked_mul(MICROS_SCALE)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(overflow)?;

    Ok(if negative { -micros } else { micros })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render integer micros back to a decimal string with trailing zeros
/// trimmed: `192_000_000` -> `"192"`, `120_500_000` -> `"120.5"`.
///
/// Inverse of [`price_to_micros`] up to insignificant zeros.
pub fn format_micros(micros: i64) -> String {
    let sign = if micros < 0 { "-" } else { "" };
    let abs = micros.unsigned_abs();
    let units = abs / MICROS_SCALE as u64;
    let frac = abs % MICROS_SCALE as u64;

    if frac == 0 {
        return format!("{sign}{units}");
    }

    let mut frac_str = format!("{frac:06}");
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{sign}{units}.{frac_str}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_units() {
        assert_eq!(price_to_micros("100", "price").unwrap(), 100_000_000);
        assert_eq!(price_to_micros("0", "price").unwrap(), 0);
    }

    #[test]
    fn parses_fractions() {
        assert_eq!(price_to_micros("449.95", "price").unwrap(), 449_950_000);
        assert_eq!(price_to_micros("0.5", "price").unwrap(), 500_000);
        assert_eq!(price_to_micros(".25", "price").unwrap(), 250_000);
        assert_eq!(price_to_micros("12.", "price").unwrap(), 12_000_000);
    }

    #[test]
    fn parses_signs() {
        assert_eq!(price_to_micros("+3.5", "price").unwrap(), 3_500_000);
        assert_eq!(price_to_micros("-3.5", "price").unwrap(), -3_500_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            price_to_micros("", "price"),
            Err(MoneyError::Empty { .. })
        ));
        assert!(matches!(
            price_to_micros("  ", "price"),
            Err(MoneyError::Empty { .. })
        ));
        assert!(matches!(
            price_to_micros("12a", "price"),
            Err(MoneyError::Invalid { .. })
        ));
        assert!(matches!(
            price_to_micros("1.2.3", "price"),
            Err(MoneyError::Invalid { .. })
        ));
        assert!(matches!(
            price_to_micros(".", "price"),
            Err(MoneyError::Invalid { .. })
        ));
        assert!(matches!(
            price_to_micros("1e3", "price"),
            Err(MoneyError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_sub_micro_precision() {
        assert!(matches!(
            price_to_micros("1.0000001", "price"),
            Err(MoneyError::TooManyDecimalPlaces { .. })
        ));
    }

    #[test]
    fn rejects_overflow() {
        assert!(matches!(
            price_to_micros("99999999999999999999", "price"),
            Err(MoneyError::Overflow { .. })
        ));
    }

    #[test]
    fn formats_round_trip() {
        assert_eq!(format_micros(100_000_000), "100");
        assert_eq!(format_micros(449_950_000), "449.95");
        assert_eq!(format_micros(500_000), "0.5");
        assert_eq!(format_micros(0), "0");
        assert_eq!(format_micros(-3_500_000), "-3.5");
        assert_eq!(format_micros(1), "0.000001");
    }
}
