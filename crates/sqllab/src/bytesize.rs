//! Human-readable byte sizes.
//!
//! Engines report scanned data as strings like `"5.2 GB"`; the threshold pass
//! needs integers. The codec is deliberately narrow: a single decimal value
//! followed by whitespace and a unit, binary (1024-power) multipliers.
//! Anything else — scientific notation, locale separators — is rejected, and
//! the caller skips the bytes check for that line item.

use serde_json::Value;

/// Recognized units, smallest first. Multiplier for index `i` is `1024^i`.
const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Errors from parsing a byte-size value.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ByteSizeError {
    /// Input was not `<value> <unit>`.
    #[error("expected a value like \"5.2 GB\", got {0:?}")]
    InvalidFormat(String),

    /// The value part did not parse as a decimal number.
    #[error("could not parse the numeric value in {0:?}")]
    InvalidNumber(String),

    /// The unit part is not one of B, KB, MB, GB, TB, PB.
    #[error("unknown byte-size unit {0:?}")]
    UnknownUnit(String),

    /// A JSON value that is neither a string nor a number.
    #[error("cannot interpret {0} as a byte count")]
    NotCoercible(String),
}

/// Parse a byte-size string (`"5.2 GB"`, `"2,048 b"`) into integer bytes.
///
/// Commas in the value are stripped; units are case-insensitive; surrounding
/// whitespace is ignored. The conversion truncates toward zero.
pub fn parse_str(input: &str) -> Result<u64, ByteSizeError> {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let (value, unit) = match tokens.as_slice() {
        [value, unit] => (*value, *unit),
        _ => return Err(ByteSizeError::InvalidFormat(input.to_string())),
    };

    let number: f64 = value
        .replace(',', "")
        .parse()
        .map_err(|_| ByteSizeError::InvalidNumber(input.to_string()))?;

    let multiplier = multiplier_for(unit)?;
    Ok((number * multiplier as f64) as u64)
}

/// Coerce a JSON value into integer bytes.
///
/// Strings go through [`parse_str`]; numbers are taken as byte counts
/// directly (floats truncate); anything else is an error.
pub fn parse_value(value: &Value) -> Result<u64, ByteSizeError> {
    match value {
        Value::String(s) => parse_str(s),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u)
            } else if let Some(f) = n.as_f64() {
                Ok(f as u64)
            } else {
                Err(ByteSizeError::NotCoercible(n.to_string()))
            }
        }
        other => Err(ByteSizeError::NotCoercible(other.to_string())),
    }
}

/// Render integer bytes with the largest unit whose value is at least 1.
///
/// Every unit renders with one fractional digit except `B`, which renders as
/// a plain integer.
pub fn format(n: u64) -> String {
    if n < 1024 {
        return format!("{} B", n);
    }

    let mut value = n as f64;
    let mut idx = 0;
    while value >= 1024.0 && idx < UNITS.len() - 1 {
        value /= 1024.0;
        idx += 1;
    }
    format!("{:.1} {}", value, UNITS[idx])
}

fn multiplier_for(unit: &str) -> Result<u64, ByteSizeError> {
    let normalized = unit.to_uppercase();
    UNITS
        .iter()
        .position(|u| *u == normalized)
        .map(|idx| 1024u64.pow(idx as u32))
        .ok_or_else(|| ByteSizeError::UnknownUnit(unit.to_string()))
}

// ── Tests ────────────────────────────────────────────────────────
