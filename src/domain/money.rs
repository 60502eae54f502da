use thiserror::Error;

/// Money is stored as integer cents so totals never drift.
/// A payload amount of 50 (currency units) is 5000 cents.
pub type Cents = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCentsError {
    #[error("invalid money format")]
    InvalidFormat,

    #[error("amount out of range")]
    OutOfRange,
}

/// Format cents as a plain decimal string.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Convert cents back to currency units for serialized output.
pub fn cents_to_units(cents: Cents) -> f64 {
    cents as f64 / 100.0
}

/// Convert a number of currency units into cents, rounding to the nearest cent.
/// Returns `None` for NaN, infinities and values that don't fit in `Cents`.
pub fn cents_from_units(units: f64) -> Option<Cents> {
    if !units.is_finite() {
        return None;
    }
    let cents = (units * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(cents as Cents)
}

/// Parse decimal text into cents.
/// Example: "50.00" -> 5000, "12.5" -> 1250, "100" -> 10000, "1.005" -> 101
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (digits, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(whole) || !all_digits(fraction) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| ParseCentsError::OutOfRange)?
    };

    // Two digits of cents, the third decides rounding (half away from zero).
    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tens = fraction_digits.next().unwrap_or(0);
    let ones = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tens * 10 + ones + i64::from(round_up)))
        .ok_or(ParseCentsError::OutOfRange)?;

    Ok(if negative { -cents } else { cents })
}

/// Serde helpers that write cents as currency units (`5000` cents -> `50.0`).
pub mod units {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use super::{Cents, cents_from_units, cents_to_units};

    pub fn serialize<S: Serializer>(cents: &Cents, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(cents_to_units(*cents))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Cents, D::Error> {
        let units = f64::deserialize(deserializer)?;
        cents_from_units(units).ok_or_else(|| D::Error::custom("amount out of range"))
    }
}
