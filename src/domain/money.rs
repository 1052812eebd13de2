use std::fmt;

/// Money is represented as integer cents to avoid floating-point precision
/// issues. Caps are non-negative and payments are strictly positive, so the
/// ledger never deals in negative amounts; rounding happens only when an
/// amount is formatted for the outside world.
pub type Cents = i64;

/// Format a non-negative amount of cents as a fixed two-decimal string.
/// Example: 7550 -> "75.50", 0 -> "0.00"
pub fn format_cents(cents: Cents) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

/// Parse a decimal string into cents.
///
/// Accepts plain base-10 decimals ("40", "35.5", ".50"). More than two
/// fraction digits are rounded half-up ("12.345" -> 1235), matching the
/// two-fraction-digit precision amounts carry in the store. Negative and
/// signed inputs are rejected outright.
pub fn parse_cents(input: &str) -> Result<Cents, ParseCentsError> {
    let input = input.trim();
    if input.is_empty() || input.starts_with('-') || input.starts_with('+') {
        return Err(ParseCentsError::InvalidFormat);
    }

    let (units_str, frac_str) = match input.split_once('.') {
        Some((units, frac)) => (units, frac),
        None => (input, ""),
    };
    if units_str.is_empty() && frac_str.is_empty() {
        return Err(ParseCentsError::InvalidFormat);
    }
    if !frac_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseCentsError::InvalidFormat);
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?
    };

    let frac_cents: i64 = match frac_str.len() {
        0 => 0,
        1 => {
            // Single digit like "5" means 50 cents
            frac_str
                .parse::<i64>()
                .map_err(|_| ParseCentsError::InvalidFormat)?
                * 10
        }
        2 => frac_str
            .parse()
            .map_err(|_| ParseCentsError::InvalidFormat)?,
        _ => {
            // Round half-up on the third fraction digit
            let head: i64 = frac_str[..2]
                .parse()
                .map_err(|_| ParseCentsError::InvalidFormat)?;
            let third = frac_str.as_bytes()[2] - b'0';
            head + i64::from(third >= 5)
        }
    };

    units
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(frac_cents))
        .ok_or(ParseCentsError::Overflow)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseCentsError {
    InvalidFormat,
    Overflow,
}

impl fmt::Display for ParseCentsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseCentsError::InvalidFormat => write!(f, "invalid money format"),
            ParseCentsError::Overflow => write!(f, "amount out of range"),
        }
    }
}

impl std::error::Error for ParseCentsError {}
