use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Tolerance used for every "is this balance settled" decision.
///
/// Equal-share splitting produces division remainders (`100 / 3`), so a
/// balance whose magnitude is at most one cent is treated as zero by the
/// resolver and by the settlement planner alike.
pub const EPSILON: f64 = 0.01;

/// Rounds a value to two decimal places (cents).
#[must_use]
pub fn round_cents(value: f64) -> f64 {
    let rounded = (value * 100.0).round() / 100.0;
    // Avoid "-0.00" when a tiny negative remainder is rounded away.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Returns `true` if `value` is within [`EPSILON`] of zero.
#[must_use]
pub fn is_settled(value: f64) -> bool {
    value.abs() <= EPSILON
}

/// Returns `true` if `value` can take part in a sum: finite and `> 0`.
///
/// Records are validated before they reach the engine, but anything that
/// slips through (restored backups, hand edited store files) must contribute
/// nothing instead of poisoning the totals with `NaN`.
#[must_use]
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Formats a value with two decimals, without a currency symbol.
#[must_use]
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round_cents(value))
}

/// Positive decimal amount entered at the boundary.
///
/// `Amount` only exists to validate user input; the engine works on plain
/// `f64` values once a record has been built.
///
/// # Examples
///
/// Parsing accepts `.` or `,` as decimal separator and rejects more than two
/// decimals or non positive values:
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().value(), 10.0);
/// assert_eq!("10,5".parse::<Amount>().unwrap().value(), 10.5);
/// assert!("12.345".parse::<Amount>().is_err());
/// assert!("0".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Creates a new amount, rejecting non-finite and non positive values.
    pub fn new(value: f64) -> Result<Self, EngineError> {
        if !is_valid_amount(value) {
            return Err(EngineError::InvalidAmount(
                "amount must be a positive number".to_string(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(self.0))
    }
}

impl TryFrom<f64> for Amount {
    type Error = EngineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    /// - rejects zero and negative amounts
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount("invalid amount".to_string());
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }
        if trimmed.starts_with('-') {
            return Err(EngineError::InvalidAmount(
                "amount must be a positive number".to_string(),
            ));
        }

        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed).trim();
        if rest.is_empty() {
            return Err(empty());
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or_else(invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(invalid());
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Self::new(total as f64 / 100.0)
    }
}
