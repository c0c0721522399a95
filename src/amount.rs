//! Conversion between human-entered amount strings and signed values, and
//! back into the grouped display form (`1.234,50€`).

use log::debug;
use thiserror::Error;

/// Appended to every formatted amount, and stripped from input.
pub const CURRENCY_SYMBOL: char = '€';
const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
const NO_BREAK_SPACE: char = '\u{a0}';

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount {input:?}")]
pub struct InvalidAmount {
    pub input: String,
}

impl InvalidAmount {
    fn new(input: &str) -> Self {
        InvalidAmount {
            input: input.to_string(),
        }
    }
}

/// Which separator characters appear in a cleaned amount string. The
/// interpretation of `.` and `,` depends only on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Separators {
    Neither,
    PeriodOnly,
    CommaOnly,
    Both,
}

impl Separators {
    fn classify(s: &str) -> Self {
        use Separators::*;
        s.chars().fold(Neither, |state, c| match (state, c) {
            (Neither, '.') => PeriodOnly,
            (Neither, ',') => CommaOnly,
            (PeriodOnly, ',') | (CommaOnly, '.') => Both,
            (state, _) => state,
        })
    }

    /// Rewrites `s` into a string using `.` as the only decimal point and no
    /// grouping. Returns `None` for a comma-only string with more than one
    /// comma, which has no unambiguous reading.
    fn normalize(self, s: &str) -> Option<String> {
        use Separators::*;
        match self {
            Neither | PeriodOnly => Some(s.to_string()),
            CommaOnly => {
                if s.matches(',').count() > 1 {
                    return None;
                }
                Some(s.replace(',', "."))
            }
            Both => {
                let without_periods: String = s.chars().filter(|&c| c != '.').collect();
                // The last comma is the decimal separator, earlier ones are
                // further grouping marks.
                let last_comma = without_periods.rfind(',')?;
                let (int_part, frac_part) = without_periods.split_at(last_comma);
                let mut out: String = int_part.chars().filter(|&c| c != ',').collect();
                out.push('.');
                out.push_str(&frac_part[1..]);
                Some(out)
            }
        }
    }
}

/// Parses a human-entered amount. Accepts both `1.234,50` and `1234.50`
/// styles, with an optional currency symbol and spaces anywhere. The sign,
/// if any, is kept; applying income/expense polarity is up to the caller.
pub fn parse(raw: Option<&str>) -> Result<f64, InvalidAmount> {
    let raw = raw.ok_or_else(|| InvalidAmount::new(""))?;
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|&c| c != CURRENCY_SYMBOL && c != ' ' && c != NO_BREAK_SPACE)
        .collect();
    if cleaned.is_empty() {
        return Err(InvalidAmount::new(raw));
    }

    let separators = Separators::classify(&cleaned);
    let normalized = separators
        .normalize(&cleaned)
        .ok_or_else(|| InvalidAmount::new(raw))?;
    debug!(
        "amount {:?} classified as {:?}, normalized to {:?}",
        raw, separators, normalized
    );

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(InvalidAmount::new(raw)),
    }
}

/// Formats `amount` with `.` grouping, `,` decimals, two fractional digits
/// and the currency symbol, e.g. `-1234.5` becomes `-1.234,50€`.
pub fn format(amount: f64) -> String {
    let fixed = format!("{:.2}", amount);
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(THOUSANDS_SEPARATOR);
        }
        grouped.push(c);
    }

    format!(
        "{}{}{}{}{}",
        sign, grouped, DECIMAL_SEPARATOR, frac_part, CURRENCY_SYMBOL
    )
}
