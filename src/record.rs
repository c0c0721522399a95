use std::fmt;

use chrono::NaiveDate;
use log::warn;
use thiserror::Error;

use crate::amount::{self, InvalidAmount};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date {input:?}, want YYYY-MM-DD")]
pub struct InvalidDate {
    pub input: String,
}

/// Checks that `s` is a calendar date in `YYYY-MM-DD` form. Records still
/// keep the date as the string that was entered.
pub fn validate_date(s: &str) -> Result<(), InvalidDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| InvalidDate {
            input: s.to_string(),
        })
}

/// One ledger entry. Negative amounts are expenses, positive are income.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

impl Record {
    /// Builds a record, rounding `amount` to cents. Non-finite amounts are
    /// rejected.
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
    ) -> Result<Self, InvalidAmount> {
        if !amount.is_finite() {
            return Err(InvalidAmount {
                input: amount.to_string(),
            });
        }
        Ok(Record {
            date: date.into(),
            category: category.into(),
            description: description.into(),
            amount: to_cents(amount),
        })
    }

    /// Builds a record from a parsed magnitude and an explicit polarity. Any
    /// sign the magnitude carried is discarded.
    pub fn from_entry(
        date: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        magnitude: f64,
        polarity: Polarity,
    ) -> Result<Self, InvalidAmount> {
        Self::new(date, category, description, polarity.apply(magnitude))
    }
}

/// Rounds to the nearest cent, the precision the ledger file keeps. Values
/// too large to scale are left alone.
fn to_cents(amount: f64) -> f64 {
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded.is_finite() {
        rounded
    } else {
        amount
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} | {:<15} | {:<30} | {:>12}",
            self.date,
            self.category,
            self.description,
            amount::format(self.amount)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    Income,
    Expense,
}

impl Polarity {
    /// Recognizes `+` and `-`, ignoring surrounding whitespace.
    pub fn from_token(token: &str) -> Option<Polarity> {
        match token.trim() {
            "+" => Some(Polarity::Income),
            "-" => Some(Polarity::Expense),
            _ => None,
        }
    }

    /// Like `from_token`, but an unrecognized token means expense.
    pub fn from_token_or_expense(token: &str) -> Polarity {
        Self::from_token(token).unwrap_or_else(|| {
            warn!("unrecognized polarity {:?}, recording as expense", token);
            Polarity::Expense
        })
    }

    pub fn apply(self, magnitude: f64) -> f64 {
        match self {
            Polarity::Income => magnitude.abs(),
            Polarity::Expense => -magnitude.abs(),
        }
    }
}
