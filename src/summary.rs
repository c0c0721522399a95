//! Per-category totals for charting.

use std::io::Write;

use anyhow::Result;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::amount;
use crate::record::Record;
use crate::table;

const BAR_WIDTH: usize = 30;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("no category has a positive total")]
pub struct NoPlottableData;

#[derive(Clone, Debug, PartialEq)]
pub struct Slice {
    pub category: String,
    pub total: f64,
}

/// Sums amounts per category. Categories are compared exactly and keep the
/// order in which they first appear.
pub fn category_totals(records: &[Record]) -> Vec<Slice> {
    let mut totals: Vec<Slice> = Vec::new();
    for r in records {
        match totals.iter_mut().find(|s| s.category == r.category) {
            Some(slice) => slice.total += r.amount,
            None => totals.push(Slice {
                category: r.category.clone(),
                total: r.amount,
            }),
        }
    }
    totals
}

/// The categories whose net total is finite and above zero. Fails rather
/// than returning an empty list.
pub fn plottable(records: &[Record]) -> Result<Vec<Slice>, NoPlottableData> {
    let slices: Vec<Slice> = category_totals(records)
        .into_iter()
        .filter(|s| s.total.is_finite() && s.total > 0.0)
        .collect();
    if slices.is_empty() {
        Err(NoPlottableData)
    } else {
        Ok(slices)
    }
}

/// Receives the positive category totals to display.
pub trait ChartSink {
    fn draw(&mut self, title: &str, slices: &[Slice]) -> Result<()>;
}

/// Draws slices as labelled horizontal bars with their share of the whole.
pub struct TextChart<W: Write> {
    out: W,
}

impl<W: Write> TextChart<W> {
    pub fn new(out: W) -> Self {
        TextChart { out }
    }
}

impl<W: Write> ChartSink for TextChart<W> {
    fn draw(&mut self, title: &str, slices: &[Slice]) -> Result<()> {
        let sum: f64 = slices.iter().map(|s| s.total).sum();
        let label_width = slices
            .iter()
            .map(|s| UnicodeWidthStr::width(s.category.as_str()))
            .max()
            .unwrap_or(0);

        writeln!(self.out, "{}", title)?;
        for s in slices {
            let share = s.total / sum;
            let bar = "#".repeat((share * BAR_WIDTH as f64).round() as usize);
            writeln!(
                self.out,
                "{}  {:>5.1}%  {:<bw$}  {}",
                table::pad_right(&s.category, label_width),
                share * 100.0,
                bar,
                amount::format(s.total),
                bw = BAR_WIDTH,
            )?;
        }
        self.out.flush()?;
        Ok(())
    }
}
