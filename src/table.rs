//! Aligned text table of ledger records with a closing totals row.

use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::amount;
use crate::record::Record;

const GAP: &str = " | ";

/// Column headings and fixed strings used by `TableRenderer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLabels {
    pub number: String,
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub total: String,
    /// Printed instead of the table when there are no records.
    pub empty: String,
}

impl Default for TableLabels {
    fn default() -> Self {
        TableLabels {
            number: "Nr.".to_string(),
            date: "Datum".to_string(),
            category: "Kategorie".to_string(),
            description: "Beschreibung".to_string(),
            amount: "Betrag".to_string(),
            total: "Gesamt:".to_string(),
            empty: "Noch keine Einträge erfasst.".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Widths {
    number: usize,
    date: usize,
    category: usize,
    description: usize,
    amount: usize,
}

impl Widths {
    fn measure(labels: &TableLabels, records: &[Record], amounts: &[String], total: &str) -> Self {
        Widths {
            number: width(&labels.number).max(records.len().to_string().len()),
            date: column(&labels.date, records.iter().map(|r| r.date.as_str())),
            category: column(&labels.category, records.iter().map(|r| r.category.as_str())),
            description: column(
                &labels.description,
                records.iter().map(|r| r.description.as_str()),
            ),
            amount: column(
                &labels.amount,
                amounts.iter().map(String::as_str).chain(Some(total)),
            ),
        }
    }

    /// Width of everything left of the amount column, gaps included.
    fn leading(&self) -> usize {
        self.number + self.date + self.category + self.description + 3 * GAP.len()
    }

    fn line(&self) -> usize {
        self.leading() + GAP.len() + self.amount
    }
}

fn width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// The widest of `label` and every cell.
fn column<'a>(label: &str, cells: impl Iterator<Item = &'a str>) -> usize {
    cells.map(width).fold(width(label), usize::max)
}

/// `s` followed by spaces up to `w` display columns.
pub(crate) fn pad_right(s: &str, w: usize) -> String {
    format!("{}{}", s, " ".repeat(w.saturating_sub(width(s))))
}

/// `s` preceded by spaces up to `w` display columns.
pub(crate) fn pad_left(s: &str, w: usize) -> String {
    format!("{}{}", " ".repeat(w.saturating_sub(width(s))), s)
}

pub struct TableRenderer {
    labels: TableLabels,
}

impl TableRenderer {
    pub fn new(labels: TableLabels) -> Self {
        TableRenderer { labels }
    }

    /// Renders `records` in order, each prefixed by its 1-based position.
    pub fn render(&self, records: &[Record]) -> String {
        if records.is_empty() {
            return format!("{}\n", self.labels.empty);
        }
        let mut out = String::new();
        // Writing into a String cannot fail.
        self.write_table(&mut out, records)
            .map(|()| out)
            .unwrap_or_default()
    }

    fn write_table<W: Write>(&self, out: &mut W, records: &[Record]) -> fmt::Result {
        let labels = &self.labels;
        let amounts: Vec<String> = records.iter().map(|r| amount::format(r.amount)).collect();
        let total = amount::format(records.iter().map(|r| r.amount).sum());
        let w = Widths::measure(labels, records, &amounts, &total);
        let rule = "-".repeat(w.line());

        write_row(
            out,
            &w,
            [
                labels.number.as_str(),
                labels.date.as_str(),
                labels.category.as_str(),
                labels.description.as_str(),
                labels.amount.as_str(),
            ],
        )?;
        writeln!(out, "{}", rule)?;
        for (i, (r, amt)) in records.iter().zip(&amounts).enumerate() {
            let position = (i + 1).to_string();
            write_row(
                out,
                &w,
                [
                    position.as_str(),
                    r.date.as_str(),
                    r.category.as_str(),
                    r.description.as_str(),
                    amt.as_str(),
                ],
            )?;
        }
        writeln!(out, "{}", rule)?;
        writeln!(
            out,
            "{}{}{}",
            pad_right(&labels.total, w.leading()),
            " ".repeat(GAP.len()),
            pad_left(&total, w.amount),
        )
    }
}

fn write_row<W: Write>(out: &mut W, w: &Widths, cells: [&str; 5]) -> fmt::Result {
    let [number, date, category, description, amount] = cells;
    writeln!(
        out,
        "{}{gap}{}{gap}{}{gap}{}{gap}{}",
        pad_right(number, w.number),
        pad_right(date, w.date),
        pad_right(category, w.category),
        pad_right(description, w.description),
        pad_left(amount, w.amount),
        gap = GAP,
    )
}
