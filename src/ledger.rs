//! The ordered, file-backed collection of ledger records.
//!
//! The backing file is CSV with the header `date,category,description,amount`.
//! Amounts are written in machine form (`-1234.50`), not through the display
//! codec. Every mutation rewrites the whole file.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

use crate::record::Record;
use crate::storage;

const HEADER: [&str; 4] = ["date", "category", "description", "amount"];

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("corrupt ledger at line {line}: {reason}")]
    CorruptLedger { line: u64, reason: String },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    records: Vec<Record>,
}

impl Ledger {
    /// Loads the ledger stored at `path`. A missing file is a fresh, empty
    /// ledger; any malformed row fails the whole load.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, LedgerError> {
        let path = path.into();
        let records = match read_records(&path)? {
            Some(records) => {
                info!("loaded {} records from {:?}", records.len(), path);
                records
            }
            None => {
                info!("no ledger at {:?}, starting empty", path);
                Vec::new()
            }
        };
        Ok(Ledger { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Adds `record` at the end and persists. If persisting fails the record
    /// is not kept.
    pub fn append(&mut self, record: Record) -> Result<(), LedgerError> {
        self.records.push(record);
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Removes the record at the 1-based `position` and persists. Returns
    /// `false` without touching anything when `position` is out of range.
    pub fn remove_at(&mut self, position: usize) -> Result<bool, LedgerError> {
        if position < 1 || position > self.records.len() {
            return Ok(false);
        }
        let removed = self.records.remove(position - 1);
        if let Err(e) = self.persist() {
            self.records.insert(position - 1, removed);
            return Err(e);
        }
        Ok(true)
    }

    /// Net sum of all amounts.
    pub fn total(&self) -> f64 {
        self.records.iter().map(|r| r.amount).sum()
    }

    /// Records whose category equals `name`, ignoring case.
    pub fn find_by_category(&self, name: &str) -> Vec<&Record> {
        let name = name.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.category.to_lowercase() == name)
            .collect()
    }

    /// Records whose date string is exactly `date`.
    pub fn find_by_date(&self, date: &str) -> Vec<&Record> {
        self.records.iter().filter(|r| r.date == date).collect()
    }

    /// Writes every record to the backing file, replacing its contents.
    pub fn persist(&self) -> Result<(), LedgerError> {
        storage::replace_file(&self.path, |f| write_records(f, &self.records))?;
        info!("saved {} records to {:?}", self.records.len(), self.path);
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Option<Vec<Record>>, LedgerError> {
    let file = match storage::open_existing(path)? {
        Some(file) => file,
        None => return Ok(None),
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(file);
    let headers = rdr.headers().map_err(corrupt)?.clone();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(corrupt)?;
        let line = row.position().map_or(0, |p| p.line());
        let de_row: de::Row = row
            .deserialize(Some(&headers))
            .map_err(|e| LedgerError::CorruptLedger {
                line,
                reason: e.to_string(),
            })?;
        records.push(de_row.into_record(line)?);
    }
    Ok(Some(records))
}

fn write_records<W: Write>(w: W, records: &[Record]) -> Result<(), LedgerError> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(w);
    wtr.write_record(HEADER)?;
    for r in records {
        let amount = format!("{:.2}", r.amount);
        wtr.write_record([
            r.date.as_str(),
            r.category.as_str(),
            r.description.as_str(),
            amount.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn corrupt(e: csv::Error) -> LedgerError {
    let line = e.position().map_or(0, |p| p.line());
    let reason = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(e) => LedgerError::Io(e),
        _ => LedgerError::CorruptLedger { line, reason },
    }
}

mod de {
    use serde_derive::Deserialize;

    use super::LedgerError;
    use crate::record::Record;

    #[derive(Deserialize)]
    pub struct Row {
        date: String,
        category: String,
        description: String,
        amount: String,
    }

    impl Row {
        pub fn into_record(self, line: u64) -> Result<Record, LedgerError> {
            let amount: f64 = self
                .amount
                .trim()
                .parse()
                .map_err(|e| LedgerError::CorruptLedger {
                    line,
                    reason: format!("amount {:?}: {}", self.amount, e),
                })?;
            Record::new(self.date, self.category, self.description, amount).map_err(|e| {
                LedgerError::CorruptLedger {
                    line,
                    reason: e.to_string(),
                }
            })
        }
    }
}
