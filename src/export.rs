//! CSV export of the month-scoped subset.
//!
//! Rows are `Date,Description,Category,Amount,Type`. Fields containing a
//! comma, quote or line break are quote-wrapped with inner quotes doubled.

use std::io;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Result, TrackerError};
use crate::format::capitalize;
use crate::models::{MonthFilter, Transaction};

/// Header row of every export.
pub const CSV_HEADERS: [&str; 5] = ["Date", "Description", "Category", "Amount", "Type"];

/// One exported transaction, every field already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Description as stored.
    pub description: String,
    /// Capitalized category.
    pub category: String,
    /// Magnitude with exactly two decimals.
    pub amount: String,
    /// `Income` when the amount is positive, otherwise `Expense`.
    pub kind: &'static str,
}

impl ExportRow {
    /// Renders one transaction.
    #[must_use]
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            date: tx.date.format("%Y-%m-%d").to_string(),
            description: tx.description.clone(),
            category: capitalize(&tx.category),
            amount: format!("{:.2}", tx.amount.abs()),
            kind: if tx.amount > 0.0_f64 { "Income" } else { "Expense" },
        }
    }

    /// Fields in header order.
    fn fields(&self) -> [&str; 5] {
        [
            &self.date,
            &self.description,
            &self.category,
            &self.amount,
            self.kind,
        ]
    }
}

/// Renders every transaction, preserving order.
#[must_use]
pub fn export_rows<'a, I>(transactions: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .map(ExportRow::from_transaction)
        .collect()
}

/// Writes the header and `rows` as CSV to `writer`.
///
/// Every record, the last included, ends with `\n`, so the output
/// always has a trailing newline. Fields are quoted only when they hold a
/// comma, quote or line break.
///
/// # Errors
///
/// Returns [`TrackerError::Csv`] if encoding or writing fails.
pub fn write_csv<W: io::Write>(rows: &[ExportRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    csv_writer.write_record(CSV_HEADERS)?;
    for row in rows {
        csv_writer.write_record(row.fields())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the CSV document into a string.
///
/// # Errors
///
/// Returns [`TrackerError::Csv`] or [`TrackerError::Io`] if encoding fails.
pub fn to_csv_string(rows: &[ExportRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|err| TrackerError::Io(io::Error::new(io::ErrorKind::InvalidData, err)))
}

/// Suggested file name for an export.
///
/// `expense-tracker-<today>.csv` for all months, otherwise
/// `expense-tracker-<YYYY-MM>.csv`.
#[must_use]
pub fn export_file_name(filter: MonthFilter, today: NaiveDate) -> String {
    match filter {
        MonthFilter::All => format!("expense-tracker-{}.csv", today.format("%Y-%m-%d")),
        MonthFilter::Month(month) => format!("expense-tracker-{month}.csv"),
    }
}
