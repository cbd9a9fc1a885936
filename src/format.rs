//! Presentation text: currency, relative dates, category labels and
//! action notices.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Transaction, TransactionId, TransactionKind};

/// Formats an amount as US dollars.
///
/// The magnitude is rounded to two decimals (whole dollars when `short`),
/// trailing fraction zeros are dropped and thousands are comma-grouped.
/// A `-` is prepended when `amount` is negative.
///
/// # Examples
///
/// ```
/// use expense_tracker_rs::format::format_currency;
///
/// assert_eq!(format_currency(-1234.5, false), "-$1,234.5");
/// assert_eq!(format_currency(1234.5, true), "$1,235");
/// assert_eq!(format_currency(1000.0, false), "$1,000");
/// ```
#[must_use]
pub fn format_currency(amount: f64, short: bool) -> String {
    let precision = if short { 0 } else { 2 };
    let rounded = format!("{:.*}", precision, amount.abs());
    let (whole, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::with_capacity(rounded.len() + 4);
    if amount < 0.0_f64 {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Inserts `,` between every group of three digits, from the right.
#[must_use]
pub fn group_thousands(digits: &str) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(count + count / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (count - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Relative date label: `Today`, `Yesterday`, or e.g. `Jan 6`.
#[must_use]
pub fn format_date(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        return "Today".to_owned();
    }
    if today.pred_opt() == Some(date) {
        return "Yesterday".to_owned();
    }
    date.format("%b %-d").to_string()
}

/// Uppercases the first character; the rest is kept as is.
#[must_use]
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Display text for the top category, `-` when there is none.
#[must_use]
pub fn format_top_category(category: Option<&str>) -> String {
    category.map_or_else(|| "-".to_owned(), capitalize)
}

/// One line of the transaction list, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    /// Transaction identifier, for edit and delete actions.
    pub id: TransactionId,
    /// Description as stored.
    pub description: String,
    /// `Income` for positive amounts, otherwise `Expense`.
    pub kind: TransactionKind,
    /// Signed currency text.
    pub amount: String,
    /// Capitalized category.
    pub category: String,
    /// Relative date label.
    pub date: String,
}

impl DisplayRow {
    /// Builds the row for `tx` as seen on `today`.
    #[must_use]
    pub fn new(tx: &Transaction, today: NaiveDate) -> Self {
        Self {
            id: tx.id,
            description: tx.description.clone(),
            kind: row_kind(tx.amount),
            amount: format_currency(tx.amount, false),
            category: capitalize(&tx.category),
            date: format_date(tx.date, today),
        }
    }
}

/// List rows show zero amounts as expenses.
fn row_kind(amount: f64) -> TransactionKind {
    if amount > 0.0_f64 {
        TransactionKind::Income
    } else {
        TransactionKind::Expense
    }
}

/// Short confirmation message for a completed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A transaction was added.
    Added(TransactionKind),
    /// A transaction was deleted.
    Deleted {
        /// Description of the removed transaction.
        description: String,
        /// Formatted signed amount of the removed transaction.
        amount: String,
    },
    /// A transaction was edited.
    Updated,
    /// Every transaction was removed.
    Cleared,
    /// Transactions were written to CSV.
    Exported(usize),
}

impl Notice {
    /// Notice for adding a transaction with the given amount.
    #[inline]
    #[must_use]
    pub fn added(amount: f64) -> Self {
        Self::Added(row_kind(amount))
    }

    /// Notice for deleting `tx`.
    #[inline]
    #[must_use]
    pub fn deleted(tx: &Transaction) -> Self {
        Self::Deleted {
            description: tx.description.clone(),
            amount: format_currency(tx.amount, false),
        }
    }
}

impl core::fmt::Display for Notice {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            Self::Added(kind) => write!(f, "{kind} added successfully!"),
            Self::Deleted {
                ref description,
                ref amount,
            } => write!(f, "Deleted {description} ({amount})"),
            Self::Updated => f.write_str("Transaction updated successfully!"),
            Self::Cleared => f.write_str("All transactions cleared!"),
            Self::Exported(count) => write!(f, "Exported {count} transactions to CSV"),
        }
    }
}
