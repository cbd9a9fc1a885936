//! Transaction model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{TransactionId, TransactionKind, YearMonth};

/// A single signed ledger entry.
///
/// The sign of `amount` encodes the type: positive is income, negative is
/// expense. Zero is accepted but counts as neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier, assigned at creation and never changed.
    pub id: TransactionId,
    /// Free-text description, never empty after trimming.
    pub description: String,
    /// Signed amount in the ledger currency.
    pub amount: f64,
    /// Category label as entered (matching is case-insensitive).
    pub category: String,
    /// Calendar date (`YYYY-MM-DD` on the wire).
    pub date: NaiveDate,
}

impl Transaction {
    /// Returns the kind encoded by the amount's sign, or `None` for zero.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<TransactionKind> {
        TransactionKind::of(self.amount)
    }

    /// Returns `true` for amounts greater than zero.
    #[inline]
    #[must_use]
    pub fn is_income(&self) -> bool {
        self.amount > 0.0_f64
    }

    /// Returns `true` for amounts less than zero.
    #[inline]
    #[must_use]
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0_f64
    }

    /// Absolute value of the amount.
    #[inline]
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    /// Calendar month the transaction falls in.
    #[inline]
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}
