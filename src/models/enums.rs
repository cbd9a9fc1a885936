//! Enumeration types for transaction kinds and the type filter.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Economic direction of a transaction, encoded by the amount's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    /// Positive amount.
    Income,
    /// Negative amount.
    Expense,
}

impl TransactionKind {
    /// Classifies a signed amount.
    ///
    /// Returns `None` for zero, which is neither income nor expense.
    #[inline]
    #[must_use]
    pub fn of(amount: f64) -> Option<Self> {
        if amount > 0.0_f64 {
            Some(Self::Income)
        } else if amount < 0.0_f64 {
            Some(Self::Expense)
        } else {
            None
        }
    }

    /// Returns the capitalized label used in exports and notices.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Income/expense toggle of the display list.
///
/// Only the display list honours this filter; summaries, stats and charts
/// ignore it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeFilter {
    /// Every transaction matches.
    #[default]
    All,
    /// Only amounts greater than zero.
    Income,
    /// Only amounts less than zero.
    Expense,
}

impl TypeFilter {
    /// Returns `true` if a transaction with this amount passes the filter.
    #[inline]
    #[must_use]
    pub fn matches(self, amount: f64) -> bool {
        match self {
            Self::All => true,
            Self::Income => amount > 0.0_f64,
            Self::Expense => amount < 0.0_f64,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = ValidationError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(ValidationError::InvalidTypeFilter {
                input: s.to_owned(),
            }),
        }
    }
}

impl core::fmt::Display for TypeFilter {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match *self {
            Self::All => "all",
            Self::Income => "income",
            Self::Expense => "expense",
        })
    }
}
