//! Data models for the ledger.
//!
//! The [`Transaction`] record, its identifier, the kind and filter enums,
//! calendar month values, and the raw inputs accepted by the store.

mod enums;
mod ids;
mod input;
mod month;
mod transaction;

pub use chrono::NaiveDate;
pub use enums::{TransactionKind, TypeFilter};
pub use ids::TransactionId;
pub use input::{NewTransaction, TransactionPatch, parse_amount, parse_date, validate_description};
pub use month::{MonthFilter, YearMonth};
pub use transaction::Transaction;
