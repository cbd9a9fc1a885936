//! Personal expense ledger with filtering, aggregation and chart series.
//!
//! The crate keeps an ordered list of signed transactions (positive is
//! income, negative is expense) and derives everything a presentation
//! layer needs from it: the filtered display list, income/expense totals,
//! time-window quick stats, a per-month or per-day expense histogram and
//! CSV export rows. All derived views are recomputed from scratch on
//! request.
//!
//! [`ledger::Ledger`] ties the pieces together with a persistence backend
//! from [`storage`]:
//!
//! ```
//! use expense_tracker_rs::ledger::Ledger;
//! use expense_tracker_rs::models::{NaiveDate, NewTransaction};
//! use expense_tracker_rs::storage::InMemoryStorage;
//!
//! let mut ledger = Ledger::builder()
//!     .storage(InMemoryStorage::new())
//!     .build()
//!     .unwrap();
//! let today = NaiveDate::from_ymd_opt(2024, 1, 6).unwrap();
//! let (_salary, _notice) = ledger
//!     .add_on(NewTransaction::new("Salary", "1000", "salary"), today)
//!     .unwrap();
//! let (_rent, _notice) = ledger
//!     .add_on(NewTransaction::new("Rent", "-200", "housing"), today)
//!     .unwrap();
//! assert!((ledger.summary().balance - 800.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod chart;
pub mod error;
pub mod export;
pub mod filter;
pub mod format;
pub mod ledger;
pub mod models;
pub mod storage;
pub mod store;
