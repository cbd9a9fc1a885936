//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe implementation of
//! [`super::LedgerStorage`] for tests where file I/O is undesirable.

use std::sync::{Mutex, PoisonError};

use crate::error::{Result, TrackerError};
use crate::models::Transaction;

/// Thread-safe in-memory storage.
///
/// # Example
///
/// ```rust
/// use expense_tracker_rs::storage::{InMemoryStorage, LedgerStorage};
///
/// let storage = InMemoryStorage::new();
/// assert!(storage.load().unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Last saved list.
    transactions: Vec<Transaction>,
    /// Number of successful saves.
    saves: usize,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-populated with `transactions`.
    #[inline]
    #[must_use]
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                transactions,
                saves: 0,
            }),
        }
    }

    /// Number of times [`super::LedgerStorage::save`] has been called.
    ///
    /// # Errors
    ///
    /// Returns an error if the inner lock is poisoned.
    #[inline]
    pub fn save_count(&self) -> Result<usize> {
        self.with_lock(|inner| inner.saves)
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R, F: FnOnce(&mut Inner) -> R>(&self, op: F) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(op(&mut inner))
    }
}

/// Wraps a mutex poison error.
fn lock_error<T>(err: &PoisonError<T>) -> TrackerError {
    TrackerError::Storage(err.to_string().into())
}

impl super::LedgerStorage for InMemoryStorage {
    #[inline]
    fn load(&self) -> Result<Vec<Transaction>> {
        self.with_lock(|inner| inner.transactions.clone())
    }

    #[inline]
    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        self.with_lock(|inner| {
            inner.transactions = transactions.to_vec();
            inner.saves += 1;
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| inner.transactions.clear())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NaiveDate, TransactionId};
    use crate::storage::LedgerStorage as _;

    fn test_transaction(id: i64) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: format!("tx {id}"),
            amount: -1.0,
            category: "food".to_owned(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn starts_empty() {
        let storage = InMemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());
        assert_eq!(storage.save_count().unwrap(), 0);
    }

    #[test]
    fn save_replaces_and_keeps_order() {
        let storage = InMemoryStorage::with_transactions(vec![test_transaction(1)]);
        storage
            .save(&[test_transaction(3), test_transaction(2)])
            .unwrap();
        let ids: Vec<i64> = storage.load().unwrap().iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, [3, 2]);
        assert_eq!(storage.save_count().unwrap(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let storage = InMemoryStorage::with_transactions(vec![test_transaction(1)]);
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_empty());
    }
}
