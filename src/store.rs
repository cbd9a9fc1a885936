//! In-memory ordered transaction store.
//!
//! The store is the only mutable state of the ledger. Records are kept
//! newest-created first; edits keep their position and deletion removes
//! exactly one record.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};

use crate::error::ValidationError;
use crate::models::{
    NewTransaction, Transaction, TransactionId, TransactionPatch, parse_amount,
    validate_description,
};

/// Ordered collection of transactions, newest first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionStore {
    /// Records in display order (index 0 is the most recently added).
    transactions: Vec<Transaction>,
    /// Highest id ever handed out or loaded.
    last_id: i64,
}

impl TransactionStore {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a persisted list, keeping its order.
    ///
    /// Records with a blank description, or whose id repeats an earlier
    /// one, are dropped so ids stay unique and descriptions non-empty.
    #[must_use]
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut seen: HashSet<TransactionId> = HashSet::with_capacity(transactions.len());
        let mut kept = Vec::with_capacity(transactions.len());
        for tx in transactions {
            if tx.description.trim().is_empty() {
                tracing::warn!(id = %tx.id, "dropping transaction with blank description");
            } else if seen.insert(tx.id) {
                kept.push(tx);
            } else {
                tracing::warn!(id = %tx.id, "dropping transaction with duplicate id");
            }
        }
        let last_id = kept.iter().map(|tx| tx.id.get()).max().unwrap_or(0);
        Self {
            transactions: kept,
            last_id,
        }
    }

    /// Validates `input` and inserts it at the head of the store.
    ///
    /// The date defaults to `today` when the input carries none.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyDescription`] or
    /// [`ValidationError::InvalidAmount`]; the store is left untouched.
    pub fn add(
        &mut self,
        input: NewTransaction,
        today: NaiveDate,
    ) -> Result<TransactionId, ValidationError> {
        let description = validate_description(&input.description)?;
        let amount = parse_amount(&input.amount)?;
        let id = self.next_id();
        tracing::debug!(id = %id, amount, "transaction added");
        self.transactions.insert(
            0,
            Transaction {
                id,
                description,
                amount,
                category: input.category.trim().to_owned(),
                date: input.date.unwrap_or(today),
            },
        );
        Ok(id)
    }

    /// Removes the record with `id`, returning `true` if it existed.
    ///
    /// Removing an absent id is a no-op.
    #[inline]
    pub fn remove(&mut self, id: TransactionId) -> bool {
        self.take(id).is_some()
    }

    /// Removes and returns the record with `id`.
    pub fn take(&mut self, id: TransactionId) -> Option<Transaction> {
        let position = self.position(id)?;
        let removed = self.transactions.remove(position);
        tracing::debug!(id = %id, "transaction removed");
        Some(removed)
    }

    /// Replaces the editable fields of the record with `id`.
    ///
    /// Returns `Ok(false)` without validating when `id` is absent. The
    /// patch amount is treated as a magnitude: if the stored amount is
    /// negative and the new one positive, it is negated so an edit keeps
    /// an expense an expense. Position and id never change.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank description, a blank or
    /// non-numeric amount, or a missing date; the store is left untouched.
    pub fn update(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<bool, ValidationError> {
        let Some(tx) = self.transactions.iter_mut().find(|tx| tx.id == id) else {
            return Ok(false);
        };
        let description = validate_description(&patch.description)?;
        if patch.amount.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "amount" });
        }
        let date = patch
            .date
            .ok_or(ValidationError::MissingField { field: "date" })?;
        let amount = preserve_sign(tx.amount, parse_amount(&patch.amount)?);

        tx.description = description;
        tx.amount = amount;
        tx.category = patch.category.trim().to_owned();
        tx.date = date;
        tracing::debug!(id = %id, amount, "transaction updated");
        Ok(true)
    }

    /// Removes every record and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.transactions.len();
        self.transactions.clear();
        tracing::debug!(count, "store cleared");
        count
    }

    /// Records in order, newest first.
    #[inline]
    #[must_use]
    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Looks up a record by id.
    #[inline]
    #[must_use]
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    /// Number of records.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Returns `true` if the store holds no records.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Index of the record with `id`.
    fn position(&self, id: TransactionId) -> Option<usize> {
        self.transactions.iter().position(|tx| tx.id == id)
    }

    /// Next id: the current time in milliseconds, bumped past the last id.
    ///
    /// Once `i64::MAX` is taken, ids are searched downward for the highest
    /// one not in use.
    fn next_id(&mut self) -> TransactionId {
        if let Some(bumped) = self.last_id.checked_add(1) {
            self.last_id = Utc::now().timestamp_millis().max(bumped);
            return TransactionId::new(self.last_id);
        }
        let used: HashSet<i64> = self.transactions.iter().map(|tx| tx.id.get()).collect();
        let free = (i64::MIN..=i64::MAX)
            .rev()
            .find(|candidate| !used.contains(candidate))
            .unwrap_or(i64::MIN);
        tracing::warn!(id = free, "id space above the last id exhausted");
        TransactionId::new(free)
    }
}

/// Applies the edit sign rule: an expense edited with a positive
/// magnitude stays negative.
fn preserve_sign(original: f64, new: f64) -> f64 {
    if original < 0.0_f64 && new > 0.0_f64 {
        -new
    } else {
        new
    }
}
