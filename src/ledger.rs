//! High-level ledger facade.
//!
//! [`Ledger`] owns the [`TransactionStore`], a [`LedgerStorage`] backend and
//! the active month filter. Every mutation persists the full list and
//! reconciles the month filter; every read recomputes its view from
//! scratch. Storage failures are logged and never abort an operation: the
//! in-memory store stays authoritative.

use std::io;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::aggregate::{self, Aggregates, QuickStats, Summary};
use crate::chart::{self, ComparisonSeries, ExpenseChart};
use crate::error::{Result, TrackerError, ValidationError};
use crate::export::{self, ExportRow};
use crate::filter::{TransactionQuery, month_scoped};
use crate::format::{DisplayRow, Notice};
use crate::models::{
    MonthFilter, NewTransaction, Transaction, TransactionId, TransactionPatch, TypeFilter,
    YearMonth,
};
use crate::storage::LedgerStorage;
use crate::store::TransactionStore;

/// Builder for [`Ledger`].
#[derive(Debug)]
pub struct LedgerBuilder<S: LedgerStorage> {
    /// Storage backend.
    storage: Option<S>,
    /// Initial month filter.
    month_filter: MonthFilter,
}

impl<S: LedgerStorage> LedgerBuilder<S> {
    /// Sets the storage backend.
    #[inline]
    #[must_use]
    pub fn storage(mut self, storage: S) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Sets the initial month filter.
    ///
    /// A month absent from the loaded data falls back to
    /// [`MonthFilter::All`].
    #[inline]
    #[must_use]
    pub const fn month_filter(mut self, filter: MonthFilter) -> Self {
        self.month_filter = filter;
        self
    }

    /// Loads the stored transactions and builds the ledger.
    ///
    /// Unreadable or malformed data is logged and replaced by an empty
    /// store.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if no storage was provided.
    #[inline]
    pub fn build(self) -> Result<Ledger<S>> {
        let storage = self
            .storage
            .ok_or_else(|| TrackerError::Storage("storage backend is required".into()))?;
        let store = match storage.load() {
            Ok(transactions) => TransactionStore::from_transactions(transactions),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load transactions, starting empty");
                TransactionStore::new()
            }
        };
        tracing::debug!(count = store.len(), "ledger loaded");
        let mut ledger = Ledger {
            store,
            storage,
            month_filter: self.month_filter,
        };
        ledger.reconcile_month_filter();
        Ok(ledger)
    }
}

/// One entry of the month selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthOption {
    /// The month, `YYYY-MM` on the wire.
    pub month: YearMonth,
    /// Long label, e.g. `January 2024`.
    pub label: String,
}

/// Everything a presentation layer renders after a change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Active month filter.
    pub month_filter: MonthFilter,
    /// Filtered display list.
    pub rows: Vec<DisplayRow>,
    /// Month-scoped totals, quick stats and category breakdown.
    pub aggregates: Aggregates,
    /// Income versus expense split.
    pub comparison: ComparisonSeries,
    /// Expense histogram.
    pub chart: ExpenseChart,
    /// Month selector entries, newest first.
    pub months: Vec<MonthOption>,
}

/// Transaction ledger with persistence and a global month filter.
#[derive(Debug)]
pub struct Ledger<S: LedgerStorage> {
    /// In-memory transactions.
    store: TransactionStore,
    /// Persistence backend.
    storage: S,
    /// Month selector shared by every view.
    month_filter: MonthFilter,
}

impl<S: LedgerStorage> Ledger<S> {
    /// Creates a new builder.
    #[inline]
    #[must_use]
    pub const fn builder() -> LedgerBuilder<S> {
        LedgerBuilder {
            storage: None,
            month_filter: MonthFilter::All,
        }
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Adds a transaction dated today unless the input says otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for a blank description or an
    /// invalid amount; nothing is stored.
    #[inline]
    pub fn add(&mut self, input: NewTransaction) -> Result<(TransactionId, Notice)> {
        self.add_on(input, Local::now().date_naive())
    }

    /// Adds a transaction, defaulting its date to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for a blank description or an
    /// invalid amount; nothing is stored.
    #[tracing::instrument(skip_all)]
    pub fn add_on(
        &mut self,
        input: NewTransaction,
        today: NaiveDate,
    ) -> Result<(TransactionId, Notice)> {
        let id = self.store.add(input, today)?;
        let notice = Notice::added(self.store.get(id).map_or(0.0_f64, |tx| tx.amount));
        self.commit();
        Ok((id, notice))
    }

    /// Replaces the editable fields of a transaction.
    ///
    /// Returns `Ok(None)` when `id` is not in the ledger. The amount keeps
    /// the sign of an expense when given as a magnitude.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] when a field is blank or
    /// invalid; nothing is changed.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn edit(&mut self, id: TransactionId, patch: TransactionPatch) -> Result<Option<Notice>> {
        if !self.store.update(id, patch)? {
            tracing::debug!("edit target not found");
            return Ok(None);
        }
        self.commit();
        Ok(Some(Notice::Updated))
    }

    /// Deletes a transaction.
    ///
    /// Returns `None` when `id` is absent; deleting twice is harmless.
    #[tracing::instrument(skip_all, fields(id = %id))]
    pub fn delete(&mut self, id: TransactionId) -> Option<Notice> {
        let removed = self.store.take(id)?;
        self.commit();
        Some(Notice::deleted(&removed))
    }

    /// Removes every transaction and returns how many there were.
    ///
    /// Confirmation is the caller's business; show [`Notice::Cleared`]
    /// when the count is non-zero.
    #[tracing::instrument(skip_all)]
    pub fn clear(&mut self) -> usize {
        let count = self.store.clear();
        if count == 0 {
            self.reconcile_month_filter();
            return 0;
        }
        tracing::info!(count, "all transactions cleared");
        if let Err(err) = self.storage.clear() {
            tracing::warn!(error = %err, "failed to clear persisted transactions");
        }
        self.reconcile_month_filter();
        count
    }

    /// Sets the month filter.
    ///
    /// A month without transactions is accepted and yields empty views
    /// until the next mutation, which resets it to [`MonthFilter::All`].
    #[inline]
    pub const fn set_month_filter(&mut self, filter: MonthFilter) {
        self.month_filter = filter;
    }

    /// Persists the store and fixes up the month filter.
    fn commit(&mut self) {
        if let Err(err) = self.storage.save(self.store.list()) {
            tracing::warn!(error = %err, "failed to persist transactions");
        }
        self.reconcile_month_filter();
    }

    /// Resets the month filter to `All` if its month has disappeared.
    fn reconcile_month_filter(&mut self) {
        if let MonthFilter::Month(month) = self.month_filter
            && !self.has_month(month)
        {
            tracing::debug!(month = %month, "selected month is gone, showing all months");
            self.month_filter = MonthFilter::All;
        }
    }

    /// Returns `true` if any transaction falls within `month`.
    fn has_month(&self, month: YearMonth) -> bool {
        self.store.list().iter().any(|tx| month.contains(tx.date))
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Active month filter.
    #[inline]
    #[must_use]
    pub const fn month_filter(&self) -> MonthFilter {
        self.month_filter
    }

    /// All transactions, newest first.
    #[inline]
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        self.store.list()
    }

    /// Looks up a transaction.
    #[inline]
    #[must_use]
    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.store.get(id)
    }

    /// Storage backend.
    #[inline]
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Distinct months present in the ledger, newest first.
    #[must_use]
    pub fn month_options(&self) -> Vec<MonthOption> {
        let mut months: Vec<YearMonth> = self
            .store
            .list()
            .iter()
            .map(Transaction::year_month)
            .collect();
        months.sort_unstable_by(|a, b| b.cmp(a));
        months.dedup();
        months
            .into_iter()
            .map(|month| MonthOption {
                month,
                label: month.long_label(),
            })
            .collect()
    }

    /// Query combining `search` and `kind` with the active month filter.
    #[inline]
    #[must_use]
    pub fn query(&self, search: &str, kind: TypeFilter) -> TransactionQuery {
        TransactionQuery::new()
            .search(search)
            .kind(kind)
            .month(self.month_filter)
    }

    /// Display list: every filter applied, ledger order kept.
    #[inline]
    #[must_use]
    pub fn view(&self, search: &str, kind: TypeFilter) -> Vec<&Transaction> {
        self.query(search, kind).apply(self.store.list())
    }

    /// Display rows for [`Self::view`], dated relative to `today`.
    #[must_use]
    pub fn display_rows(&self, search: &str, kind: TypeFilter, today: NaiveDate) -> Vec<DisplayRow> {
        self.view(search, kind)
            .into_iter()
            .map(|tx| DisplayRow::new(tx, today))
            .collect()
    }

    /// Month-scoped subset shared by every aggregate view.
    #[inline]
    #[must_use]
    pub fn scoped(&self) -> Vec<&Transaction> {
        month_scoped(self.store.list(), self.month_filter)
    }

    /// Income/expense totals of the month-scoped subset.
    #[inline]
    #[must_use]
    pub fn summary(&self) -> Summary {
        aggregate::summarize(self.scoped())
    }

    /// Totals, quick stats and category breakdown of the month-scoped
    /// subset, as of `now`.
    #[inline]
    #[must_use]
    pub fn aggregates(&self, now: NaiveDateTime) -> Aggregates {
        aggregate::aggregate(self.scoped(), now)
    }

    /// Quick stats as of `now`.
    #[inline]
    #[must_use]
    pub fn quick_stats(&self, now: NaiveDateTime) -> QuickStats {
        self.aggregates(now).stats
    }

    /// Income versus expense split of the month-scoped subset.
    #[inline]
    #[must_use]
    pub fn comparison(&self) -> ComparisonSeries {
        ComparisonSeries::from_summary(&self.summary())
    }

    /// Expense histogram for the active month filter.
    #[inline]
    #[must_use]
    pub fn expense_chart(&self, today: NaiveDate) -> ExpenseChart {
        chart::expense_chart(self.scoped(), self.month_filter, today)
    }

    /// Everything to render, computed as of `now`.
    #[must_use]
    pub fn dashboard(&self, search: &str, kind: TypeFilter, now: NaiveDateTime) -> Dashboard {
        let today = now.date();
        let aggregates = self.aggregates(now);
        Dashboard {
            month_filter: self.month_filter,
            rows: self.display_rows(search, kind, today),
            comparison: ComparisonSeries::from_summary(&aggregates.summary),
            aggregates,
            chart: self.expense_chart(today),
            months: self.month_options(),
        }
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export rows for the month-scoped subset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NothingToExport`] when the ledger holds
    /// no transactions at all.
    pub fn export_rows(&self) -> Result<Vec<ExportRow>> {
        if self.store.is_empty() {
            return Err(ValidationError::NothingToExport.into());
        }
        Ok(export::export_rows(self.scoped()))
    }

    /// Writes the month-scoped subset as CSV.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NothingToExport`] when the ledger is
    /// empty, or [`TrackerError::Csv`] if writing fails.
    #[tracing::instrument(skip_all)]
    pub fn export_csv<W: io::Write>(&self, writer: W) -> Result<Notice> {
        let rows = self.export_rows()?;
        export::write_csv(&rows, writer)?;
        tracing::debug!(count = rows.len(), "transactions exported");
        Ok(Notice::Exported(rows.len()))
    }

    /// Suggested export file name for the active month filter.
    #[inline]
    #[must_use]
    pub fn export_file_name(&self, today: NaiveDate) -> String {
        export::export_file_name(self.month_filter, today)
    }
}
