//! Transaction query predicate.
//!
//! The display list combines free-text search, the income/expense toggle
//! and the month selector. Summaries, quick stats, charts and export only
//! ever apply the month selector; [`month_scoped`] is the helper for that.

use crate::models::{MonthFilter, Transaction, TypeFilter};

/// Composable query over transactions.
///
/// All set criteria are combined: a transaction must satisfy every one.
///
/// # Examples
///
/// ```
/// use expense_tracker_rs::filter::TransactionQuery;
/// use expense_tracker_rs::models::{MonthFilter, TypeFilter};
///
/// let query = TransactionQuery::new()
///     .search("coffee")
///     .kind(TypeFilter::Expense)
///     .month("2024-01".parse::<MonthFilter>().unwrap());
/// assert_eq!(query.kind, TypeFilter::Expense);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    /// Case-insensitive substring matched against description or category.
    pub search: String,
    /// Income/expense toggle.
    pub kind: TypeFilter,
    /// Month selector.
    pub month: MonthFilter,
}

impl TransactionQuery {
    /// Creates a query that matches every transaction.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text.
    #[inline]
    #[must_use]
    pub fn search<T: Into<String>>(mut self, text: T) -> Self {
        self.search = text.into();
        self
    }

    /// Sets the type filter.
    #[inline]
    #[must_use]
    pub const fn kind(mut self, kind: TypeFilter) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the month filter.
    #[inline]
    #[must_use]
    pub const fn month(mut self, month: MonthFilter) -> Self {
        self.month = month;
        self
    }

    /// Returns `true` if the transaction satisfies all criteria.
    #[inline]
    #[must_use]
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.matches_with(tx, &self.search.to_lowercase())
    }

    /// Applies the query to a list, preserving its order.
    #[must_use]
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        let needle = self.search.to_lowercase();
        transactions
            .iter()
            .filter(|tx| self.matches_with(tx, &needle))
            .collect()
    }

    /// Checks every criterion with the search text already lowercased.
    fn matches_with(&self, tx: &Transaction, needle: &str) -> bool {
        contains_text(tx, needle) && self.kind.matches(tx.amount) && self.month.matches(tx.date)
    }
}

/// Case-insensitive match of an already-lowercased needle against the
/// description or category. An empty needle always matches.
fn contains_text(tx: &Transaction, needle: &str) -> bool {
    needle.is_empty()
        || tx.description.to_lowercase().contains(needle)
        || tx.category.to_lowercase().contains(needle)
}

/// Returns the month-scoped subset used by every aggregate view.
#[must_use]
pub fn month_scoped(transactions: &[Transaction], month: MonthFilter) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| month.matches(tx.date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NaiveDate, TransactionId};

    fn tx(id: i64, description: &str, amount: f64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(3, "Coffee beans", -12.0, "food", "2024-02-01"),
            tx(2, "Train ticket", -40.0, "Transport", "2024-01-06"),
            tx(1, "Salary", 1000.0, "salary", "2024-01-05"),
            tx(0, "Adjustment", 0.0, "other", "2024-01-05"),
        ]
    }

    fn ids(list: &[&Transaction]) -> Vec<i64> {
        list.iter().map(|tx| tx.id.get()).collect()
    }

    #[test]
    fn empty_query_matches_everything() {
        let all = sample();
        let query = TransactionQuery::new();
        assert!(all.iter().all(|t| query.matches(t)));
        assert_eq!(query.apply(&all).len(), all.len());
    }

    #[test]
    fn search_is_case_insensitive_over_description_and_category() {
        let all = sample();
        assert_eq!(ids(&TransactionQuery::new().search("COFFEE").apply(&all)), [3]);
        assert_eq!(ids(&TransactionQuery::new().search("transp").apply(&all)), [2]);
        assert!(TransactionQuery::new().search("rent").apply(&all).is_empty());
    }

    #[test]
    fn type_filter_excludes_zero_amounts() {
        let all = sample();
        assert_eq!(
            ids(&TransactionQuery::new().kind(TypeFilter::Income).apply(&all)),
            [1]
        );
        assert_eq!(
            ids(&TransactionQuery::new().kind(TypeFilter::Expense).apply(&all)),
            [3, 2]
        );
    }

    #[test]
    fn month_filter_uses_calendar_month() {
        let all = sample();
        let january: MonthFilter = "2024-01".parse().unwrap();
        assert_eq!(ids(&TransactionQuery::new().month(january).apply(&all)), [2, 1, 0]);
    }

    #[test]
    fn criteria_are_combined() {
        let all = sample();
        let query = TransactionQuery::new()
            .search("a")
            .kind(TypeFilter::Expense)
            .month("2024-01".parse().unwrap());
        assert_eq!(ids(&query.apply(&all)), [2]);
        assert!(query.matches(&all[1]));
        assert!(!query.matches(&all[2]));
    }

    #[test]
    fn apply_agrees_with_matches() {
        let all = sample();
        for search in ["", "A", "Salary", "FOOD"] {
            for kind in [TypeFilter::All, TypeFilter::Income, TypeFilter::Expense] {
                for month in [MonthFilter::All, "2024-02".parse().unwrap()] {
                    let query = TransactionQuery::new().search(search).kind(kind).month(month);
                    let expected: Vec<i64> = all
                        .iter()
                        .filter(|t| query.matches(t))
                        .map(|t| t.id.get())
                        .collect();
                    assert_eq!(ids(&query.apply(&all)), expected);
                }
            }
        }
    }

    #[test]
    fn month_scoped_ignores_search_and_type() {
        let all = sample();
        let scoped = month_scoped(&all, "2024-01".parse().unwrap());
        assert_eq!(ids(&scoped), [2, 1, 0]);
        assert_eq!(month_scoped(&all, MonthFilter::All).len(), 4);
    }
}
