//! Totals, category breakdowns and time-window statistics.
//!
//! Every function here is pure: callers pass the month-scoped subset and
//! the current instant, and results depend on nothing else. An empty
//! subset yields all-zero results.

use std::collections::HashSet;

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use crate::models::{Transaction, YearMonth};

/// Length of the trailing expense window.
const WEEK_WINDOW_DAYS: i64 = 7;

/// Income, expense and balance of a subset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Sum of positive amounts.
    pub total_income: f64,
    /// Sum of magnitudes of negative amounts.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// Number of transactions in the subset, zero amounts included.
    pub count: usize,
}

/// Expense totals per category, in first-seen order.
///
/// Keys are the stored category text; `Food` and `food` are distinct.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    /// `(category, total)` pairs in insertion order.
    entries: Vec<(String, f64)>,
}

impl CategoryTotals {
    /// Adds `amount` to `category`, appending it if unseen.
    fn record(&mut self, category: &str, amount: f64) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.0 == category) {
            entry.1 += amount;
        } else {
            self.entries.push((category.to_owned(), amount));
        }
    }

    /// Total for `category`, if it had any expense.
    #[inline]
    #[must_use]
    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.0 == category)
            .map(|entry| entry.1)
    }

    /// Iterates `(category, total)` in first-seen order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|entry| (entry.0.as_str(), entry.1))
    }

    /// Number of categories with expenses.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when there were no expenses.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Category with the strictly greatest total.
    ///
    /// Ties go to the category seen first. `None` when empty.
    #[must_use]
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (category, total) in self.iter() {
            let current_max = best.map_or(0.0_f64, |found| found.1);
            if total > current_max {
                best = Some((category, total));
            }
        }
        best
    }
}

/// Today / week / top category / monthly average figures.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    /// Expense magnitude dated today.
    pub today_expense: f64,
    /// Expense magnitude dated within the trailing seven days.
    pub week_expense: f64,
    /// Category with the largest expense total, as stored.
    pub top_category: Option<String>,
    /// Total expense divided by the number of months with any expense.
    pub avg_monthly_expense: f64,
}

/// Everything the aggregator derives from one scan of a subset.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Income/expense totals.
    pub summary: Summary,
    /// Quick stats.
    pub stats: QuickStats,
    /// Expense totals per category.
    pub categories: CategoryTotals,
}

/// Computes totals, category breakdown and quick stats in a single pass.
///
/// `now` anchors "today" (its calendar date) and the trailing week window,
/// which covers transactions dated at or after `now - 7 days`. Dates are
/// taken at midnight, so the window is a sliding 168 hours rather than a
/// calendar week, and future-dated expenses fall inside it.
#[must_use]
pub fn aggregate<'a, I>(transactions: I, now: NaiveDateTime) -> Aggregates
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let today = now.date();
    let week_start = now
        .checked_sub_signed(TimeDelta::days(WEEK_WINDOW_DAYS))
        .unwrap_or(NaiveDateTime::MIN);

    let mut summary = Summary::default();
    let mut stats = QuickStats::default();
    let mut categories = CategoryTotals::default();
    let mut expense_months: HashSet<YearMonth> = HashSet::new();

    for tx in transactions {
        summary.count += 1;
        if tx.is_income() {
            summary.total_income += tx.amount;
        } else if tx.is_expense() {
            let amount = tx.magnitude();
            summary.total_expense += amount;
            if tx.date == today {
                stats.today_expense += amount;
            }
            if tx.date.and_time(NaiveTime::MIN) >= week_start {
                stats.week_expense += amount;
            }
            categories.record(&tx.category, amount);
            let _first_in_month = expense_months.insert(tx.year_month());
        }
    }

    summary.balance = summary.total_income - summary.total_expense;
    stats.top_category = categories.top().map(|(category, _)| category.to_owned());
    stats.avg_monthly_expense = average(summary.total_expense, expense_months.len());

    Aggregates {
        summary,
        stats,
        categories,
    }
}

/// Income/expense totals of a subset.
#[must_use]
pub fn summarize<'a, I>(transactions: I) -> Summary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = Summary::default();
    for tx in transactions {
        summary.count += 1;
        if tx.is_income() {
            summary.total_income += tx.amount;
        } else if tx.is_expense() {
            summary.total_expense += tx.magnitude();
        }
    }
    summary.balance = summary.total_income - summary.total_expense;
    summary
}

/// Divides `total` by `months`, or zero when there are none.
fn average(total: f64, months: usize) -> f64 {
    if months == 0 {
        return 0.0_f64;
    }
    let divisor = u32::try_from(months).map_or(f64::from(u32::MAX), f64::from);
    total / divisor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NaiveDate, TransactionId};

    fn tx(id: i64, amount: f64, category: &str, date: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: format!("tx {id}"),
            amount,
            category: category.to_owned(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn noon(date: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_subset_is_all_zero() {
        let result = aggregate(&[], noon("2024-01-10"));
        assert_eq!(result, Aggregates::default());
        assert!(result.stats.top_category.is_none());
        assert_eq!(summarize(&[]), Summary::default());
    }

    #[test]
    fn totals_and_balance() {
        let all = vec![
            tx(3, -50.0, "food", "2024-02-01"),
            tx(2, -200.0, "housing", "2024-01-06"),
            tx(1, 1000.0, "salary", "2024-01-05"),
        ];
        let summary = summarize(&all);
        assert!(close(summary.total_income, 1000.0));
        assert!(close(summary.total_expense, 250.0));
        assert!(close(summary.balance, 750.0));
        assert_eq!(summary.count, 3);
        assert_eq!(aggregate(&all, noon("2024-03-01")).summary, summary);
    }

    #[test]
    fn zero_amounts_count_but_do_not_aggregate() {
        let all = vec![tx(1, 0.0, "other", "2024-01-10")];
        let result = aggregate(&all, noon("2024-01-10"));
        assert_eq!(result.summary.count, 1);
        assert!(close(result.summary.balance, 0.0));
        assert!(result.categories.is_empty());
        assert!(close(result.stats.today_expense, 0.0));
    }

    #[test]
    fn today_and_week_windows() {
        let all = vec![
            tx(1, -5.0, "food", "2024-01-10"),
            tx(2, -7.0, "food", "2024-01-04"),
            tx(3, -11.0, "food", "2024-01-03"),
            tx(4, -13.0, "food", "2024-01-12"),
            tx(5, 100.0, "salary", "2024-01-10"),
        ];
        let stats = aggregate(&all, noon("2024-01-10")).stats;
        assert!(close(stats.today_expense, 5.0));
        // 2024-01-03 00:00 is before the cutoff of 2024-01-03 12:00.
        assert!(close(stats.week_expense, 5.0 + 7.0 + 13.0));
    }

    #[test]
    fn week_window_includes_cutoff_midnight() {
        let all = vec![tx(1, -9.0, "food", "2024-01-03")];
        let midnight = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert!(close(aggregate(&all, midnight).stats.week_expense, 9.0));
    }

    #[test]
    fn category_totals_keep_first_seen_order() {
        let all = vec![
            tx(1, -10.0, "food", "2024-01-01"),
            tx(2, -30.0, "transport", "2024-01-02"),
            tx(3, -20.0, "food", "2024-01-03"),
            tx(4, 500.0, "salary", "2024-01-03"),
        ];
        let categories = aggregate(&all, noon("2024-01-10")).categories;
        let listed: Vec<(&str, f64)> = categories.iter().collect();
        assert_eq!(listed, [("food", 30.0), ("transport", 30.0)]);
        assert_eq!(categories.get("salary"), None);
        assert_eq!(categories.get("food"), Some(30.0));
    }

    #[test]
    fn top_category_ties_go_to_first_seen() {
        let all = vec![
            tx(1, -10.0, "food", "2024-01-01"),
            tx(2, -30.0, "transport", "2024-01-02"),
            tx(3, -20.0, "food", "2024-01-03"),
        ];
        let stats = aggregate(&all, noon("2024-01-10")).stats;
        assert_eq!(stats.top_category.as_deref(), Some("food"));
    }

    #[test]
    fn top_category_strictly_greatest() {
        let all = vec![
            tx(1, -10.0, "food", "2024-01-01"),
            tx(2, -30.0, "Transport", "2024-01-02"),
        ];
        let stats = aggregate(&all, noon("2024-01-10")).stats;
        assert_eq!(stats.top_category.as_deref(), Some("Transport"));
    }

    #[test]
    fn monthly_average_counts_expense_months_only() {
        let all = vec![
            tx(1, -100.0, "food", "2024-01-01"),
            tx(2, -50.0, "food", "2024-01-20"),
            tx(3, -30.0, "food", "2024-03-02"),
            tx(4, 900.0, "salary", "2024-02-01"),
        ];
        let stats = aggregate(&all, noon("2024-03-10")).stats;
        assert!(close(stats.avg_monthly_expense, 90.0));
    }

    #[test]
    fn same_month_in_different_years_is_distinct() {
        let all = vec![
            tx(1, -100.0, "food", "2023-01-01"),
            tx(2, -50.0, "food", "2024-01-01"),
        ];
        let stats = aggregate(&all, noon("2024-01-10")).stats;
        assert!(close(stats.avg_monthly_expense, 75.0));
    }
}
