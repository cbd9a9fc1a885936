//! Chart series for the expense histogram and the income/expense comparison.
//!
//! Heights are percentages in `0.0..=100.0`. An empty chart carries no bars.

use chrono::{Datelike as _, NaiveDate};
use serde::Serialize;

use crate::aggregate::Summary;
use crate::models::{MonthFilter, Transaction, YearMonth};

/// Abbreviated month names, January first.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One bucket of the expense histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBar {
    /// Bucket label: `Jan`..`Dec` or the day of the month.
    pub label: String,
    /// Summed expense magnitude.
    pub total: f64,
    /// Bar height relative to the largest bucket.
    pub height_percent: f64,
}

/// Bucketing mode of an [`ExpenseChart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ChartMode {
    /// Twelve month buckets of one calendar year.
    Monthly {
        /// The charted year.
        year: i32,
    },
    /// One bucket per day of a single month.
    Daily {
        /// The charted month.
        month: YearMonth,
    },
}

/// Expense histogram ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseChart {
    /// How the buckets were formed.
    pub mode: ChartMode,
    /// Buckets in ascending time order; empty when `empty` is set.
    pub bars: Vec<ChartBar>,
    /// `true` when there is nothing to draw.
    pub empty: bool,
}

impl ExpenseChart {
    /// Builds a chart from bucket totals, scaling by `max(totals, floor)`.
    fn from_buckets(mode: ChartMode, buckets: Vec<(String, f64)>, floor: f64) -> Self {
        let max = buckets
            .iter()
            .map(|bucket| bucket.1)
            .fold(floor, f64::max);
        let has_expense = buckets.iter().any(|bucket| bucket.1 > 0.0_f64);
        if !has_expense || max <= 0.0_f64 {
            return Self {
                mode,
                bars: Vec::new(),
                empty: true,
            };
        }
        let bars = buckets
            .into_iter()
            .map(|(label, total)| ChartBar {
                label,
                total,
                height_percent: total / max * 100.0_f64,
            })
            .collect();
        Self {
            mode,
            bars,
            empty: false,
        }
    }

    /// Sum of all bucket totals.
    #[inline]
    #[must_use]
    pub fn total(&self) -> f64 {
        self.bars.iter().map(|bar| bar.total).sum()
    }
}

/// Expense totals per month of `year`, January through December.
///
/// Months without expenses are zero-filled. Heights are scaled by the
/// largest month total, floored at 1.
#[must_use]
pub fn monthly_expense_chart<'a, I>(transactions: I, year: i32) -> ExpenseChart
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = [0.0_f64; 12];
    for tx in transactions {
        if !tx.is_expense() || tx.date.year() != year {
            continue;
        }
        if let Some(slot) = usize::try_from(tx.date.month0())
            .ok()
            .and_then(|index| totals.get_mut(index))
        {
            *slot += tx.magnitude();
        }
    }
    let buckets = MONTH_ABBREVIATIONS
        .iter()
        .zip(totals)
        .map(|(name, total)| ((*name).to_owned(), total))
        .collect();
    ExpenseChart::from_buckets(ChartMode::Monthly { year }, buckets, 1.0_f64)
}

/// Expense totals per day of `month`, day 1 through the last day.
///
/// Days without expenses are zero-filled. Heights are scaled by the largest
/// day total; a month without expenses yields an empty chart.
#[must_use]
pub fn daily_expense_chart<'a, I>(transactions: I, month: YearMonth) -> ExpenseChart
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let days = month.days_in_month();
    let mut totals: Vec<f64> = (1..=days).map(|_| 0.0_f64).collect();
    for tx in transactions {
        if !tx.is_expense() || !month.contains(tx.date) {
            continue;
        }
        if let Some(slot) = usize::try_from(tx.date.day0())
            .ok()
            .and_then(|index| totals.get_mut(index))
        {
            *slot += tx.magnitude();
        }
    }
    let buckets = (1..=days)
        .zip(totals)
        .map(|(day, total)| (day.to_string(), total))
        .collect();
    ExpenseChart::from_buckets(ChartMode::Daily { month }, buckets, 0.0_f64)
}

/// Chooses the chart mode from the month filter.
///
/// `All` charts the calendar year of `today` by month; a specific month is
/// charted by day.
#[must_use]
pub fn expense_chart<'a, I>(transactions: I, filter: MonthFilter, today: NaiveDate) -> ExpenseChart
where
    I: IntoIterator<Item = &'a Transaction>,
{
    match filter {
        MonthFilter::All => monthly_expense_chart(transactions, today.year()),
        MonthFilter::Month(month) => daily_expense_chart(transactions, month),
    }
}

/// Income versus expense split of a subset.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSeries {
    /// Total income.
    pub income: f64,
    /// Total expense magnitude.
    pub expense: f64,
    /// Income share of `income + expense`, in percent.
    pub income_percent: f64,
    /// Expense share of `income + expense`, in percent.
    pub expense_percent: f64,
}

impl ComparisonSeries {
    /// Computes the split; both shares are zero when there is no activity.
    #[must_use]
    pub fn new(income: f64, expense: f64) -> Self {
        let total = income + expense;
        let (income_percent, expense_percent) = if total > 0.0_f64 {
            (income / total * 100.0_f64, expense / total * 100.0_f64)
        } else {
            (0.0_f64, 0.0_f64)
        };
        Self {
            income,
            expense,
            income_percent,
            expense_percent,
        }
    }

    /// Builds the series from summary totals.
    #[inline]
    #[must_use]
    pub fn from_summary(summary: &Summary) -> Self {
        Self::new(summary.total_income, summary.total_expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;

    fn tx(id: i64, amount: f64, date: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            description: format!("tx {id}"),
            amount,
            category: "food".to_owned(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn monthly_chart_has_twelve_ordered_buckets() {
        let all = vec![
            tx(1, -50.0, "2024-02-01"),
            tx(2, -200.0, "2024-01-06"),
            tx(3, 1000.0, "2024-01-05"),
            tx(4, -999.0, "2023-12-31"),
        ];
        let chart = monthly_expense_chart(&all, 2024);
        assert!(!chart.empty);
        assert_eq!(chart.mode, ChartMode::Monthly { year: 2024 });
        let labels: Vec<&str> = chart.bars.iter().map(|bar| bar.label.as_str()).collect();
        assert_eq!(labels, MONTH_ABBREVIATIONS);
        assert!(close(chart.bars[0].total, 200.0));
        assert!(close(chart.bars[0].height_percent, 100.0));
        assert!(close(chart.bars[1].height_percent, 25.0));
        assert!(close(chart.bars[11].total, 0.0));
        assert!(close(chart.total(), 250.0));
    }

    #[test]
    fn monthly_chart_floors_scale_at_one() {
        let all = vec![tx(1, -0.5, "2024-03-10")];
        let chart = monthly_expense_chart(&all, 2024);
        assert!(!chart.empty);
        assert!(close(chart.bars[2].height_percent, 50.0));
    }

    #[test]
    fn monthly_chart_without_expenses_is_empty() {
        let all = vec![tx(1, 100.0, "2024-03-10"), tx(2, -5.0, "2023-03-10")];
        let chart = monthly_expense_chart(&all, 2024);
        assert!(chart.empty);
        assert!(chart.bars.is_empty());
    }

    #[test]
    fn daily_chart_covers_every_day_of_month() {
        let feb = YearMonth::new(2024, 2).unwrap();
        let all = vec![
            tx(1, -10.0, "2024-02-01"),
            tx(2, -40.0, "2024-02-29"),
            tx(3, -5.0, "2024-03-01"),
        ];
        let chart = daily_expense_chart(&all, feb);
        assert_eq!(chart.bars.len(), 29);
        assert_eq!(chart.bars[0].label, "1");
        assert_eq!(chart.bars[28].label, "29");
        assert!(close(chart.bars[0].height_percent, 25.0));
        assert!(close(chart.bars[28].height_percent, 100.0));
        assert!(close(chart.total(), 50.0));
    }

    #[test]
    fn daily_chart_without_expenses_is_empty() {
        let april = YearMonth::new(2024, 4).unwrap();
        let chart = daily_expense_chart(&[tx(1, 20.0, "2024-04-02")], april);
        assert!(chart.empty);
        assert!(chart.bars.is_empty());
        assert_eq!(chart.mode, ChartMode::Daily { month: april });
    }

    #[test]
    fn mode_follows_month_filter() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let all = vec![tx(1, -10.0, "2024-01-01")];
        let yearly = expense_chart(&all, MonthFilter::All, today);
        assert_eq!(yearly.mode, ChartMode::Monthly { year: 2024 });
        let january = "2024-01".parse().unwrap();
        let daily = expense_chart(&all, january, today);
        assert_eq!(daily.bars.len(), 31);
    }

    #[test]
    fn comparison_shares() {
        let series = ComparisonSeries::new(750.0, 250.0);
        assert!(close(series.income_percent, 75.0));
        assert!(close(series.expense_percent, 25.0));
        let idle = ComparisonSeries::new(0.0, 0.0);
        assert!(close(idle.income_percent, 0.0));
        assert!(close(idle.expense_percent, 0.0));
    }
}
