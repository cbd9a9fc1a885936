//! End-to-end ledger scenarios with in-memory and file-backed storage.

use expense_tracker_rs::error::{TrackerError, ValidationError};
use expense_tracker_rs::ledger::Ledger;
use expense_tracker_rs::models::{
    MonthFilter, NaiveDate, NewTransaction, TransactionId, TransactionPatch, TypeFilter,
};
#[cfg(feature = "storage-file")]
use expense_tracker_rs::storage::FileStorage;
use expense_tracker_rs::storage::{InMemoryStorage, LedgerStorage};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Adds the three reference transactions and returns their ids, oldest
/// first.
fn add_reference<S: LedgerStorage>(ledger: &mut Ledger<S>) -> [TransactionId; 3] {
    let today = day(2024, 2, 1);
    let (salary, _) = ledger
        .add_on(NewTransaction::new("Salary", "1000", "salary").date(day(2024, 1, 5)), today)
        .unwrap();
    let (rent, _) = ledger
        .add_on(NewTransaction::new("Rent", "-200", "housing").date(day(2024, 1, 6)), today)
        .unwrap();
    let (food, _) = ledger
        .add_on(NewTransaction::new("Groceries", "-50", "food").date(day(2024, 2, 1)), today)
        .unwrap();
    [salary, rent, food]
}

fn memory_ledger() -> Ledger<InMemoryStorage> {
    Ledger::builder()
        .storage(InMemoryStorage::new())
        .build()
        .unwrap()
}

#[test]
fn totals_across_all_months_and_one_month() {
    let mut ledger = memory_ledger();
    let _ids = add_reference(&mut ledger);

    let all = ledger.summary();
    assert!(close(all.total_income, 1000.0));
    assert!(close(all.total_expense, 250.0));
    assert!(close(all.balance, 750.0));

    ledger.set_month_filter("2024-01".parse().unwrap());
    let january = ledger.summary();
    assert!(close(january.total_income, 1000.0));
    assert!(close(january.total_expense, 200.0));
}

#[test]
fn edit_with_magnitude_keeps_expense_sign() {
    let mut ledger = memory_ledger();
    let [_, rent, _] = add_reference(&mut ledger);
    let patch = TransactionPatch::new("Rent", "300", "housing", day(2024, 1, 6));
    let _notice = ledger.edit(rent, patch).unwrap();
    assert!(close(ledger.get(rent).unwrap().amount, -300.0));
    assert_eq!(ledger.transactions()[1].id, rent);
}

#[test]
fn clear_all_returns_prior_count() {
    let mut ledger = memory_ledger();
    let _ids = add_reference(&mut ledger);
    assert_eq!(ledger.clear(), 3);
    assert!(ledger.transactions().is_empty());
}

#[test]
fn empty_ledger_aggregates_to_zero() {
    let ledger = memory_ledger();
    let now = day(2024, 1, 1).and_hms_opt(12, 0, 0).unwrap();
    let aggregates = ledger.aggregates(now);
    assert_eq!(aggregates.summary.count, 0);
    assert!(close(aggregates.summary.balance, 0.0));
    assert!(aggregates.stats.top_category.is_none());
    assert_eq!(
        expense_tracker_rs::format::format_top_category(aggregates.stats.top_category.as_deref()),
        "-"
    );
    assert!(ledger.expense_chart(now.date()).empty);
}

#[test]
fn display_list_applies_search_and_type_but_aggregates_do_not() {
    let mut ledger = memory_ledger();
    let _ids = add_reference(&mut ledger);
    let listed = ledger.view("GROC", TypeFilter::Expense);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].description, "Groceries");
    assert_eq!(ledger.summary().count, 3);
}

#[test]
fn remove_is_idempotent() {
    let mut ledger = memory_ledger();
    let [salary, _, _] = add_reference(&mut ledger);
    assert!(ledger.delete(salary).is_some());
    assert!(ledger.delete(salary).is_none());
    assert_eq!(ledger.transactions().len(), 2);
}

#[test]
fn export_escapes_description() {
    let mut ledger = memory_ledger();
    let _added = ledger
        .add_on(
            NewTransaction::new("Coffee, \"Large\"", "-4.5", "food").date(day(2024, 1, 6)),
            day(2024, 1, 6),
        )
        .unwrap();
    let mut out = Vec::new();
    let _notice = ledger.export_csv(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"Coffee, \"\"Large\"\"\""));
}

#[test]
fn export_of_empty_ledger_is_refused() {
    let ledger = memory_ledger();
    assert!(matches!(
        ledger.export_rows(),
        Err(TrackerError::Validation(ValidationError::NothingToExport))
    ));
}

#[cfg(feature = "storage-file")]
#[test]
fn file_storage_round_trip_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let ids = {
        let mut ledger = Ledger::builder()
            .storage(FileStorage::new(dir.path().to_path_buf()).unwrap())
            .build()
            .unwrap();
        add_reference(&mut ledger)
    };

    let reopened = Ledger::builder()
        .storage(FileStorage::new(dir.path().to_path_buf()).unwrap())
        .month_filter("2024-02".parse().unwrap())
        .build()
        .unwrap();
    let stored: Vec<TransactionId> = reopened.transactions().iter().map(|tx| tx.id).collect();
    assert_eq!(stored, [ids[2], ids[1], ids[0]]);
    assert_eq!(reopened.month_filter(), "2024-02".parse::<MonthFilter>().unwrap());
    assert_eq!(reopened.view("", TypeFilter::All).len(), 1);
}

#[cfg(feature = "storage-file")]
#[test]
fn corrupt_file_falls_back_to_empty_ledger() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("transactions.json"), "[{\"id\":").unwrap();
    let ledger = Ledger::builder()
        .storage(FileStorage::new(dir.path().to_path_buf()).unwrap())
        .build()
        .unwrap();
    assert!(ledger.transactions().is_empty());
}
