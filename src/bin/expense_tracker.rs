//! CLI binary for keeping a personal expense ledger.

use core::fmt::Display;
use std::fs;
use std::io::{self, BufWriter, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};
use expense_tracker_rs::aggregate::Aggregates;
use expense_tracker_rs::chart::{ChartBar, ChartMode, ComparisonSeries, ExpenseChart};
use expense_tracker_rs::format::{DisplayRow, Notice, capitalize, format_currency, format_top_category};
use expense_tracker_rs::ledger::{Ledger, MonthOption};
use expense_tracker_rs::models::{
    MonthFilter, NaiveDate, NewTransaction, TransactionId, TransactionKind, TransactionPatch,
    TypeFilter,
};
use expense_tracker_rs::storage::{FileStorage, LedgerStorage};
use owo_colors::OwoColorize;

/// Environment variable overriding the data directory.
const DATA_DIR_ENV: &str = "EXPENSE_TRACKER_DATA_DIR";

/// Width of a full-height chart bar, in glyphs.
const BAR_WIDTH: u32 = 30;

/// Expense tracker: record income and expenses, browse summaries and charts.
#[derive(Debug, Parser)]
#[command(name = "expense-tracker", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Add a transaction; negative amounts are expenses.
    Add {
        /// What the money was for.
        description: String,
        /// Signed amount, e.g. 1000 or -42.50.
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Category label.
        #[arg(long, default_value = "other")]
        category: String,
        /// Date (YYYY-MM-DD); defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// Replace every field of a transaction.
    Edit(EditArgs),
    /// Delete a transaction by id.
    Delete {
        /// Transaction id.
        id: TransactionId,
    },
    /// Delete every transaction.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// List transactions, newest first.
    List(ListArgs),
    /// Show totals, quick stats and the category breakdown.
    Summary(MonthArgs),
    /// Draw the expense histogram.
    Chart(MonthArgs),
    /// List the months that have transactions, newest first.
    Months,
    /// Export transactions as CSV.
    Export {
        /// Month scope.
        #[command(flatten)]
        scope: MonthArgs,
        /// Output file (default: expense-tracker-<date>.csv).
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Arguments for the `edit` subcommand.
#[derive(Debug, Args)]
struct EditArgs {
    /// Transaction id.
    id: TransactionId,
    /// New description.
    #[arg(long)]
    description: String,
    /// New amount; an expense stays an expense when given as a magnitude.
    #[arg(long, allow_hyphen_values = true)]
    amount: String,
    /// New category.
    #[arg(long)]
    category: String,
    /// New date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
}

/// Arguments for the `list` subcommand.
#[derive(Debug, Args)]
struct ListArgs {
    /// Case-insensitive text matched against description or category.
    #[arg(long, default_value = "")]
    search: String,
    /// Transaction type: all, income or expense.
    #[arg(long = "type", default_value = "all")]
    kind: TypeFilter,
    /// Month scope.
    #[command(flatten)]
    scope: MonthArgs,
}

/// Month selector shared by the read commands.
#[derive(Debug, Args)]
struct MonthArgs {
    /// Month (YYYY-MM) or `all`.
    #[arg(long, default_value = "all")]
    month: MonthFilter,
}

/// Parses a date string in `YYYY-MM-DD` format for clap.
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    expense_tracker_rs::models::parse_date(s).map_err(|err| err.to_string())
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let env_dir = std::env::var(DATA_DIR_ENV).ok();
    let storage = match create_storage(cli.data_dir, env_dir) {
        Ok(storage) => storage,
        Err(err) => return fail("failed to initialize storage", err),
    };

    let mut ledger = match Ledger::builder().storage(storage).build() {
        Ok(ledger) => ledger,
        Err(err) => return fail("failed to open ledger", err),
    };

    dispatch(&mut ledger, cli.command, Local::now().naive_local())
}

/// Picks the data directory: the flag, then the environment, then the
/// platform default.
fn resolve_data_dir(
    flag: Option<PathBuf>,
    env_dir: Option<String>,
) -> expense_tracker_rs::error::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    match env_dir {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => FileStorage::default_dir(),
    }
}

/// Creates the file storage backend in the resolved data directory.
fn create_storage(
    flag: Option<PathBuf>,
    env_dir: Option<String>,
) -> expense_tracker_rs::error::Result<FileStorage> {
    let dir = resolve_data_dir(flag, env_dir)?;
    tracing::debug!(dir = %dir.display(), "using data directory");
    FileStorage::new(dir)
}

/// Dispatches to the appropriate subcommand handler.
fn dispatch<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    command: Command,
    now: NaiveDateTime,
) -> io::Result<ExitCode> {
    match command {
        Command::Add {
            description,
            amount,
            category,
            date,
        } => {
            let mut input = NewTransaction::new(description, amount, category);
            input.date = date;
            cmd_add(ledger, input, now.date())
        }
        Command::Edit(args) => cmd_edit(ledger, args),
        Command::Delete { id } => cmd_delete(ledger, id),
        Command::Clear { yes } => cmd_clear(ledger, yes),
        Command::List(args) => cmd_list(ledger, &args, now.date()),
        Command::Summary(scope) => cmd_summary(ledger, scope.month, now),
        Command::Chart(scope) => cmd_chart(ledger, scope.month, now.date()),
        Command::Months => cmd_months(ledger),
        Command::Export { scope, out } => cmd_export(ledger, scope.month, out, now.date()),
    }
}

/// Executes the `add` subcommand.
fn cmd_add<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    input: NewTransaction,
    today: NaiveDate,
) -> io::Result<ExitCode> {
    match ledger.add_on(input, today) {
        Ok((id, notice)) => {
            print_notice(&notice, Some(id))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("could not add transaction", err),
    }
}

/// Executes the `edit` subcommand.
fn cmd_edit<S: LedgerStorage>(ledger: &mut Ledger<S>, args: EditArgs) -> io::Result<ExitCode> {
    let patch = TransactionPatch::new(args.description, args.amount, args.category, args.date);
    match ledger.edit(args.id, patch) {
        Ok(Some(notice)) => {
            print_notice(&notice, Some(args.id))?;
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => fail(
            "could not edit transaction",
            format!("no transaction with id {}", args.id),
        ),
        Err(err) => fail("could not edit transaction", err),
    }
}

/// Executes the `delete` subcommand. Deleting an unknown id is not an
/// error.
fn cmd_delete<S: LedgerStorage>(ledger: &mut Ledger<S>, id: TransactionId) -> io::Result<ExitCode> {
    match ledger.delete(id) {
        Some(notice) => print_notice(&notice, None)?,
        None => writeln!(
            io::stdout().lock(),
            "{}",
            format_args!("No transaction with id {id}.").dimmed()
        )?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `clear` subcommand.
fn cmd_clear<S: LedgerStorage>(ledger: &mut Ledger<S>, confirmed: bool) -> io::Result<ExitCode> {
    if !confirmed {
        let mut err = io::stderr().lock();
        writeln!(
            err,
            "{} refusing to delete every transaction",
            "error:".red().bold()
        )?;
        writeln!(err, "  {} pass {} to confirm", "hint:".cyan(), "--yes".bold())?;
        return Ok(ExitCode::FAILURE);
    }
    if ledger.clear() == 0 {
        writeln!(io::stdout().lock(), "{}", "No transactions to clear.".dimmed())?;
    } else {
        print_notice(&Notice::Cleared, None)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes the `list` subcommand.
fn cmd_list<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    args: &ListArgs,
    today: NaiveDate,
) -> io::Result<ExitCode> {
    ledger.set_month_filter(args.scope.month);
    let rows = ledger.display_rows(&args.search, args.kind, today);
    print_rows_table(&rows)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `summary` subcommand.
fn cmd_summary<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    month: MonthFilter,
    now: NaiveDateTime,
) -> io::Result<ExitCode> {
    ledger.set_month_filter(month);
    let aggregates = ledger.aggregates(now);
    let comparison = ComparisonSeries::from_summary(&aggregates.summary);
    print_summary(&aggregates, &comparison, month)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `chart` subcommand.
fn cmd_chart<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    month: MonthFilter,
    today: NaiveDate,
) -> io::Result<ExitCode> {
    ledger.set_month_filter(month);
    print_chart(&ledger.expense_chart(today))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `months` subcommand.
fn cmd_months<S: LedgerStorage>(ledger: &Ledger<S>) -> io::Result<ExitCode> {
    print_months_table(&ledger.month_options())?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `export` subcommand.
fn cmd_export<S: LedgerStorage>(
    ledger: &mut Ledger<S>,
    month: MonthFilter,
    out: Option<PathBuf>,
    today: NaiveDate,
) -> io::Result<ExitCode> {
    if ledger.transactions().is_empty() {
        writeln!(io::stdout().lock(), "{}", "No transactions to export.".dimmed())?;
        return Ok(ExitCode::FAILURE);
    }
    ledger.set_month_filter(month);
    let path = out.unwrap_or_else(|| PathBuf::from(ledger.export_file_name(today)));
    let file = match fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => return fail("could not create export file", err),
    };
    match ledger.export_csv(BufWriter::new(file)) {
        Ok(notice) => {
            print_notice(&notice, None)?;
            writeln!(io::stdout().lock(), "  {}", path.display().dimmed())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => fail("export failed", err),
    }
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints `error: <context>: <err>` to stderr and returns failure.
fn fail<E: Display>(context: &str, err: E) -> io::Result<ExitCode> {
    writeln!(
        io::stderr().lock(),
        "{} {context}: {err}",
        "error:".red().bold()
    )?;
    Ok(ExitCode::FAILURE)
}

/// Prints a confirmation notice, with the affected id when known.
fn print_notice(notice: &Notice, id: Option<TransactionId>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    match id {
        Some(tx_id) => writeln!(
            out,
            "{} {}",
            notice.green().bold(),
            format_args!("(id {tx_id})").dimmed()
        ),
        None => writeln!(out, "{}", notice.green().bold()),
    }
}

/// Header cell in the table accent colour.
fn header(title: &str) -> Cell {
    Cell::new(title).fg(Color::Cyan)
}

/// Amount cell coloured by kind.
fn amount_cell(text: &str, kind: TransactionKind) -> Cell {
    let color = match kind {
        TransactionKind::Income => Color::Green,
        TransactionKind::Expense => Color::Red,
    };
    Cell::new(text)
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

/// Prints the transaction list.
fn print_rows_table(rows: &[DisplayRow]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if rows.is_empty() {
        writeln!(out, "{}", "No transactions found.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        header("Date"),
        header("Description"),
        header("Category"),
        header("Amount"),
        header("ID"),
    ]);
    for row in rows {
        _ = table.add_row(vec![
            Cell::new(&row.date),
            Cell::new(&row.description),
            Cell::new(&row.category),
            amount_cell(&row.amount, row.kind),
            Cell::new(row.id).fg(Color::DarkGrey),
        ]);
    }

    writeln!(
        out,
        "{} {}",
        "Transactions".green().bold(),
        format_args!("({})", rows.len()).dimmed()
    )?;
    writeln!(out)?;
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints totals, quick stats, the comparison split and category totals.
fn print_summary(
    aggregates: &Aggregates,
    comparison: &ComparisonSeries,
    month: MonthFilter,
) -> io::Result<()> {
    let summary = &aggregates.summary;
    let stats = &aggregates.stats;
    let mut out = io::stdout().lock();

    let scope = month
        .month()
        .map_or_else(|| "All months".to_owned(), |selected| selected.long_label());
    writeln!(
        out,
        "{} {}",
        "Summary".green().bold(),
        format_args!("({scope}, {} transactions)", summary.count).dimmed()
    )?;
    writeln!(out)?;

    let mut totals = Table::new();
    _ = totals.load_preset(UTF8_FULL);
    _ = totals.set_header(vec![header("Balance"), header("Income"), header("Expense")]);
    _ = totals.add_row(vec![
        Cell::new(format_currency(summary.balance, false)),
        Cell::new(format_currency(summary.total_income, false)).fg(Color::Green),
        Cell::new(format_currency(summary.total_expense, false)).fg(Color::Red),
    ]);
    writeln!(out, "{totals}")?;

    let mut quick = Table::new();
    _ = quick.load_preset(UTF8_FULL);
    _ = quick.set_header(vec![
        header("Today"),
        header("This week"),
        header("Top category"),
        header("Avg / month"),
    ]);
    _ = quick.add_row(vec![
        Cell::new(format_currency(stats.today_expense, true)),
        Cell::new(format_currency(stats.week_expense, true)),
        Cell::new(format_top_category(stats.top_category.as_deref())),
        Cell::new(format_currency(stats.avg_monthly_expense, true)),
    ]);
    writeln!(out, "{quick}")?;

    writeln!(
        out,
        "{} {} {:.0}%  {} {:.0}%",
        "Income vs expense:".bold(),
        "income".green(),
        comparison.income_percent,
        "expense".red(),
        comparison.expense_percent
    )?;

    if !aggregates.categories.is_empty() {
        let mut categories = Table::new();
        _ = categories.load_preset(UTF8_FULL);
        _ = categories.set_header(vec![header("Category"), header("Spent")]);
        for (category, total) in aggregates.categories.iter() {
            _ = categories.add_row(vec![
                Cell::new(capitalize(category)),
                Cell::new(format_currency(total, false)).set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(out)?;
        writeln!(out, "{categories}")?;
    }
    Ok(())
}

/// Renders a bar as block glyphs proportional to its height.
fn bar_glyphs(bar: &ChartBar) -> String {
    let filled = bar.height_percent / 100.0_f64 * f64::from(BAR_WIDTH);
    (0..BAR_WIDTH)
        .take_while(|step| f64::from(*step) < filled.round())
        .map(|_| '\u{2588}')
        .collect()
}

/// Prints the expense histogram.
fn print_chart(chart: &ExpenseChart) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let title = match chart.mode {
        ChartMode::Monthly { year } => format!("Monthly expenses {year}"),
        ChartMode::Daily { month } => format!("Daily expenses {}", month.long_label()),
    };
    writeln!(out, "{}", title.green().bold())?;
    writeln!(out)?;
    if chart.empty {
        writeln!(out, "{}", "No expense data to chart.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![header(""), header("Spent"), header("")]);
    for bar in &chart.bars {
        _ = table.add_row(vec![
            Cell::new(&bar.label),
            Cell::new(format_currency(bar.total, true)).set_alignment(CellAlignment::Right),
            Cell::new(bar_glyphs(bar)).fg(Color::Red),
        ]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints the month selector entries.
fn print_months_table(months: &[MonthOption]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if months.is_empty() {
        writeln!(out, "{}", "No months with transactions.".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![header("Month"), header("Label")]);
    for option in months {
        _ = table.add_row(vec![Cell::new(option.month), Cell::new(&option.label)]);
    }
    writeln!(out, "{table}")?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // If stderr itself failed there is nothing left to report to.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
