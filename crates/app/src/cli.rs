use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Amount, MonthWindow, SortOrder};

#[derive(Parser, Debug)]
#[command(name = "quota")]
#[command(about = "Track shared expenses and settle who owes whom")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Optional config file path (TOML).
    #[arg(long, global = true)]
    pub config: Option<String>,
    /// Override the ledger file.
    #[arg(long, global = true)]
    pub store: Option<String>,
    /// Override the log level (e.g. debug).
    #[arg(long, global = true)]
    pub level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the roster.
    People(People),
    /// List the suggested expense categories.
    Categories,
    /// Record an expense split equally among participants.
    Expense(ExpenseArgs),
    /// Record a direct payment between two people.
    Pay(PayArgs),
    /// Delete a transaction by id.
    Delete { id: String },
    /// Replace a transaction, keeping the fields that are not given.
    Edit(EditArgs),
    /// Delete every transaction.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Show transactions.
    List(ListArgs),
    /// Show who owes whom.
    Balances(FilterArgs),
    /// Suggest transfers that settle every balance.
    Settle(SettleArgs),
    /// Spending totals.
    Totals(FilterArgs),
    /// Per-person shares by week and month.
    Periods {
        /// Reference day, defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Write transactions as CSV or a JSON backup.
    Export(ExportArgs),
    /// Prepend the transactions of a JSON backup.
    Restore { path: PathBuf },
}

#[derive(Args, Debug)]
pub struct People {
    #[command(subcommand)]
    pub command: PeopleCommand,
}

#[derive(Subcommand, Debug)]
pub enum PeopleCommand {
    Add { name: String },
    Remove { name: String },
    List,
}

#[derive(Args, Debug)]
pub struct ExpenseArgs {
    #[arg(long)]
    pub amount: Amount,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub payer: String,
    /// Participants, comma separated.
    #[arg(long = "with", value_delimiter = ',', required = true)]
    pub participants: Vec<String>,
    /// Free-form label; `quota categories` lists the usual ones.
    #[arg(long)]
    pub category: Option<String>,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct PayArgs {
    #[arg(long)]
    pub amount: Amount,
    #[arg(long)]
    pub from: String,
    #[arg(long)]
    pub to: String,
    #[arg(long)]
    pub description: Option<String>,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: String,
    #[arg(long)]
    pub amount: Option<Amount>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Expense payer.
    #[arg(long)]
    pub payer: Option<String>,
    /// Expense participants, comma separated.
    #[arg(long = "with", value_delimiter = ',')]
    pub participants: Option<Vec<String>>,
    #[arg(long)]
    pub category: Option<String>,
    /// Payment sender.
    #[arg(long)]
    pub from: Option<String>,
    /// Payment recipient.
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive text match on description, category and people.
    #[arg(long)]
    pub search: Option<String>,
    /// Only this month (YYYY-MM).
    #[arg(long)]
    pub month: Option<MonthWindow>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// amount-asc, amount-desc, date-asc or date-desc.
    #[arg(long, default_value = "date-desc")]
    pub sort: SortOrder,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    /// Record every suggested transfer as a payment.
    #[arg(long)]
    pub record: bool,
    /// Date of the recorded payments, defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,
    /// Write to a file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub filter: FilterArgs,
}
