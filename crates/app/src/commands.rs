//! Command handlers. Each handler mutates or reads the ledger and writes its
//! report to `out`; the caller persists the ledger when a handler reports a
//! change.

use std::{fs, io::Write};

use chrono::NaiveDate;
use engine::{
    CATEGORIES, EngineError, ExpenseInput, Ledger, PaymentInput, SortOrder, Transaction,
    TransactionFilter, TransactionKind, compute_balances, compute_totals, period_rollup,
    plan_settlement, restore_json, to_csv, to_json,
};

use crate::{
    cli::{
        Command, EditArgs, ExpenseArgs, ExportArgs, ExportFormat, FilterArgs, PayArgs,
        PeopleCommand, SettleArgs,
    },
    error::{AppError, Result},
    render,
    settings::Settings,
};

/// Whether a command changed the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Changed,
    Unchanged,
}

impl FilterArgs {
    fn to_filter(&self, sort: SortOrder) -> TransactionFilter {
        TransactionFilter {
            text: self.search.clone(),
            month: self.month,
            sort,
        }
    }
}

pub fn run(
    command: Command,
    ledger: &mut Ledger,
    settings: &Settings,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Effect> {
    match command {
        Command::People(people) => match people.command {
            PeopleCommand::Add { name } => {
                let name = ledger.add_person(&name)?;
                writeln!(out, "added {name}")?;
                Ok(Effect::Changed)
            }
            PeopleCommand::Remove { name } => {
                ledger.remove_person(&name)?;
                writeln!(out, "removed {name}")?;
                Ok(Effect::Changed)
            }
            PeopleCommand::List => {
                for name in ledger.people().iter() {
                    writeln!(out, "{name}")?;
                }
                Ok(Effect::Unchanged)
            }
        },
        Command::Categories => {
            for category in CATEGORIES {
                if category == settings.default_category {
                    writeln!(out, "{category} (default)")?;
                } else {
                    writeln!(out, "{category}")?;
                }
            }
            Ok(Effect::Unchanged)
        }
        Command::Expense(args) => add_expense(args, ledger, settings, today, out),
        Command::Pay(args) => record_payment(args, ledger, today, out),
        Command::Delete { id } => {
            let removed = ledger.delete(&id)?;
            writeln!(out, "deleted {} ({})", removed.id, removed.description)?;
            Ok(Effect::Changed)
        }
        Command::Edit(args) => edit(args, ledger, out),
        Command::Clear { yes } => {
            if !yes {
                return Err(AppError::InvalidInput(
                    "refusing to delete every transaction without --yes".to_string(),
                ));
            }
            let count = ledger.clear();
            writeln!(out, "deleted {count} transactions")?;
            Ok(Effect::Changed)
        }
        Command::List(args) => {
            let rows = ledger.query(&args.filter.to_filter(args.sort));
            render::transactions(out, &rows)?;
            Ok(Effect::Unchanged)
        }
        Command::Balances(filter) => {
            warn_unknown(ledger);
            let rows = ledger.query(&filter.to_filter(SortOrder::default()));
            let balances = compute_balances(&rows, ledger.people());
            render::balances(out, &balances)?;
            Ok(Effect::Unchanged)
        }
        Command::Settle(args) => settle(args, ledger, today, out),
        Command::Totals(filter) => {
            let rows = ledger.query(&filter.to_filter(SortOrder::default()));
            render::totals(out, &compute_totals(&rows, ledger.people()))?;
            Ok(Effect::Unchanged)
        }
        Command::Periods { today: reference } => {
            let rollup = period_rollup(
                ledger.transactions(),
                ledger.people(),
                reference.unwrap_or(today),
            );
            render::periods(out, &rollup)?;
            Ok(Effect::Unchanged)
        }
        Command::Export(args) => export(args, ledger, out),
        Command::Restore { path } => {
            let payload = fs::read_to_string(&path)?;
            let report = restore_json(&payload)?;
            let restored = ledger.restore(report.restored);
            tracing::info!(restored, dropped = report.dropped, "backup restored");
            writeln!(
                out,
                "restored {restored} transactions, dropped {}",
                report.dropped
            )?;
            Ok(Effect::Changed)
        }
    }
}

fn add_expense(
    args: ExpenseArgs,
    ledger: &mut Ledger,
    settings: &Settings,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Effect> {
    let id = ledger.add_expense(ExpenseInput {
        amount: args.amount.value(),
        description: args.description,
        date: args.date.unwrap_or(today),
        payer: args.payer,
        participants: args.participants,
        category: args
            .category
            .or_else(|| Some(settings.default_category.clone())),
    })?;
    writeln!(out, "added expense {id}")?;
    Ok(Effect::Changed)
}

fn record_payment(
    args: PayArgs,
    ledger: &mut Ledger,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Effect> {
    let id = ledger.record_payment(PaymentInput {
        amount: args.amount.value(),
        description: args.description,
        date: args.date.unwrap_or(today),
        from: args.from,
        to: args.to,
    })?;
    writeln!(out, "added payment {id}")?;
    Ok(Effect::Changed)
}

/// Takes the record back and submits a corrected copy. A failed submission
/// surfaces as an error before anything is saved.
fn edit(args: EditArgs, ledger: &mut Ledger, out: &mut impl Write) -> Result<Effect> {
    let current = ledger
        .transaction(&args.id)
        .ok_or_else(|| EngineError::KeyNotFound(args.id.clone()))?;
    if current.is_expense() {
        if args.from.is_some() || args.to.is_some() {
            return Err(AppError::InvalidInput(
                "--from/--to only apply to payments".to_string(),
            ));
        }
    } else if args.payer.is_some() || args.participants.is_some() || args.category.is_some() {
        return Err(AppError::InvalidInput(
            "--payer/--with/--category only apply to expenses".to_string(),
        ));
    }

    let old: Transaction = ledger.delete(&args.id)?;
    let amount = args.amount.map_or(old.amount, |a| a.value());
    let date = args.date.unwrap_or(old.date);

    let id = match old.kind {
        TransactionKind::Expense {
            payer,
            participants,
            category,
        } => ledger.add_expense(ExpenseInput {
            amount,
            description: args.description.unwrap_or(old.description),
            date,
            payer: args.payer.unwrap_or(payer),
            participants: args.participants.unwrap_or(participants),
            category: Some(args.category.unwrap_or(category)),
        })?,
        TransactionKind::Payment { from, to } => ledger.record_payment(PaymentInput {
            amount,
            description: Some(args.description.unwrap_or(old.description)),
            date,
            from: args.from.unwrap_or(from),
            to: args.to.unwrap_or(to),
        })?,
    };
    writeln!(out, "replaced {} with {id}", args.id)?;
    Ok(Effect::Changed)
}

fn settle(
    args: SettleArgs,
    ledger: &mut Ledger,
    today: NaiveDate,
    out: &mut impl Write,
) -> Result<Effect> {
    warn_unknown(ledger);
    let plan = plan_settlement(&ledger.balances().net);
    if plan.is_empty() {
        writeln!(out, "everyone is settled")?;
        return Ok(Effect::Unchanged);
    }
    for transfer in &plan {
        writeln!(out, "{transfer}")?;
    }
    if !args.record {
        return Ok(Effect::Unchanged);
    }

    let date = args.date.unwrap_or(today);
    for transfer in &plan {
        ledger.record_settlement(transfer, date)?;
    }
    writeln!(out, "recorded {} payments", plan.len())?;
    Ok(Effect::Changed)
}

fn export(args: ExportArgs, ledger: &Ledger, out: &mut impl Write) -> Result<Effect> {
    let rows = ledger.query(&args.filter.to_filter(SortOrder::default()));
    let payload = match args.format {
        ExportFormat::Csv => to_csv(&rows)?,
        ExportFormat::Json => to_json(&rows)?,
    };
    match args.output {
        Some(path) => {
            fs::write(&path, payload)?;
            tracing::info!(path = %path.display(), count = rows.len(), "export written");
        }
        None => out.write_all(payload.as_bytes())?,
    }
    Ok(Effect::Unchanged)
}

fn warn_unknown(ledger: &Ledger) {
    let unknown = ledger.unknown_people();
    if !unknown.is_empty() {
        tracing::warn!(
            people = %unknown.join(", "),
            "transactions mention people outside the roster; they are left out"
        );
    }
}
