//! Plain text tables printed by the commands.

use std::io::{self, Write};

use engine::{Balances, PeriodShares, Totals, Transaction, TransactionKind, format_amount};

pub fn transactions(out: &mut impl Write, rows: &[Transaction]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "no transactions");
    }
    for tx in rows {
        let details = match &tx.kind {
            TransactionKind::Expense {
                payer,
                participants,
                category,
            } => format!("[{category}] {payer} for {}", participants.join(", ")),
            TransactionKind::Payment { from, to } => format!("{from} -> {to}"),
        };
        writeln!(
            out,
            "{}  {}  {:<7}  {:>10}  {}  {}",
            tx.id,
            tx.date,
            tx.kind.as_str(),
            format_amount(tx.amount),
            tx.description,
            details
        )?;
    }
    Ok(())
}

pub fn balances(out: &mut impl Write, balances: &Balances) -> io::Result<()> {
    if balances.net.is_empty() {
        return writeln!(out, "no people");
    }
    let width = name_width(balances.net.iter().map(|b| b.person.as_str()));
    for balance in balances.net.iter() {
        let status = if balance.is_settled() {
            "settled".to_string()
        } else if balance.amount > 0.0 {
            format!("is owed {}", format_amount(balance.amount))
        } else {
            format!("owes {}", format_amount(-balance.amount))
        };
        writeln!(out, "{:<width$}  {status}", balance.person)?;
    }

    if !balances.pairs.is_empty() {
        writeln!(out)?;
        for debt in balances.pairs.iter() {
            writeln!(
                out,
                "{} owes {} {}",
                debt.debtor,
                debt.creditor,
                format_amount(debt.amount)
            )?;
        }
    }
    Ok(())
}

pub fn totals(out: &mut impl Write, totals: &Totals) -> io::Result<()> {
    writeln!(out, "total        {}", format_amount(totals.total))?;
    writeln!(out, "transactions {}", totals.count)?;
    if let Some(top) = totals.top_category() {
        writeln!(out, "top category {top}")?;
    }

    if !totals.by_category.is_empty() {
        writeln!(out)?;
        let width = name_width(totals.by_category.iter().map(|(name, _)| name.as_str()));
        for (category, amount) in &totals.by_category {
            writeln!(out, "{category:<width$}  {:>10}", format_amount(*amount))?;
        }
    }

    if !totals.by_person.is_empty() {
        writeln!(out)?;
        let width = name_width(totals.by_person.iter().map(|(name, _)| name.as_str()));
        for (person, amount) in &totals.by_person {
            writeln!(out, "{person:<width$}  {:>10}", format_amount(*amount))?;
        }
    }
    Ok(())
}

pub fn periods(out: &mut impl Write, rows: &[PeriodShares]) -> io::Result<()> {
    let width = name_width(rows.iter().map(|r| r.person.as_str())).max("person".len());
    writeln!(
        out,
        "{:<width$}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}  {:>9}",
        "person", "week 1", "week 2", "week 3", "week 4", "month", "last", "prior"
    )?;
    for row in rows {
        write!(out, "{:<width$}", row.person)?;
        for week in row.weeks {
            write!(out, "  {:>9}", format_amount(week))?;
        }
        writeln!(
            out,
            "  {:>9}  {:>9}  {:>9}",
            format_amount(row.current_month()),
            format_amount(row.last_month),
            format_amount(row.two_months_ago)
        )?;
    }
    Ok(())
}

fn name_width<'a>(names: impl Iterator<Item = &'a str>) -> usize {
    names.map(|name| name.chars().count()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use engine::Roster;

    use super::*;

    #[test]
    fn balances_show_status_and_pairs() {
        let roster: Roster = ["Alice", "Bob"].into_iter().collect();
        let txs = vec![Transaction {
            id: "a".to_string(),
            amount: 100.0,
            description: "Rent".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            kind: TransactionKind::Expense {
                payer: "Alice".to_string(),
                participants: vec!["Alice".to_string(), "Bob".to_string()],
                category: "Housing".to_string(),
            },
        }];
        let mut out: Vec<u8> = Vec::new();
        balances(&mut out, &engine::compute_balances(&txs, &roster)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Alice  is owed 50.00\nBob    owes 50.00\n\nBob owes Alice 50.00\n"
        );
    }
}
