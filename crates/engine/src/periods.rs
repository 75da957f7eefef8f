//! Period rollups of what each person consumed.
//!
//! Every expense share is bucketed relative to a reference day ("today"):
//! into one of four weeks of the current month, into last month, or into the
//! month before that. Older shares are ignored.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{Roster, Transaction, filter::MonthWindow, ledger::expense_shares};

/// Shares consumed by one person, per period.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PeriodShares {
    pub person: String,
    /// Weeks of the current month: days 1-7, 8-14, 15-21, 22 to end.
    pub weeks: [f64; 4],
    pub last_month: f64,
    pub two_months_ago: f64,
}

impl PeriodShares {
    /// Total of the current month.
    pub fn current_month(&self) -> f64 {
        self.weeks.iter().sum()
    }
}

/// Zero-based week bucket for a day of the month.
pub fn week_of_month(day: u32) -> usize {
    match day {
        0..=7 => 0,
        8..=14 => 1,
        15..=21 => 2,
        _ => 3,
    }
}

/// Buckets the expense shares of every person in `roster` around `today`.
///
/// Rows follow roster order. Payments are not consumption and are skipped.
pub fn period_rollup(
    transactions: &[Transaction],
    roster: &Roster,
    today: NaiveDate,
) -> Vec<PeriodShares> {
    let current = MonthWindow::containing(today);
    let last = current.previous();
    let before_last = last.previous();

    let mut rows: Vec<PeriodShares> = roster
        .iter()
        .map(|person| PeriodShares {
            person: person.to_string(),
            ..Default::default()
        })
        .collect();

    for tx in transactions {
        for (participant, share) in expense_shares(tx, roster) {
            let Some(index) = roster.position(participant) else {
                continue;
            };
            let row = &mut rows[index];
            if current.contains(tx.date) {
                row.weeks[week_of_month(tx.date.day())] += share;
            } else if last.contains(tx.date) {
                row.last_month += share;
            } else if before_last.contains(tx.date) {
                row.two_months_ago += share;
            }
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TransactionKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(amount: f64, date: NaiveDate, participants: &[&str]) -> Transaction {
        Transaction {
            id: "e".to_string(),
            amount,
            description: "groceries".to_string(),
            date,
            kind: TransactionKind::Expense {
                payer: "Alice".to_string(),
                participants: participants.iter().map(|p| p.to_string()).collect(),
                category: "Food".to_string(),
            },
        }
    }

    #[test]
    fn week_thresholds() {
        assert_eq!(week_of_month(1), 0);
        assert_eq!(week_of_month(7), 0);
        assert_eq!(week_of_month(8), 1);
        assert_eq!(week_of_month(14), 1);
        assert_eq!(week_of_month(15), 2);
        assert_eq!(week_of_month(21), 2);
        assert_eq!(week_of_month(22), 3);
        assert_eq!(week_of_month(31), 3);
    }

    #[test]
    fn shares_land_in_their_period() {
        let roster: Roster = ["Alice", "Bob"].into_iter().collect();
        let today = date(2024, 3, 20);
        let txs = vec![
            expense(20.0, date(2024, 3, 2), &["Alice", "Bob"]),
            expense(8.0, date(2024, 3, 22), &["Bob"]),
            expense(30.0, date(2024, 2, 29), &["Alice", "Bob", "Carol"]),
            expense(12.0, date(2024, 1, 1), &["Alice"]),
            expense(99.0, date(2023, 12, 31), &["Alice", "Bob"]),
        ];
        let rows = period_rollup(&txs, &roster, today);

        assert_eq!(rows[0].person, "Alice");
        assert_eq!(rows[0].weeks, [10.0, 0.0, 0.0, 0.0]);
        assert_eq!(rows[0].last_month, 10.0);
        assert_eq!(rows[0].two_months_ago, 12.0);

        assert_eq!(rows[1].weeks, [10.0, 0.0, 0.0, 8.0]);
        assert_eq!(rows[1].current_month(), 18.0);
        assert_eq!(rows[1].last_month, 10.0);
        assert_eq!(rows[1].two_months_ago, 0.0);
    }

    #[test]
    fn year_boundary() {
        let roster: Roster = ["Alice"].into_iter().collect();
        let txs = vec![
            expense(5.0, date(2023, 12, 10), &["Alice"]),
            expense(7.0, date(2023, 11, 30), &["Alice"]),
        ];
        let rows = period_rollup(&txs, &roster, date(2024, 1, 5));
        assert_eq!(rows[0].last_month, 5.0);
        assert_eq!(rows[0].two_months_ago, 7.0);
    }
}
