//! Settlement planner.
//!
//! Proposes transfers that bring every net balance back to zero using a
//! greedy largest-first matching: the biggest debtor pays the biggest
//! creditor as much as possible, then the next pair is matched. This is a
//! heuristic; it emits at most `debtors + creditors - 1` transfers but does
//! not guarantee the minimum count.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    EPSILON, PaymentInput,
    balances::NetBalances,
    money::format_amount,
};

/// Description stored on payments recorded from a suggested transfer.
pub const SETTLEMENT_DESCRIPTION: &str = "Settlement";

/// A proposed transfer of `amount` from `from` to `to`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Transfer {
    /// Payment that records this transfer on `date`.
    pub fn to_payment(&self, date: NaiveDate) -> PaymentInput {
        PaymentInput {
            amount: self.amount,
            description: Some(SETTLEMENT_DESCRIPTION.to_string()),
            date,
            from: self.from.clone(),
            to: self.to.clone(),
        }
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} pays {} {}", self.from, self.to, format_amount(self.amount))
    }
}

struct Party<'a> {
    name: &'a str,
    remaining: f64,
}

/// Sorts by remaining amount, largest first. `sort_by` is stable, so equal
/// amounts keep the roster order of the input.
fn largest_first(parties: &mut [Party<'_>]) {
    parties.sort_by(|a, b| b.remaining.total_cmp(&a.remaining));
}

/// Computes the greedy largest-first settlement plan for `net`.
///
/// People within [`EPSILON`] of zero are left out. Magnitudes are matched
/// unrounded, so every transfer moves exactly what one side still has open
/// and recording the plan brings every balance within [`EPSILON`] of zero.
/// A party whose remainder falls to [`EPSILON`] or below is done; it never
/// gets a tiny trailing transfer.
pub fn plan_settlement(net: &NetBalances) -> Vec<Transfer> {
    let mut debtors: Vec<Party<'_>> = Vec::new();
    let mut creditors: Vec<Party<'_>> = Vec::new();
    for entry in net.iter() {
        if entry.amount < -EPSILON {
            debtors.push(Party {
                name: &entry.person,
                remaining: -entry.amount,
            });
        } else if entry.amount > EPSILON {
            creditors.push(Party {
                name: &entry.person,
                remaining: entry.amount,
            });
        }
    }
    largest_first(&mut debtors);
    largest_first(&mut creditors);

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];
        let amount = debtor.remaining.min(creditor.remaining);

        transfers.push(Transfer {
            from: debtor.name.to_string(),
            to: creditor.name.to_string(),
            amount,
        });

        debtor.remaining -= amount;
        creditor.remaining -= amount;
        if debtor.remaining <= EPSILON {
            i += 1;
        }
        if creditor.remaining <= EPSILON {
            j += 1;
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(entries: &[(&str, f64)]) -> NetBalances {
        entries.iter().map(|(name, amount)| (*name, *amount)).collect()
    }

    fn transfer(from: &str, to: &str, amount: f64) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn largest_debtor_pays_first() {
        let plan = plan_settlement(&net(&[("Alice", 50.0), ("Bob", -20.0), ("Carol", -30.0)]));
        assert_eq!(
            plan,
            vec![
                transfer("Carol", "Alice", 30.0),
                transfer("Bob", "Alice", 20.0),
            ]
        );
    }

    #[test]
    fn ties_follow_roster_order() {
        let plan = plan_settlement(&net(&[
            ("Dan", -10.0),
            ("Alice", 10.0),
            ("Bob", -10.0),
            ("Carol", 10.0),
        ]));
        assert_eq!(
            plan,
            vec![transfer("Dan", "Alice", 10.0), transfer("Bob", "Carol", 10.0)]
        );
    }

    #[test]
    fn settled_people_are_ignored() {
        assert!(plan_settlement(&net(&[("Alice", 0.004), ("Bob", -0.004)])).is_empty());
        assert!(plan_settlement(&NetBalances::default()).is_empty());
    }

    #[test]
    fn one_debtor_many_creditors() {
        let plan = plan_settlement(&net(&[
            ("Alice", 25.0),
            ("Bob", 40.0),
            ("Carol", -65.0),
        ]));
        assert_eq!(
            plan,
            vec![
                transfer("Carol", "Bob", 40.0),
                transfer("Carol", "Alice", 25.0),
            ]
        );
    }

    #[test]
    fn thirds_do_not_leave_residual_transfers() {
        let third = 100.0 / 3.0;
        let plan = plan_settlement(&net(&[
            ("Alice", 2.0 * third),
            ("Bob", -third),
            ("Carol", -third),
        ]));
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|t| t.to == "Alice" && t.amount == third));
        assert_eq!(plan[0].to_string(), "Bob pays Alice 33.33");
    }

    #[test]
    fn many_fractional_debtors_settle_the_creditor_fully() {
        // Three 30.01 expenses, each split between the payer and two others.
        let share = 30.01 / 3.0;
        let mut entries = vec![("P", 6.0 * share)];
        entries.extend(["D1", "D2", "D3", "D4", "D5", "D6"].map(|d| (d, -share)));
        let balances = net(&entries);
        let plan = plan_settlement(&balances);
        assert_eq!(plan.len(), 6);

        let paid: f64 = plan.iter().map(|t| t.amount).sum();
        assert!((paid - balances.get("P")).abs() <= EPSILON);
        for entry in balances.iter() {
            let sent: f64 = plan
                .iter()
                .filter(|t| t.from == entry.person)
                .map(|t| t.amount)
                .sum();
            let received: f64 = plan
                .iter()
                .filter(|t| t.to == entry.person)
                .map(|t| t.amount)
                .sum();
            let left = entry.amount + sent - received;
            assert!(left.abs() <= EPSILON, "{} left with {left}", entry.person);
        }
    }

    #[test]
    fn transfer_count_is_bounded() {
        let plan = plan_settlement(&net(&[
            ("A", 12.5),
            ("B", -7.25),
            ("C", 3.75),
            ("D", -20.0),
            ("E", 11.0),
        ]));
        assert!(plan.len() <= 4);
        let total: f64 = plan.iter().map(|t| t.amount).sum();
        assert!((total - 27.25).abs() < 1e-9);
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(transfer("Bob", "Alice", 12.5).to_string(), "Bob pays Alice 12.50");
    }
}
