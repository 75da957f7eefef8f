use serde::Serialize;

use crate::{Roster, Transaction, ledger::expense_shares, money::is_valid_amount};

/// Aggregates shown in the summary: overall spend, spend per category and
/// what each person consumed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Totals {
    /// Sum of expense amounts. Payments move money between people and are
    /// not spending.
    pub total: f64,
    /// Number of transactions considered, payments included.
    pub count: usize,
    /// Category totals, largest first.
    pub by_category: Vec<(String, f64)>,
    /// Consumed shares per person, in roster order.
    pub by_person: Vec<(String, f64)>,
}

impl Totals {
    /// Category with the largest total; the first one seen wins ties.
    pub fn top_category(&self) -> Option<&str> {
        self.by_category.first().map(|(name, _)| name.as_str())
    }
}

pub fn compute_totals(transactions: &[Transaction], roster: &Roster) -> Totals {
    let mut total = 0.0;
    let mut by_category: Vec<(String, f64)> = Vec::new();
    let mut by_person: Vec<(String, f64)> =
        roster.iter().map(|name| (name.to_string(), 0.0)).collect();

    for tx in transactions {
        let Some(category) = tx.category() else {
            continue;
        };
        if !is_valid_amount(tx.amount) {
            continue;
        }
        total += tx.amount;
        match by_category.iter_mut().find(|(name, _)| name == category) {
            Some((_, sum)) => *sum += tx.amount,
            None => by_category.push((category.to_string(), tx.amount)),
        }
        for (participant, share) in expense_shares(tx, roster) {
            if let Some(index) = roster.position(participant) {
                by_person[index].1 += share;
            }
        }
    }
    by_category.sort_by(|a, b| b.1.total_cmp(&a.1));

    Totals {
        total,
        count: transactions.len(),
        by_category,
        by_person,
    }
}
