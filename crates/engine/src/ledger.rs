//! Ledger reducer: folds a transaction list into gross directional debt.
//!
//! The result is an [`OwedMatrix`] where `owed(debtor, creditor)` is what
//! `debtor` owes `creditor` before mutual debts are cancelled. Folding is
//! plain accumulation, so the order of the transactions does not matter.

use std::collections::BTreeMap;

use crate::{Roster, Transaction, TransactionKind, money::is_valid_amount};

/// Gross amounts owed, keyed by debtor then creditor.
///
/// Values are usually positive; a payment larger than the debt it repays
/// leaves a negative entry that the resolver nets against the reverse
/// direction.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwedMatrix {
    owed: BTreeMap<String, BTreeMap<String, f64>>,
}

impl OwedMatrix {
    /// Amount `debtor` owes `creditor`, `0.0` if nothing was recorded.
    pub fn owed(&self, debtor: &str, creditor: &str) -> f64 {
        self.owed
            .get(debtor)
            .and_then(|row| row.get(creditor))
            .copied()
            .unwrap_or(0.0)
    }

    /// Iterates `(debtor, creditor, amount)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.owed.iter().flat_map(|(debtor, row)| {
            row.iter()
                .map(move |(creditor, amount)| (debtor.as_str(), creditor.as_str(), *amount))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.owed.is_empty()
    }

    fn add(&mut self, debtor: &str, creditor: &str, amount: f64) {
        *self
            .owed
            .entry(debtor.to_string())
            .or_default()
            .entry(creditor.to_string())
            .or_insert(0.0) += amount;
    }
}

/// Equal shares of an expense for the participants listed in `roster`.
///
/// Yields `(participant, share)` with `share = amount / participants`. The
/// divisor counts every participant, known or not, so removing someone from
/// the roster never inflates the share of the others. Payments, invalid
/// amounts and empty participant lists yield nothing.
pub(crate) fn expense_shares<'a>(
    tx: &'a Transaction,
    roster: &'a Roster,
) -> impl Iterator<Item = (&'a str, f64)> + 'a {
    let split = match &tx.kind {
        TransactionKind::Expense { participants, .. }
            if !participants.is_empty() && is_valid_amount(tx.amount) =>
        {
            Some((participants, tx.amount / participants.len() as f64))
        }
        _ => None,
    };
    split.into_iter().flat_map(move |(participants, share)| {
        participants
            .iter()
            .filter(move |p| roster.contains(p))
            .map(move |p| (p.as_str(), share))
    })
}

/// Folds `transactions` into the gross owed matrix.
///
/// - Expense: each participant other than the payer owes the payer one share.
/// - Payment: reduces what the sender owes the recipient.
///
/// Names missing from `roster` are skipped, as are payments between the same
/// person, invalid amounts and expenses without participants.
pub fn reduce(transactions: &[Transaction], roster: &Roster) -> OwedMatrix {
    let mut matrix = OwedMatrix::default();

    for tx in transactions {
        match &tx.kind {
            TransactionKind::Expense { payer, .. } => {
                if !roster.contains(payer) {
                    continue;
                }
                for (participant, share) in expense_shares(tx, roster) {
                    if participant != payer.as_str() {
                        matrix.add(participant, payer, share);
                    }
                }
            }
            TransactionKind::Payment { from, to } => {
                if from == to
                    || !is_valid_amount(tx.amount)
                    || !roster.contains(from)
                    || !roster.contains(to)
                {
                    continue;
                }
                matrix.add(from, to, -tx.amount);
            }
        }
    }

    matrix
}
