//! Net balance resolver.
//!
//! Collapses the gross [`OwedMatrix`] into:
//!
//! - a signed net per person ([`NetBalances`]): positive means the person is
//!   owed money overall, negative means they owe money;
//! - a netted value per pair of people ([`PairwiseNet`]): mutual debts are
//!   cancelled so at most one direction of a pair is ever positive.
//!
//! Both are pure functions of the transactions and the roster; nothing is
//! cached between calls.

use serde::Serialize;

use crate::{
    EPSILON, Roster, Transaction,
    ledger::{OwedMatrix, reduce},
    money::is_settled,
};

/// Net position of one person.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NetBalance {
    pub person: String,
    pub amount: f64,
}

impl NetBalance {
    pub fn is_settled(&self) -> bool {
        is_settled(self.amount)
    }
}

/// Per-person net balances in roster order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NetBalances {
    entries: Vec<NetBalance>,
}

impl NetBalances {
    /// Net of `person`, `0.0` if they are not in the table.
    pub fn get(&self, person: &str) -> f64 {
        self.entries
            .iter()
            .find(|entry| entry.person == person)
            .map_or(0.0, |entry| entry.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetBalance> {
        self.entries.iter()
    }

    /// Entries that are not settled, i.e. further than [`EPSILON`] from zero.
    pub fn outstanding(&self) -> impl Iterator<Item = &NetBalance> {
        self.entries.iter().filter(|entry| !entry.is_settled())
    }

    /// Sum of every net. Always zero up to rounding.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for NetBalances {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(person, amount)| NetBalance {
                    person: person.into(),
                    amount,
                })
                .collect(),
        }
    }
}

/// One netted debt between two people.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Debt {
    pub debtor: String,
    pub creditor: String,
    pub amount: f64,
}

/// Netted debts, one per unordered pair that is not settled.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PairwiseNet {
    debts: Vec<Debt>,
}

impl PairwiseNet {
    /// Net amount `debtor` owes `creditor` after cancelling mutual debt.
    ///
    /// Returns `0.0` when the debt runs the other way or is settled.
    pub fn owed(&self, debtor: &str, creditor: &str) -> f64 {
        self.debts
            .iter()
            .find(|debt| debt.debtor == debtor && debt.creditor == creditor)
            .map_or(0.0, |debt| debt.amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Debt> {
        self.debts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }
}

/// Everything the resolver derives from one snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Balances {
    pub matrix: OwedMatrix,
    pub pairs: PairwiseNet,
    pub net: NetBalances,
}

/// Reduces `transactions` and resolves both kinds of net balances.
pub fn compute_balances(transactions: &[Transaction], roster: &Roster) -> Balances {
    let matrix = reduce(transactions, roster);
    let pairs = pairwise_net(&matrix, roster);
    let net = net_balances(&matrix, roster);
    Balances { matrix, pairs, net }
}

/// Per-person net: what others owe the person minus what the person owes.
///
/// For a roster that covers every name in the transactions this equals
/// `paid as payer - own shares + payments received - payments sent`.
pub fn net_balances(matrix: &OwedMatrix, roster: &Roster) -> NetBalances {
    let mut net: Vec<f64> = vec![0.0; roster.len()];
    for (debtor, creditor, amount) in matrix.iter() {
        if let Some(index) = roster.position(debtor) {
            net[index] -= amount;
        }
        if let Some(index) = roster.position(creditor) {
            net[index] += amount;
        }
    }
    roster.iter().zip(net).collect()
}

/// Cancels mutual debt for every pair of people in roster order.
///
/// For a pair `(a, b)` the net `owed(a, b) - owed(b, a)` is reported as a
/// single debt in whichever direction is positive; nets within [`EPSILON`]
/// are dropped.
pub fn pairwise_net(matrix: &OwedMatrix, roster: &Roster) -> PairwiseNet {
    let names: Vec<&str> = roster.iter().collect();
    let mut debts = Vec::new();
    for (i, a) in names.iter().enumerate() {
        for b in &names[i + 1..] {
            let net = matrix.owed(a, b) - matrix.owed(b, a);
            if net > EPSILON {
                debts.push(Debt {
                    debtor: a.to_string(),
                    creditor: b.to_string(),
                    amount: net,
                });
            } else if net < -EPSILON {
                debts.push(Debt {
                    debtor: b.to_string(),
                    creditor: a.to_string(),
                    amount: -net,
                });
            }
        }
    }
    PairwiseNet { debts }
}
