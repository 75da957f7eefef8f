//! Explicit store object holding the roster and the transaction list.
//!
//! [`Ledger`] owns the mutable state the rest of the engine reads as an
//! immutable snapshot: every derived view (balances, settlement, totals) is a
//! full recomputation over the current lists. [`Snapshot`] is the
//! serializable form kept on disk by the command line front end.

use std::{fs, io, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Balances, EngineError, ExpenseInput, PaymentInput, ResultEngine, Roster, Transaction,
    TransactionFilter, Transfer, compute_balances, plan_settlement,
    util::new_id,
};

/// Serializable state: people plus transactions, newest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub people: Roster,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Loads a snapshot, returning an empty one if the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> ResultEngine<Self> {
        let content = match fs::read_to_string(path.as_ref()) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ResultEngine<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ledger {
    people: Roster,
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Return a builder for `Ledger`.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    pub fn people(&self) -> &Roster {
        &self.people
    }

    /// Transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|tx| tx.id == id)
    }

    pub fn add_person(&mut self, name: &str) -> ResultEngine<String> {
        let name = self.people.add(name)?;
        tracing::debug!(person = %name, "person added");
        Ok(name)
    }

    /// Removes a person from the roster. Their transactions stay in the list
    /// and stop contributing to balances until the name is added back.
    pub fn remove_person(&mut self, name: &str) -> ResultEngine<()> {
        self.people.remove(name)?;
        tracing::debug!(person = %name, "person removed");
        Ok(())
    }

    /// Validates and prepends a new expense, returning its id.
    ///
    /// The payer and every participant must be in the roster.
    pub fn add_expense(&mut self, input: ExpenseInput) -> ResultEngine<String> {
        let tx = Transaction::expense(input)?;
        self.insert(tx)
    }

    /// Validates and prepends a new payment, returning its id.
    pub fn record_payment(&mut self, input: PaymentInput) -> ResultEngine<String> {
        let tx = Transaction::payment(input)?;
        self.insert(tx)
    }

    /// Turns a suggested transfer into a recorded payment.
    pub fn record_settlement(
        &mut self,
        transfer: &Transfer,
        date: NaiveDate,
    ) -> ResultEngine<String> {
        self.record_payment(transfer.to_payment(date))
    }

    fn insert(&mut self, tx: Transaction) -> ResultEngine<String> {
        for person in tx.people() {
            self.people.require(person)?;
        }
        let id = tx.id.clone();
        tracing::debug!(
            id = %id,
            kind = tx.kind.as_str(),
            amount = tx.amount,
            "transaction added"
        );
        self.transactions.insert(0, tx);
        Ok(id)
    }

    /// Removes a transaction and hands it back, so a caller can load it into
    /// a form and submit a corrected copy.
    pub fn delete(&mut self, id: &str) -> ResultEngine<Transaction> {
        let index = self
            .transactions
            .iter()
            .position(|tx| tx.id == id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        tracing::debug!(id = %id, "transaction deleted");
        Ok(self.transactions.remove(index))
    }

    /// Removes every transaction, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.transactions.len();
        self.transactions.clear();
        tracing::debug!(count, "transactions cleared");
        count
    }

    /// Prepends an external batch (already sanitized) to the list.
    ///
    /// Ids that collide with an existing transaction are replaced with fresh
    /// ones. Names are not checked against the roster: restored history may
    /// mention people that were removed since.
    pub fn restore(&mut self, batch: Vec<Transaction>) -> usize {
        let mut restored: Vec<Transaction> = Vec::with_capacity(batch.len());
        for mut tx in batch {
            let taken = |id: &str| {
                self.transactions.iter().any(|t| t.id == id)
                    || restored.iter().any(|t| t.id == id)
            };
            if tx.id.is_empty() || taken(&tx.id) {
                tx.id = new_id();
            }
            restored.push(tx);
        }
        let count = restored.len();
        restored.append(&mut self.transactions);
        self.transactions = restored;
        tracing::debug!(count, "transactions restored");
        count
    }

    /// Filtered and sorted copy of the transaction list.
    pub fn query(&self, filter: &TransactionFilter) -> Vec<Transaction> {
        filter.apply(&self.transactions)
    }

    pub fn balances(&self) -> Balances {
        compute_balances(&self.transactions, &self.people)
    }

    pub fn settlement(&self) -> Vec<Transfer> {
        plan_settlement(&self.balances().net)
    }

    /// Names mentioned in transactions that are not in the roster.
    pub fn unknown_people(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = Vec::new();
        for tx in &self.transactions {
            for person in tx.people() {
                if !self.people.contains(person) && !unknown.contains(&person) {
                    unknown.push(person);
                }
            }
        }
        unknown
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            people: self.people.clone(),
            transactions: self.transactions.clone(),
        }
    }
}

impl From<Snapshot> for Ledger {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            people: snapshot.people,
            transactions: snapshot.transactions,
        }
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    people: Roster,
    transactions: Vec<Transaction>,
}

impl LedgerBuilder {
    /// Start from a fixed roster.
    pub fn people<I, S>(mut self, people: I) -> LedgerBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.people = people.into_iter().collect();
        self
    }

    /// Existing transactions, newest first.
    pub fn transactions(mut self, transactions: Vec<Transaction>) -> LedgerBuilder {
        self.transactions = transactions;
        self
    }

    /// Construct `Ledger`
    pub fn build(self) -> Ledger {
        Ledger {
            people: self.people,
            transactions: self.transactions,
        }
    }
}
