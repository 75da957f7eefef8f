//! CSV export, JSON backup and sanitizing restore.
//!
//! None of this is needed to compute balances. It is the encoding boundary
//! used by front ends to move transaction lists in and out.

use std::io;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::{
    DEFAULT_CATEGORY, EngineError, ResultEngine, Transaction, TransactionKind,
    money::{format_amount, is_valid_amount},
    transactions::DEFAULT_PAYMENT_DESCRIPTION,
    util::{dedup_names, new_id},
};

/// Separator used for participant lists in CSV cells.
pub const PARTICIPANT_SEPARATOR: &str = "|";

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Kind")]
    kind: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Payer")]
    payer: &'a str,
    #[serde(rename = "Participants")]
    participants: String,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        let (payer, participants) = match &tx.kind {
            TransactionKind::Expense {
                payer,
                participants,
                ..
            } => (payer.as_str(), participants.join(PARTICIPANT_SEPARATOR)),
            TransactionKind::Payment { from, to } => (from.as_str(), to.clone()),
        };
        Self {
            date: tx.date.format("%Y-%m-%d").to_string(),
            kind: tx.kind.as_str(),
            description: &tx.description,
            category: tx.category().unwrap_or(""),
            amount: format_amount(tx.amount),
            payer,
            participants,
        }
    }
}

/// Writes `transactions` as CSV, one row per transaction, with a header.
///
/// Payments put the sender in `Payer` and the recipient in `Participants`.
pub fn write_csv<W: io::Write>(writer: W, transactions: &[Transaction]) -> ResultEngine<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for tx in transactions {
        writer.serialize(CsvRow::from(tx))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn to_csv(transactions: &[Transaction]) -> ResultEngine<String> {
    let mut buffer: Vec<u8> = Vec::new();
    write_csv(&mut buffer, transactions)?;
    String::from_utf8(buffer)
        .map_err(|err| EngineError::InvalidTransaction(format!("non UTF-8 export: {err}")))
}

/// Pretty printed JSON array of `transactions`.
pub fn to_json(transactions: &[Transaction]) -> ResultEngine<String> {
    Ok(serde_json::to_string_pretty(transactions)?)
}

/// Outcome of a restore: the sanitized records and how many were dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RestoreReport {
    pub restored: Vec<Transaction>,
    pub dropped: usize,
}

/// Parses a JSON backup, sanitizing every record on its own.
///
/// Only a payload that is not a JSON array fails; a record missing a
/// required field is dropped and counted instead of aborting the batch.
/// Accepts the field names written by [`to_json`] as well as older backups
/// (`desc`, `splitWith`, no `kind`).
pub fn restore_json(input: &str) -> ResultEngine<RestoreReport> {
    let value: Value = serde_json::from_str(input)?;
    let Value::Array(records) = value else {
        return Err(EngineError::InvalidTransaction(
            "backup must be a JSON array".to_string(),
        ));
    };

    let mut report = RestoreReport::default();
    for (index, record) in records.iter().enumerate() {
        match sanitize(record) {
            Some(tx) => report.restored.push(tx),
            None => {
                tracing::warn!(index, "dropping backup record with missing fields");
                report.dropped += 1;
            }
        }
    }
    Ok(report)
}

fn text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn amount(record: &Value) -> Option<f64> {
    let value = match record.get("amount")? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', ".").parse().ok()?,
        _ => return None,
    };
    is_valid_amount(value).then_some(value)
}

fn date(record: &Value) -> Option<NaiveDate> {
    let raw = text(record, &["date"])?;
    let day: String = raw.chars().take(10).collect();
    NaiveDate::parse_from_str(&day, "%Y-%m-%d").ok()
}

fn names(record: &Value, keys: &[&str]) -> Vec<String> {
    let Some(Value::Array(items)) = keys.iter().find_map(|key| record.get(key)) else {
        return Vec::new();
    };
    let names = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .filter(|s| !s.is_empty())
        .collect();
    dedup_names(names)
}

fn sanitize(record: &Value) -> Option<Transaction> {
    if !record.is_object() {
        return None;
    }
    let amount = amount(record)?;
    let date = date(record)?;
    let id = text(record, &["id"]).unwrap_or_else(new_id);
    let description = text(record, &["description", "desc"]);

    let kind = text(record, &["kind"]).unwrap_or_else(|| "expense".to_string());
    let (description, kind) = match kind.as_str() {
        "payment" => {
            let from = text(record, &["from"])?;
            let to = text(record, &["to"])?;
            if from == to {
                return None;
            }
            (
                description.unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string()),
                TransactionKind::Payment { from, to },
            )
        }
        "expense" => (
            description?,
            TransactionKind::Expense {
                payer: text(record, &["payer"])?,
                participants: names(record, &["participants", "splitWith"]),
                category: text(record, &["category"])
                    .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            },
        ),
        _ => return None,
    };

    Some(Transaction {
        id,
        amount,
        description,
        date,
        kind,
    })
}
