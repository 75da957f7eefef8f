//! Transaction primitives.
//!
//! A `Transaction` is either an expense split among participants or a direct
//! payment between two people. Both share the same header (id, amount,
//! description, date); the variant payload lives in [`TransactionKind`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine,
    money::is_valid_amount,
    util::{dedup_names, new_id, normalize_optional_text, normalize_required_name},
};

/// Category used when none is given.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Suggested expense categories.
pub const CATEGORIES: [&str; 10] = [
    "Food",
    "Transport",
    "Housing",
    "Utilities",
    "Health",
    "Entertainment",
    "Education",
    "Shopping",
    "Travel",
    DEFAULT_CATEGORY,
];

/// Description given to payments that don't carry one.
pub const DEFAULT_PAYMENT_DESCRIPTION: &str = "Payment";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    /// `payer` paid the whole amount; every participant owes an equal share.
    Expense {
        payer: String,
        participants: Vec<String>,
        category: String,
    },
    /// `from` gave `to` the amount directly.
    Payment { from: String, to: String },
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense { .. } => "expense",
            Self::Payment { .. } => "payment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub kind: TransactionKind,
}

/// Input used to create an expense.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseInput {
    pub amount: f64,
    pub description: String,
    pub date: NaiveDate,
    pub payer: String,
    pub participants: Vec<String>,
    pub category: Option<String>,
}

/// Input used to record a direct payment.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentInput {
    pub amount: f64,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
}

fn validate_amount(amount: f64) -> ResultEngine<()> {
    if !is_valid_amount(amount) {
        return Err(EngineError::InvalidAmount(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(())
}

impl Transaction {
    /// Builds a validated expense with a fresh id.
    ///
    /// Participants are deduplicated keeping their order. The payer does not
    /// need to be a participant.
    pub fn expense(input: ExpenseInput) -> ResultEngine<Self> {
        validate_amount(input.amount)?;
        let description = input.description.trim().to_string();
        if description.is_empty() {
            return Err(EngineError::InvalidTransaction(
                "description must not be empty".to_string(),
            ));
        }
        let payer = normalize_required_name(&input.payer, "payer")?;
        let participants = input
            .participants
            .iter()
            .map(|p| normalize_required_name(p, "participant"))
            .collect::<ResultEngine<Vec<_>>>()?;
        let participants = dedup_names(participants);
        if participants.is_empty() {
            return Err(EngineError::InvalidTransaction(
                "select at least one participant".to_string(),
            ));
        }
        let category = normalize_optional_text(input.category.as_deref())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Ok(Self {
            id: new_id(),
            amount: input.amount,
            description,
            date: input.date,
            kind: TransactionKind::Expense {
                payer,
                participants,
                category,
            },
        })
    }

    /// Builds a validated payment with a fresh id.
    pub fn payment(input: PaymentInput) -> ResultEngine<Self> {
        validate_amount(input.amount)?;
        let from = normalize_required_name(&input.from, "sender")?;
        let to = normalize_required_name(&input.to, "recipient")?;
        if from == to {
            return Err(EngineError::InvalidTransaction(
                "a payment needs two different people".to_string(),
            ));
        }
        let description = normalize_optional_text(input.description.as_deref())
            .unwrap_or_else(|| DEFAULT_PAYMENT_DESCRIPTION.to_string());

        Ok(Self {
            id: new_id(),
            amount: input.amount,
            description,
            date: input.date,
            kind: TransactionKind::Payment { from, to },
        })
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense { .. })
    }

    /// Expense category, `None` for payments.
    pub fn category(&self) -> Option<&str> {
        match &self.kind {
            TransactionKind::Expense { category, .. } => Some(category),
            TransactionKind::Payment { .. } => None,
        }
    }

    /// Every name mentioned by the transaction, payer/sender first.
    pub fn people(&self) -> Vec<&str> {
        match &self.kind {
            TransactionKind::Expense {
                payer,
                participants,
                ..
            } => std::iter::once(payer.as_str())
                .chain(participants.iter().map(String::as_str))
                .collect(),
            TransactionKind::Payment { from, to } => vec![from.as_str(), to.as_str()],
        }
    }

    /// Text the search filter matches against: description, category and the
    /// people involved, joined with spaces.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![self.description.as_str()];
        if let Some(category) = self.category() {
            parts.push(category);
        }
        parts.extend(self.people());
        parts.join(" ")
    }
}
