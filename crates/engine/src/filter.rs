use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, Transaction};

/// Inclusive calendar-month window (`first..=last`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthWindow {
    first: NaiveDate,
    last: NaiveDate,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Result<Self, EngineError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            EngineError::InvalidFilter(format!("invalid month: {year:04}-{month:02}"))
        })?;
        Ok(Self::starting_at(first))
    }

    /// Month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self::starting_at(date.with_day(1).unwrap_or(date))
    }

    fn starting_at(first: NaiveDate) -> Self {
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        Self { first, last }
    }

    /// The month before this one.
    pub fn previous(self) -> Self {
        match self.first.checked_sub_months(Months::new(1)) {
            Some(first) => Self::starting_at(first),
            None => self,
        }
    }

    pub fn first(self) -> NaiveDate {
        self.first
    }

    pub fn last(self) -> NaiveDate {
        self.last
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }
}

impl FromStr for MonthWindow {
    type Err = EngineError;

    /// Parses a `YYYY-MM` selector.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidFilter(format!("expected YYYY-MM, got \"{s}\""));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

/// Sort order for the transaction table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    AmountAsc,
    AmountDesc,
    DateAsc,
    /// Most recent first.
    #[default]
    DateDesc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AmountAsc => "amount-asc",
            Self::AmountDesc => "amount-desc",
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
        }
    }

    /// Sorts in place. The sort is stable: equal keys keep their input order.
    pub fn sort(self, transactions: &mut [Transaction]) {
        match self {
            Self::AmountAsc => transactions.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
            Self::AmountDesc => transactions.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
            Self::DateAsc => transactions.sort_by(|a, b| a.date.cmp(&b.date)),
            Self::DateDesc => transactions.sort_by(|a, b| b.date.cmp(&a.date)),
        }
    }
}

impl FromStr for SortOrder {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "amount-asc" => Ok(Self::AmountAsc),
            "amount-desc" => Ok(Self::AmountDesc),
            "date-asc" => Ok(Self::DateAsc),
            "date-desc" => Ok(Self::DateDesc),
            other => Err(EngineError::InvalidFilter(format!(
                "invalid sort order: {other}"
            ))),
        }
    }
}

/// Text/month predicates plus sort order applied before reducing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFilter {
    /// Case-insensitive substring of [`Transaction::search_text`].
    pub text: Option<String>,
    /// Only keep transactions dated inside this month.
    pub month: Option<MonthWindow>,
    pub sort: SortOrder,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let in_text = match self.text.as_deref() {
            Some(text) if !text.is_empty() => tx
                .search_text()
                .to_lowercase()
                .contains(&text.to_lowercase()),
            _ => true,
        };
        let in_month = self.month.is_none_or(|month| month.contains(tx.date));
        in_text && in_month
    }

    /// Returns the matching transactions, sorted.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| self.matches(tx))
            .cloned()
            .collect();
        self.sort.sort(&mut out);
        out
    }
}
