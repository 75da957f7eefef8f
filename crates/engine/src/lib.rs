//! Shared-expense debt ledger.
//!
//! The engine reduces a list of [`Transaction`]s (expenses split equally
//! among participants, and direct payments) into who owes whom:
//!
//! 1. [`reduce`] folds the list into a gross [`OwedMatrix`];
//! 2. [`compute_balances`] nets it per person and per pair;
//! 3. [`plan_settlement`] proposes transfers that zero every balance.
//!
//! Every derivation is a pure function of the transactions and the
//! [`Roster`]. [`Ledger`] is the explicit store that front ends mutate.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use engine::{ExpenseInput, Ledger};
//!
//! let mut ledger = Ledger::builder().people(["Alice", "Bob"]).build();
//! ledger
//!     .add_expense(ExpenseInput {
//!         amount: 100.0,
//!         description: "Groceries".to_string(),
//!         date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
//!         payer: "Alice".to_string(),
//!         participants: vec!["Alice".to_string(), "Bob".to_string()],
//!         category: Some("Food".to_string()),
//!     })
//!     .unwrap();
//!
//! let balances = ledger.balances();
//! assert_eq!(balances.net.get("Alice"), 50.0);
//! assert_eq!(ledger.settlement()[0].to_string(), "Bob pays Alice 50.00");
//! ```

pub use balances::{
    Balances, Debt, NetBalance, NetBalances, PairwiseNet, compute_balances, net_balances,
    pairwise_net,
};
pub use error::EngineError;
pub use exchange::{RestoreReport, restore_json, to_csv, to_json, write_csv};
pub use filter::{MonthWindow, SortOrder, TransactionFilter};
pub use ledger::{OwedMatrix, reduce};
pub use money::{Amount, EPSILON, format_amount, is_settled, round_cents};
pub use people::Roster;
pub use periods::{PeriodShares, period_rollup, week_of_month};
pub use settlement::{SETTLEMENT_DESCRIPTION, Transfer, plan_settlement};
pub use store::{Ledger, LedgerBuilder, Snapshot};
pub use totals::{Totals, compute_totals};
pub use transactions::{
    CATEGORIES, DEFAULT_CATEGORY, ExpenseInput, PaymentInput, Transaction, TransactionKind,
};

mod balances;
mod error;
mod exchange;
mod filter;
mod ledger;
mod money;
mod people;
mod periods;
mod settlement;
mod store;
mod totals;
mod transactions;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
