//! # household-ledger
//!
//! Shared-expense ledger and settlement planner.
//!
//! Given a list of expenses (who paid, how much, for whom), this crate
//! computes every participant's balance and a list of transfers that
//! settles all balances to zero.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: participants, records, balances, transfers
//! - **input** — Line-oriented record source
//! - **ledger** — Folding records into balances
//! - **settlement** — Greedy, fair and randomized settlement strategies
//! - **report** — Plain-text and JSON output
//! - **simulation** — Random ledgers for testing and benchmarking

pub mod core;
pub mod input;
pub mod ledger;
pub mod report;
pub mod settlement;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::balances::{Balances, TotalPaid, EPSILON};
    pub use crate::core::expense::{ExpenseRecord, RawRecord, SourceLine};
    pub use crate::core::participant::Participant;
    pub use crate::core::transfer::Transfer;
    pub use crate::ledger::builder::{LedgerBuilder, LedgerSummary};
    pub use crate::ledger::error::{LedgerError, MalformedRecordError};
    pub use crate::settlement::objective::{CapabilityUnavailable, Objective, PaymentCountVariance};
    pub use crate::settlement::planner::{SettlementPlan, SettlementPlanner, Strategy, StrategyKind};
    pub use crate::settlement::search::SearchConfig;
}
