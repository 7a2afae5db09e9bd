use crate::core::amount::AmountError;
use crate::core::participant::ParticipantError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Why a single record could not be folded into the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordFault {
    #[error("invalid payer: {0}")]
    InvalidPayer(#[source] ParticipantError),
    #[error("invalid beneficiary: {0}")]
    InvalidBeneficiary(#[source] ParticipantError),
    #[error("invalid amount: {0}")]
    InvalidAmount(#[source] AmountError),
    #[error("record has no beneficiaries")]
    EmptyBeneficiaries,
    #[error("amount overflows the ledger totals")]
    Overflow,
}

/// A record that aborted the fold, with its 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error in line {line}: {raw}: {fault}")]
pub struct MalformedRecordError {
    pub line: usize,
    pub raw: String,
    #[source]
    pub fault: RecordFault,
}

/// Errors arising from building a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),
    /// Balances stopped summing to zero. Indicates a bug, not bad input.
    #[error("ledger invariant violated: balances sum to {drift}, expected zero")]
    InvariantViolation { drift: Decimal },
}
