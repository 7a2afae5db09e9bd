use crate::core::participant::Participant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed payment that settles part of the ledger.
///
/// Represents the fact that `from` owes `to` a specific `amount`.
/// Transfers are produced by the settlement planner and never fed back
/// into the ledger builder.
///
/// # Examples
///
/// ```
/// use household_ledger::core::participant::Participant;
/// use household_ledger::core::transfer::Transfer;
/// use rust_decimal_macros::dec;
///
/// let transfer = Transfer::new(
///     Participant::parse("K").unwrap(),
///     Participant::parse("D").unwrap(),
///     dec!(5),
/// );
///
/// assert_eq!(transfer.to_string(), "K -> D: 5.00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    /// The participant who pays.
    from: Participant,
    /// The participant who receives.
    to: Participant,
    /// The amount paid. Always positive.
    amount: Decimal,
}

impl Transfer {
    /// Create a new transfer.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive.
    pub fn new(from: Participant, to: Participant, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Transfer amount must be positive, got {}",
            amount
        );
        Self { from, to, amount }
    }

    pub fn from(&self) -> Participant {
        self.from
    }

    pub fn to(&self) -> Participant {
        self.to
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {:.2}", self.from, self.to, self.amount)
    }
}
