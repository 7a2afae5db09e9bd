use crate::core::participant::Participant;
use crate::core::transfer::Transfer;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tolerance below which a balance counts as settled.
///
/// Splitting an amount among three beneficiaries is not exact even in
/// decimal arithmetic, so sums are compared against this threshold rather
/// than against zero.
pub const EPSILON: Decimal = dec!(0.00001);

/// Net position of every participant in a ledger.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
///
/// Entries are kept in participant order, so iteration and every
/// tie-break derived from it is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Balances {
    positions: BTreeMap<Participant, Decimal>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `participant` has an entry, starting at zero.
    pub fn ensure(&mut self, participant: Participant) {
        self.positions.entry(participant).or_insert(Decimal::ZERO);
    }

    /// Add `amount` to a participant's balance.
    pub fn credit(&mut self, participant: Participant, amount: Decimal) {
        *self.positions.entry(participant).or_insert(Decimal::ZERO) += amount;
    }

    /// Subtract `amount` from a participant's balance.
    pub fn debit(&mut self, participant: Participant, amount: Decimal) {
        *self.positions.entry(participant).or_insert(Decimal::ZERO) -= amount;
    }

    /// Like [`Balances::credit`], but returns `None` instead of
    /// overflowing. The balance is left unchanged on overflow.
    pub fn checked_credit(&mut self, participant: Participant, amount: Decimal) -> Option<Decimal> {
        let entry = self.positions.entry(participant).or_insert(Decimal::ZERO);
        *entry = entry.checked_add(amount)?;
        Some(*entry)
    }

    /// Like [`Balances::debit`], but returns `None` instead of overflowing.
    pub fn checked_debit(&mut self, participant: Participant, amount: Decimal) -> Option<Decimal> {
        let entry = self.positions.entry(participant).or_insert(Decimal::ZERO);
        *entry = entry.checked_sub(amount)?;
        Some(*entry)
    }

    /// Apply a transfer: the payer's debt shrinks, the receiver's credit shrinks.
    pub fn apply_transfer(&mut self, transfer: &Transfer) {
        self.credit(transfer.from(), transfer.amount());
        self.debit(transfer.to(), transfer.amount());
    }

    /// Balance of a participant; zero if never mentioned.
    pub fn get(&self, participant: Participant) -> Decimal {
        self.positions
            .get(&participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn contains(&self, participant: Participant) -> bool {
        self.positions.contains_key(&participant)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Participant, Decimal)> + '_ {
        self.positions.iter().map(|(p, v)| (*p, *v))
    }

    pub fn participants(&self) -> impl Iterator<Item = Participant> + '_ {
        self.positions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of every balance. Zero (within [`EPSILON`]) for a consistent ledger.
    pub fn sum(&self) -> Decimal {
        self.positions.values().sum()
    }

    /// Verify the zero-sum invariant.
    pub fn is_balanced(&self) -> bool {
        self.sum().abs() < EPSILON
    }

    /// Every balance is within [`EPSILON`] of zero.
    pub fn is_settled(&self) -> bool {
        self.positions.values().all(|v| v.abs() < EPSILON)
    }

    /// Participants with a positive balance, with their credit.
    pub fn creditors(&self) -> Vec<(Participant, Decimal)> {
        self.iter().filter(|(_, v)| *v > Decimal::ZERO).collect()
    }

    /// Participants with a negative balance.
    pub fn debtors(&self) -> Vec<(Participant, Decimal)> {
        self.iter().filter(|(_, v)| *v < Decimal::ZERO).collect()
    }

    /// Total that has to change hands to settle: sum of positive balances.
    pub fn total_outstanding(&self) -> Decimal {
        self.positions
            .values()
            .filter(|v| **v > Decimal::ZERO)
            .sum()
    }
}

impl FromIterator<(Participant, Decimal)> for Balances {
    fn from_iter<T: IntoIterator<Item = (Participant, Decimal)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// How much each participant advanced out of pocket.
///
/// Only positive amounts count: a negative record (money received on
/// behalf of the group) is not an advance. Used for reporting, never for
/// settlement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TotalPaid {
    advances: BTreeMap<Participant, Decimal>,
}

impl TotalPaid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a payer; the entry exists even if nothing positive is recorded.
    pub fn ensure(&mut self, participant: Participant) {
        self.advances.entry(participant).or_insert(Decimal::ZERO);
    }

    /// Record an amount paid; non-positive amounts are ignored.
    pub fn record(&mut self, participant: Participant, amount: Decimal) {
        let entry = self.advances.entry(participant).or_insert(Decimal::ZERO);
        if amount > Decimal::ZERO {
            *entry += amount;
        }
    }

    /// Like [`TotalPaid::record`], but returns `None` instead of overflowing.
    pub fn checked_record(&mut self, participant: Participant, amount: Decimal) -> Option<Decimal> {
        let entry = self.advances.entry(participant).or_insert(Decimal::ZERO);
        if amount > Decimal::ZERO {
            *entry = entry.checked_add(amount)?;
        }
        Some(*entry)
    }

    pub fn get(&self, participant: Participant) -> Decimal {
        self.advances
            .get(&participant)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Participant, Decimal)> + '_ {
        self.advances.iter().map(|(p, v)| (*p, *v))
    }

    pub fn len(&self) -> usize {
        self.advances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.advances.is_empty()
    }

    /// Total amount advanced by everyone.
    pub fn total(&self) -> Decimal {
        self.advances.values().sum()
    }
}
