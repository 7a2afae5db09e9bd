use crate::core::participant::Participant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An expense as it appears in the record source, before normalization.
///
/// Fields are kept as text: the payer code, the amount expression
/// (`"20.0 + 15.50"`), the beneficiary codes (`"mK"`) and an optional
/// free-text comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub payer: String,
    pub amount: String,
    pub beneficiaries: String,
    pub comment: Option<String>,
}

impl RawRecord {
    pub fn new(
        payer: impl Into<String>,
        amount: impl Into<String>,
        beneficiaries: impl Into<String>,
    ) -> Self {
        Self {
            payer: payer.into(),
            amount: amount.into(),
            beneficiaries: beneficiaries.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

impl fmt::Display for RawRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.payer, self.amount, self.beneficiaries)?;
        if let Some(comment) = &self.comment {
            write!(f, ", {}", comment)?;
        }
        Ok(())
    }
}

/// One line of the record source.
///
/// Comment and blank lines carry no data but still count towards line
/// numbers reported in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceLine {
    Comment,
    Blank,
    Record(RawRecord),
}

impl From<RawRecord> for SourceLine {
    fn from(record: RawRecord) -> Self {
        SourceLine::Record(record)
    }
}

/// A normalized expense: who paid, how much, and for whom.
///
/// `amount` may be negative, which records money the payer *received*
/// on behalf of the beneficiaries (e.g. rent from a subtenant).
/// Beneficiaries may repeat; each occurrence is one equal share.
///
/// Records are immutable once built by the ledger builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    payer: Participant,
    amount: Decimal,
    beneficiaries: Vec<Participant>,
    comment: Option<String>,
}

impl ExpenseRecord {
    pub(crate) fn new(
        payer: Participant,
        amount: Decimal,
        beneficiaries: Vec<Participant>,
        comment: Option<String>,
    ) -> Self {
        debug_assert!(!beneficiaries.is_empty());
        Self {
            payer,
            amount,
            beneficiaries,
            comment,
        }
    }

    pub fn payer(&self) -> Participant {
        self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn beneficiaries(&self) -> &[Participant] {
        &self.beneficiaries
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// The share charged to one occurrence of a beneficiary.
    pub fn share(&self) -> Decimal {
        self.amount / Decimal::from(self.beneficiaries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_raw_record_display() {
        let raw = RawRecord::new("D", "20.0 + 15.50", "mK").with_comment("groceries");
        assert_eq!(raw.to_string(), "D, 20.0 + 15.50, mK, groceries");
    }

    #[test]
    fn test_share_counts_repeats() {
        let k = Participant::parse("K").unwrap();
        let h = Participant::parse("H").unwrap();
        let record = ExpenseRecord::new(k, dec!(30), vec![k, h, k], None);
        assert_eq!(record.share(), dec!(10));
    }
}
