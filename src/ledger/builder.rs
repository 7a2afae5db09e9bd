use crate::core::amount;
use crate::core::balances::{Balances, TotalPaid};
use crate::core::expense::{ExpenseRecord, RawRecord, SourceLine};
use crate::core::participant::Participant;
use crate::ledger::error::{LedgerError, MalformedRecordError, RecordFault};
use log::{debug, error, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of folding a record source into a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Net position of every participant ever mentioned.
    balances: Balances,
    /// Positive amounts each payer advanced.
    total_paid: TotalPaid,
    /// Normalized records, in input order.
    transactions: Vec<ExpenseRecord>,
}

impl LedgerSummary {
    pub fn balances(&self) -> &Balances {
        &self.balances
    }

    pub fn total_paid(&self) -> &TotalPaid {
        &self.total_paid
    }

    pub fn transactions(&self) -> &[ExpenseRecord] {
        &self.transactions
    }

    /// Total amount advanced by all payers.
    pub fn total_spent(&self) -> Decimal {
        self.total_paid.total()
    }
}

/// Folds expense records into per-participant balances.
pub struct LedgerBuilder;

impl LedgerBuilder {
    /// Fold a record source into balances, advances and a transaction list.
    ///
    /// # Algorithm
    ///
    /// For each record, in order:
    /// 1. Normalize payer and beneficiary codes.
    /// 2. Evaluate the amount expression exactly.
    /// 3. Credit the payer with the full amount (and record it as an
    ///    advance if positive).
    /// 4. Debit every beneficiary occurrence with `amount / occurrences`.
    ///
    /// Comment and blank lines are skipped but still counted, so the
    /// line number in a [`MalformedRecordError`] matches the source.
    /// Amounts whose running total would overflow `Decimal` are reported
    /// as [`RecordFault::Overflow`] on the record that crosses the limit.
    /// The first malformed record aborts the whole fold; no partial
    /// ledger is returned.
    pub fn fold(lines: &[SourceLine]) -> Result<LedgerSummary, LedgerError> {
        let mut balances = Balances::new();
        let mut total_paid = TotalPaid::new();
        let mut transactions = Vec::new();
        // Bounds every balance, and any partial sum of them.
        let mut turnover = Decimal::ZERO;

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            let raw = match line {
                SourceLine::Record(raw) if !is_blank(raw) => raw,
                _ => continue,
            };

            let malformed = |fault: RecordFault| MalformedRecordError {
                line: line_number,
                raw: raw.to_string(),
                fault,
            };

            let record = normalize(raw).map_err(malformed)?;
            turnover = turnover
                .checked_add(record.amount().abs())
                .ok_or_else(|| malformed(RecordFault::Overflow))?;
            post(&mut balances, &mut total_paid, &record)
                .ok_or_else(|| malformed(RecordFault::Overflow))?;

            debug!(
                "line {}: {} paid {} for {} beneficiary share(s)",
                line_number,
                record.payer(),
                record.amount(),
                record.beneficiaries().len()
            );
            transactions.push(record);
        }

        let drift = balances.sum();
        if !balances.is_balanced() {
            error!("ledger balances sum to {} after folding", drift);
            return Err(LedgerError::InvariantViolation { drift });
        }

        info!(
            "folded {} transaction(s) across {} participant(s)",
            transactions.len(),
            balances.len()
        );

        Ok(LedgerSummary {
            balances,
            total_paid,
            transactions,
        })
    }

    /// Fold plain records, numbering them as consecutive source lines.
    pub fn fold_records(records: &[RawRecord]) -> Result<LedgerSummary, LedgerError> {
        let lines: Vec<SourceLine> = records.iter().cloned().map(SourceLine::from).collect();
        Self::fold(&lines)
    }
}

/// Credit the payer and debit every beneficiary share.
fn post(balances: &mut Balances, total_paid: &mut TotalPaid, record: &ExpenseRecord) -> Option<()> {
    balances.checked_credit(record.payer(), record.amount())?;
    total_paid.checked_record(record.payer(), record.amount())?;

    let share = record.share();
    for beneficiary in record.beneficiaries() {
        balances.checked_debit(*beneficiary, share)?;
    }
    Some(())
}

/// A record with every field empty is a blank line.
fn is_blank(raw: &RawRecord) -> bool {
    raw.payer.trim().is_empty()
        && raw.amount.trim().is_empty()
        && raw.beneficiaries.trim().is_empty()
}

fn normalize(raw: &RawRecord) -> Result<ExpenseRecord, RecordFault> {
    let payer = Participant::parse(&raw.payer).map_err(RecordFault::InvalidPayer)?;
    let amount = amount::evaluate(&raw.amount).map_err(RecordFault::InvalidAmount)?;
    let beneficiaries =
        Participant::parse_many(&raw.beneficiaries).map_err(RecordFault::InvalidBeneficiary)?;
    if beneficiaries.is_empty() {
        return Err(RecordFault::EmptyBeneficiaries);
    }

    let comment = raw
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ExpenseRecord::new(payer, amount, beneficiaries, comment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::AmountError;
    use crate::core::participant::ParticipantError;
    use rust_decimal_macros::dec;

    fn p(code: &str) -> Participant {
        Participant::parse(code).unwrap()
    }

    #[test]
    fn test_split_between_two() {
        let summary = LedgerBuilder::fold_records(&[RawRecord::new("P", "15.0", "KH")]).unwrap();
        let balances = summary.balances();
        assert_eq!(balances.get(p("P")), dec!(15));
        assert_eq!(balances.get(p("K")), dec!(-7.5));
        assert_eq!(balances.get(p("H")), dec!(-7.5));
    }

    #[test]
    fn test_reference_ledger() {
        let summary = LedgerBuilder::fold_records(&[
            RawRecord::new("D", "15.0", "KH"),
            RawRecord::new("K", "2.5 + 2.5", "KH"),
        ])
        .unwrap();

        let balances = summary.balances();
        assert_eq!(balances.get(p("D")), dec!(15));
        assert_eq!(balances.get(p("H")), dec!(-10));
        assert_eq!(balances.get(p("K")), dec!(-5));
        assert_eq!(balances.len(), 3);

        assert_eq!(summary.total_paid().get(p("D")), dec!(15));
        assert_eq!(summary.total_paid().get(p("K")), dec!(5));
        assert_eq!(summary.total_spent(), dec!(20));
        assert_eq!(summary.transactions()[1].amount(), dec!(5));
    }

    #[test]
    fn test_negative_amount_is_income() {
        let summary = LedgerBuilder::fold_records(&[RawRecord::new("H", "-250.0", "DH")]).unwrap();
        let balances = summary.balances();
        assert_eq!(balances.get(p("D")), dec!(125));
        assert_eq!(balances.get(p("H")), dec!(-125));
        // Money received is not an advance.
        assert_eq!(summary.total_paid().get(p("H")), Decimal::ZERO);
        assert_eq!(summary.total_spent(), Decimal::ZERO);
    }

    #[test]
    fn test_repeated_beneficiary_takes_two_shares() {
        let summary = LedgerBuilder::fold_records(&[RawRecord::new("A", "30", "BBC")]).unwrap();
        let balances = summary.balances();
        assert_eq!(balances.get(p("B")), dec!(-20));
        assert_eq!(balances.get(p("C")), dec!(-10));
        assert_eq!(balances.get(p("A")), dec!(30));
    }

    #[test]
    fn test_codes_are_normalized() {
        let summary =
            LedgerBuilder::fold_records(&[RawRecord::new(" d ", "20", "m K")]).unwrap();
        let record = &summary.transactions()[0];
        assert_eq!(record.payer(), p("D"));
        assert_eq!(record.beneficiaries(), &[p("M"), p("K")]);
    }

    #[test]
    fn test_three_way_split_stays_balanced() {
        let summary = LedgerBuilder::fold_records(&[RawRecord::new("A", "10", "ABC")]).unwrap();
        assert!(summary.balances().is_balanced());
    }

    #[test]
    fn test_comments_and_blanks_count_lines() {
        let lines = vec![
            SourceLine::Comment,
            SourceLine::Record(RawRecord::new("D", "10", "DK")),
            SourceLine::Blank,
            SourceLine::Record(RawRecord::new("K", "oops", "DK")),
        ];

        let err = LedgerBuilder::fold(&lines).unwrap_err();
        match err {
            LedgerError::Malformed(e) => {
                assert_eq!(e.line, 4);
                assert_eq!(e.raw, "K, oops, DK");
                assert!(matches!(
                    e.fault,
                    RecordFault::InvalidAmount(AmountError::ExpectedNumber { offset: 0 })
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_record_is_blank() {
        let lines = vec![SourceLine::Record(RawRecord::new("", " ", ""))];
        let summary = LedgerBuilder::fold(&lines).unwrap();
        assert!(summary.transactions().is_empty());
        assert!(summary.balances().is_empty());
    }

    #[test]
    fn test_empty_beneficiaries_rejected() {
        let err = LedgerBuilder::fold_records(&[RawRecord::new("D", "10", " ")]).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Malformed(MalformedRecordError {
                line: 1,
                fault: RecordFault::EmptyBeneficiaries,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_payer_rejected() {
        let err = LedgerBuilder::fold_records(&[
            RawRecord::new("D", "10", "DK"),
            RawRecord::new("DK", "10", "DK"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Malformed(MalformedRecordError {
                line: 2,
                fault: RecordFault::InvalidPayer(ParticipantError::TooLong(_)),
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_beneficiary_rejected() {
        let err = LedgerBuilder::fold_records(&[RawRecord::new("D", "10", "D-K")]).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Malformed(MalformedRecordError {
                fault: RecordFault::InvalidBeneficiary(ParticipantError::InvalidCharacter('-')),
                ..
            })
        ));
    }

    #[test]
    fn test_comment_kept_on_transaction() {
        let summary = LedgerBuilder::fold_records(&[
            RawRecord::new("D", "10", "DK").with_comment(" pizza "),
            RawRecord::new("D", "10", "DK").with_comment("  "),
        ])
        .unwrap();
        assert_eq!(summary.transactions()[0].comment(), Some("pizza"));
        assert_eq!(summary.transactions()[1].comment(), None);
    }

    #[test]
    fn test_overflow_is_reported_not_panicked() {
        let err = LedgerBuilder::fold_records(&[
            RawRecord::new("A", "79228162514264337593543950335", "B"),
            RawRecord::new("A", "79228162514264337593543950335", "B"),
        ])
        .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Malformed(MalformedRecordError {
                line: 2,
                fault: RecordFault::Overflow,
                ..
            })
        ));
        assert!(err
            .to_string()
            .starts_with("error in line 2: A, 79228162514264337593543950335, B"));
    }

    #[test]
    fn test_offsetting_huge_amounts_still_overflow() {
        // Net balances would stay small, but the advances alone overflow.
        let err = LedgerBuilder::fold_records(&[
            RawRecord::new("A", "79228162514264337593543950335", "A"),
            RawRecord::new("B", "79228162514264337593543950335", "B"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Malformed(MalformedRecordError {
                line: 2,
                fault: RecordFault::Overflow,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_source() {
        let summary = LedgerBuilder::fold(&[]).unwrap();
        assert!(summary.balances().is_empty());
        assert_eq!(summary.total_spent(), Decimal::ZERO);
    }
}
