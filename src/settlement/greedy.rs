use crate::core::balances::{Balances, EPSILON};
use crate::core::participant::Participant;
use crate::core::transfer::Transfer;
use log::{debug, warn};
use rust_decimal::Decimal;

/// Settle by matching the largest debts against the largest credits.
///
/// Debtors are processed most-negative first. Each one pays the largest
/// remaining creditor; a creditor that is not used up goes back on top of
/// the stack for the next debtor. Matching large against large keeps the
/// number of small transfers down, and never needs more than
/// `participants - 1` transfers.
///
/// Every nonzero balance takes part, however small, so sub-cent
/// positions cannot pile up into an unpaid remainder. Ties are broken by
/// participant order.
pub fn settle(balances: &mut Balances) -> Vec<Transfer> {
    let mut debtors = balances.debtors();
    let mut creditors = balances.creditors();
    debtors.sort_by(|a, b| a.1.cmp(&b.1));
    creditors.sort_by(|a, b| a.1.cmp(&b.1));

    pair_off(
        balances,
        debtors.into_iter().map(|(p, _)| p),
        creditors.into_iter().map(|(p, _)| p).collect(),
    )
}

/// Pair debtors, in the given order, against a stack of creditors.
///
/// The last creditor in `creditors` is paid first. Each transfer is the
/// exact smaller side of the pair, so it clears the debtor, the creditor,
/// or both. Shared by the greedy strategy and every trial of the
/// randomized search.
pub(crate) fn pair_off(
    balances: &mut Balances,
    debtors: impl IntoIterator<Item = Participant>,
    mut creditors: Vec<Participant>,
) -> Vec<Transfer> {
    let mut transfers = Vec::new();

    for debtor in debtors {
        while balances.get(debtor) < Decimal::ZERO {
            let Some(creditor) = creditors.pop() else {
                let owed = -balances.get(debtor);
                if owed > EPSILON {
                    warn!("no creditor left for {} owing {}", debtor, owed);
                } else {
                    debug!("greedy: {} keeps rounding residue {}", debtor, owed);
                }
                break;
            };

            let owed = -balances.get(debtor);
            let credit = balances.get(creditor);
            let amount = if owed >= credit {
                credit
            } else {
                creditors.push(creditor);
                owed
            };

            if amount > Decimal::ZERO {
                let transfer = Transfer::new(debtor, creditor, amount);
                debug!("greedy: {}", transfer);
                balances.apply_transfer(&transfer);
                transfers.push(transfer);
            }
        }
    }

    transfers
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn p(code: &str) -> Participant {
        Participant::parse(code).unwrap()
    }

    fn balances(entries: &[(&str, Decimal)]) -> Balances {
        entries.iter().map(|(code, v)| (p(code), *v)).collect()
    }

    #[test]
    fn test_reference_scenario() {
        let mut b = balances(&[("D", dec!(15)), ("H", dec!(-10)), ("K", dec!(-5))]);
        let transfers = settle(&mut b);

        assert_eq!(
            transfers,
            vec![
                Transfer::new(p("H"), p("D"), dec!(10)),
                Transfer::new(p("K"), p("D"), dec!(5)),
            ]
        );
        assert!(b.is_settled());
    }

    #[test]
    fn test_largest_creditor_paid_first() {
        let mut b = balances(&[
            ("A", dec!(30)),
            ("B", dec!(10)),
            ("C", dec!(-25)),
            ("D", dec!(-15)),
        ]);
        let transfers = settle(&mut b);

        assert_eq!(
            transfers,
            vec![
                Transfer::new(p("C"), p("A"), dec!(25)),
                Transfer::new(p("D"), p("A"), dec!(5)),
                Transfer::new(p("D"), p("B"), dec!(10)),
            ]
        );
        assert!(b.is_settled());
    }

    #[test]
    fn test_debtor_spans_creditors() {
        let mut b = balances(&[("A", dec!(4)), ("B", dec!(6)), ("C", dec!(-10))]);
        let transfers = settle(&mut b);

        assert_eq!(
            transfers,
            vec![
                Transfer::new(p("C"), p("B"), dec!(6)),
                Transfer::new(p("C"), p("A"), dec!(4)),
            ]
        );
        assert!(b.is_settled());
    }

    #[test]
    fn test_transfer_count_bounded() {
        let mut b = balances(&[
            ("A", dec!(12.5)),
            ("B", dec!(7.25)),
            ("C", dec!(-3)),
            ("D", dec!(-9.75)),
            ("E", dec!(-7)),
        ]);
        let n = b.len();
        let transfers = settle(&mut b);
        assert!(transfers.len() < n);
        assert!(b.is_settled());
    }

    #[test]
    fn test_sub_cent_balances_are_settled() {
        // Two tiny creditors together exceed the tolerance.
        let mut b = balances(&[
            ("A", dec!(0.000009)),
            ("B", dec!(0.000009)),
            ("Z", dec!(-0.000018)),
        ]);
        let transfers = settle(&mut b);

        assert_eq!(
            transfers,
            vec![
                Transfer::new(p("Z"), p("B"), dec!(0.000009)),
                Transfer::new(p("Z"), p("A"), dec!(0.000009)),
            ]
        );
        assert!(b.is_settled());
    }

    #[test]
    fn test_sub_cent_debtors_are_settled() {
        let mut b = balances(&[
            ("A", dec!(-0.000009)),
            ("B", dec!(-0.000009)),
            ("Z", dec!(0.000018)),
        ]);
        let transfers = settle(&mut b);

        assert_eq!(transfers.len(), 2);
        assert!(b.is_settled());
    }

    #[test]
    fn test_settled_ledger_needs_nothing() {
        let mut b = balances(&[("A", Decimal::ZERO), ("B", dec!(0.000001))]);
        assert!(settle(&mut b).is_empty());
    }

    #[test]
    fn test_empty() {
        let mut b = Balances::new();
        assert!(settle(&mut b).is_empty());
    }
}
