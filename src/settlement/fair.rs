use crate::core::balances::Balances;
use crate::core::participant::Participant;
use crate::core::transfer::Transfer;
use log::debug;
use rust_decimal::Decimal;

/// Settle so that every participant makes at most one payment.
///
/// Each round, the participant with the most negative balance pays their
/// entire debt to the participant with the most positive balance, then
/// leaves the round. The receiver may be overpaid; the surplus stays on
/// their running balance and they pay it on in a later round. The last
/// participant standing is settled by the zero-sum invariant.
///
/// Participants with a zero balance leave without a transfer. Any debt,
/// however small, is paid, so sub-cent debts cannot accumulate on the
/// last participant.
pub fn settle(balances: &mut Balances) -> Vec<Transfer> {
    let mut remaining: Vec<Participant> = balances.participants().collect();
    let mut transfers = Vec::new();

    while remaining.len() > 1 {
        remaining.sort_by(|a, b| balances.get(*a).cmp(&balances.get(*b)));
        let payer = remaining.remove(0);
        let Some(&receiver) = remaining.last() else {
            break;
        };

        let amount = -balances.get(payer);
        if amount > Decimal::ZERO {
            let transfer = Transfer::new(payer, receiver, amount);
            debug!("fair: {}", transfer);
            balances.apply_transfer(&transfer);
            transfers.push(transfer);
        }
    }

    transfers
}
