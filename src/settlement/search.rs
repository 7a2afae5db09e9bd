//! Randomized settlement search.
//!
//! Runs the greedy pairing many times with shuffled debtor and creditor
//! orders and keeps the candidate with the lowest objective score.

use crate::core::balances::Balances;
use crate::core::participant::Participant;
use crate::core::transfer::Transfer;
use crate::settlement::greedy::pair_off;
use crate::settlement::objective::Objective;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for the randomized search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of candidate settlements to sample. Zero is treated as one.
    pub trials: usize,
    /// Seed used by [`SettlementPlanner::plan`] to build its random
    /// source; `None` draws one from the OS. [`search`] itself ignores it
    /// and uses the random source it is given.
    ///
    /// [`SettlementPlanner::plan`]: crate::settlement::planner::SettlementPlanner::plan
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            trials: 1000,
            seed: None,
        }
    }
}

/// Best candidate found by [`search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub transfers: Vec<Transfer>,
    pub balances: Balances,
    pub score: f64,
    /// Zero-based index of the winning trial.
    pub trial: usize,
}

/// Sample `config.trials` shuffled greedy settlements and keep the best.
///
/// Every trial works on its own copy of `balances`. Scores are ordered by
/// [`f64::total_cmp`], so a `NaN` score loses to any number. Ties keep the
/// earliest trial.
pub fn search<R: Rng + ?Sized>(
    balances: &Balances,
    config: &SearchConfig,
    objective: &dyn Objective,
    rng: &mut R,
) -> SearchOutcome {
    let debtors: Vec<Participant> = balances.debtors().into_iter().map(|(p, _)| p).collect();
    let creditors: Vec<Participant> = balances.creditors().into_iter().map(|(p, _)| p).collect();

    let mut best: Option<SearchOutcome> = None;
    for trial in 0..config.trials.max(1) {
        let mut debtor_order = debtors.clone();
        let mut creditor_order = creditors.clone();
        debtor_order.shuffle(rng);
        creditor_order.shuffle(rng);

        let mut working = balances.clone();
        let transfers = pair_off(&mut working, debtor_order, creditor_order);
        let score = objective.score(&transfers);

        let improves = best
            .as_ref()
            .map_or(true, |b| score.total_cmp(&b.score).is_lt());
        if improves {
            debug!(
                "search: trial {} scores {} with {} transfer(s)",
                trial,
                score,
                transfers.len()
            );
            best = Some(SearchOutcome {
                transfers,
                balances: working,
                score,
                trial,
            });
        }
    }

    // The loop runs at least once.
    best.unwrap_or_else(|| SearchOutcome {
        transfers: Vec::new(),
        balances: balances.clone(),
        score: 0.0,
        trial: 0,
    })
}
