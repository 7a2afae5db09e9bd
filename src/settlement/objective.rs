//! Scoring functions for candidate settlements.
//!
//! The randomized search samples many transfer lists and keeps the one
//! with the lowest score. An [`Objective`] defines that score.

use crate::core::participant::Participant;
use crate::core::transfer::Transfer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// The scoring capability an objective depends on is missing.
///
/// Recoverable: the planner falls back to the greedy strategy and
/// reports this as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("objective '{objective}' is unavailable: {reason}")]
pub struct CapabilityUnavailable {
    pub objective: String,
    pub reason: String,
}

/// Scores a candidate transfer list. Lower is better.
pub trait Objective {
    /// Short name used in logs and warnings.
    fn name(&self) -> &str;

    /// Check, before any trial runs, that this objective can score.
    fn check_available(&self) -> Result<(), CapabilityUnavailable> {
        Ok(())
    }

    fn score(&self, transfers: &[Transfer]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[Transfer]) -> f64,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn score(&self, transfers: &[Transfer]) -> f64 {
        self(transfers)
    }
}

/// Number of transfers each paying participant has to send.
pub fn payments_per_sender(transfers: &[Transfer]) -> BTreeMap<Participant, usize> {
    let mut counts = BTreeMap::new();
    for transfer in transfers {
        *counts.entry(transfer.from()).or_insert(0) += 1;
    }
    counts
}

/// Variance of the per-debtor payment count.
///
/// Rewards settlements where every debtor makes roughly the same number of
/// payments, rather than one debtor paying everybody. The population
/// variance is used, so a single debtor scores zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaymentCountVariance;

impl Objective for PaymentCountVariance {
    fn name(&self) -> &str {
        "payment-count-variance"
    }

    #[cfg(feature = "variance-objective")]
    fn check_available(&self) -> Result<(), CapabilityUnavailable> {
        Ok(())
    }

    #[cfg(not(feature = "variance-objective"))]
    fn check_available(&self) -> Result<(), CapabilityUnavailable> {
        Err(CapabilityUnavailable {
            objective: self.name().to_string(),
            reason: "built without the `variance-objective` feature".to_string(),
        })
    }

    #[cfg(feature = "variance-objective")]
    fn score(&self, transfers: &[Transfer]) -> f64 {
        let counts: Vec<f64> = payments_per_sender(transfers)
            .values()
            .map(|&c| c as f64)
            .collect();
        variance(&counts)
    }

    #[cfg(not(feature = "variance-objective"))]
    fn score(&self, _transfers: &[Transfer]) -> f64 {
        f64::INFINITY
    }
}

#[cfg(feature = "variance-objective")]
fn variance(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n
}
