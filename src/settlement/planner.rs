use crate::core::balances::Balances;
use crate::core::transfer::Transfer;
use crate::settlement::objective::{CapabilityUnavailable, Objective, PaymentCountVariance};
use crate::settlement::search::{self, SearchConfig};
use crate::settlement::{fair, greedy};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which settlement algorithm produced a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Greedy,
    FairAll,
    RandomizedSearch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}', expected greedy, fair or random")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(StrategyKind::Greedy),
            "fair" | "fair-all" | "fair_all" => Ok(StrategyKind::FairAll),
            "random" | "randomized" | "randomized-search" => Ok(StrategyKind::RandomizedSearch),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Greedy => "greedy",
            StrategyKind::FairAll => "fair",
            StrategyKind::RandomizedSearch => "random",
        };
        write!(f, "{}", name)
    }
}

/// A settlement strategy together with its configuration.
#[derive(Default)]
pub enum Strategy {
    /// Match the largest debts against the largest credits.
    #[default]
    Greedy,
    /// Every participant pays at most once.
    FairAll,
    /// Shuffled greedy pairings, scored by `objective`, best of `config.trials`.
    RandomizedSearch {
        config: SearchConfig,
        objective: Box<dyn Objective>,
    },
}

impl Strategy {
    /// Randomized search scored by payment-count variance.
    pub fn randomized(config: SearchConfig) -> Self {
        Strategy::RandomizedSearch {
            config,
            objective: Box::new(PaymentCountVariance),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Greedy => StrategyKind::Greedy,
            Strategy::FairAll => StrategyKind::FairAll,
            Strategy::RandomizedSearch { .. } => StrategyKind::RandomizedSearch,
        }
    }
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Greedy => f.write_str("Greedy"),
            Strategy::FairAll => f.write_str("FairAll"),
            Strategy::RandomizedSearch { config, objective } => f
                .debug_struct("RandomizedSearch")
                .field("config", config)
                .field("objective", &objective.name())
                .finish(),
        }
    }
}

/// Transfers that settle a ledger, and how they were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Strategy that actually produced the transfers.
    strategy: StrategyKind,
    /// Transfers in the order they should be applied.
    transfers: Vec<Transfer>,
    /// Balances after applying every transfer.
    remaining: Balances,
    /// Why the requested strategy was replaced by greedy, if it was.
    fallback: Option<CapabilityUnavailable>,
}

impl SettlementPlan {
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn remaining(&self) -> &Balances {
        &self.remaining
    }

    pub fn fallback(&self) -> Option<&CapabilityUnavailable> {
        self.fallback.as_ref()
    }

    /// Verify the plan settles every balance.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_settled()
    }

    /// Sum of all transfer amounts.
    pub fn total_transferred(&self) -> rust_decimal::Decimal {
        self.transfers.iter().map(|t| t.amount()).sum()
    }
}

/// Turns final balances into a list of transfers.
///
/// The planner never mutates the caller's balances: every call works on a
/// private copy, so the pre-settlement balances remain available for
/// reporting.
#[derive(Debug, Default)]
pub struct SettlementPlanner {
    strategy: Strategy,
}

impl SettlementPlanner {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Plan a settlement.
    ///
    /// The randomized search seeds its random source from
    /// [`SearchConfig::seed`] when set, and from the OS otherwise.
    pub fn plan(&self, balances: &Balances) -> SettlementPlan {
        let mut rng = match &self.strategy {
            Strategy::RandomizedSearch { config, .. } => match config.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            },
            _ => StdRng::seed_from_u64(0),
        };
        self.plan_with_rng(balances, &mut rng)
    }

    /// Plan a settlement using the given random source.
    pub fn plan_with_rng<R: Rng + ?Sized>(&self, balances: &Balances, rng: &mut R) -> SettlementPlan {
        let mut working = balances.clone();

        let plan = match &self.strategy {
            Strategy::Greedy => SettlementPlan {
                strategy: StrategyKind::Greedy,
                transfers: greedy::settle(&mut working),
                remaining: working,
                fallback: None,
            },
            Strategy::FairAll => SettlementPlan {
                strategy: StrategyKind::FairAll,
                transfers: fair::settle(&mut working),
                remaining: working,
                fallback: None,
            },
            Strategy::RandomizedSearch { config, objective } => {
                match objective.check_available() {
                    Ok(()) => {
                        let outcome = search::search(balances, config, objective.as_ref(), rng);
                        info!(
                            "randomized search: best of {} trial(s) is #{} scoring {}",
                            config.trials.max(1),
                            outcome.trial,
                            outcome.score
                        );
                        SettlementPlan {
                            strategy: StrategyKind::RandomizedSearch,
                            transfers: outcome.transfers,
                            remaining: outcome.balances,
                            fallback: None,
                        }
                    }
                    Err(unavailable) => {
                        warn!("{}; falling back to greedy settlement", unavailable);
                        SettlementPlan {
                            strategy: StrategyKind::Greedy,
                            transfers: greedy::settle(&mut working),
                            remaining: working,
                            fallback: Some(unavailable),
                        }
                    }
                }
            }
        };

        info!(
            "{} settlement: {} transfer(s)",
            plan.strategy,
            plan.transfers.len()
        );
        debug_assert!(plan.remaining.is_balanced());
        plan
    }
}
