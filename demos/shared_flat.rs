//! Shared-flat settlement example.
//!
//! Folds a month of shared expenses and compares the three settlement
//! strategies on the same balances.

use household_ledger::input::source::parse_source;
use household_ledger::ledger::builder::LedgerBuilder;
use household_ledger::report::LedgerReport;
use household_ledger::settlement::planner::{SettlementPlanner, Strategy};
use household_ledger::settlement::search::SearchConfig;

const LEDGER: &str = "\
# payer, amount, beneficiaries[, comment]
D, 20.00, MK, cinema
D, 20.0 + 15.50, mK, groceries
K, 64.90, DKMH, electricity
H, -250, DH, rent from the subtenant
M, 12.40, MMH, bakery
";

fn main() {
    println!("━━━ Shared flat ━━━\n");

    let lines = parse_source(LEDGER).expect("ledger source is well formed");
    let summary = LedgerBuilder::fold(&lines).expect("ledger records are valid");

    let strategies = [
        Strategy::Greedy,
        Strategy::FairAll,
        Strategy::randomized(SearchConfig {
            trials: 1000,
            seed: Some(42),
        }),
    ];

    for strategy in strategies {
        let plan = SettlementPlanner::new(strategy).plan(summary.balances());
        println!("{}", LedgerReport::new(&summary, &plan));
        println!(
            "{} transfer(s), {:.2} moved in total\n",
            plan.transfers().len(),
            plan.total_transferred()
        );
    }
}
