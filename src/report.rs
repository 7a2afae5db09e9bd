//! Plain-text and JSON renderings of a settled ledger.

use crate::ledger::builder::LedgerSummary;
use crate::settlement::planner::{SettlementPlan, StrategyKind};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// A ledger and its settlement plan, ready to render.
///
/// `Display` produces the plain-text report; [`LedgerReport::to_output`]
/// produces the JSON-serializable form.
pub struct LedgerReport<'a> {
    summary: &'a LedgerSummary,
    plan: &'a SettlementPlan,
}

impl<'a> LedgerReport<'a> {
    pub fn new(summary: &'a LedgerSummary, plan: &'a SettlementPlan) -> Self {
        Self { summary, plan }
    }

    pub fn to_output(&self) -> ReportOutput {
        ReportOutput {
            total_spent: self.summary.total_spent().to_string(),
            total_paid: self
                .summary
                .total_paid()
                .iter()
                .map(|(participant, amount)| AmountOutput {
                    participant: participant.to_string(),
                    amount: amount.to_string(),
                })
                .collect(),
            balances: self
                .summary
                .balances()
                .iter()
                .map(|(participant, amount)| AmountOutput {
                    participant: participant.to_string(),
                    amount: amount.to_string(),
                })
                .collect(),
            strategy: self.plan.strategy(),
            warning: self.plan.fallback().map(|f| f.to_string()),
            transfers: self
                .plan
                .transfers()
                .iter()
                .map(|t| TransferOutput {
                    from: t.from().to_string(),
                    to: t.to().to_string(),
                    amount: format!("{:.2}", t.amount()),
                })
                .collect(),
        }
    }
}

/// JSON output schema for a settled ledger.
#[derive(Debug, Serialize)]
pub struct ReportOutput {
    pub total_spent: String,
    pub total_paid: Vec<AmountOutput>,
    pub balances: Vec<AmountOutput>,
    pub strategy: StrategyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub transfers: Vec<TransferOutput>,
}

#[derive(Debug, Serialize)]
pub struct AmountOutput {
    pub participant: String,
    pub amount: String,
}

#[derive(Debug, Serialize)]
pub struct TransferOutput {
    pub from: String,
    pub to: String,
    pub amount: String,
}

fn write_table(f: &mut fmt::Formatter<'_>, title: &str, rows: &[(String, Decimal)]) -> fmt::Result {
    writeln!(f, "{}", title)?;
    let names: Vec<&str> = rows.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<String> = rows.iter().map(|(_, v)| format!("{:.2}", v)).collect();
    writeln!(f, "\t{}", names.join("\t"))?;
    writeln!(f, "\t{}", "========".repeat(names.len()))?;
    writeln!(f, "\t{}", values.join("\t"))
}

impl fmt::Display for LedgerReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let advances: Vec<(String, Decimal)> = self
            .summary
            .total_paid()
            .iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect();
        write_table(f, "Who advanced how much?", &advances)?;
        writeln!(f)?;
        writeln!(f, "Total spent: {:.2}", self.summary.total_spent())?;
        writeln!(f)?;

        let balances: Vec<(String, Decimal)> = self
            .summary
            .balances()
            .iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect();
        write_table(f, "Balances", &balances)?;
        writeln!(f)?;

        if let Some(fallback) = self.plan.fallback() {
            writeln!(f, "Warning: {}; used greedy settlement", fallback)?;
        }
        writeln!(f, "Settlement ({})", self.plan.strategy())?;
        if self.plan.transfers().is_empty() {
            writeln!(f, "\tNothing to settle.")?;
        }
        for transfer in self.plan.transfers() {
            writeln!(
                f,
                "\t{} to {}:\t{:.2}",
                transfer.from(),
                transfer.to(),
                transfer.amount()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::RawRecord;
    use crate::ledger::builder::LedgerBuilder;
    use crate::settlement::planner::SettlementPlanner;

    fn reference() -> (LedgerSummary, SettlementPlan) {
        let summary = LedgerBuilder::fold_records(&[
            RawRecord::new("D", "15.0", "KH"),
            RawRecord::new("K", "2.5 + 2.5", "KH"),
        ])
        .unwrap();
        let plan = SettlementPlanner::default().plan(summary.balances());
        (summary, plan)
    }

    #[test]
    fn test_text_report() {
        let (summary, plan) = reference();
        let text = LedgerReport::new(&summary, &plan).to_string();

        assert!(text.contains("Who advanced how much?\n\tD\tK\n"));
        assert!(text.contains("\t15.00\t5.00\n"));
        assert!(text.contains("Total spent: 20.00"));
        assert!(text.contains("\tD\tH\tK\n"));
        assert!(text.contains("\t15.00\t-10.00\t-5.00\n"));
        assert!(text.contains("Settlement (greedy)\n\tH to D:\t10.00\n\tK to D:\t5.00\n"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_json_output() {
        let (summary, plan) = reference();
        let output = LedgerReport::new(&summary, &plan).to_output();
        let json = serde_json::to_value(&output).unwrap();

        assert_eq!(json["strategy"], "greedy");
        assert_eq!(json["transfers"][0]["from"], "H");
        assert_eq!(json["transfers"][0]["to"], "D");
        assert_eq!(json["transfers"][0]["amount"], "10.00");
        assert_eq!(json["balances"].as_array().unwrap().len(), 3);
        assert!(json.get("warning").is_none());
    }
}
