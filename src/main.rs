//! household-ledger CLI
//!
//! Settle a shared-expense ledger from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Balances and greedy settlement
//! household-ledger settle --input flat.csv
//!
//! # Every participant pays at most once, as JSON
//! household-ledger settle --input flat.csv --strategy fair --format json
//!
//! # Randomized search, reproducible
//! household-ledger settle --input flat.csv --strategy random --trials 500 --seed 7
//!
//! # Generate a random ledger for testing
//! household-ledger generate --participants 6 --records 40
//! ```

use household_ledger::input::source::{parse_source, render_source};
use household_ledger::ledger::builder::LedgerBuilder;
use household_ledger::report::LedgerReport;
use household_ledger::settlement::planner::{SettlementPlanner, Strategy, StrategyKind};
use household_ledger::settlement::search::SearchConfig;
use household_ledger::simulation::random_ledger::{generate_random_ledger, GeneratorConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"household-ledger — shared-expense balances and settlement

USAGE:
    household-ledger <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute balances and settlement transfers for a ledger file
    generate    Generate a random ledger (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>        Ledger file: one "payer, amount, beneficiaries[, comment]" per line
    --strategy <NAME>     greedy (default), fair or random
    --trials <N>          Trials for the random strategy (default: 1000)
    --seed <N>            Seed for the random strategy
    --format <FORMAT>     Output format: text (default) or json

OPTIONS (generate):
    --participants <N>    Number of participants, 1-26 (default: 5)
    --records <N>         Number of records (default: 30)
    --seed <N>            Seed for reproducible output
    --output <FILE>       Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG              Log level, e.g. RUST_LOG=debug

EXAMPLES:
    household-ledger settle --input flat.csv
    household-ledger settle --input flat.csv --strategy fair --format json
    household-ledger settle --input flat.csv --strategy random --trials 500 --seed 7
    household-ledger generate --participants 6 --records 40 --output test.csv"#
    );
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", flag, what);
        process::exit(1);
    })
}

fn parse_number<T: std::str::FromStr>(value: &str, flag: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        eprintln!("{} requires a number, got '{}'", flag, value);
        process::exit(1);
    })
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut kind = StrategyKind::Greedy;
    let mut config = SearchConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(required_value(args, i, "--input", "a file path"));
            }
            "--strategy" => {
                i += 1;
                let name = required_value(args, i, "--strategy", "greedy, fair or random");
                kind = name.parse().unwrap_or_else(|e| {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                });
            }
            "--trials" => {
                i += 1;
                config.trials = parse_number(&required_value(args, i, "--trials", "a number"), "--trials");
            }
            "--seed" => {
                i += 1;
                config.seed = Some(parse_number(&required_value(args, i, "--seed", "a number"), "--seed"));
            }
            "--format" => {
                i += 1;
                format = required_value(args, i, "--format", "'text' or 'json'");
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let content = fs::read_to_string(&path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let lines = parse_source(&content).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let summary = LedgerBuilder::fold(&lines).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });

    let strategy = match kind {
        StrategyKind::Greedy => Strategy::Greedy,
        StrategyKind::FairAll => Strategy::FairAll,
        StrategyKind::RandomizedSearch => Strategy::randomized(config),
    };
    let plan = SettlementPlanner::new(strategy).plan(summary.balances());
    let report = LedgerReport::new(&summary, &plan);

    if format == "json" {
        match serde_json::to_string_pretty(&report.to_output()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing report: {}", e);
                process::exit(1);
            }
        }
    } else {
        print!("{}", report);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GeneratorConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = parse_number(
                    &required_value(args, i, "--participants", "a number"),
                    "--participants",
                );
            }
            "--records" => {
                i += 1;
                config.record_count =
                    parse_number(&required_value(args, i, "--records", "a number"), "--records");
            }
            "--seed" => {
                i += 1;
                config.seed = Some(parse_number(&required_value(args, i, "--seed", "a number"), "--seed"));
            }
            "--output" => {
                i += 1;
                output_path = Some(required_value(args, i, "--output", "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let records = generate_random_ledger(&config);
    let text = format!(
        "# payer, amount, beneficiaries\n{}",
        render_source(&records)
    );

    if let Some(path) = output_path {
        fs::write(&path, &text).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} records across {} participants → {}",
            records.len(),
            config.participant_count.clamp(1, 26),
            path
        );
    } else {
        print!("{}", text);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
