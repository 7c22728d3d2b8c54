//! Round-robin strategy tournament runner.
//!
//! Usage:
//!   cargo run --release --bin tournament -- [OPTIONS]
//!
//! Options:
//!   --rounds <N>         Rounds per game (default: 100)
//!   --trials <N>         Trials per matchup (default: 50)
//!   --seed <N>           Base seed (default: 0)
//!   --p <VALUE>          Control-switch probability (default: 0.3)
//!   --p-bump <VALUE>     Switch-probability bump on rejection (default: 0.0)
//!   --output <FILE>      Output file (default: tournament.json)

use std::env;
use std::fs::File;
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};

use bargain_solver::game::{
    run_tournament_with, trial_count, MatchRecord, ProposerKind, ResponderKind, TournamentConfig,
};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut config = TournamentConfig::default();
    let mut output_file = "tournament.json".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rounds" | "-r" => {
                i += 1;
                if i < args.len() {
                    config.rounds_per_game = args[i].parse().unwrap_or(100);
                }
            }
            "--trials" | "-t" => {
                i += 1;
                if i < args.len() {
                    config.trials_per_match = args[i].parse().unwrap_or(50);
                }
            }
            "--seed" | "-s" => {
                i += 1;
                if i < args.len() {
                    config.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--p" => {
                i += 1;
                if i < args.len() {
                    config.game.p_switch = args[i].parse().unwrap_or(0.3);
                }
            }
            "--p-bump" => {
                i += 1;
                if i < args.len() {
                    config.game.p_reject_bump = args[i].parse().unwrap_or(0.0);
                }
            }
            "--output" | "-o" => {
                i += 1;
                if i < args.len() {
                    output_file = args[i].clone();
                }
            }
            "--help" | "-h" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                return ExitCode::FAILURE;
            }
        }
        i += 1;
    }

    let proposers = vec![
        ProposerKind::Conceding {
            start: 90.0,
            decrement: 5.0,
        },
        ProposerKind::RandomUniform,
        ProposerKind::TitForTat,
        ProposerKind::BinarySearch,
        ProposerKind::RiskAware,
        ProposerKind::ForwardLooking,
    ];
    let responders = vec![
        ResponderKind::Utilitarian,
        ResponderKind::TitForTat,
        ResponderKind::Probabilistic { alpha: 0.5 },
        ResponderKind::StrategicRejector,
    ];

    let total = trial_count(&proposers, &responders, &config);

    println!("=== Bargaining Strategy Tournament ===");
    println!(
        "{} proposers x {} responders per seat, {} trials each: {} games\n",
        proposers.len(),
        responders.len(),
        config.trials_per_match,
        total
    );

    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40} {pos}/{len} {per_sec}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let start = Instant::now();
    let records = match run_tournament_with(&proposers, &responders, &config, |_| bar.inc(1)) {
        Ok(records) => records,
        Err(e) => {
            bar.abandon();
            eprintln!("tournament failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    bar.finish();

    println!(
        "\n{} games in {:.2}s",
        records.len(),
        start.elapsed().as_secs_f64()
    );
    print_summary(&records);

    match write_output(&output_file, &records) {
        Ok(()) => {
            println!("Records written to {}", output_file);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to write {}: {}", output_file, e);
            ExitCode::FAILURE
        }
    }
}

/// Mean Player 1 utility per seat-1 strategy pair, highest first.
fn print_summary(records: &[MatchRecord]) {
    use std::collections::BTreeMap;

    let mut totals: BTreeMap<(String, String), (f64, u32)> = BTreeMap::new();
    for record in records {
        let key = (record.p1_proposer.clone(), record.p1_responder.clone());
        let entry = totals.entry(key).or_insert((0.0, 0));
        entry.0 += record.p1_utility;
        entry.1 += 1;
    }

    let mut rows: Vec<_> = totals
        .into_iter()
        .map(|((prop, resp), (sum, count))| (prop, resp, sum / count as f64))
        .collect();
    rows.sort_by(|a, b| b.2.total_cmp(&a.2));

    println!("\nMean utility by seat-1 strategy pair:");
    for (prop, resp, mean) in rows {
        println!("  {:<16} / {:<18} {:>10.2}", prop, resp, mean);
    }
}

fn write_output(path: &str, records: &[MatchRecord]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())
}

fn print_help() {
    println!("Bargaining strategy tournament runner");
    println!();
    println!("Options:");
    println!("  --rounds <N>      Rounds per game (default: 100)");
    println!("  --trials <N>      Trials per matchup (default: 50)");
    println!("  --seed <N>        Base seed (default: 0)");
    println!("  --p <VALUE>       Control-switch probability (default: 0.3)");
    println!("  --p-bump <VALUE>  Switch-probability bump on rejection (default: 0.0)");
    println!("  --output <FILE>   Output file (default: tournament.json)");
}
