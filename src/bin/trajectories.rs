//! Best-response trajectory runner.
//!
//! Usage:
//!   cargo run --release --bin trajectories -- [OPTIONS]
//!
//! Options:
//!   --steps <N>          Update steps per trajectory (default: 20)
//!   --depth <N>          Recursion horizon (default: 3)
//!   --p-bump <VALUE>     Rejection bump on the switch probability (default: 0.1)
//!   --offer <VALUE>      Starting offer (default: 50.0)
//!   --alpha <VALUE>      Starting alpha (default: 0.1)
//!   --output <FILE>      Output file (default: trajectories.json)

use std::env;
use std::fs::File;
use std::io::Write;
use std::process::ExitCode;
use std::time::Instant;

use bargain_solver::dynamics::{BargainConfig, BestResponseDynamics, Trajectory, UpdateRule};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut n_steps: u32 = 20;
    let mut depth: u32 = 3;
    let mut p_bump: f64 = 0.1;
    let mut offer0: f64 = 50.0;
    let mut alpha0: f64 = 0.1;
    let mut output_file = "trajectories.json".to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--steps" | "-n" => {
                i += 1;
                if i < args.len() {
                    n_steps = args[i].parse().unwrap_or(20);
                }
            }
            "--depth" | "-d" => {
                i += 1;
                if i < args.len() {
                    depth = args[i].parse().unwrap_or(3);
                }
            }
            "--p-bump" => {
                i += 1;
                if i < args.len() {
                    p_bump = args[i].parse().unwrap_or(0.1);
                }
            }
            "--offer" => {
                i += 1;
                if i < args.len() {
                    offer0 = args[i].parse().unwrap_or(50.0);
                }
            }
            "--alpha" => {
                i += 1;
                if i < args.len() {
                    alpha0 = args[i].parse().unwrap_or(0.1);
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

    let config = BargainConfig::default()
        .with_depth(depth)
        .with_p_bump(p_bump);

    println!("=================================================");
    println!("  Bargaining Best-Response Trajectories");
    println!("=================================================");
    println!("Depth: {}, p_switch: {}, p_bump: {}", depth, config.p_switch, p_bump);
    println!("Start: offer = {}, alpha = {}", offer0, alpha0);
    println!("Steps: {}\n", n_steps);

    let total_start = Instant::now();
    let mut trajectories: Vec<Trajectory> = Vec::new();

    for rule in UpdateRule::ALL {
        let dynamics = match BestResponseDynamics::new(config.clone(), rule) {
            Ok(d) => d,
            Err(e) => {
                eprintln!("invalid configuration: {}", e);
                return ExitCode::FAILURE;
            }
        };
        let trajectory = match dynamics.run(offer0, alpha0, n_steps) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("{}: {}", rule.name(), e);
                return ExitCode::FAILURE;
            }
        };

        let last = trajectory.last();
        let settled = trajectory
            .settled_at(1e-4)
            .map(|s| format!("settled at step {}", s))
            .unwrap_or_else(|| "no fixed point observed".to_string());
        println!(
            "{:<18} offer = {:>8.4}, alpha = {:>8.4}  ({}, {:.2}s)",
            rule.name(),
            last.offer,
            last.alpha,
            settled,
            trajectory.stats.elapsed_seconds
        );

        trajectories.push(trajectory);
    }

    println!("\nTotal time: {:.2}s", total_start.elapsed().as_secs_f64());

    match write_output(&output_file, &trajectories) {
        Ok(()) => {
            println!("Trajectories written to {}", output_file);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to write {}: {}", output_file, e);
            ExitCode::FAILURE
        }
    }
}

fn write_output(path: &str, trajectories: &[Trajectory]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(trajectories)?;
    let mut file = File::create(path)?;
    file.write_all(json.as_bytes())
}

fn print_help() {
    println!("Bargaining best-response trajectory runner");
    println!();
    println!("Runs the four alternating-update variants (myopic, reject-bump,");
    println!("level-k responder, level-k both) from a common starting point and");
    println!("writes the trajectories as JSON.");
    println!();
    println!("Options:");
    println!("  --steps <N>       Update steps per trajectory (default: 20)");
    println!("  --depth <N>       Recursion horizon (default: 3)");
    println!("  --p-bump <VALUE>  Rejection bump on switch probability (default: 0.1)");
    println!("  --offer <VALUE>   Starting offer (default: 50.0)");
    println!("  --alpha <VALUE>   Starting alpha (default: 0.1)");
    println!("  --output <FILE>   Output file (default: trajectories.json)");
}
