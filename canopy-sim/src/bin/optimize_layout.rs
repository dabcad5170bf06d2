//! Search fixture spacings for a design and print improvement suggestions
//!
//! Usage:
//! ```
//! cargo run --release --bin optimize_layout -- --design room.json --target-ppfd 600
//! ```

use canopy_sim::optimizer::{optimize_lighting_design, OptimizationConstraints};
use canopy_sim::shared_args::SharedSimulationArgs;
use clap::Parser;
use log::{info, warn};
use shared::range_arg::RangeArg;
use shared::units::{Ppfd, RatioExt};
use std::fs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Optimize the fixture layout of a lighting design")]
struct Args {
    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Target PPFD; overrides the design's constraints with defaults around it
    #[arg(long)]
    target_ppfd: Option<f64>,

    /// Fixture spacing sweep (start:stop:step), overriding the config
    #[arg(long)]
    spacing_range: Option<RangeArg>,

    /// Write the full optimization result as JSON
    #[arg(long)]
    output: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();
    let (design, mut config) = args.shared.load()?;
    if let Some(sweep) = args.spacing_range {
        config.optimizer.spacing_sweep = sweep;
    }

    let constraints = match (args.target_ppfd, &design.constraints) {
        (Some(target), _) => OptimizationConstraints::for_target(Ppfd::new(target)),
        (None, Some(constraints)) => constraints.clone(),
        (None, None) => {
            warn!("Design has no constraints and no --target-ppfd given; using 400");
            OptimizationConstraints::for_target(Ppfd::new(400.0))
        }
    };
    info!(
        "Optimizing '{}' for {:.0} over spacings {}",
        design.name, constraints.target_ppfd, config.optimizer.spacing_sweep
    );

    let result = optimize_lighting_design(&design.room, &design.fixtures, &constraints, &config)?;

    println!("Candidates:");
    println!("  spacing  fixtures   avg PPFD  min/avg   score  status");
    for candidate in &result.candidates {
        let status = match candidate.rejection {
            Some(reason) => format!("rejected ({reason:?})"),
            None if candidate.spacing == result.spacing && !result.used_fallback => {
                "selected".to_string()
            }
            None => "ok".to_string(),
        };
        println!(
            "  {:>7.2}  {:>8}  {:>9.1}  {:>7.3}  {:>6.3}  {}",
            candidate.spacing,
            candidate.fixture_count,
            candidate.statistics.average.value(),
            candidate.statistics.uniformity.min_avg.as_fraction(),
            candidate.score,
            status
        );
    }

    println!();
    if result.used_fallback {
        println!(
            "No candidate met the acceptance rule; fallback spacing {:.2} used",
            result.spacing
        );
    }
    println!(
        "Recommended: {} fixtures at {:.2} spacing",
        result.layout.len(),
        result.spacing
    );
    println!(
        "  average {:.1}, min/avg {:.3}, CV {:.1} %, {:.1}",
        result.statistics.average,
        result.statistics.uniformity.min_avg.as_fraction(),
        result.statistics.uniformity.cv_pct,
        result.power_density
    );

    if !result.layout.is_empty() {
        let acceptance = design.acceptance(
            &result.statistics,
            result.power_density,
            &constraints,
            &config.climate_targets,
        )?;
        println!(
            "  DLI {:.1} at {} h, acceptance {}",
            acceptance.dli,
            design.photoperiod_hours,
            if acceptance.accepted { "PASS" } else { "FAIL" }
        );
        for check in acceptance.failures() {
            println!("    failed {}: {}", check.name, check.detail);
        }
    }

    println!();
    println!(
        "Current design: average {:.1}, min/avg {:.3}",
        result.baseline.average,
        result.baseline.uniformity.min_avg.as_fraction()
    );
    if result.suggestions.is_empty() {
        println!("No suggestions; the current design passes every check");
    }
    for suggestion in &result.suggestions {
        println!(
            "  [{:<6}] {:<10} {} (~{:.0} %)",
            suggestion.priority,
            suggestion.kind,
            suggestion.title,
            suggestion.estimated_improvement_pct
        );
        println!("           {}", suggestion.detail);
    }

    if let Some(path) = &args.output {
        fs::write(path, serde_json::to_string_pretty(&result)?)?;
        println!();
        println!("Wrote result to {path}");
    }

    Ok(())
}
