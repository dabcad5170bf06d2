//! Simulate a lighting design and report PPFD, uniformity, DLI and climate
//!
//! Usage:
//! ```
//! cargo run --release --bin ppfd_map -- --design room.json --csv ppfd.csv
//! ```

use canopy_sim::optimizer::constraints::OptimizationConstraints;
use canopy_sim::physics::{evaluate_acceptance, photoperiod_for_dli, ClimateAssessment};
use canopy_sim::shared_args::SharedSimulationArgs;
use canopy_sim::{daily_light_integral, simulate_room, IrradianceField, SimulationReport};
use clap::Parser;
use log::info;
use shared::units::{PressureExt, RatioExt};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compute the PPFD map of a lighting design")]
struct Args {
    #[command(flatten)]
    shared: SharedSimulationArgs,

    /// Write every sample as x,y,ppfd to this CSV file
    #[arg(long)]
    csv: Option<String>,
}

fn write_csv(field: &IrradianceField, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "x,y,ppfd")?;
    for (x, y, ppfd) in field.samples() {
        writeln!(file, "{:.4},{:.4},{:.3}", x, y, ppfd.value())?;
    }
    file.flush()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();
    let (design, config) = args.shared.load()?;
    info!(
        "Loaded design '{}' with {} fixtures",
        design.name,
        design.fixtures.len()
    );

    let report = simulate_room(&design.room, &design.fixtures, &config)?;
    let stats = &report.statistics;
    let (rows, cols) = report.field.shape();

    println!("Design: {}", design.name);
    println!(
        "Room: {} x {} x {}, {} fixtures",
        design.room.width,
        design.room.length,
        design.room.height,
        design.fixtures.len()
    );
    println!(
        "Grid: {} x {} samples at {} spacing, working height {}",
        cols, rows, config.report_resolution, config.working_height
    );
    println!();
    println!("Average PPFD:  {:.1}", stats.average);
    println!("Min / Max:     {:.1} / {:.1}", stats.min.value(), stats.max.value());
    println!("Std dev:       {:.1}", stats.std_dev.value());
    println!(
        "Min/avg:       {:.3} ({})",
        stats.uniformity.min_avg.as_fraction(),
        report.uniformity_rating
    );
    println!("Avg/max:       {:.3}", stats.uniformity.avg_max.as_fraction());
    println!("Min/max:       {:.3}", stats.uniformity.min_max.as_fraction());
    println!("CV:            {:.1} % ({})", stats.uniformity.cv_pct, report.cv_rating);
    println!("Power density: {:.1}", report.power_density);

    let dli = daily_light_integral(stats.average, design.photoperiod_hours)?;
    println!();
    println!("DLI at {} h:   {:.1}", design.photoperiod_hours, dli);

    let climate = match &design.climate {
        Some(reading) => {
            let assessment = reading.assess(&config.climate_targets)?;
            println!(
                "VPD:           {:.2} kPa ({:?})",
                assessment.state.vpd.as_kilopascals(),
                assessment.vpd_status
            );
            println!(
                "Humidity def.: {:.1} ({:?})",
                assessment.state.humidity_deficit, assessment.humidity_deficit_status
            );
            Some(assessment)
        }
        None => None,
    };

    if let Some(constraints) = &design.constraints {
        print_acceptance(constraints, &report, design.photoperiod_hours, climate.as_ref())?;
    }

    if let Some(path) = &args.csv {
        write_csv(&report.field, Path::new(path))?;
        println!();
        println!("Wrote {} samples to {}", report.field.len(), path);
    }

    Ok(())
}

fn print_acceptance(
    constraints: &OptimizationConstraints,
    report: &SimulationReport,
    photoperiod_hours: f64,
    climate: Option<&ClimateAssessment>,
) -> Result<(), Box<dyn std::error::Error>> {
    let acceptance = evaluate_acceptance(
        &report.statistics,
        report.power_density,
        constraints,
        photoperiod_hours,
        climate,
    )?;

    println!();
    println!(
        "Acceptance: {}",
        if acceptance.accepted { "PASS" } else { "FAIL" }
    );
    for check in &acceptance.checks {
        let mark = if check.passed { "ok  " } else { "FAIL" };
        println!("  [{}] {:<14} {}", mark, check.name, check.detail);
    }

    if let Some(target) = constraints.target_dli {
        match photoperiod_for_dli(report.statistics.average, target) {
            Some(hours) => println!("  {:.1} h of light reaches the DLI target of {:.1}", hours, target),
            None => println!("  DLI target of {:.1} is out of reach within 24 h", target),
        }
    }
    Ok(())
}
