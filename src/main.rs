//! punchkit CLI
//!
//! Generates needle-punch programs, prints job plans and estimates the run
//! time of existing listings.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use punchkit::{
    init_logging, CommandStatistics, JobConfig, ListingFormatter, PatternGenerator,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

#[derive(Parser)]
#[command(name = "punchkit", version, long_version = LONG_VERSION)]
#[command(about = "Needle-punch toolpath generator for rotary felting machines", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full punch program
    Generate {
        /// Job config (.toml or .json); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output listing; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the rotation plan and punch statistics without generating
    Plan {
        /// Job config (.toml or .json)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Estimate the run time of an existing listing
    Estimate {
        /// G-code listing to time
        listing: PathBuf,
        /// Job config providing the kinematic limits
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write a default job config
    InitConfig {
        /// Destination (.toml or .json)
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Generate { config, output } => generate(config.as_deref(), output.as_deref()),
        Commands::Plan { config } => plan(config.as_deref()),
        Commands::Estimate { listing, config } => estimate(&listing, config.as_deref()),
        Commands::InitConfig { path, force } => init_config(&path, force),
    }
}

fn load_job(path: Option<&Path>) -> Result<JobConfig> {
    match path {
        Some(path) => JobConfig::load_from_file(path)
            .with_context(|| format!("Failed to load job config {}", path.display())),
        None => {
            let job = JobConfig::default();
            job.validate().context("Built-in job config is invalid")?;
            Ok(job)
        }
    }
}

fn generate(config: Option<&Path>, output: Option<&Path>) -> Result<()> {
    let job = load_job(config)?;
    let generator = PatternGenerator::new(job.machine.clone(), job.generation.clone())
        .context("Cannot generate a pattern for these parameters")?;
    let commands = generator.generate()?;

    let stats = CommandStatistics::collect(&commands);
    info!(
        "Generated {} commands ({} punches, {} rotations)",
        stats.total_commands, stats.punch_sequences, stats.rotations
    );

    let formatter = ListingFormatter::new(job.machine, generator.statistics(), job.kinematics);
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            formatter.write_to(&commands, &mut BufWriter::new(file))?;
            info!("Wrote listing to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            formatter.write_to(&commands, &mut stdout.lock())?;
        }
    }

    Ok(())
}

fn plan(config: Option<&Path>) -> Result<()> {
    let job = load_job(config)?;
    let generator = PatternGenerator::new(job.machine.clone(), job.generation.clone())?;
    let plan = generator.plan();
    let layout = generator.layout();
    let stats = generator.statistics();

    let mut out = io::stdout().lock();
    writeln!(out, "Ideal revolutions:      {}", plan.ideal_revolutions)?;
    writeln!(out, "Main revolutions:       {}", plan.main_revolutions)?;
    writeln!(out, "Stitching revolutions:  {}", plan.extra_revolutions)?;
    writeln!(out, "Total revolutions:      {}", plan.total_revolutions)?;
    writeln!(out, "Calculated diameter:    {} mm", plan.calculated_outer_diameter)?;
    writeln!(out, "Density divisor:        {}", plan.density_divisor)?;
    writeln!(out, "Zones per crank:        {}", layout.zone_count)?;
    writeln!(out, "Punches per zone:       {}", layout.substeps_per_revolution)?;
    writeln!(out, "Sections:               {}", layout.section_count)?;
    writeln!(out, "Fabric length:          {:.0} mm", stats.total_fabric_length)?;
    writeln!(out, "Punch estimate:         {}", stats.total_punches)?;
    writeln!(out, "Max commands:           {}", generator.estimated_command_count())?;
    writeln!(out, "Random seed:            {}", stats.random_seed)?;
    Ok(())
}

fn estimate(listing: &Path, config: Option<&Path>) -> Result<()> {
    let job = load_job(config)?;
    let report = punchkit::timing::predict_listing_file(listing, &job.kinematics)
        .with_context(|| format!("Failed to time {}", listing.display()))?;

    if !report.has_cut_marker {
        info!(
            "No M{} marker in {}; reporting the whole listing as part 1",
            job.kinematics.cut_marker_code,
            listing.display()
        );
    }

    let mut out = io::stdout().lock();
    for (label, span) in [
        ("Part 1", report.part1),
        ("Part 2", report.part2),
        ("Total", report.total),
    ] {
        writeln!(out, "{} => {} ({})", label, span, span.whole_seconds())?;
    }
    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    JobConfig::default()
        .save_to_file(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default job config to {}", path.display());
    Ok(())
}
