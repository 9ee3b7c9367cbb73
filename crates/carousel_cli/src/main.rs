//! Carousel development harness
//!
//! Replays scripted interactions against the in-memory document to debug
//! and demo the widget. Not a published component; the widget itself only
//! targets a real DOM through the `Dom` trait.

use anyhow::Result;
use carousel_widget::DEFAULT_AUTOMOVE_MS;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod runner;
mod script;

use config::Scenario;
use runner::Runner;

#[derive(Parser)]
#[command(name = "carousel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Development harness: replay carousel scenarios", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario and print the carousel state after each step
    Run {
        /// Scenario file (TOML)
        scenario: PathBuf,

        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Print the final markup
        #[arg(long)]
        html: bool,
    },

    /// Parse and validate a scenario without running it
    Check {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },

    /// Run the built-in demo scenario
    Demo {
        /// Print JSON lines instead of text
        #[arg(long)]
        json: bool,

        /// Print the demo scenario instead of running it
        #[arg(long)]
        print: bool,
    },

    /// Show version and default settings
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            json,
            html,
        } => cmd_run(&scenario, json, html),

        Commands::Check { scenario } => cmd_check(&scenario),

        Commands::Demo { json, print } => cmd_demo(json, print),

        Commands::Info => cmd_info(),
    }
}

fn cmd_run(path: &Path, json: bool, html: bool) -> Result<()> {
    let scenario = Scenario::load(path)?;
    execute(scenario, json, html)
}

fn execute(scenario: Scenario, json: bool, html: bool) -> Result<()> {
    let mut runner = Runner::new(scenario)?;

    print_report(&runner.snapshot_report("init"), json)?;
    for report in runner.run()? {
        print_report(&report, json)?;
    }

    if html {
        println!("{}", runner.html());
    }
    Ok(())
}

fn print_report(report: &runner::StepReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        println!("{}", report.to_line());
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scenario = Scenario::load(path)?;
    let steps = scenario.steps()?;

    // Building the runner validates markup selectors and the container
    let runner = Runner::new(scenario.clone())?;

    info!(
        "Scenario {} is valid: {} slides, {} steps",
        scenario.name,
        runner.carousel().slide_count(),
        steps.len()
    );
    Ok(())
}

fn cmd_demo(json: bool, print: bool) -> Result<()> {
    if print {
        print!("{}", config::DEMO_SCENARIO.trim_start());
        return Ok(());
    }
    execute(Scenario::demo()?, json, false)
}

fn cmd_info() -> Result<()> {
    println!("Carousel");
    println!("========");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Step commands:");
    println!("  - next | prev");
    println!("  - goto N");
    println!("  - click MARKER   (prev, next, or a page index)");
    println!("  - tap-body");
    println!("  - key left|right");
    println!("  - hover | leave");
    println!("  - wait MS");
    println!("  - add N");
    println!("  - remove I...");
    println!();
    println!("Default automove interval: {}ms", DEFAULT_AUTOMOVE_MS);
    println!();

    println!("Default scenario settings:");
    println!("{}", Scenario::default().to_toml()?);

    Ok(())
}
