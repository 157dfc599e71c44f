use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use dose_scheduler::output::{generate_report, save_results};
use dose_scheduler::{parse_instant, Config, Planner};

#[derive(Parser)]
#[command(name = "dose_scheduler")]
#[command(about = "Generate treatment dose schedules and today's medication agenda")]
struct Cli {
    /// Treatment plan file (JSON)
    #[arg(short, long)]
    config: PathBuf,
    
    /// Output directory
    #[arg(short, long)]
    output: PathBuf,
    
    /// Reference time, e.g. 2024-01-02T10:00 (defaults to the local clock)
    #[arg(short, long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,
    
    /// Also write a markdown report
    #[arg(short, long)]
    report: bool,
    
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_now(text: &str) -> Result<NaiveDateTime, String> {
    parse_instant(text).map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    
    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
    
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("loading treatment plan {:?}", cli.config))?;
    info!("Loaded {} treatments from {:?}", config.treatments.len(), cli.config);
    
    let planner = Planner::new(config);
    let result = planner.run(now).context("building schedules")?;
    
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {:?}", cli.output))?;
    
    save_results(&result, &cli.output)?;
    if cli.report {
        generate_report(&result, &cli.output)?;
    }
    info!("Results saved to {:?}", cli.output);
    
    Ok(())
}
