//! goalgrid CLI.
//!
//! Usage: goalgrid <COMMAND>
//!
//! Commands:
//!   month       Print one month of goals, week grids, and moods
//!   save-goals  Apply a save-goals request (JSON)
//!   save-mood   Record the mood of one day
//!   stats       Print per-day completion statistics

mod cli;
mod config;

use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use goalgrid_core::db::open_db;
use goalgrid_core::{
    init_logging, MonthService, SaveGoalsRequest, SaveMoodRequest, SqliteUnitOfWork,
};
use log::info;
use serde::Serialize;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::from_cli(&cli);
    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }

    let mut conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let mut service = MonthService::new(SqliteUnitOfWork::try_new(&mut conn)?);

    match cli.command {
        Commands::Month {
            username,
            year,
            month,
        } => print_json(&service.get_month_data(&username, year, month)?),
        Commands::SaveGoals { file } => {
            let request: SaveGoalsRequest = serde_json::from_str(&read_input(&file)?)
                .context("save-goals request is not valid JSON")?;
            let summary = service.save_goals(&request)?;
            info!(
                "event=cli_save_goals module=cli status=ok goals={} tasks={} completions={}",
                summary.goals.reconciled, summary.tasks.reconciled, summary.completions.reconciled
            );
            println!(
                "saved {} goal(s), {} task(s), {} day(s)",
                summary.goals.reconciled, summary.tasks.reconciled, summary.completions.reconciled
            );
            Ok(())
        }
        Commands::SaveMood {
            username,
            date,
            emoji,
        } => {
            let mood = service.save_mood(&SaveMoodRequest {
                username,
                date,
                emoji,
            })?;
            println!("saved mood for {}", mood.date);
            Ok(())
        }
        Commands::Stats {
            username,
            year,
            month,
        } => print_json(&service.daily_stats(&username, year, month)?),
        Commands::Insights {
            username,
            year,
            month,
        } => print_json(&service.month_insights(&username, year, month)?),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        return Ok(buffer);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
