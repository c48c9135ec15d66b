pub mod bracket;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod exchange;
pub mod matching;
pub mod projection;
pub mod rating;
pub mod services;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use cli::Cli;

use crate::bracket::Side;
use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::services::bracket::{render_bracket, BracketService};
use crate::services::processing::ProcessingService;
use crate::services::projection::ProjectionService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_process(
    from: Option<NaiveDate>,
    hca: Option<f64>,
    learning_rate: Option<f64>,
    strict_names: bool,
) -> Result<()> {
    let mut config = AppConfig::new();
    if let Some(hca) = hca {
        config.rating.home_advantage = hca;
    }
    if let Some(rate) = learning_rate {
        config.rating.learning_rate = rate;
    }
    if strict_names {
        config.rating.fuzzy_name_matching = false;
    }

    let service = ProcessingService::new(config)?;
    let summary = service.run(from)?;
    println!(
        "Processed {} games, skipped {}, {} already applied",
        summary.processed, summary.skipped, summary.already_applied
    );
    Ok(())
}

pub fn handle_project(home: &str, away: &str, neutral: bool) -> Result<()> {
    let service = ProjectionService::new(AppConfig::new())?;
    let report = service.run(home, away, neutral)?;
    println!("{report}");
    Ok(())
}

pub fn handle_bracket(template: &str, picks: &[(String, Side)], odds: bool) -> Result<()> {
    let service = BracketService::new(AppConfig::new())?;
    let (bracket, template) = service.run(template, picks)?;
    print!("{}", render_bracket(&bracket, &template, odds));
    Ok(())
}

pub fn handle_templates() -> Result<()> {
    let service = BracketService::new(AppConfig::new())?;
    for template in service.registry()?.list() {
        println!(
            "{:<14} {:>3} teams  {:>3} games  {}",
            template.id,
            template.team_count,
            template.matchup_count(),
            template.name
        );
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}
