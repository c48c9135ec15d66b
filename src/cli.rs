use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::bracket::Side;

#[derive(Parser, Debug)]
#[command(author, version, about = "power ratings nudged toward market closing lines")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Replay the game feed into ratings and publish snapshot and database
    Process {
        /// Keep history before this date and replay from it (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Home-court advantage in points
        #[arg(long)]
        hca: Option<f64>,
        /// Fraction of the market discrepancy absorbed per game
        #[arg(long)]
        learning_rate: Option<f64>,
        /// Only resolve team names by override or exact match
        #[arg(long)]
        strict_names: bool,
    },
    /// Project the spread between two rated teams
    Project {
        home: String,
        away: String,
        /// Play on a neutral floor
        #[arg(long)]
        neutral: bool,
    },
    /// Build and project a tournament bracket from the seeding file
    Bracket {
        /// Template id, see `templates`
        template: String,
        /// Manual pick as MATCHUP=top|bottom, applied in order
        #[arg(long = "pick", value_parser = parse_pick)]
        picks: Vec<(String, Side)>,
        /// Print title odds for every team
        #[arg(long)]
        odds: bool,
    },
    /// List available bracket templates
    Templates,
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

fn parse_pick(value: &str) -> Result<(String, Side), String> {
    let (matchup, side) = value
        .split_once('=')
        .ok_or_else(|| format!("expected MATCHUP=top|bottom, got '{value}'"))?;
    if matchup.is_empty() {
        return Err(format!("missing matchup id in '{value}'"));
    }
    Ok((matchup.to_string(), side.parse()?))
}
