use anyhow::Result;

use power_ratings::cli::Command;
use power_ratings::{
    handle_bracket, handle_completions, handle_process, handle_project, handle_templates,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Process {
            from,
            hca,
            learning_rate,
            strict_names,
        } => handle_process(*from, *hca, *learning_rate, *strict_names),
        Command::Project {
            home,
            away,
            neutral,
        } => handle_project(home, away, *neutral),
        Command::Bracket {
            template,
            picks,
            odds,
        } => handle_bracket(template, picks, *odds),
        Command::Templates => handle_templates(),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
