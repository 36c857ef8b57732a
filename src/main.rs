use anyhow::Result;

use seat_race_rating::cli::Command;
use seat_race_rating::{handle_rankings, handle_recalculate, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
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
        Command::Serve { port } => handle_serve(*port),
        Command::Recalculate {
            team_id,
            rating_type,
        } => handle_recalculate(*team_id, rating_type),
        Command::Rankings {
            team_id,
            rating_type,
            min_races,
        } => handle_rankings(*team_id, rating_type, *min_races),
    }
}
