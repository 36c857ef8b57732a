pub mod analysis;
pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::domain::RatingType;
use crate::services::recalculation::RecalculationService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_recalculate(team_id: i64, rating_type: &str) -> Result<()> {
    let rating_type = parse_rating_type(rating_type)?;
    let mut conn = open_database()?;

    let service = RecalculationService::new(AppConfig::new());
    let summary = service.run(&mut conn, team_id, rating_type)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub fn handle_rankings(team_id: i64, rating_type: &str, min_races: i64) -> Result<()> {
    let rating_type = parse_rating_type(rating_type)?;
    let conn = open_database()?;

    let rankings = rating::get_team_rankings(&conn, team_id, rating_type, min_races)?;
    for entry in &rankings {
        println!(
            "{:>3}. {:<24} {:>8.1}  ({} races, confidence {:.1})",
            entry.rank,
            entry.athlete_name,
            entry.rating_value,
            entry.races_count,
            entry.confidence_score
        );
    }
    Ok(())
}

fn parse_rating_type(raw: &str) -> Result<RatingType> {
    RatingType::parse(raw).ok_or_else(|| anyhow::anyhow!("Unknown rating type: {}", raw))
}

fn open_database() -> Result<database::DbConn> {
    let db_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "seat_race_rating.db".to_string());
    let pool = database::create_pool(&db_path)?;
    database::get_connection(&pool)
}
