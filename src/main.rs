use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

mod db;
mod models;
mod report;
mod season;
mod stats;

use season::Season;

#[derive(Parser)]
#[command(name = "season-leaderboard")]
#[command(about = "Seasonal running leaderboard and radar statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo runners, goals, and runs for the current year
    Seed,
    /// Import runs from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Print the season leaderboard
    Stats {
        /// Season to score; defaults to the season containing today
        #[arg(long, value_enum)]
        season: Option<Season>,
        /// Calendar year; defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Emit the full overview (including the radar payload) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long, value_enum)]
        season: Option<Season>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn resolve_season_year(season: Option<Season>, year: Option<i32>) -> (Season, i32) {
    let today = Utc::now().date_naive();
    (
        season.unwrap_or_else(|| Season::current(today)),
        year.unwrap_or_else(|| today.year()),
    )
}

async fn compute_overview(
    pool: &PgPool,
    season: Season,
    year: i32,
) -> anyhow::Result<models::SeasonOverview> {
    let range = season::season_range(season, year)?;
    let cohort = db::fetch_cohort(pool, range.start.date(), range.end.date()).await?;
    stats::season_stats(season, year, &cohort)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let database_url = std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a Postgres instance")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("failed to connect to Postgres")?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(&pool).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_csv(&pool, &csv).await?;
            println!("Inserted {inserted} runs from {}.", csv.display());
        }
        Commands::Stats {
            season,
            year,
            limit,
            json,
        } => {
            let (season, year) = resolve_season_year(season, year);
            let overview = compute_overview(&pool, season, year).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
                return Ok(());
            }

            if overview.players.is_empty() {
                println!("No runners found for {} {}.", season.label(), year);
                return Ok(());
            }

            println!("{} {} leaderboard:", season.label(), year);
            for player in overview.players.iter().take(limit) {
                println!(
                    "- #{} {} {:.2}/{:.2} km ({:.2}%), longest streak {} days",
                    player.rank,
                    player.name,
                    player.total_km,
                    player.target_km,
                    player.completion_percentage,
                    player.longest_streak_days
                );
            }
        }
        Commands::Report { season, year, out } => {
            let (season, year) = resolve_season_year(season, year);
            let overview = compute_overview(&pool, season, year).await?;
            let report = report::build_report(&overview);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
