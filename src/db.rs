use std::collections::HashMap;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{GoalTargets, RunRecord, RunnerProfile};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

async fn upsert_runner(pool: &PgPool, name: &str, email: &str) -> anyhow::Result<Uuid> {
    let id: Uuid = sqlx::query(
        r#"
        INSERT INTO season_leaderboard.runners (id, name, email)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE
        SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await?
    .get("id");

    Ok(id)
}

async fn upsert_goal(
    pool: &PgPool,
    runner_id: Uuid,
    open_target: f64,
    closed_target: f64,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO season_leaderboard.goals
        (id, runner_id, open_season_target_km, closed_season_target_km)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (runner_id) DO UPDATE
        SET open_season_target_km = EXCLUDED.open_season_target_km,
            closed_season_target_km = EXCLUDED.closed_season_target_km
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(runner_id)
    .bind(open_target)
    .bind(closed_target)
    .execute(pool)
    .await?;

    Ok(())
}

async fn insert_run(
    pool: &PgPool,
    runner_id: Uuid,
    date: NaiveDate,
    distance_km: f64,
    source_key: &str,
) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO season_leaderboard.runs (id, runner_id, date, distance_km, source_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (source_key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(runner_id)
    .bind(date)
    .bind(distance_km)
    .bind(source_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Inserts two demo runners with goals for both seasons and a spread of
/// runs across the current year. Idempotent on re-run.
pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let year = Utc::now().year();

    let runner_a = upsert_runner(pool, "Runner One", "runner1@example.com").await?;
    let runner_b = upsert_runner(pool, "Runner Two", "runner2@example.com").await?;

    upsert_goal(pool, runner_a, 120.0, 160.0).await?;
    upsert_goal(pool, runner_b, 180.0, 140.0).await?;

    let open_dates = [(1, 6), (2, 12), (3, 9), (4, 20), (6, 1)];
    let closed_dates = [(7, 3), (8, 14), (9, 5), (10, 19), (12, 8)];

    for (index, (month, day)) in open_dates.into_iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")?;
        insert_run(
            pool,
            runner_a,
            date,
            6.0 + index as f64,
            &format!("seed-open-a-{index}"),
        )
        .await?;
        insert_run(
            pool,
            runner_b,
            date + chrono::Duration::days(2),
            5.0 + index as f64 * 1.5,
            &format!("seed-open-b-{index}"),
        )
        .await?;
    }

    for (index, (month, day)) in closed_dates.into_iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(year, month, day).context("invalid seed date")?;
        insert_run(
            pool,
            runner_a,
            date,
            7.0 + index as f64,
            &format!("seed-closed-a-{index}"),
        )
        .await?;
        insert_run(
            pool,
            runner_b,
            date + chrono::Duration::days(1),
            6.0 + index as f64 * 1.4,
            &format!("seed-closed-b-{index}"),
        )
        .await?;
    }

    Ok(())
}

/// Loads every runner with their goal and their runs restricted to
/// `[start, end]` inclusive. Runners without runs in the window still
/// appear, with an empty run list.
pub async fn fetch_cohort(
    pool: &PgPool,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<Vec<RunnerProfile>> {
    let runner_rows = sqlx::query(
        r#"
        SELECT r.id, r.name, g.open_season_target_km, g.closed_season_target_km
        FROM season_leaderboard.runners r
        LEFT JOIN season_leaderboard.goals g ON g.runner_id = r.id
        ORDER BY r.name, r.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut cohort = Vec::with_capacity(runner_rows.len());
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for row in runner_rows {
        let id: Uuid = row.get("id");
        let open_target: Option<f64> = row.get("open_season_target_km");
        let goal = open_target.map(|open| GoalTargets {
            open_season_target_km: open,
            closed_season_target_km: row.get("closed_season_target_km"),
        });

        index.insert(id, cohort.len());
        cohort.push(RunnerProfile {
            id,
            name: row.get("name"),
            goal,
            runs: Vec::new(),
        });
    }

    let run_rows = sqlx::query(
        r#"
        SELECT runner_id, date, distance_km
        FROM season_leaderboard.runs
        WHERE date BETWEEN $1 AND $2
        ORDER BY date
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    for row in run_rows {
        let runner_id: Uuid = row.get("runner_id");
        if let Some(&position) = index.get(&runner_id) {
            cohort[position].runs.push(RunRecord {
                date: row.get("date"),
                distance_km: row.get("distance_km"),
            });
        }
    }

    Ok(cohort)
}

/// Imports runs from a CSV with columns
/// `name,email,date,distance_km[,source_key]`, creating runners as needed.
/// Returns the number of newly inserted runs.
pub async fn import_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        name: String,
        email: String,
        date: NaiveDate,
        distance_km: f64,
        source_key: Option<String>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut inserted = 0usize;

    for result in reader.deserialize::<CsvRow>() {
        let row = result.context("malformed CSV row")?;
        if row.distance_km < 0.0 {
            anyhow::bail!("negative distance for {} on {}", row.email, row.date);
        }

        let runner_id = upsert_runner(pool, &row.name, &row.email).await?;
        let source_key = row
            .source_key
            .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

        if insert_run(pool, runner_id, row.date, row.distance_km, &source_key).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}
