use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use serde::Serialize;

use crate::models::SeasonRange;

/// The two fixed six-month competition windows of a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// January 1 through June 30, inclusive.
    Open,
    /// July 1 through December 31, inclusive.
    Closed,
}

impl Season {
    pub fn current(reference: NaiveDate) -> Self {
        if reference.month() <= 6 {
            Season::Open
        } else {
            Season::Closed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Open => "Open Season",
            Season::Closed => "Closed Season",
        }
    }

    pub fn start_date(self, year: i32) -> anyhow::Result<NaiveDate> {
        let (month, day) = match self {
            Season::Open => (1, 1),
            Season::Closed => (7, 1),
        };
        NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("invalid season start for year {year}"))
    }

    pub fn end_date(self, year: i32) -> anyhow::Result<NaiveDate> {
        let (month, day) = match self {
            Season::Open => (6, 30),
            Season::Closed => (12, 31),
        };
        NaiveDate::from_ymd_opt(year, month, day)
            .with_context(|| format!("invalid season end for year {year}"))
    }

    /// Picks the matching target field off a runner's goal.
    pub fn target_km(self, goal: Option<&crate::models::GoalTargets>) -> f64 {
        match (self, goal) {
            (Season::Open, Some(goal)) => goal.open_season_target_km,
            (Season::Closed, Some(goal)) => goal.closed_season_target_km,
            (_, None) => 0.0,
        }
    }
}

/// Inclusive range for a season of a given year: start of the first day
/// through the last millisecond of the final day.
pub fn season_range(season: Season, year: i32) -> anyhow::Result<SeasonRange> {
    let start = season.start_date(year)?;
    let end = season.end_date(year)?;

    let start: NaiveDateTime = start
        .and_hms_opt(0, 0, 0)
        .context("season start out of range")?;
    let end: NaiveDateTime = end
        .and_hms_milli_opt(23, 59, 59, 999)
        .context("season end out of range")?;

    Ok(SeasonRange { start, end })
}
