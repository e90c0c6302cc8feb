use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use uuid::Uuid;

use crate::season::Season;

/// A single logged run, day granularity.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub date: NaiveDate,
    pub distance_km: f64,
}

/// Per-season target distances. A runner without a stored goal is treated
/// as targeting zero for both seasons.
#[derive(Debug, Clone)]
pub struct GoalTargets {
    pub open_season_target_km: f64,
    pub closed_season_target_km: f64,
}

/// One runner's slice of the cohort: identity, goal, and the runs already
/// filtered to the season window by the data layer.
#[derive(Debug, Clone)]
pub struct RunnerProfile {
    pub id: Uuid,
    pub name: String,
    pub goal: Option<GoalTargets>,
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeasonRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Raw per-runner metrics, before any cross-cohort normalization.
#[derive(Debug, Clone)]
pub struct RawStats {
    pub id: Uuid,
    pub name: String,
    pub total_km: f64,
    pub target_km: f64,
    pub completion_percentage: f64,
    pub runs_count: usize,
    pub active_days: usize,
    pub avg_distance: f64,
    pub longest_run: f64,
    pub longest_streak_days: u32,
    pub active_weeks: usize,
    pub activity_spread_score: f64,
}

/// Raw metrics plus cohort-relative 0-100 scores and leaderboard rank.
#[derive(Debug, Clone, Serialize)]
pub struct RankedStats {
    pub id: Uuid,
    pub name: String,
    pub total_km: f64,
    pub target_km: f64,
    pub completion_percentage: f64,
    pub runs_count: usize,
    pub active_days: usize,
    pub avg_distance: f64,
    pub longest_run: f64,
    pub longest_streak_days: u32,
    pub active_weeks: usize,
    pub activity_spread_score: f64,
    pub consistency_score: f64,
    pub total_distance_score: f64,
    pub avg_distance_score: f64,
    pub longest_run_score: f64,
    pub streak_score: f64,
    pub rank: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarDataset {
    pub label: String,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadarChart {
    pub labels: Vec<&'static str>,
    pub datasets: Vec<RadarDataset>,
}

/// Full output of a season computation: ranked leaderboard plus the
/// chart-ready radar payload, both in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct SeasonOverview {
    pub season: Season,
    pub year: i32,
    pub range: SeasonRange,
    pub players: Vec<RankedStats>,
    pub radar: RadarChart,
}
