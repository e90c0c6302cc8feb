use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::models::{
    RadarChart, RadarDataset, RankedStats, RawStats, RunnerProfile, SeasonRange, SeasonOverview,
};
use crate::season::{self, Season};

const RADAR_LABELS: [&str; 6] = [
    "Consistency",
    "Total Distance",
    "Average Distance",
    "Longest Run",
    "Streak",
    "Activity Spread",
];

/// Computes the full season overview for a cohort: per-runner raw stats,
/// cohort-normalized scores, leaderboard ranks, and the radar payload.
///
/// The cohort's runs must already be filtered to the season window; the
/// data layer is responsible for that.
pub fn season_stats(
    season: Season,
    year: i32,
    cohort: &[RunnerProfile],
) -> anyhow::Result<SeasonOverview> {
    let range = season::season_range(season, year)?;

    let raw: Vec<RawStats> = cohort
        .iter()
        .map(|runner| raw_stats_for_runner(runner, season, &range))
        .collect();

    let max_active_days = raw.iter().map(|s| s.active_days).max().unwrap_or(0);
    let max_total_km = fold_max(raw.iter().map(|s| s.total_km));
    let max_avg_distance = fold_max(raw.iter().map(|s| s.avg_distance));
    let max_longest_run = fold_max(raw.iter().map(|s| s.longest_run));
    let max_streak = raw.iter().map(|s| s.longest_streak_days).max().unwrap_or(0);

    let mut players: Vec<RankedStats> = raw
        .into_iter()
        .map(|stats| RankedStats {
            consistency_score: normalize(stats.active_days as f64, max_active_days as f64),
            total_distance_score: normalize(stats.total_km, max_total_km),
            avg_distance_score: normalize(stats.avg_distance, max_avg_distance),
            longest_run_score: normalize(stats.longest_run, max_longest_run),
            streak_score: normalize(stats.longest_streak_days as f64, max_streak as f64),
            rank: 0,
            id: stats.id,
            name: stats.name,
            total_km: stats.total_km,
            target_km: stats.target_km,
            completion_percentage: stats.completion_percentage,
            runs_count: stats.runs_count,
            active_days: stats.active_days,
            avg_distance: stats.avg_distance,
            longest_run: stats.longest_run,
            longest_streak_days: stats.longest_streak_days,
            active_weeks: stats.active_weeks,
            activity_spread_score: stats.activity_spread_score,
        })
        .collect();

    // Stable sort keeps first-seen order for equal completion values.
    players.sort_by(|a, b| {
        b.completion_percentage
            .partial_cmp(&a.completion_percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (index, player) in players.iter_mut().enumerate() {
        player.rank = index + 1;
    }

    let datasets = players
        .iter()
        .map(|player| RadarDataset {
            label: player.name.clone(),
            data: vec![
                player.consistency_score,
                player.total_distance_score,
                player.avg_distance_score,
                player.longest_run_score,
                player.streak_score,
                player.activity_spread_score,
            ],
        })
        .collect();

    Ok(SeasonOverview {
        season,
        year,
        range,
        players,
        radar: RadarChart {
            labels: RADAR_LABELS.to_vec(),
            datasets,
        },
    })
}

/// Aggregates one runner's season-filtered runs into raw metrics.
pub fn raw_stats_for_runner(
    runner: &RunnerProfile,
    season: Season,
    range: &SeasonRange,
) -> RawStats {
    let total_km: f64 = runner.runs.iter().map(|run| run.distance_km).sum();
    let runs_count = runner.runs.len();
    let avg_distance = if runs_count > 0 {
        total_km / runs_count as f64
    } else {
        0.0
    };
    let longest_run = fold_max(runner.runs.iter().map(|run| run.distance_km));

    // Distinct calendar days; multiple runs on the same day collapse to one.
    let active_days: BTreeSet<NaiveDate> = runner.runs.iter().map(|run| run.date).collect();

    let longest_streak = longest_streak_days(&active_days);
    let active_weeks = active_weeks_count(&active_days);
    let activity_spread = activity_spread_score(active_weeks, range);

    let target_km = season.target_km(runner.goal.as_ref());
    let completion = if target_km > 0.0 {
        total_km / target_km * 100.0
    } else {
        0.0
    };

    RawStats {
        id: runner.id,
        name: runner.name.clone(),
        total_km: round2(total_km),
        target_km: round2(target_km),
        completion_percentage: round2(completion),
        runs_count,
        active_days: active_days.len(),
        avg_distance: round2(avg_distance),
        longest_run: round2(longest_run),
        longest_streak_days: longest_streak,
        active_weeks,
        activity_spread_score: round2(activity_spread),
    }
}

/// Longest run of consecutive calendar days with at least one activity.
/// Any gap resets the running streak to one.
fn longest_streak_days(active_days: &BTreeSet<NaiveDate>) -> u32 {
    if active_days.is_empty() {
        return 0;
    }

    let mut longest = 1u32;
    let mut current = 1u32;
    let mut previous: Option<NaiveDate> = None;

    for date in active_days {
        if let Some(prev) = previous {
            if (*date - prev) == Duration::days(1) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 1;
            }
        }
        previous = Some(*date);
    }

    longest
}

/// Counts distinct Monday-based week starts among the active days.
fn active_weeks_count(active_days: &BTreeSet<NaiveDate>) -> usize {
    active_days
        .iter()
        .map(|date| week_start(*date))
        .collect::<BTreeSet<NaiveDate>>()
        .len()
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Share of the season's calendar weeks that saw at least one run.
fn activity_spread_score(active_weeks: usize, range: &SeasonRange) -> f64 {
    let first_week = week_start(range.start.date());
    let last_week = week_start(range.end.date());
    let total_weeks = (last_week - first_week).num_days() / 7 + 1;

    if total_weeks <= 0 {
        return 0.0;
    }

    active_weeks as f64 / total_weeks as f64 * 100.0
}

/// Rescales a value against the cohort maximum onto 0-100. A zero maximum
/// yields 0.0 for every runner rather than dividing by zero.
fn normalize(value: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }

    round2(value / max * 100.0)
}

fn fold_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, f64::max)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
