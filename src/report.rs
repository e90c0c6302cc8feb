use std::fmt::Write;

use crate::models::SeasonOverview;

/// Renders the season overview as a markdown report: standings first,
/// then the radar score profile per runner.
pub fn build_report(overview: &SeasonOverview) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "# {} {} Leaderboard",
        overview.season.label(),
        overview.year
    );
    let _ = writeln!(
        output,
        "Covering {} to {}",
        overview.range.start.date(),
        overview.range.end.date()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Standings");

    if overview.players.is_empty() {
        let _ = writeln!(output, "No runners in the cohort.");
        return output;
    }

    for player in &overview.players {
        let _ = writeln!(
            output,
            "- {}. {}: {:.2} of {:.2} km ({:.2}% of target), {} runs across {} active days",
            player.rank,
            player.name,
            player.total_km,
            player.target_km,
            player.completion_percentage,
            player.runs_count,
            player.active_days
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Score Profiles");

    for dataset in &overview.radar.datasets {
        let _ = writeln!(output, "### {}", dataset.label);
        for (label, value) in overview.radar.labels.iter().zip(dataset.data.iter()) {
            let _ = writeln!(output, "- {label}: {value:.2}");
        }
        let _ = writeln!(output);
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalTargets, RunRecord, RunnerProfile};
    use crate::season::Season;
    use crate::stats;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn report_lists_standings_in_rank_order() {
        let cohort = vec![RunnerProfile {
            id: Uuid::new_v4(),
            name: "Runner One".to_string(),
            goal: Some(GoalTargets {
                open_season_target_km: 100.0,
                closed_season_target_km: 100.0,
            }),
            runs: vec![RunRecord {
                date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
                distance_km: 50.0,
            }],
        }];

        let overview = stats::season_stats(Season::Open, 2026, &cohort).unwrap();
        let report = build_report(&overview);

        assert!(report.contains("# Open Season 2026 Leaderboard"));
        assert!(report.contains("Covering 2026-01-01 to 2026-06-30"));
        assert!(report.contains("- 1. Runner One: 50.00 of 100.00 km (50.00% of target)"));
        assert!(report.contains("### Runner One"));
        assert!(report.contains("- Activity Spread:"));
    }

    #[test]
    fn empty_cohort_renders_an_empty_state() {
        let overview = stats::season_stats(Season::Closed, 2026, &[]).unwrap();
        let report = build_report(&overview);

        assert!(report.contains("No runners in the cohort."));
        assert!(!report.contains("### "));
    }
}
