//! Report orchestration.
//!
//! Pure, synchronous assembly of the analytics report from the eight raw
//! collections. The caller fetches the collections (in parallel, already
//! scoped to the window) and decides when to run; this module only
//! transforms. Narrative insights are attached afterwards by
//! [`crate::insight::InsightSynthesizer`].

use crate::analytics::aggregate::{self, ActivitySummary};
use crate::analytics::report::{
    AnalyticsReport, DisciplinePoint, ScoreAverages, WellbeingPoint,
};
use crate::analytics::{consistency, correlation, patterns, streak, trend};
use crate::types::{ActivityCollections, ActivityRecord, TimeRange};
use chrono::{NaiveDate, Utc};

/// Build the full analytics report for one user's collections.
///
/// `today` anchors the window and the current-streak walk; tests pass a fixed
/// date, production callers use [`generate_report_now`].
pub fn generate_report(
    range: TimeRange,
    collections: &ActivityCollections,
    today: NaiveDate,
) -> AnalyticsReport {
    let (start, end) = range.window(today);

    tracing::debug!(
        range = range.as_str(),
        %start,
        %end,
        entries = collections.total_entries(),
        "Generating analytics report"
    );

    let summary = aggregate::aggregate(collections, start, end);
    if summary.skipped_records > 0 {
        tracing::warn!(
            skipped = summary.skipped_records,
            "Report computed with undated records excluded"
        );
    }

    let consistency = consistency::calculate(collections, &summary);
    let trends = trend::calculate(collections);
    let streaks = streak::calculate(&summary.activity_days, today);
    let correlations = correlation::calculate(collections);
    let patterns = patterns::calculate(
        collections,
        &summary,
        range,
        &consistency,
        &trends,
        &streaks,
    );

    let report = AnalyticsReport {
        time_range: range,
        wellbeing: wellbeing_series(collections, range),
        averages: score_averages(collections),
        disciplines: discipline_series(&consistency, &summary),
        activity_counts: summary.counts,
        consistency,
        trends,
        streaks,
        correlations,
        patterns,
        insights: Vec::new(),
    };

    tracing::info!(
        range = range.as_str(),
        active_days = summary.active_days(),
        streak = report.streaks.current,
        overall_trend = report.trends.overall.as_str(),
        "Analytics report ready"
    );

    report
}

/// [`generate_report`] anchored at the current UTC date.
pub fn generate_report_now(range: TimeRange, collections: &ActivityCollections) -> AnalyticsReport {
    generate_report(range, collections, Utc::now().date_naive())
}

/// Date-sorted mood/spiritual series with window-granularity labels.
fn wellbeing_series(collections: &ActivityCollections, range: TimeRange) -> Vec<WellbeingPoint> {
    let mut points: Vec<WellbeingPoint> = collections
        .mood_entries
        .iter()
        .filter_map(|e| {
            let date = ActivityRecord::Mood(e).extract_date().ok()?;
            Some(WellbeingPoint {
                date,
                label: range.label_for(date),
                mood: e.mood_score,
                spiritual: e.spiritual_score,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Mean scores over entries that carry them.
fn score_averages(collections: &ActivityCollections) -> ScoreAverages {
    let moods: Vec<f64> = collections
        .mood_entries
        .iter()
        .filter_map(|e| e.mood_score)
        .collect();
    let spirituals: Vec<f64> = collections
        .mood_entries
        .iter()
        .filter_map(|e| e.spiritual_score)
        .collect();

    ScoreAverages {
        mood: mean(&moods),
        spiritual: mean(&spirituals),
    }
}

/// The four discipline percentages shown on the disciplines chart.
fn discipline_series(
    consistency: &crate::analytics::report::ConsistencyStats,
    summary: &ActivitySummary,
) -> Vec<DisciplinePoint> {
    let habit_pct = if summary.total_days > 0 {
        ((summary.counts.habits_logged as f64 / summary.total_days as f64) * 100.0).min(100.0)
    } else {
        0.0
    };

    vec![
        DisciplinePoint {
            name: "Prayer".to_string(),
            value: consistency.prayer * 100.0,
        },
        DisciplinePoint {
            name: "Bible".to_string(),
            value: consistency.bible_reading * 100.0,
        },
        DisciplinePoint {
            name: "Church".to_string(),
            value: consistency.church * 100.0,
        },
        DisciplinePoint {
            name: "Habits".to_string(),
            value: habit_pct,
        },
    ]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
