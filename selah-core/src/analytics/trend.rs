//! Half-split trend classification.
//!
//! A series is sorted by date, split at the midpoint (odd counts bias the
//! extra element into the second half) and the two halves' aggregates are
//! compared against a threshold. Fewer than three entries is always
//! [`Trend::Stable`].

use crate::analytics::report::{Trend, TrendSummary};
use crate::types::{ActivityCollections, ActivityRecord, MoodEntry};
use chrono::NaiveDate;
use std::collections::BTreeSet;

const SCORE_THRESHOLD: f64 = 0.5;
const PRAYER_THRESHOLD: f64 = 0.15;
const MIN_ENTRIES: usize = 3;

/// Compute the trend block of the report.
pub fn calculate(collections: &ActivityCollections) -> TrendSummary {
    let mut scored: Vec<(NaiveDate, &MoodEntry)> = collections
        .mood_entries
        .iter()
        .filter_map(|e| {
            ActivityRecord::Mood(e)
                .extract_date()
                .ok()
                .map(|date| (date, e))
        })
        .collect();
    scored.sort_by_key(|(date, _)| *date);

    let mood = numeric_trend(&scored, |e| e.mood_score);
    let spiritual = numeric_trend(&scored, |e| e.spiritual_score);
    let prayer = boolean_trend(&scored, |e| e.prayer_time);

    let mut all_dates: Vec<NaiveDate> = collections
        .records()
        .filter_map(|r| r.extract_date().ok())
        .collect();
    all_dates.sort();
    let consistency = density_trend(&all_dates);

    TrendSummary {
        overall: combine(mood, spiritual),
        mood,
        spiritual,
        consistency,
        prayer,
    }
}

/// Classify a date-sorted series by a numeric property, thresholds ±0.5.
/// Entries without the property are excluded before splitting.
fn numeric_trend<F>(sorted: &[(NaiveDate, &MoodEntry)], value: F) -> Trend
where
    F: Fn(&MoodEntry) -> Option<f64>,
{
    let values: Vec<f64> = sorted.iter().filter_map(|(_, e)| value(e)).collect();
    if values.len() < MIN_ENTRIES {
        return Trend::Stable;
    }

    let (first, second) = values.split_at(values.len() / 2);
    classify(mean(second) - mean(first), SCORE_THRESHOLD)
}

/// Classify a boolean discipline by its per-half mean, tighter ±0.15
/// thresholds since the signal is a 0/1 rate rather than a 1–10 score.
fn boolean_trend<F>(sorted: &[(NaiveDate, &MoodEntry)], flag: F) -> Trend
where
    F: Fn(&MoodEntry) -> bool,
{
    if sorted.len() < MIN_ENTRIES {
        return Trend::Stable;
    }

    let values: Vec<f64> = sorted
        .iter()
        .map(|(_, e)| if flag(e) { 1.0 } else { 0.0 })
        .collect();
    let (first, second) = values.split_at(values.len() / 2);
    classify(mean(second) - mean(first), PRAYER_THRESHOLD)
}

/// Classify engagement frequency for dated-but-unscored records: unique days
/// per half divided by the half's calendar span.
fn density_trend(sorted_dates: &[NaiveDate]) -> Trend {
    if sorted_dates.len() < MIN_ENTRIES {
        return Trend::Stable;
    }

    let (first, second) = sorted_dates.split_at(sorted_dates.len() / 2);
    classify(density(second) - density(first), SCORE_THRESHOLD)
}

fn density(dates: &[NaiveDate]) -> f64 {
    let (Some(first), Some(last)) = (dates.first(), dates.last()) else {
        return 0.0;
    };
    let span = (*last - *first).num_days() + 1;
    if span <= 0 {
        return 0.0;
    }
    let unique: BTreeSet<&NaiveDate> = dates.iter().collect();
    unique.len() as f64 / span as f64
}

fn classify(difference: f64, threshold: f64) -> Trend {
    if difference > threshold {
        Trend::Improving
    } else if difference < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Combine mood and spiritual into the overall trend: agreement wins, a lone
/// `Stable` defers to the other, direct disagreement is `Stable`.
fn combine(mood: Trend, spiritual: Trend) -> Trend {
    match (mood, spiritual) {
        (m, s) if m == s => m,
        (Trend::Stable, other) | (other, Trend::Stable) => other,
        _ => Trend::Stable,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
