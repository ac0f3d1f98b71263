//! Day-of-week and growth patterns, plus rule-based encouragements.

use crate::analytics::aggregate::ActivitySummary;
use crate::analytics::report::{
    ConsistencyStats, GrowthPoint, PatternStats, StreakStats, Trend, TrendSummary,
};
use crate::types::{ActivityCollections, ActivityRecord, TimeRange};
use chrono::{Datelike, NaiveDate};

/// Neutral midpoint of the 1–10 score scale, used when a growth curve has no
/// scored entries at all.
const EMPTY_CURVE_VALUE: f64 = 5.0;

const MAX_MESSAGES: usize = 3;
const MIN_MESSAGES: usize = 2;

/// Compute the patterns block of the report.
pub fn calculate(
    collections: &ActivityCollections,
    summary: &ActivitySummary,
    range: TimeRange,
    consistency: &ConsistencyStats,
    trends: &TrendSummary,
    streaks: &StreakStats,
) -> PatternStats {
    PatternStats {
        day_of_week: day_of_week_histogram(collections),
        growth: growth_curve(collections, range),
        positives: positives(summary, consistency, trends, streaks),
        opportunities: opportunities(summary, consistency, trends, streaks),
    }
}

/// Weekday activity histogram, Sunday-first, normalized to the busiest day.
fn day_of_week_histogram(collections: &ActivityCollections) -> [f64; 7] {
    let mut counts = [0u32; 7];
    for record in collections.records() {
        if let Ok(date) = record.extract_date() {
            counts[date.weekday().num_days_from_sunday() as usize] += 1;
        }
    }

    let max = *counts.iter().max().unwrap_or(&0);
    if max == 0 {
        return [0.0; 7];
    }

    let mut normalized = [0.0; 7];
    for (i, count) in counts.iter().enumerate() {
        normalized[i] = *count as f64 / max as f64;
    }
    normalized
}

/// Fixed-bucket spiritual-score curve over the window.
///
/// Scored entries are sorted by date and distributed into buckets by index,
/// so the curve reflects the window's labels even when logging is uneven. An
/// empty bucket inherits its nearest non-empty neighbor (backward first, then
/// forward); an entirely empty series flat-lines at the scale midpoint.
fn growth_curve(collections: &ActivityCollections, range: TimeRange) -> Vec<GrowthPoint> {
    let bucket_count = range.bucket_count();
    let labels = range.bucket_labels();

    let mut scored: Vec<(NaiveDate, f64)> = collections
        .mood_entries
        .iter()
        .filter_map(|e| {
            let date = ActivityRecord::Mood(e).extract_date().ok()?;
            Some((date, e.spiritual_score?))
        })
        .collect();
    scored.sort_by_key(|(date, _)| *date);

    let mut sums = vec![0.0; bucket_count];
    let mut counts = vec![0usize; bucket_count];
    if !scored.is_empty() {
        let per_bucket = scored.len() as f64 / bucket_count as f64;
        for (i, (_, score)) in scored.iter().enumerate() {
            let bucket = ((i as f64 / per_bucket) as usize).min(bucket_count - 1);
            sums[bucket] += score;
            counts[bucket] += 1;
        }
    }

    let values: Vec<Option<f64>> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, count)| {
            if *count == 0 {
                None
            } else {
                Some(sum / *count as f64)
            }
        })
        .collect();

    (0..bucket_count)
        .map(|i| GrowthPoint {
            label: labels[i].clone(),
            value: fill_gap(&values, i),
        })
        .collect()
}

/// Nearest non-empty neighbor, searching backward first, then forward.
fn fill_gap(values: &[Option<f64>], index: usize) -> f64 {
    if let Some(value) = values[index] {
        return value;
    }
    for back in (0..index).rev() {
        if let Some(value) = values[back] {
            return value;
        }
    }
    for forward in values.iter().skip(index + 1) {
        if let Some(value) = forward {
            return *value;
        }
    }
    EMPTY_CURVE_VALUE
}

fn positives(
    summary: &ActivitySummary,
    consistency: &ConsistencyStats,
    trends: &TrendSummary,
    streaks: &StreakStats,
) -> Vec<String> {
    let mut messages = Vec::new();

    if streaks.current >= 7 {
        messages.push(format!(
            "You're on a {}-day streak. That kind of rhythm builds deep roots.",
            streaks.current
        ));
    } else if streaks.current >= 3 {
        messages.push(format!(
            "A {}-day streak is underway. Keep showing up!",
            streaks.current
        ));
    }
    if trends.spiritual == Trend::Improving {
        messages.push("Your spiritual wellbeing has been trending upward.".to_string());
    }
    if trends.mood == Trend::Improving {
        messages.push("Your mood has lifted over this period.".to_string());
    }
    if consistency.prayer >= 0.7 {
        messages.push("Prayer has been a near-daily practice. Well done.".to_string());
    }
    if consistency.overall >= 0.8 {
        messages.push("You engaged on most days of this period. That consistency matters.".to_string());
    }
    if summary.counts.answered_prayers > 0 {
        messages.push(format!(
            "You recorded {} answered prayer{} this period. Worth celebrating.",
            summary.counts.answered_prayers,
            if summary.counts.answered_prayers == 1 { "" } else { "s" }
        ));
    }

    pad(messages, &[
        "Every entry you logged this period is a step taken on purpose.",
        "Showing up at all is the hardest part, and you did.",
    ])
}

fn opportunities(
    summary: &ActivitySummary,
    consistency: &ConsistencyStats,
    trends: &TrendSummary,
    streaks: &StreakStats,
) -> Vec<String> {
    let mut messages = Vec::new();

    if consistency.bible_reading < 0.3 {
        messages.push(
            "Bible reading appeared on few days. Even five minutes a day compounds.".to_string(),
        );
    }
    if consistency.prayer < 0.3 {
        messages.push("Consider anchoring prayer to an existing daily habit.".to_string());
    }
    if trends.spiritual == Trend::Declining {
        messages.push(
            "Your spiritual scores dipped in the second half of this period. A retreat day or a conversation with a mentor might help."
                .to_string(),
        );
    }
    if streaks.current == 0 && summary.total_entries > 0 {
        messages.push("Your streak has lapsed. Today is a good day to restart.".to_string());
    }
    if summary.counts.journal_entries == 0 {
        messages.push("Journaling is untouched this period. Writing helps you notice what God is doing.".to_string());
    }
    if summary.counts.scripture_memory == 0 {
        messages.push("Try adding one memory verse. Reviewing it takes under a minute a day.".to_string());
    }

    pad(messages, &[
        "Pick one practice to deepen next week rather than adding something new.",
        "Small, repeatable steps beat ambitious plans that fizzle.",
    ])
}

/// Cap at three messages, padding with generic fallbacks up to two.
fn pad(mut messages: Vec<String>, fallbacks: &[&str]) -> Vec<String> {
    for fallback in fallbacks {
        if messages.len() >= MIN_MESSAGES {
            break;
        }
        messages.push(fallback.to_string());
    }
    messages.truncate(MAX_MESSAGES);
    messages
}
