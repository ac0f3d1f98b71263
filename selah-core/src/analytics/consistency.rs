//! Consistency ratios: active days over window days, per discipline.

use crate::analytics::aggregate::{unique_days, ActivitySummary};
use crate::analytics::report::ConsistencyStats;
use crate::types::{ActivityCollections, ActivityRecord, MoodEntry};

/// Compute the consistency block of the report.
///
/// Every ratio guards its denominator; empty collections produce 0, never
/// NaN. Church attendance is weekly-cadence, so it is normalized against an
/// expected count of one service per logged week
/// (`min(1, church_days / ceil(mood_entries / 7))`) rather than against every
/// day in the window. That formula assumes roughly daily check-ins and is an
/// approximation, not an invariant.
pub fn calculate(collections: &ActivityCollections, summary: &ActivitySummary) -> ConsistencyStats {
    let total_days = summary.total_days;

    // Numerators are days, not entries: multiple check-ins on one calendar
    // day count once, keeping every ratio in [0, 1].
    let prayer_days = flagged_days(&collections.mood_entries, |e| e.prayer_time);
    let bible_days = flagged_days(&collections.mood_entries, |e| e.bible_reading);
    let church_days = flagged_days(&collections.mood_entries, |e| e.church_attendance);

    let memory_days = unique_days(
        collections
            .scripture_memory
            .iter()
            .map(ActivityRecord::ScriptureMemory),
    )
    .len();
    let journal_days = unique_days(
        collections
            .journal_entries
            .iter()
            .map(ActivityRecord::Journal),
    )
    .len();

    let expected_services = (collections.mood_entries.len() as f64 / 7.0).ceil();

    ConsistencyStats {
        overall: ratio(summary.active_days(), total_days),
        prayer: ratio(prayer_days, total_days),
        bible_reading: ratio(bible_days, total_days),
        church: if expected_services > 0.0 {
            (church_days as f64 / expected_services).min(1.0)
        } else {
            0.0
        },
        scripture_memory: ratio(memory_days, total_days),
        journaling: ratio(journal_days, total_days),
    }
}

/// Unique calendar days among mood entries with a discipline flag set.
fn flagged_days<F>(entries: &[MoodEntry], flag: F) -> usize
where
    F: Fn(&MoodEntry) -> bool,
{
    unique_days(
        entries
            .iter()
            .filter(|e| flag(e))
            .map(ActivityRecord::Mood),
    )
    .len()
}

fn ratio(count: usize, total_days: i64) -> f64 {
    if total_days <= 0 {
        0.0
    } else {
        count as f64 / total_days as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate::aggregate;
    use crate::types::MoodEntry;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mood(day: NaiveDate, prayer: bool, bible: bool, church: bool) -> MoodEntry {
        MoodEntry {
            id: format!("m-{}", day),
            entry_date: Some(day),
            created_at: None,
            mood_score: Some(6.0),
            spiritual_score: Some(6.0),
            prayer_time: prayer,
            bible_reading: bible,
            church_attendance: church,
            notes: None,
        }
    }

    #[test]
    fn test_overall_ratio_bounds() {
        let start = date(2024, 6, 1);
        let collections = ActivityCollections {
            mood_entries: (0..7)
                .map(|i| mood(start + chrono::Duration::days(i), true, false, false))
                .collect(),
            ..Default::default()
        };
        let summary = aggregate(&collections, start, date(2024, 6, 7));
        let stats = calculate(&collections, &summary);

        assert!((stats.overall - 1.0).abs() < 1e-9);
        assert!((stats.prayer - 1.0).abs() < 1e-9);
        assert_eq!(stats.bible_reading, 0.0);
    }

    #[test]
    fn test_church_normalized_weekly() {
        let start = date(2024, 6, 1);
        // 14 daily check-ins, 2 of them church days: 2 services / ceil(14/7)=2
        let collections = ActivityCollections {
            mood_entries: (0..14)
                .map(|i| mood(start + chrono::Duration::days(i), false, false, i % 7 == 0))
                .collect(),
            ..Default::default()
        };
        let summary = aggregate(&collections, start, date(2024, 6, 14));
        let stats = calculate(&collections, &summary);

        assert!((stats.church - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_church_caps_at_one() {
        let start = date(2024, 6, 1);
        // More church days than expected services still caps at 1.0
        let collections = ActivityCollections {
            mood_entries: (0..7)
                .map(|i| mood(start + chrono::Duration::days(i), false, false, true))
                .collect(),
            ..Default::default()
        };
        let summary = aggregate(&collections, start, date(2024, 6, 7));
        let stats = calculate(&collections, &summary);

        assert!((stats.church - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_day_checkins_count_once() {
        let start = date(2024, 6, 1);
        // Ten prayer-flagged check-ins all on the same day of a 7-day window
        let collections = ActivityCollections {
            mood_entries: (0..10).map(|_| mood(start, true, true, false)).collect(),
            ..Default::default()
        };
        let summary = aggregate(&collections, start, date(2024, 6, 7));
        let stats = calculate(&collections, &summary);

        assert!((stats.prayer - 1.0 / 7.0).abs() < 1e-9);
        assert!((stats.bible_reading - 1.0 / 7.0).abs() < 1e-9);
        assert!(stats.prayer <= 1.0);
        assert!(stats.overall <= 1.0);
    }

    #[test]
    fn test_empty_collections_are_all_zero() {
        let collections = ActivityCollections::default();
        let summary = aggregate(&collections, date(2024, 6, 1), date(2024, 6, 30));
        let stats = calculate(&collections, &summary);

        assert_eq!(stats.overall, 0.0);
        assert_eq!(stats.prayer, 0.0);
        assert_eq!(stats.church, 0.0);
        assert_eq!(stats.scripture_memory, 0.0);
        assert_eq!(stats.journaling, 0.0);
    }
}
