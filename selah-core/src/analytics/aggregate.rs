//! Unified activity-day aggregation.
//!
//! Merges the eight record collections into a single set of activity days
//! plus per-category counts. Everything downstream (consistency, streaks,
//! patterns) reads from this view rather than re-walking the collections.

use crate::analytics::report::ActivityCounts;
use crate::types::{ActivityCollections, ActivityRecord};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Aggregated view of one window's activity.
#[derive(Debug, Clone, Default)]
pub struct ActivitySummary {
    /// Every calendar day with at least one record of any category
    pub activity_days: BTreeSet<NaiveDate>,
    /// Calendar days in the window (`end − start + 1`)
    pub total_days: i64,
    /// Record count across all collections
    pub total_entries: usize,
    /// Records dropped because no date field was present
    pub skipped_records: usize,
    pub counts: ActivityCounts,
}

impl ActivitySummary {
    /// Number of distinct active days.
    pub fn active_days(&self) -> usize {
        self.activity_days.len()
    }
}

/// Build the unified activity view for a window.
///
/// Set semantics collapse duplicate dates, so the result is idempotent and
/// independent of collection order. Records missing every known date field
/// are skipped and logged rather than failing the report; the caller can
/// inspect `skipped_records` to detect data-quality problems upstream.
pub fn aggregate(
    collections: &ActivityCollections,
    start: NaiveDate,
    end: NaiveDate,
) -> ActivitySummary {
    let mut summary = ActivitySummary {
        total_days: (end - start).num_days() + 1,
        total_entries: collections.total_entries(),
        counts: count_activities(collections),
        ..Default::default()
    };

    for record in collections.records() {
        match record.extract_date() {
            Ok(date) => {
                summary.activity_days.insert(date);
            }
            Err(e) => {
                summary.skipped_records += 1;
                tracing::warn!(
                    category = record.category(),
                    error = %e,
                    "Skipping record without a usable date"
                );
            }
        }
    }

    summary
}

fn count_activities(collections: &ActivityCollections) -> ActivityCounts {
    ActivityCounts {
        mood_entries: collections.mood_entries.len(),
        prayer_requests: collections.prayer_requests.len(),
        answered_prayers: collections
            .prayer_requests
            .iter()
            .filter(|p| p.answered)
            .count(),
        journal_entries: collections.journal_entries.len(),
        scripture_memory: collections.scripture_memory.len(),
        study_notes: collections.study_notes.len(),
        devotionals_completed: collections.devotional_progress.len(),
        habits_logged: collections.habit_logs.len(),
        reading_reflections: collections.reading_reflections.len(),
    }
}

/// Unique calendar days extracted from one collection's records.
///
/// Used by per-category consistency, which needs day counts per discipline
/// rather than the merged set.
pub fn unique_days<'a, I>(records: I) -> BTreeSet<NaiveDate>
where
    I: Iterator<Item = ActivityRecord<'a>>,
{
    records
        .filter_map(|record| record.extract_date().ok())
        .collect()
}
