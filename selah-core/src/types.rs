//! Core domain types for selah-core
//!
//! These types are the canonical shapes of the eight activity-record
//! collections the remote store hands to the analytics engine, plus the
//! time-range parameter that scopes a report.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Activity record** | One timestamped entry in any of the eight categories |
//! | **Activity day** | A calendar day with at least one record of any category |
//! | **Time range** | The requested reporting window (week/month/quarter/year) |
//! | **Wellbeing scores** | Self-reported mood and spiritual scores on a 1–10 scale |
//!
//! Every record variant carries at least one date-bearing field. Which field
//! is authoritative differs per variant, so [`ActivityRecord::extract_date`]
//! resolves it through a fixed priority order rather than probing shapes at
//! runtime.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ============================================
// Time range
// ============================================

/// Reporting window requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    /// Last 7 days
    Week,
    /// Last month
    Month,
    /// Last 3 months
    Quarter,
    /// Last 12 months
    Year,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Quarter => "quarter",
            TimeRange::Year => "year",
        }
    }

    /// Concrete `[start, end]` window ending at `today` (both inclusive).
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = match self {
            TimeRange::Week => today - chrono::Duration::days(6),
            TimeRange::Month => months_back(today, 1),
            TimeRange::Quarter => months_back(today, 3),
            TimeRange::Year => months_back(today, 12),
        };
        (start, today)
    }

    /// Number of calendar days in the window (`end − start + 1`).
    pub fn total_days(&self, today: NaiveDate) -> i64 {
        let (start, end) = self.window(today);
        (end - start).num_days() + 1
    }

    /// Number of growth-curve buckets for this window.
    pub fn bucket_count(&self) -> usize {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 4,
            TimeRange::Quarter => 6,
            TimeRange::Year => 12,
        }
    }

    /// Fixed chart labels for the growth-curve buckets.
    pub fn bucket_labels(&self) -> Vec<String> {
        match self {
            TimeRange::Week => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            TimeRange::Month => (1..=4).map(|w| format!("Week {}", w)).collect(),
            TimeRange::Quarter => (0..6)
                .map(|i| format!("Wk {}-{}", i * 2 + 1, i * 2 + 2))
                .collect(),
            TimeRange::Year => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }

    /// Date display format for series points: weekday name inside a week
    /// window, month + day otherwise.
    pub fn label_for(&self, date: NaiveDate) -> String {
        match self {
            TimeRange::Week => date.format("%a").to_string(),
            _ => date.format("%b %-d").to_string(),
        }
    }
}

impl FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            other => Err(Error::InvalidTimeRange(other.to_string())),
        }
    }
}

/// Step `months` back from `date`, clamping the day to the target month's end.
fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    use chrono::Datelike;

    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    let day = date.day();

    NaiveDate::from_ymd_opt(year, month0 + 1, day)
        .or_else(|| {
            // Day overflows the shorter month (e.g. Mar 31 -> Feb 28)
            let last = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
                .and_then(|d| d.checked_add_months(chrono::Months::new(1)))
                .map(|d| d.pred_opt().unwrap_or(d));
            last
        })
        .unwrap_or(date)
}

// ============================================
// Activity record variants
// ============================================

/// Daily mood check-in with wellbeing scores and discipline flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    /// Check-in date (authoritative)
    pub entry_date: Option<NaiveDate>,
    /// Fallback when `entry_date` is absent in older rows
    pub created_at: Option<DateTime<Utc>>,
    /// Mood score, 1–10
    pub mood_score: Option<f64>,
    /// Spiritual wellbeing score, 1–10
    pub spiritual_score: Option<f64>,
    /// Whether the day included prayer time
    #[serde(default)]
    pub prayer_time: bool,
    /// Whether the day included Bible reading
    #[serde(default)]
    pub bible_reading: bool,
    /// Whether the day included a church service
    #[serde(default)]
    pub church_attendance: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A prayer request, possibly marked answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrayerRequest {
    pub id: String,
    pub title: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answered: bool,
    pub answered_at: Option<DateTime<Utc>>,
}

/// Free-form journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub entry_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub title: Option<String>,
}

/// Scripture-memory practice record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureMemoryEntry {
    pub id: String,
    pub reference: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    /// Most recent practice session; used only when `created_at` is absent
    pub last_practiced: Option<DateTime<Utc>>,
}

/// Bible-study note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyNote {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub passage: Option<String>,
}

/// Completed day of a devotional plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevotionalProgress {
    pub id: String,
    pub completed_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub devotional_id: Option<String>,
}

/// Habit completion log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: String,
    pub habit_id: Option<String>,
    pub completed_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Reflection attached to a reading-plan day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingReflection {
    pub id: String,
    pub entry_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub plan_id: Option<String>,
}

/// Closed set of activity-record shapes.
///
/// The aggregation layer works on borrowed views of the typed collections, so
/// this enum borrows rather than owns.
#[derive(Debug, Clone, Copy)]
pub enum ActivityRecord<'a> {
    Mood(&'a MoodEntry),
    Prayer(&'a PrayerRequest),
    Journal(&'a JournalEntry),
    ScriptureMemory(&'a ScriptureMemoryEntry),
    StudyNote(&'a StudyNote),
    Devotional(&'a DevotionalProgress),
    Habit(&'a HabitLog),
    Reflection(&'a ReadingReflection),
}

impl ActivityRecord<'_> {
    /// Category name, used in logs and error messages.
    pub fn category(&self) -> &'static str {
        match self {
            ActivityRecord::Mood(_) => "mood",
            ActivityRecord::Prayer(_) => "prayer",
            ActivityRecord::Journal(_) => "journal",
            ActivityRecord::ScriptureMemory(_) => "scripture_memory",
            ActivityRecord::StudyNote(_) => "study_note",
            ActivityRecord::Devotional(_) => "devotional",
            ActivityRecord::Habit(_) => "habit",
            ActivityRecord::Reflection(_) => "reflection",
        }
    }

    /// Resolve the record's canonical calendar date.
    ///
    /// Fields are tried in a fixed priority order: `entry_date`,
    /// `completed_date`, `created_at`, `last_practiced`. Date-times truncate
    /// to their date portion. A record with no date field is a data-quality
    /// problem and surfaces as [`Error::MissingDate`].
    pub fn extract_date(&self) -> Result<NaiveDate> {
        let date = match self {
            ActivityRecord::Mood(e) => resolve(e.entry_date, None, e.created_at, None),
            ActivityRecord::Prayer(e) => resolve(None, None, e.created_at, None),
            ActivityRecord::Journal(e) => resolve(e.entry_date, None, e.created_at, None),
            ActivityRecord::ScriptureMemory(e) => {
                resolve(None, None, e.created_at, e.last_practiced)
            }
            ActivityRecord::StudyNote(e) => resolve(None, None, e.created_at, None),
            ActivityRecord::Devotional(e) => resolve(None, e.completed_date, e.created_at, None),
            ActivityRecord::Habit(e) => resolve(None, e.completed_date, e.created_at, None),
            ActivityRecord::Reflection(e) => resolve(e.entry_date, None, e.created_at, None),
        };

        date.ok_or(Error::MissingDate {
            category: self.category(),
        })
    }
}

/// Priority chain shared by every variant:
/// `entry_date` → `completed_date` → `created_at` → `last_practiced`.
fn resolve(
    entry_date: Option<NaiveDate>,
    completed_date: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
    last_practiced: Option<DateTime<Utc>>,
) -> Option<NaiveDate> {
    entry_date
        .or(completed_date)
        .or_else(|| created_at.map(|dt| dt.date_naive()))
        .or_else(|| last_practiced.map(|dt| dt.date_naive()))
}

// ============================================
// Input collections
// ============================================

/// The eight record collections, pre-fetched by the caller for one user and
/// one time window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityCollections {
    #[serde(default)]
    pub mood_entries: Vec<MoodEntry>,
    #[serde(default)]
    pub prayer_requests: Vec<PrayerRequest>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub scripture_memory: Vec<ScriptureMemoryEntry>,
    #[serde(default)]
    pub study_notes: Vec<StudyNote>,
    #[serde(default)]
    pub devotional_progress: Vec<DevotionalProgress>,
    #[serde(default)]
    pub habit_logs: Vec<HabitLog>,
    #[serde(default)]
    pub reading_reflections: Vec<ReadingReflection>,
}

impl ActivityCollections {
    /// Total record count across every category.
    pub fn total_entries(&self) -> usize {
        self.mood_entries.len()
            + self.prayer_requests.len()
            + self.journal_entries.len()
            + self.scripture_memory.len()
            + self.study_notes.len()
            + self.devotional_progress.len()
            + self.habit_logs.len()
            + self.reading_reflections.len()
    }

    /// Iterate every record as a tagged [`ActivityRecord`] view.
    pub fn records(&self) -> impl Iterator<Item = ActivityRecord<'_>> {
        let moods = self.mood_entries.iter().map(ActivityRecord::Mood);
        let prayers = self.prayer_requests.iter().map(ActivityRecord::Prayer);
        let journals = self.journal_entries.iter().map(ActivityRecord::Journal);
        let memory = self
            .scripture_memory
            .iter()
            .map(ActivityRecord::ScriptureMemory);
        let notes = self.study_notes.iter().map(ActivityRecord::StudyNote);
        let devotionals = self
            .devotional_progress
            .iter()
            .map(ActivityRecord::Devotional);
        let habits = self.habit_logs.iter().map(ActivityRecord::Habit);
        let reflections = self
            .reading_reflections
            .iter()
            .map(ActivityRecord::Reflection);

        moods
            .chain(prayers)
            .chain(journals)
            .chain(memory)
            .chain(notes)
            .chain(devotionals)
            .chain(habits)
            .chain(reflections)
    }
}
