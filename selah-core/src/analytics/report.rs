//! The analytics report aggregate.
//!
//! Assembled once by [`crate::analytics::engine::generate_report`] from the
//! outputs of the independent calculators, then handed to the insight
//! synthesizer, which attaches the `insights` list. Nothing mutates the
//! report after that.

use crate::types::TimeRange;
use serde::{Deserialize, Serialize};

/// Three-valued trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        }
    }
}

/// Active-day ratios in `[0, 1]`, overall and per discipline.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ConsistencyStats {
    pub overall: f64,
    pub prayer: f64,
    pub bible_reading: f64,
    /// Normalized against an expected weekly cadence, not daily.
    pub church: f64,
    pub scripture_memory: f64,
    pub journaling: f64,
}

/// One point of the wellbeing chart. Scores are absent on days the check-in
/// skipped them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellbeingPoint {
    /// ISO calendar date
    pub date: chrono::NaiveDate,
    /// Display label, formatted per window granularity
    pub label: String,
    pub mood: Option<f64>,
    pub spiritual: Option<f64>,
}

/// Mean scores over entries that carry them; 0 when none do.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScoreAverages {
    pub mood: f64,
    pub spiritual: f64,
}

/// Trend classifications across the report's dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendSummary {
    pub overall: Trend,
    pub mood: Trend,
    pub spiritual: Trend,
    pub consistency: Trend,
    pub prayer: Trend,
}

impl Default for TrendSummary {
    fn default() -> Self {
        Self {
            overall: Trend::Stable,
            mood: Trend::Stable,
            spiritual: Trend::Stable,
            consistency: Trend::Stable,
            prayer: Trend::Stable,
        }
    }
}

/// Consecutive-activity-day streaks. `current` never exceeds `longest`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StreakStats {
    pub current: u32,
    pub longest: u32,
}

/// One named discipline percentage for the disciplines chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplinePoint {
    pub name: String,
    /// Percentage in `[0, 100]`
    pub value: f64,
}

/// Raw record counts per category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActivityCounts {
    pub mood_entries: usize,
    pub prayer_requests: usize,
    pub answered_prayers: usize,
    pub journal_entries: usize,
    pub scripture_memory: usize,
    pub study_notes: usize,
    pub devotionals_completed: usize,
    pub habits_logged: usize,
    pub reading_reflections: usize,
}

/// One activity/wellbeing correlation coefficient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCorrelation {
    pub name: String,
    /// Pearson coefficient in `[-1, 1]`
    pub value: f64,
}

/// Correlation coefficients plus derived natural-language observations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationStats {
    pub activities: Vec<ActivityCorrelation>,
    pub insights: Vec<String>,
}

/// One growth-curve bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub label: String,
    /// Mean spiritual score for the bucket, 1–10 scale
    pub value: f64,
}

/// Day-of-week and long-run activity patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternStats {
    /// Sunday-first weekday histogram, normalized to the busiest day
    pub day_of_week: [f64; 7],
    pub growth: Vec<GrowthPoint>,
    /// At most 3 affirmations
    pub positives: Vec<String>,
    /// At most 3 constructive suggestions
    pub opportunities: Vec<String>,
}

/// Kind of narrative insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Strength,
    Growth,
    Opportunity,
}

/// Scripture citation attached to an insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptureRef {
    pub reference: String,
    pub text: String,
}

/// One structured narrative insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
    pub scripture: ScriptureRef,
}

/// Complete analytics report for one user and one time range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub time_range: TimeRange,
    pub consistency: ConsistencyStats,
    pub wellbeing: Vec<WellbeingPoint>,
    pub averages: ScoreAverages,
    pub trends: TrendSummary,
    pub streaks: StreakStats,
    pub disciplines: Vec<DisciplinePoint>,
    pub activity_counts: ActivityCounts,
    pub correlations: CorrelationStats,
    pub patterns: PatternStats,
    /// Empty until the insight synthesizer runs
    #[serde(default)]
    pub insights: Vec<Insight>,
}
