//! Analytics engine for spiritual-activity records.
//!
//! Turns the eight raw record collections into one structured report:
//! - Consistency ratios (overall and per discipline)
//! - Wellbeing series and score averages
//! - Trend classification (half-split comparison)
//! - Activity streaks with a one-day grace rule
//! - Activity/wellbeing Pearson correlations
//! - Day-of-week and growth patterns with encouragements
//!
//! The whole pipeline is synchronous and allocation-light; realistic inputs
//! are hundreds of records, not millions. Each calculator is an independent
//! function over the raw collections and/or the aggregated activity view, so
//! every block of the report is unit-testable in isolation.
//!
//! Narrative insights are not computed here; see [`crate::insight`] for the
//! cache-aware synthesis wrapper.

pub mod aggregate;
pub mod consistency;
pub mod correlation;
pub mod engine;
pub mod patterns;
pub mod report;
pub mod streak;
pub mod trend;

pub use aggregate::{aggregate as aggregate_activity, ActivitySummary};
pub use engine::{generate_report, generate_report_now};
pub use report::{
    ActivityCorrelation, ActivityCounts, AnalyticsReport, ConsistencyStats, CorrelationStats,
    DisciplinePoint, GrowthPoint, Insight, InsightKind, PatternStats, ScoreAverages, ScriptureRef,
    StreakStats, Trend, TrendSummary, WellbeingPoint,
};
