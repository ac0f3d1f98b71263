//! Integration tests for the analytics pipeline and insight synthesis
//!
//! These drive the public API end to end: raw collections in, finalized
//! report with insights out, with the cache and generator collaborators
//! swapped for test doubles.

use chrono::{NaiveDate, TimeZone, Utc};
use selah_core::analytics::{generate_report, Insight, InsightKind, ScriptureRef, Trend};
use selah_core::cache::{MemoryInsightCache, SqliteInsightCache};
use selah_core::insight::{CacheEntry, InsightCache, InsightSynthesizer, NarrativeGenerator};
use selah_core::types::{
    DevotionalProgress, HabitLog, JournalEntry, MoodEntry, PrayerRequest, ScriptureMemoryEntry,
};
use selah_core::{ActivityCollections, AnalyticsReport, Result, TimeRange};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mood_entry(day: NaiveDate) -> MoodEntry {
    MoodEntry {
        id: format!("mood-{}", day),
        entry_date: Some(day),
        created_at: None,
        mood_score: Some(6.0),
        spiritual_score: Some(6.0),
        prayer_time: false,
        bible_reading: false,
        church_attendance: false,
        notes: None,
    }
}

fn sample_insight(title: &str) -> Insight {
    Insight {
        kind: InsightKind::Strength,
        title: title.to_string(),
        content: "generated content".to_string(),
        scripture: ScriptureRef {
            reference: "Psalm 23:1".to_string(),
            text: "The Lord is my shepherd.".to_string(),
        },
    }
}

/// Generator double with a scripted response.
struct ScriptedGenerator {
    response: std::result::Result<Vec<Insight>, String>,
    called: std::sync::atomic::AtomicBool,
}

impl ScriptedGenerator {
    fn ok(title: &str) -> Self {
        Self {
            response: Ok(vec![sample_insight(title)]),
            called: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn failing() -> Self {
        Self {
            response: Err("connection refused".to_string()),
            called: std::sync::atomic::AtomicBool::new(false),
        }
    }

    fn was_called(&self) -> bool {
        self.called.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl NarrativeGenerator for &ScriptedGenerator {
    async fn generate(
        &self,
        _user_id: &str,
        _range: TimeRange,
        _report: &AnalyticsReport,
    ) -> Result<Vec<Insight>> {
        self.called.store(true, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(insights) => Ok(insights.clone()),
            Err(msg) => Err(selah_core::Error::Generator(msg.clone())),
        }
    }
}

// ============================================
// Report scenarios
// ============================================

#[test]
fn test_consecutive_week_produces_full_streak() {
    // Scenario: five consecutive active days ending today
    let today = date(2024, 6, 14);
    let collections = ActivityCollections {
        mood_entries: (10..=14).map(|d| mood_entry(date(2024, 6, d))).collect(),
        ..Default::default()
    };

    let report = generate_report(TimeRange::Month, &collections, today);

    assert_eq!(report.streaks.current, 5);
    assert_eq!(report.streaks.longest, 5);
    assert!(report.streaks.current <= report.streaks.longest);
}

#[test]
fn test_rising_spiritual_scores_classify_improving() {
    let today = date(2024, 6, 10);
    let scores = [3.0, 3.0, 3.0, 8.0, 8.0, 8.0];
    let collections = ActivityCollections {
        mood_entries: scores
            .iter()
            .enumerate()
            .map(|(i, s)| MoodEntry {
                spiritual_score: Some(*s),
                ..mood_entry(date(2024, 6, i as u32 + 1))
            })
            .collect(),
        ..Default::default()
    };

    let report = generate_report(TimeRange::Month, &collections, today);
    assert_eq!(report.trends.spiritual, Trend::Improving);
}

#[test]
fn test_prayer_correlation_scenario() {
    // prayer_time set exactly on high-score days across 10 entries
    let today = date(2024, 6, 15);
    let scores = [3.0, 8.0, 4.0, 9.0, 2.0, 7.0, 8.0, 3.0, 9.0, 4.0];
    let collections = ActivityCollections {
        mood_entries: scores
            .iter()
            .enumerate()
            .map(|(i, s)| MoodEntry {
                spiritual_score: Some(*s),
                mood_score: Some(*s),
                prayer_time: *s >= 7.0,
                ..mood_entry(date(2024, 6, i as u32 + 1))
            })
            .collect(),
        ..Default::default()
    };

    let report = generate_report(TimeRange::Month, &collections, today);

    let prayer = report
        .correlations
        .activities
        .iter()
        .find(|a| a.name == "Prayer")
        .expect("prayer correlation present");
    assert!(prayer.value > 0.3);
    assert!((-1.0..=1.0).contains(&prayer.value));
    assert!(report
        .correlations
        .insights
        .iter()
        .any(|i| i.to_lowercase().contains("prayer")));
}

#[test]
fn test_empty_month_report_defaults() {
    let today = date(2024, 6, 30);
    let report = generate_report(TimeRange::Month, &ActivityCollections::default(), today);

    assert_eq!(report.consistency.overall, 0.0);
    assert_eq!(report.trends.overall, Trend::Stable);
    assert_eq!(report.streaks.current, 0);
    assert_eq!(report.streaks.longest, 0);
    assert!(report.correlations.activities.is_empty());
    assert_eq!(report.patterns.day_of_week, [0.0; 7]);
    // Growth curve still has the window's bucket count, flat at the midpoint
    assert_eq!(report.patterns.growth.len(), 4);
}

#[test]
fn test_mixed_collections_report_shape() {
    let today = date(2024, 6, 20);
    let collections = ActivityCollections {
        mood_entries: (1..=20)
            .map(|d| MoodEntry {
                prayer_time: d % 2 == 0,
                bible_reading: d % 3 == 0,
                church_attendance: d % 7 == 0,
                mood_score: Some(5.0 + (d % 4) as f64),
                spiritual_score: Some(4.0 + (d % 5) as f64),
                ..mood_entry(date(2024, 6, d))
            })
            .collect(),
        prayer_requests: vec![PrayerRequest {
            id: "p1".to_string(),
            title: Some("Guidance".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 6, 5, 7, 0, 0).unwrap()),
            answered: true,
            answered_at: Some(Utc.with_ymd_and_hms(2024, 6, 12, 7, 0, 0).unwrap()),
        }],
        journal_entries: vec![JournalEntry {
            id: "j1".to_string(),
            entry_date: Some(date(2024, 6, 8)),
            created_at: None,
            title: None,
        }],
        scripture_memory: vec![ScriptureMemoryEntry {
            id: "s1".to_string(),
            reference: Some("Romans 8:28".to_string()),
            created_at: Some(Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap()),
            last_practiced: Some(Utc.with_ymd_and_hms(2024, 6, 18, 9, 0, 0).unwrap()),
        }],
        devotional_progress: vec![DevotionalProgress {
            id: "d1".to_string(),
            completed_date: Some(date(2024, 6, 3)),
            created_at: None,
            devotional_id: None,
        }],
        habit_logs: (1..=10)
            .map(|d| HabitLog {
                id: format!("h{}", d),
                habit_id: Some("morning-prayer".to_string()),
                completed_date: Some(date(2024, 6, d)),
                created_at: None,
            })
            .collect(),
        ..Default::default()
    };

    let report = generate_report(TimeRange::Month, &collections, today);

    // Consistency ratios are all in [0, 1]
    assert!((0.0..=1.0).contains(&report.consistency.overall));
    assert!((0.0..=1.0).contains(&report.consistency.prayer));
    assert!((0.0..=1.0).contains(&report.consistency.church));
    assert!(report.consistency.overall > 0.0);

    // Histogram normalized with at least one full bucket
    assert!(report
        .patterns
        .day_of_week
        .iter()
        .all(|v| (0.0..=1.0).contains(v)));
    assert!(report.patterns.day_of_week.iter().any(|v| *v == 1.0));

    // Counts flow through
    assert_eq!(report.activity_counts.mood_entries, 20);
    assert_eq!(report.activity_counts.answered_prayers, 1);
    assert_eq!(report.activity_counts.habits_logged, 10);

    // Serializes to a single JSON object
    let json = serde_json::to_value(&report).unwrap();
    assert!(json["consistency"]["overall"].is_number());
    assert!(json["patterns"]["growth"].is_array());
}

// ============================================
// Insight synthesis scenarios
// ============================================

#[tokio::test]
async fn test_same_day_cache_skips_generator() {
    // Scenario: fresh cache entry for (user, month) short-circuits the service
    let today = date(2024, 6, 15);
    let cache = MemoryInsightCache::new();
    cache
        .put(
            "user-1",
            TimeRange::Month,
            &CacheEntry {
                insights: vec![sample_insight("from cache")],
                analytics: serde_json::json!({}),
                generated_at: today.and_hms_opt(6, 30, 0).unwrap().and_utc(),
            },
        )
        .unwrap();

    let generator = ScriptedGenerator::ok("live");
    let synthesizer = InsightSynthesizer::new(cache, &generator);

    let report = generate_report(TimeRange::Month, &ActivityCollections::default(), today);
    let report = synthesizer
        .finalize("user-1", TimeRange::Month, report, today)
        .await;

    assert_eq!(report.insights[0].title, "from cache");
    assert!(!generator.was_called());
}

#[tokio::test]
async fn test_empty_sources_still_yield_insights() {
    // Scenario: all eight sources empty, generator down, no cache
    let today = date(2024, 6, 30);
    let generator = ScriptedGenerator::failing();
    let synthesizer = InsightSynthesizer::new(MemoryInsightCache::new(), &generator);

    let report = generate_report(TimeRange::Month, &ActivityCollections::default(), today);
    let report = synthesizer
        .finalize("user-1", TimeRange::Month, report, today)
        .await;

    assert!(!report.insights.is_empty());
    assert!(report.insights.iter().any(|i| i.kind == InsightKind::Opportunity));
    assert!(generator.was_called());
}

#[tokio::test]
async fn test_successful_generation_lands_in_sqlite_cache() {
    let today = date(2024, 6, 15);
    let cache = SqliteInsightCache::open_in_memory().unwrap();
    let generator = ScriptedGenerator::ok("live");

    {
        let synthesizer = InsightSynthesizer::new(&cache, &generator);
        let report = generate_report(TimeRange::Week, &ActivityCollections::default(), today);
        let report = synthesizer
            .finalize("user-1", TimeRange::Week, report, today)
            .await;
        assert_eq!(report.insights[0].title, "live");
    }

    let entry = cache.get("user-1", TimeRange::Week).unwrap().unwrap();
    assert_eq!(entry.insights[0].title, "live");
    assert!(entry.analytics["streaks"]["current"].is_number());
}
