//! Narrative-insight synthesis.
//!
//! The report itself is computed synchronously before this layer runs; the
//! only potentially blocking work here is the call to the external narrative
//! service. The synthesizer wraps that call in a bounded timeout and a
//! fallback chain, so it always returns *some* insight list:
//!
//! ```text
//! CheckCache ──fresh──────────────────────────▶ return cached
//!     │ stale/missing
//!     ▼
//! GenerateLive ──success──▶ persist cache ────▶ return generated
//!     │ failure/timeout
//!     ▼
//! FallbackOlderCache ──found──────────────────▶ return stale cached
//!     │ not found
//!     ▼
//! StaticInsights ─────────────────────────────▶ return rule-based
//! ```
//!
//! Both collaborators arrive as dependencies, so the whole state machine is
//! unit-testable without a real store or service.

pub mod fallback;
pub mod generator;

use crate::analytics::report::{AnalyticsReport, Insight};
use crate::error::Result;
use crate::types::TimeRange;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use fallback::static_insights;
pub use generator::{GeneratorClient, GeneratorConfig};

/// One cached synthesis result, keyed externally by `(user_id, time_range)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub insights: Vec<Insight>,
    /// Snapshot of the report the insights were generated from
    pub analytics: serde_json::Value,
    pub generated_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Freshness is same-calendar-day only; there is no other TTL.
    pub fn is_fresh(&self, today: NaiveDate) -> bool {
        self.generated_at.date_naive() == today
    }
}

/// Cache collaborator: upsert-by-key store for daily synthesis results.
pub trait InsightCache {
    fn get(&self, user_id: &str, range: TimeRange) -> Result<Option<CacheEntry>>;
    fn put(&self, user_id: &str, range: TimeRange, entry: &CacheEntry) -> Result<()>;
}

impl<C: InsightCache + ?Sized> InsightCache for &C {
    fn get(&self, user_id: &str, range: TimeRange) -> Result<Option<CacheEntry>> {
        (**self).get(user_id, range)
    }

    fn put(&self, user_id: &str, range: TimeRange, entry: &CacheEntry) -> Result<()> {
        (**self).put(user_id, range, entry)
    }
}

/// Narrative-generator collaborator: turns a computed report into prose
/// insights over an authenticated channel. The synthesizer bounds every call
/// with its own timeout, so implementations may block on the network.
#[allow(async_fn_in_trait)]
pub trait NarrativeGenerator {
    async fn generate(
        &self,
        user_id: &str,
        range: TimeRange,
        report: &AnalyticsReport,
    ) -> Result<Vec<Insight>>;

    /// Cheap connectivity probe, consulted before the main call. Defaults to
    /// reachable for implementations with nothing to probe.
    async fn probe(&self) -> bool {
        true
    }
}

const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Cache-aware orchestration around the narrative generator.
pub struct InsightSynthesizer<C, G> {
    cache: C,
    generator: G,
    generate_timeout: Duration,
    probe_timeout: Duration,
}

impl<C, G> InsightSynthesizer<C, G>
where
    C: InsightCache,
    G: NarrativeGenerator,
{
    pub fn new(cache: C, generator: G) -> Self {
        Self {
            cache,
            generator,
            generate_timeout: DEFAULT_GENERATE_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Override the generation-call timeout.
    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Override the connectivity-probe timeout.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Produce the insight list for a report. Never fails and never returns
    /// an empty list; every branch of the fallback chain terminates.
    pub async fn synthesize(
        &self,
        user_id: &str,
        range: TimeRange,
        report: &AnalyticsReport,
        today: NaiveDate,
    ) -> Vec<Insight> {
        // CheckCache
        let cached = match self.cache.get(user_id, range) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(user_id, range = range.as_str(), error = %e, "Cache read failed, treating as miss");
                None
            }
        };

        if let Some(entry) = &cached {
            if entry.is_fresh(today) && !entry.insights.is_empty() {
                tracing::debug!(
                    user_id,
                    range = range.as_str(),
                    generated_at = %entry.generated_at,
                    "Using same-day cached insights"
                );
                return entry.insights.clone();
            }
        }

        // GenerateLive
        match self.generate_live(user_id, range, report).await {
            Ok(insights) if !insights.is_empty() => {
                self.persist(user_id, range, report, &insights);
                return insights;
            }
            Ok(_) => {
                tracing::warn!(user_id, range = range.as_str(), "Generator returned no insights");
            }
            Err(e) => {
                tracing::warn!(user_id, range = range.as_str(), error = %e, "Live generation failed");
            }
        }

        // FallbackOlderCache
        if let Some(entry) = cached {
            if !entry.insights.is_empty() {
                tracing::info!(
                    user_id,
                    range = range.as_str(),
                    generated_at = %entry.generated_at,
                    "Falling back to older cached insights"
                );
                return entry.insights;
            }
        }

        // StaticInsights
        tracing::info!(user_id, range = range.as_str(), "Using static rule-based insights");
        static_insights(report)
    }

    /// Synthesize and attach insights, returning the finalized report.
    pub async fn finalize(
        &self,
        user_id: &str,
        range: TimeRange,
        mut report: AnalyticsReport,
        today: NaiveDate,
    ) -> AnalyticsReport {
        report.insights = self.synthesize(user_id, range, &report, today).await;
        report
    }

    async fn generate_live(
        &self,
        user_id: &str,
        range: TimeRange,
        report: &AnalyticsReport,
    ) -> Result<Vec<Insight>> {
        match tokio::time::timeout(self.probe_timeout, self.generator.probe()).await {
            Ok(true) => {}
            Ok(false) => {
                return Err(crate::Error::Generator(
                    "generator probe reported unreachable".to_string(),
                ))
            }
            Err(_) => {
                return Err(crate::Error::Generator(format!(
                    "generator probe timed out after {:?}",
                    self.probe_timeout
                )))
            }
        }

        match tokio::time::timeout(
            self.generate_timeout,
            self.generator.generate(user_id, range, report),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(crate::Error::Generator(format!(
                "generation timed out after {:?}",
                self.generate_timeout
            ))),
        }
    }

    /// Cache writes happen only after successful generation; failures are
    /// logged and swallowed.
    fn persist(&self, user_id: &str, range: TimeRange, report: &AnalyticsReport, insights: &[Insight]) {
        let analytics = match serde_json::to_value(report) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Failed to serialize report for cache");
                return;
            }
        };

        let entry = CacheEntry {
            insights: insights.to_vec(),
            analytics,
            generated_at: Utc::now(),
        };

        if let Err(e) = self.cache.put(user_id, range, &entry) {
            tracing::warn!(user_id, range = range.as_str(), error = %e, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::generate_report;
    use crate::analytics::report::InsightKind;
    use crate::cache::MemoryInsightCache;
    use crate::types::ActivityCollections;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn report() -> AnalyticsReport {
        generate_report(TimeRange::Month, &ActivityCollections::default(), today())
    }

    fn insight(title: &str) -> Insight {
        Insight {
            kind: InsightKind::Strength,
            title: title.to_string(),
            content: "content".to_string(),
            scripture: crate::analytics::ScriptureRef {
                reference: "John 15:5".to_string(),
                text: "Apart from me you can do nothing.".to_string(),
            },
        }
    }

    /// Generator test double: scripted outcome plus a call counter.
    struct FakeGenerator {
        outcome: Result<Vec<Insight>>,
        reachable: bool,
        calls: Arc<AtomicUsize>,
    }

    impl FakeGenerator {
        fn succeeding(title: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    outcome: Ok(vec![insight(title)]),
                    reachable: true,
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn failing() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    outcome: Err(crate::Error::Generator("service down".to_string())),
                    reachable: true,
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn unreachable() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    outcome: Ok(vec![]),
                    reachable: false,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl NarrativeGenerator for FakeGenerator {
        async fn generate(
            &self,
            _user_id: &str,
            _range: TimeRange,
            _report: &AnalyticsReport,
        ) -> Result<Vec<Insight>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(insights) => Ok(insights.clone()),
                Err(_) => Err(crate::Error::Generator("service down".to_string())),
            }
        }

        async fn probe(&self) -> bool {
            self.reachable
        }
    }

    #[tokio::test]
    async fn test_fresh_cache_short_circuits_generator() {
        let cache = MemoryInsightCache::new();
        let entry = CacheEntry {
            insights: vec![insight("cached")],
            analytics: serde_json::json!({}),
            generated_at: today().and_hms_opt(8, 0, 0).unwrap().and_utc(),
        };
        cache.put("user-1", TimeRange::Month, &entry).unwrap();

        let (generator, calls) = FakeGenerator::succeeding("live");
        let synthesizer = InsightSynthesizer::new(cache, generator);

        let insights = synthesizer
            .synthesize("user-1", TimeRange::Month, &report(), today())
            .await;

        assert_eq!(insights[0].title, "cached");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_live_generation_and_persists() {
        let cache = MemoryInsightCache::new();
        let stale = CacheEntry {
            insights: vec![insight("old")],
            analytics: serde_json::json!({}),
            generated_at: (today() - chrono::Duration::days(2))
                .and_hms_opt(8, 0, 0)
                .unwrap()
                .and_utc(),
        };
        cache.put("user-1", TimeRange::Month, &stale).unwrap();

        let (generator, calls) = FakeGenerator::succeeding("live");
        let synthesizer = InsightSynthesizer::new(cache.clone(), generator);

        let insights = synthesizer
            .synthesize("user-1", TimeRange::Month, &report(), today())
            .await;

        assert_eq!(insights[0].title, "live");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let written = cache.get("user-1", TimeRange::Month).unwrap().unwrap();
        assert_eq!(written.insights[0].title, "live");
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_stale_cache() {
        let cache = MemoryInsightCache::new();
        let stale = CacheEntry {
            insights: vec![insight("old")],
            analytics: serde_json::json!({}),
            generated_at: (today() - chrono::Duration::days(1))
                .and_hms_opt(8, 0, 0)
                .unwrap()
                .and_utc(),
        };
        cache.put("user-1", TimeRange::Month, &stale).unwrap();

        let (generator, _) = FakeGenerator::failing();
        let synthesizer = InsightSynthesizer::new(cache, generator);

        let insights = synthesizer
            .synthesize("user-1", TimeRange::Month, &report(), today())
            .await;

        assert_eq!(insights[0].title, "old");
    }

    #[tokio::test]
    async fn test_failure_without_cache_uses_static_insights() {
        let (generator, _) = FakeGenerator::failing();
        let synthesizer = InsightSynthesizer::new(MemoryInsightCache::new(), generator);

        let insights = synthesizer
            .synthesize("user-1", TimeRange::Month, &report(), today())
            .await;

        assert!(!insights.is_empty());
        assert!(insights.iter().any(|i| i.kind == InsightKind::Strength));
    }

    #[tokio::test]
    async fn test_unreachable_probe_skips_generate_call() {
        let (generator, calls) = FakeGenerator::unreachable();
        let synthesizer = InsightSynthesizer::new(MemoryInsightCache::new(), generator);

        let insights = synthesizer
            .synthesize("user-1", TimeRange::Month, &report(), today())
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!insights.is_empty());
    }

    #[tokio::test]
    async fn test_finalize_attaches_insights() {
        let (generator, _) = FakeGenerator::succeeding("live");
        let synthesizer = InsightSynthesizer::new(MemoryInsightCache::new(), generator);

        let finalized = synthesizer
            .finalize("user-1", TimeRange::Month, report(), today())
            .await;

        assert_eq!(finalized.insights[0].title, "live");
    }
}
