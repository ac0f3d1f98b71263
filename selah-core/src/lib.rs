//! # selah-core
//!
//! Analytics engine for spiritual-activity tracking.
//!
//! This library turns heterogeneous, timestamped user-activity records (mood
//! check-ins, prayer requests, journal entries, scripture memory, study
//! notes, devotional progress, habit logs, reading reflections) into one
//! structured analytics report: consistency ratios, trends, streaks,
//! correlations, activity patterns and narrative insights.
//!
//! ## Architecture
//!
//! The engine is a pure transformation: the caller fetches the eight record
//! collections for a window (concurrently, joined before calling in), then
//!
//! 1. [`analytics::generate_report`] computes the full report synchronously
//! 2. [`insight::InsightSynthesizer`] attaches narrative insights, consulting
//!    a same-day cache, an external generator service and a static rule-based
//!    fallback in that order
//!
//! Nothing is fetched or persisted by the report computation itself; the
//! cache and generator are injected collaborators.
//!
//! ## Example
//!
//! ```rust,no_run
//! use selah_core::analytics::generate_report_now;
//! use selah_core::cache::SqliteInsightCache;
//! use selah_core::insight::{GeneratorClient, InsightSynthesizer};
//! use selah_core::{ActivityCollections, Config, TimeRange};
//!
//! # async fn run(collections: ActivityCollections) -> selah_core::Result<()> {
//! let config = Config::load()?;
//! let cache = SqliteInsightCache::open(&Config::cache_path())?;
//! let generator = GeneratorClient::new(config.generator)?;
//! let synthesizer = InsightSynthesizer::new(cache, generator);
//!
//! let report = generate_report_now(TimeRange::Month, &collections);
//! let report = synthesizer
//!     .finalize("user-1", TimeRange::Month, report, chrono::Utc::now().date_naive())
//!     .await;
//! # let _ = report;
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analytics::{generate_report, generate_report_now, AnalyticsReport};
pub use config::Config;
pub use error::{Error, Result};
pub use insight::InsightSynthesizer;
pub use types::{ActivityCollections, ActivityRecord, TimeRange};

// Public modules
pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod insight;
pub mod logging;
pub mod types;
