//! Deterministic rule-based insights.
//!
//! Last resort of the synthesizer's fallback chain: when the narrative
//! service is unreachable and no cache entry exists, these rules turn the
//! already-computed report into a small set of structured insights so the
//! caller always gets something to show.

use crate::analytics::report::{
    AnalyticsReport, Insight, InsightKind, ScriptureRef, Trend,
};

/// Build static insights from the computed report. Never returns empty.
pub fn static_insights(report: &AnalyticsReport) -> Vec<Insight> {
    vec![
        strength_insight(report),
        growth_insight(report),
        opportunity_insight(report),
    ]
}

fn strength_insight(report: &AnalyticsReport) -> Insight {
    let (title, content) = if report.streaks.current >= 3 {
        (
            "Consistent presence".to_string(),
            format!(
                "You are on a {}-day activity streak. Daily faithfulness in small things is where growth takes root.",
                report.streaks.current
            ),
        )
    } else if report.consistency.prayer >= 0.5 {
        (
            "A praying rhythm".to_string(),
            "Prayer showed up on at least half the days of this period. That rhythm is a real strength to build on.".to_string(),
        )
    } else if let Some(positive) = report.patterns.positives.first() {
        ("Something to celebrate".to_string(), positive.clone())
    } else {
        (
            "You showed up".to_string(),
            "You logged activity this period, and every entry is a deliberate step toward growth.".to_string(),
        )
    };

    Insight {
        kind: InsightKind::Strength,
        title,
        content,
        scripture: scripture_for("faithfulness"),
    }
}

fn growth_insight(report: &AnalyticsReport) -> Insight {
    let (title, content, theme) = match report.trends.overall {
        Trend::Improving => (
            "Momentum is building".to_string(),
            "Your mood and spiritual wellbeing both moved upward across this period. Whatever you changed recently, keep it going.".to_string(),
            "growth",
        ),
        Trend::Declining => (
            "A season to tend".to_string(),
            "Your wellbeing scores slipped in the second half of this period. Seasons like this are normal; the habits you keep now matter most.".to_string(),
            "perseverance",
        ),
        Trend::Stable => (
            "Steady ground".to_string(),
            "Your wellbeing held steady across this period. Stability is a fine base for adding one new practice.".to_string(),
            "steadfastness",
        ),
    };

    Insight {
        kind: InsightKind::Growth,
        title,
        content,
        scripture: scripture_for(theme),
    }
}

fn opportunity_insight(report: &AnalyticsReport) -> Insight {
    let content = report
        .patterns
        .opportunities
        .first()
        .cloned()
        .unwrap_or_else(|| {
            "Pick one spiritual practice and give it five focused minutes a day next week.".to_string()
        });

    Insight {
        kind: InsightKind::Opportunity,
        title: "One next step".to_string(),
        content,
        scripture: scripture_for("renewal"),
    }
}

fn scripture_for(theme: &str) -> ScriptureRef {
    let (reference, text) = match theme {
        "faithfulness" => (
            "Galatians 6:9",
            "Let us not become weary in doing good, for at the proper time we will reap a harvest if we do not give up.",
        ),
        "growth" => (
            "Philippians 1:6",
            "He who began a good work in you will carry it on to completion until the day of Christ Jesus.",
        ),
        "perseverance" => (
            "Isaiah 40:31",
            "Those who hope in the Lord will renew their strength. They will soar on wings like eagles.",
        ),
        "steadfastness" => (
            "Psalm 1:3",
            "That person is like a tree planted by streams of water, which yields its fruit in season.",
        ),
        _ => (
            "Lamentations 3:22-23",
            "His compassions never fail. They are new every morning; great is your faithfulness.",
        ),
    };

    ScriptureRef {
        reference: reference.to_string(),
        text: text.to_string(),
    }
}
