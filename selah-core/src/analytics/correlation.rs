//! Pearson correlations between activity indicators and wellbeing scores.

use crate::analytics::report::{ActivityCorrelation, CorrelationStats};
use crate::types::ActivityCollections;

const MIN_SAMPLES: usize = 3;
const NOTABLE_THRESHOLD: f64 = 0.3;
const STRONG_THRESHOLD: f64 = 0.5;

/// Compute the correlation block of the report.
///
/// Each mood check-in supplies a binary activity indicator (prayed, read,
/// attended) and its continuous wellbeing scores. Fewer than three usable
/// samples yields no coefficients and a single insufficient-data note.
pub fn calculate(collections: &ActivityCollections) -> CorrelationStats {
    let samples: Vec<Sample> = collections
        .mood_entries
        .iter()
        .filter_map(|e| {
            Some(Sample {
                prayer: bool_to_f64(e.prayer_time),
                bible: bool_to_f64(e.bible_reading),
                church: bool_to_f64(e.church_attendance),
                mood: e.mood_score?,
                spiritual: e.spiritual_score?,
            })
        })
        .collect();

    if samples.len() < MIN_SAMPLES {
        return CorrelationStats {
            activities: Vec::new(),
            insights: vec![
                "Not enough check-ins yet to see how your activities connect to wellbeing. Keep logging daily!".to_string(),
            ],
        };
    }

    let prayer_spiritual = pearson(
        &samples.iter().map(|s| s.prayer).collect::<Vec<_>>(),
        &samples.iter().map(|s| s.spiritual).collect::<Vec<_>>(),
    );
    let bible_spiritual = pearson(
        &samples.iter().map(|s| s.bible).collect::<Vec<_>>(),
        &samples.iter().map(|s| s.spiritual).collect::<Vec<_>>(),
    );
    let church_spiritual = pearson(
        &samples.iter().map(|s| s.church).collect::<Vec<_>>(),
        &samples.iter().map(|s| s.spiritual).collect::<Vec<_>>(),
    );
    let prayer_mood = pearson(
        &samples.iter().map(|s| s.prayer).collect::<Vec<_>>(),
        &samples.iter().map(|s| s.mood).collect::<Vec<_>>(),
    );
    let bible_mood = pearson(
        &samples.iter().map(|s| s.bible).collect::<Vec<_>>(),
        &samples.iter().map(|s| s.mood).collect::<Vec<_>>(),
    );

    let activities = vec![
        ActivityCorrelation {
            name: "Prayer".to_string(),
            value: prayer_spiritual,
        },
        ActivityCorrelation {
            name: "Bible Reading".to_string(),
            value: bible_spiritual,
        },
        ActivityCorrelation {
            name: "Church".to_string(),
            value: church_spiritual,
        },
    ];

    let insights = derive_insights(
        prayer_spiritual,
        bible_spiritual,
        church_spiritual,
        prayer_mood,
        bible_mood,
    );

    CorrelationStats {
        activities,
        insights,
    }
}

fn derive_insights(
    prayer_spiritual: f64,
    bible_spiritual: f64,
    church_spiritual: f64,
    prayer_mood: f64,
    bible_mood: f64,
) -> Vec<String> {
    let mut insights = Vec::new();

    if prayer_spiritual > STRONG_THRESHOLD && bible_spiritual > STRONG_THRESHOLD {
        insights.push(
            "Both prayer and Bible reading strongly correlate with your spiritual wellbeing. These two habits are the backbone of your growth."
                .to_string(),
        );
    } else {
        if prayer_spiritual > NOTABLE_THRESHOLD {
            insights.push(
                "Days with prayer time tend to be days of stronger spiritual wellbeing.".to_string(),
            );
        }
        if bible_spiritual > NOTABLE_THRESHOLD {
            insights.push(
                "Bible reading shows a clear connection to your spiritual wellbeing.".to_string(),
            );
        }
    }

    if church_spiritual > NOTABLE_THRESHOLD {
        insights
            .push("Attending church lines up with your strongest spiritual days.".to_string());
    }
    if prayer_mood > NOTABLE_THRESHOLD {
        insights.push("Prayer also appears to lift your overall mood.".to_string());
    }
    if bible_mood > NOTABLE_THRESHOLD {
        insights.push("Time in Scripture tends to go hand in hand with better mood.".to_string());
    }

    if insights.is_empty() {
        insights.push(
            "No single activity stands out yet. Keep logging and patterns will emerge over time."
                .to_string(),
        );
    }

    insights
}

/// Pearson correlation coefficient, 0 when either series has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = x[i] - mean_x;
        let dy = y[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }

    cov / (var_x * var_y).sqrt()
}

fn bool_to_f64(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    prayer: f64,
    bible: f64,
    church: f64,
    mood: f64,
    spiritual: f64,
}
