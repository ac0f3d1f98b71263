//! Consecutive-activity-day streaks.

use crate::analytics::report::StreakStats;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeSet;

/// Compute current and longest streaks from the activity-day set.
///
/// The current streak uses a two-day lookback: a missed "today" with an
/// active yesterday does not reset the streak, but if neither today nor
/// yesterday has activity the streak is 0. This exact rule, not a generic
/// run-length count ending anywhere, is what the product's streak display
/// promises.
pub fn calculate(activity_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> StreakStats {
    StreakStats {
        current: current_streak(activity_days, today),
        longest: longest_streak(activity_days),
    }
}

fn longest_streak(activity_days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut previous: Option<NaiveDate> = None;

    for day in activity_days {
        run = match previous {
            Some(prev) if (*day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    longest
}

fn current_streak(activity_days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today - Duration::days(1);

    // Grace rule: one quiet "today" is tolerated, two quiet days are not.
    let anchor = if activity_days.contains(&today) {
        today
    } else if activity_days.contains(&yesterday) {
        yesterday
    } else {
        return 0;
    };

    let mut streak = 0u32;
    let mut day = anchor;
    while activity_days.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }

    streak
}
