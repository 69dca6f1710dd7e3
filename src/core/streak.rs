use chrono::{DateTime, Utc};

const DAY_MILLIS: i64 = 86_400_000;

/// Whole days between two instants, floored (not calendar days).
pub fn days_between(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last).num_milliseconds().div_euclid(DAY_MILLIS)
}

/// Streak value after logging at `now`.
///
/// Same day keeps the streak, the next day extends it, any other gap
/// (including a clock that moved backwards) restarts it at one.
pub fn next_streak(current: u32, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(last) = last else {
        return 1;
    };
    match days_between(last, now) {
        0 => current,
        1 => current.saturating_add(1),
        _ => 1,
    }
}
