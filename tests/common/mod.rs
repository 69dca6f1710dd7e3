#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use mana_core::{Config, ManualClock, ProgressEngine, ProgressSnapshot};

pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 7, 9, 30, 0).unwrap()
}

/// Engine with default config on a clock the test controls.
pub fn engine_with_clock() -> (ProgressEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_instant()));
    let engine = ProgressEngine::new(Config::default(), clock.clone());
    (engine, clock)
}

pub fn one_day() -> Duration {
    Duration::days(1)
}

pub fn sum_of_amounts(snapshot: &ProgressSnapshot) -> f64 {
    snapshot.transactions.iter().map(|t| t.amount).sum()
}
