//! The progress engine and the pure rules it is built from.

pub mod achievements;
pub mod budget;
pub mod clock;
pub mod engine;
pub mod leveling;
pub mod services;
pub mod snapshot;
pub mod streak;
