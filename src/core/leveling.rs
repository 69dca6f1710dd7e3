use serde::{Deserialize, Serialize};

/// Experience and level counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpOutcome {
    Accumulated,
    LeveledUp { level: u32 },
}

impl Progression {
    pub fn new(xp_per_level: u32) -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: xp_per_level,
        }
    }

    /// Adds `amount` experience, advancing at most one level per call.
    ///
    /// On a level-up the threshold becomes `new_level * xp_per_level` and the
    /// overflow carries over as-is, even if it already exceeds the new threshold.
    pub fn add_xp(&mut self, amount: u32, xp_per_level: u32) -> XpOutcome {
        let new_xp = self.xp.saturating_add(amount);
        if new_xp < self.xp_to_next_level {
            self.xp = new_xp;
            return XpOutcome::Accumulated;
        }

        let new_level = self.level.saturating_add(1);
        self.xp = new_xp - self.xp_to_next_level;
        self.xp_to_next_level = new_level.saturating_mul(xp_per_level);
        self.level = new_level;
        XpOutcome::LeveledUp { level: new_level }
    }

    /// Fraction of the current level completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.xp_to_next_level == 0 {
            return 1.0;
        }
        (f64::from(self.xp) / f64::from(self.xp_to_next_level)).clamp(0.0, 1.0)
    }
}
