//! Level curve and derived level state.
//!
//! Levels sit at multiples of a fixed per-level XP cost:
//!
//! ```text
//! level            = floor(total_xp / cost) + 1
//! xp_into_level    = total_xp mod cost
//! xp_to_next_level = cost - xp_into_level
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Percentage, ValidationError};

/// Default XP needed to clear one level.
pub const DEFAULT_LEVEL_COST: u64 = 500;

/// Deterministic mapping from accumulated XP to a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCurve {
    level_cost: u64,
}

impl LevelCurve {
    pub fn new(level_cost: u64) -> Result<Self, ValidationError> {
        if level_cost == 0 {
            return Err(ValidationError::out_of_range(
                "level_cost",
                1,
                i64::MAX,
                0,
            ));
        }
        Ok(Self { level_cost })
    }

    pub fn level_cost(&self) -> u64 {
        self.level_cost
    }

    /// Computes the level state for a total. Pure; never cached.
    pub fn state_for(&self, total_xp: u64) -> LevelState {
        let level = u32::try_from(total_xp / self.level_cost)
            .unwrap_or(u32::MAX - 1)
            .saturating_add(1);
        let xp_into_level = total_xp % self.level_cost;

        LevelState {
            level,
            xp_into_level,
            xp_to_next_level: self.level_cost - xp_into_level,
            level_cost: self.level_cost,
        }
    }

    /// Minimum total XP at which `level` is reached.
    pub fn threshold_for(&self, level: u32) -> u64 {
        u64::from(level.saturating_sub(1)).saturating_mul(self.level_cost)
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self {
            level_cost: DEFAULT_LEVEL_COST,
        }
    }
}

/// Derived view of a learner's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    level_cost: u64,
}

impl LevelState {
    /// Progress through the current level.
    pub fn progress(&self) -> Percentage {
        Percentage::from_ratio(self.xp_into_level, self.level_cost)
    }
}

/// A learner's accumulated experience. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceState {
    total_xp: u64,
}

impl ExperienceState {
    pub fn total_xp(&self) -> u64 {
        self.total_xp
    }

    /// Adds a positive amount, saturating at `u64::MAX`.
    pub fn award(&mut self, amount: u32) -> Result<u64, ValidationError> {
        if amount == 0 {
            return Err(ValidationError::out_of_range(
                "amount",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        self.total_xp = self.total_xp.saturating_add(u64::from(amount));
        Ok(self.total_xp)
    }
}

/// Result of an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpdate {
    pub amount: u32,
    pub total_xp: u64,
    pub previous_level: u32,
    pub state: LevelState,
}

impl LevelUpdate {
    /// True when the award pushed the learner into a higher level.
    pub fn leveled_up(&self) -> bool {
        self.state.level > self.previous_level
    }

    /// Number of levels gained by this award.
    pub fn levels_gained(&self) -> u32 {
        self.state.level.saturating_sub(self.previous_level)
    }
}
