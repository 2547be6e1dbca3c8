//! Progression configuration (level curve and XP table)

use serde::Deserialize;

use crate::domain::leveling::{LevelCurve, XpRewards, DEFAULT_LEVEL_COST};

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProgressionConfig {
    /// XP needed to clear one level.
    #[serde(default = "default_level_cost")]
    pub level_cost: u64,

    /// XP granted per completed lesson, by lesson kind.
    #[serde(default)]
    pub xp: XpRewards,
}

impl ProgressionConfig {
    pub fn level_curve(&self) -> Result<LevelCurve, ValidationError> {
        LevelCurve::new(self.level_cost).map_err(|_| ValidationError::InvalidLevelCost)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.level_curve()?;
        for (kind, amount) in [
            ("video", self.xp.video),
            ("interactive_3d", self.xp.interactive_3d),
            ("quiz", self.xp.quiz),
        ] {
            if amount == 0 {
                return Err(ValidationError::InvalidXpReward(kind.to_string()));
            }
        }
        Ok(())
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            level_cost: default_level_cost(),
            xp: XpRewards::default(),
        }
    }
}

fn default_level_cost() -> u64 {
    DEFAULT_LEVEL_COST
}
