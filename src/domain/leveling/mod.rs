//! Leveling domain module.
//!
//! Pure XP arithmetic: the level curve, the derived `LevelState`, the
//! additive `ExperienceState` and the per-lesson XP table.

mod curve;
mod rewards;

pub use curve::{ExperienceState, LevelCurve, LevelState, LevelUpdate, DEFAULT_LEVEL_COST};
pub use rewards::XpRewards;
