//! Achievement domain module.
//!
//! One-way unlockable flags. Each achievement is a pure predicate over a
//! `LearnerSnapshot`, kept in an `AchievementRegistry`.

mod definition;
mod registry;
mod rule;

pub use definition::{AchievementDefinition, AchievementStatus};
pub use registry::{AchievementPredicate, AchievementRegistry, RegisteredAchievement};
pub use rule::{AchievementRule, LearnerSnapshot};
