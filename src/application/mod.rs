//! Application layer - services orchestrating the domain over ports.
//!
//! - `SessionManager` - authentication state machine
//! - `ProgressStore` - enrollment and lesson completion
//! - `LevelingSystem` - XP awards and level reads
//! - `AchievementEngine` - achievement evaluation
//! - `LearnerLedger` - serialized, single-write learner updates shared by the above
//! - `Academy` - composition root

mod academy;
mod achievement_engine;
mod delivery;
mod learner_ledger;
mod leveling_system;
mod progress_store;
mod session_manager;

pub use academy::{Academy, AcademyPorts};
pub use achievement_engine::AchievementEngine;
pub use learner_ledger::{LearnerLedger, LearnerTransaction};
pub use leveling_system::LevelingSystem;
pub use progress_store::{LessonCompletion, ProgressStore};
pub use session_manager::{SessionManager, SubscriptionId};
