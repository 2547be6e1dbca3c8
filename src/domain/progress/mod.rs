//! Progress domain module.
//!
//! Enrollment tracking, the per-learner aggregate and the events emitted
//! when a learner makes progress.

mod enrollment;
mod errors;
mod events;
mod learner;
mod summary;

pub use enrollment::Enrollment;
pub use errors::ProgressError;
pub use events::{AchievementEarned, ExperienceAwarded, LessonCompleted};
pub use learner::LearnerRecord;
pub use summary::DashboardSummary;
