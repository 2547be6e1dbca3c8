//! Progress domain events.
//!
//! Published after a learner record has been committed:
//! - `LessonCompleted` - a lesson was newly added to an enrollment
//! - `ExperienceAwarded` - XP was added to the learner's total
//! - `AchievementEarned` - a locked achievement became earned

use serde::{Deserialize, Serialize};

use crate::domain::catalog::LessonKind;
use crate::domain::foundation::{
    domain_event, AchievementId, CourseId, EventId, LessonId, Percentage, Timestamp, UserId,
};

// ════════════════════════════════════════════════════════════════════════════
// LessonCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Emitted exactly once per lesson per learner, on the call that changed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompleted {
    pub event_id: EventId,
    pub learner_id: UserId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub lesson_kind: LessonKind,
    /// Course progress after this lesson.
    pub progress: Percentage,
    /// True when this lesson finished the course.
    pub course_completed: bool,
    pub completed_at: Timestamp,
}

domain_event!(
    LessonCompleted,
    event_type = "lesson.completed.v1",
    aggregate_id = learner_id,
    aggregate_type = "Learner",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ExperienceAwarded
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceAwarded {
    pub event_id: EventId,
    pub learner_id: UserId,
    pub amount: u32,
    pub total_xp: u64,
    pub level: u32,
    /// Lets the UI trigger its level-up celebration.
    pub leveled_up: bool,
    pub awarded_at: Timestamp,
}

domain_event!(
    ExperienceAwarded,
    event_type = "experience.awarded.v1",
    aggregate_id = learner_id,
    aggregate_type = "Learner",
    occurred_at = awarded_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// AchievementEarned
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementEarned {
    pub event_id: EventId,
    pub learner_id: UserId,
    pub achievement_id: AchievementId,
    pub earned_at: Timestamp,
}

domain_event!(
    AchievementEarned,
    event_type = "achievement.earned.v1",
    aggregate_id = learner_id,
    aggregate_type = "Learner",
    occurred_at = earned_at,
    event_id = event_id
);
