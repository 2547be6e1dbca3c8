//! Achievement rules and the snapshot they are evaluated against.

use serde::{Deserialize, Serialize};

use crate::domain::leveling::LevelCurve;
use crate::domain::progress::{Enrollment, LearnerRecord};

/// Read-only view of a learner handed to achievement predicates.
///
/// Captured after the operation that triggered evaluation has been applied,
/// so predicates see the post-update XP and completion counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnerSnapshot {
    pub enrollments: Vec<Enrollment>,
    pub total_xp: u64,
    pub level: u32,
    pub lessons_completed: u32,
    pub courses_completed: u32,
}

impl LearnerSnapshot {
    pub fn capture(record: &LearnerRecord, curve: &LevelCurve) -> Self {
        let total_xp = record.experience().total_xp();
        Self {
            enrollments: record.enrollments().cloned().collect(),
            total_xp,
            level: curve.state_for(total_xp).level,
            lessons_completed: record.lessons_completed(),
            courses_completed: record.courses_completed(),
        }
    }
}

/// Declarative unlock conditions that can be loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AchievementRule {
    FirstLesson,
    LessonsCompleted { count: u32 },
    CoursesCompleted { count: u32 },
    LevelReached { level: u32 },
}

impl AchievementRule {
    pub fn is_satisfied(&self, snapshot: &LearnerSnapshot) -> bool {
        match *self {
            AchievementRule::FirstLesson => snapshot.lessons_completed >= 1,
            AchievementRule::LessonsCompleted { count } => snapshot.lessons_completed >= count,
            AchievementRule::CoursesCompleted { count } => snapshot.courses_completed >= count,
            AchievementRule::LevelReached { level } => snapshot.level >= level,
        }
    }
}
