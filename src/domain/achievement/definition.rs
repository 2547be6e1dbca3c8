//! Achievement definitions and learner-facing status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AchievementId, Timestamp};

use super::AchievementRule;

/// A configurable achievement: metadata plus a declarative rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub rule: AchievementRule,
}

impl AchievementDefinition {
    pub fn new(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        rule: AchievementRule,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            rule,
        }
    }

    /// Built-in achievements shown on the learner dashboard.
    pub fn defaults() -> Vec<AchievementDefinition> {
        [
            ("first-steps", "First Steps", "Complete your first lesson", AchievementRule::FirstLesson),
            (
                "dedicated-student",
                "Dedicated Student",
                "Complete 10 lessons",
                AchievementRule::LessonsCompleted { count: 10 },
            ),
            (
                "course-master",
                "Course Master",
                "Complete your first course",
                AchievementRule::CoursesCompleted { count: 1 },
            ),
            (
                "knowledge-seeker",
                "Knowledge Seeker",
                "Complete 5 courses",
                AchievementRule::CoursesCompleted { count: 5 },
            ),
            ("rising-star", "Rising Star", "Reach level 5", AchievementRule::LevelReached { level: 5 }),
        ]
        .into_iter()
        .filter_map(|(id, title, description, rule)| {
            AchievementId::new(id)
                .ok()
                .map(|id| AchievementDefinition::new(id, title, description, rule))
        })
        .collect()
    }
}

/// One catalog entry as seen by a particular learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementStatus {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    /// `None` while locked.
    pub earned_at: Option<Timestamp>,
}

impl AchievementStatus {
    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }
}
