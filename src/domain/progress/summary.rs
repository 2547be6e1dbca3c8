//! Dashboard read model.

use serde::Serialize;

use crate::domain::catalog::Course;
use crate::domain::leveling::LevelState;

use super::LearnerRecord;

/// Aggregate numbers shown on a learner's dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub enrolled_courses: u32,
    pub completed_courses: u32,
    /// Mean completion across enrolled courses, rounded to the nearest percent.
    pub average_progress: u8,
    pub lessons_completed: u32,
    /// Duration of every enrolled course added up.
    pub enrolled_minutes: u32,
    /// Duration of the completed lessons only.
    pub minutes_studied: u32,
    pub total_xp: u64,
    pub level: LevelState,
    pub achievements_earned: u32,
}

impl DashboardSummary {
    /// `courses` supplies lesson durations. An enrolled course missing from
    /// it still counts toward progress but adds no minutes.
    pub fn from_record(record: &LearnerRecord, level: LevelState, courses: &[Course]) -> Self {
        let mut enrolled = 0u32;
        let mut progress_sum = 0u32;
        let mut enrolled_minutes = 0u32;
        let mut minutes_studied = 0u32;
        for enrollment in record.enrollments() {
            enrolled += 1;
            progress_sum += u32::from(enrollment.progress().value());

            if let Some(course) = courses.iter().find(|c| c.id() == enrollment.course_id()) {
                enrolled_minutes = enrolled_minutes.saturating_add(course.total_minutes());
                minutes_studied = course
                    .lessons()
                    .iter()
                    .filter(|lesson| enrollment.has_completed(lesson.id()))
                    .fold(minutes_studied, |acc, lesson| {
                        acc.saturating_add(lesson.duration_minutes())
                    });
            }
        }

        let average_progress = if enrolled == 0 {
            0
        } else {
            ((progress_sum + enrolled / 2) / enrolled).min(100) as u8
        };

        Self {
            enrolled_courses: enrolled,
            completed_courses: record.courses_completed(),
            average_progress,
            lessons_completed: record.lessons_completed(),
            enrolled_minutes,
            minutes_studied,
            total_xp: record.experience().total_xp(),
            level,
            achievements_earned: record.earned().count() as u32,
        }
    }
}
