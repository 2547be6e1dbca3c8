//! Enrollment entity - one learner's progress through one course.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::catalog::Course;
use crate::domain::foundation::{CourseId, LessonId, Percentage, Timestamp, UserId};

/// A learner's relationship to one course.
///
/// `total_lessons` is captured from the (immutable) course at enrollment
/// time, which makes the completion percentage a pure read. Completed
/// lesson ids are only ever added, so the percentage never decreases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    learner_id: UserId,
    course_id: CourseId,
    total_lessons: u32,
    completed_lesson_ids: BTreeSet<LessonId>,
    enrolled_at: Timestamp,
}

impl Enrollment {
    pub fn new(learner_id: UserId, course: &Course, enrolled_at: Timestamp) -> Self {
        Self {
            learner_id,
            course_id: course.id().clone(),
            total_lessons: u32::try_from(course.lesson_count()).unwrap_or(u32::MAX),
            completed_lesson_ids: BTreeSet::new(),
            enrolled_at,
        }
    }

    pub fn learner_id(&self) -> &UserId {
        &self.learner_id
    }

    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    pub fn total_lessons(&self) -> u32 {
        self.total_lessons
    }

    pub fn enrolled_at(&self) -> Timestamp {
        self.enrolled_at
    }

    pub fn completed_lesson_ids(&self) -> &BTreeSet<LessonId> {
        &self.completed_lesson_ids
    }

    pub fn completed_count(&self) -> u32 {
        u32::try_from(self.completed_lesson_ids.len()).unwrap_or(u32::MAX)
    }

    pub fn has_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lesson_ids.contains(lesson_id)
    }

    /// Adds a lesson to the completed set. Returns `false` if it was already there.
    ///
    /// Callers must have checked that the lesson belongs to the course.
    pub fn mark_complete(&mut self, lesson_id: LessonId) -> bool {
        if self.completed_count() >= self.total_lessons {
            return false;
        }
        self.completed_lesson_ids.insert(lesson_id)
    }

    /// Completion percentage, floored. Zero for an empty course.
    pub fn progress(&self) -> Percentage {
        Percentage::from_ratio(
            u64::from(self.completed_count()),
            u64::from(self.total_lessons),
        )
    }

    /// True once every lesson is done. A course without lessons is never complete.
    pub fn is_complete(&self) -> bool {
        self.total_lessons > 0 && self.completed_count() >= self.total_lessons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Difficulty, Lesson, LessonKind};

    fn course(lessons: usize) -> Course {
        Course::new(
            CourseId::new("c1").unwrap(),
            "Course",
            "Magic",
            Difficulty::Intermediate,
            (0..lessons)
                .map(|i| {
                    Lesson::new(
                        LessonId::new(format!("l{}", i)).unwrap(),
                        "Lesson",
                        LessonKind::Video,
                        10,
                    )
                })
                .collect(),
        )
        .unwrap()
    }

    fn enrollment(lessons: usize) -> Enrollment {
        Enrollment::new(UserId::new("u1").unwrap(), &course(lessons), Timestamp::now())
    }

    fn lesson(i: usize) -> LessonId {
        LessonId::new(format!("l{}", i)).unwrap()
    }

    #[test]
    fn new_enrollment_is_empty() {
        let e = enrollment(4);
        assert_eq!(e.total_lessons(), 4);
        assert_eq!(e.completed_count(), 0);
        assert_eq!(e.progress(), Percentage::ZERO);
        assert!(!e.is_complete());
    }

    #[test]
    fn mark_complete_is_idempotent() {
        let mut e = enrollment(4);
        assert!(e.mark_complete(lesson(0)));
        assert!(!e.mark_complete(lesson(0)));
        assert_eq!(e.completed_count(), 1);
    }

    #[test]
    fn three_of_four_is_seventy_five() {
        let mut e = enrollment(4);
        for i in 0..3 {
            e.mark_complete(lesson(i));
        }
        assert_eq!(e.progress().value(), 75);
        assert!(!e.is_complete());

        e.mark_complete(lesson(3));
        assert_eq!(e.progress(), Percentage::HUNDRED);
        assert!(e.is_complete());
    }

    #[test]
    fn empty_course_reports_zero_and_is_never_complete() {
        let e = enrollment(0);
        assert_eq!(e.progress(), Percentage::ZERO);
        assert!(!e.is_complete());
    }

    #[test]
    fn cannot_exceed_total_lessons() {
        let mut e = enrollment(1);
        assert!(e.mark_complete(lesson(0)));
        assert!(!e.mark_complete(lesson(7)));
        assert_eq!(e.progress(), Percentage::HUNDRED);
    }
}
