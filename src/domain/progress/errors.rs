//! Progress-specific error types.

use thiserror::Error;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, LessonId, UserId, ValidationError};

/// Errors from enrollment, lesson completion, XP awards and achievement evaluation.
#[derive(Debug, Clone, Error)]
pub enum ProgressError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Learner {learner_id} is not enrolled in course {course_id}")]
    NotEnrolled { learner_id: UserId, course_id: CourseId },

    #[error("Lesson {lesson_id} is not part of course {course_id}")]
    UnknownLesson { course_id: CourseId, lesson_id: LessonId },

    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Infrastructure error: {0}")]
    Infrastructure(DomainError),
}

impl ProgressError {
    pub fn not_enrolled(learner_id: &UserId, course_id: &CourseId) -> Self {
        ProgressError::NotEnrolled {
            learner_id: learner_id.clone(),
            course_id: course_id.clone(),
        }
    }

    pub fn unknown_lesson(course_id: &CourseId, lesson_id: &LessonId) -> Self {
        ProgressError::UnknownLesson {
            course_id: course_id.clone(),
            lesson_id: lesson_id.clone(),
        }
    }

    pub fn course_not_found(course_id: &CourseId) -> Self {
        ProgressError::CourseNotFound(course_id.clone())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ProgressError::Validation(_) => ErrorCode::ValidationFailed,
            ProgressError::NotEnrolled { .. } => ErrorCode::NotEnrolled,
            ProgressError::UnknownLesson { .. } => ErrorCode::UnknownLesson,
            ProgressError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            ProgressError::Infrastructure(err) => err.code,
        }
    }
}

impl From<DomainError> for ProgressError {
    fn from(err: DomainError) -> Self {
        ProgressError::Infrastructure(err)
    }
}
