//! Catalog domain module.
//!
//! Immutable course and lesson types fetched from the external catalog.

mod course;

pub use course::{Course, CourseQuery, Difficulty, Lesson, LessonKind};
