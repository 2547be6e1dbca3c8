//! Course and lesson value objects.
//!
//! Courses are fetched from the external catalog and never change once
//! fetched; the types expose read-only accessors only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{CourseId, LessonId, ValidationError};

/// Presentation kind of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    Video,
    #[serde(rename = "interactive_3d")]
    Interactive3D,
    Quiz,
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LessonKind::Video => "video",
            LessonKind::Interactive3D => "interactive_3d",
            LessonKind::Quiz => "quiz",
        };
        write!(f, "{}", s)
    }
}

/// Course difficulty as shown in the catalog filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// A single lesson within a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    title: String,
    kind: LessonKind,
    duration_minutes: u32,
}

impl Lesson {
    pub fn new(id: LessonId, title: impl Into<String>, kind: LessonKind, duration_minutes: u32) -> Self {
        Self {
            id,
            title: title.into(),
            kind,
            duration_minutes,
        }
    }

    pub fn id(&self) -> &LessonId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
}

/// A course with its ordered lesson list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    category: String,
    difficulty: Difficulty,
    lessons: Vec<Lesson>,
}

impl Course {
    /// Creates a course, rejecting duplicate lesson ids.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        category: impl Into<String>,
        difficulty: Difficulty,
        lessons: Vec<Lesson>,
    ) -> Result<Self, ValidationError> {
        for (i, lesson) in lessons.iter().enumerate() {
            if lessons[..i].iter().any(|l| l.id == lesson.id) {
                return Err(ValidationError::invalid_format(
                    "lessons",
                    format!("duplicate lesson id '{}'", lesson.id),
                ));
            }
        }

        Ok(Self {
            id,
            title: title.into(),
            category: category.into(),
            difficulty,
            lessons,
        })
    }

    pub fn id(&self) -> &CourseId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Lessons in course order.
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| &l.id == id)
    }

    pub fn contains_lesson(&self, id: &LessonId) -> bool {
        self.lesson(id).is_some()
    }

    /// Total running time of all lessons.
    pub fn total_minutes(&self) -> u32 {
        self.lessons.iter().map(|l| l.duration_minutes).sum()
    }
}

/// Filter over the catalog, mirroring the catalog page's search box and chips.
///
/// Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseQuery {
    /// Case-insensitive substring matched against the title.
    pub text: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive exact category match.
    pub category: Option<String>,
}

impl CourseQuery {
    pub fn matches(&self, course: &Course) -> bool {
        let text_ok = self.text.as_deref().map_or(true, |text| {
            course.title.to_lowercase().contains(&text.trim().to_lowercase())
        });
        let difficulty_ok = self.difficulty.map_or(true, |d| d == course.difficulty);
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |c| c.eq_ignore_ascii_case(&course.category));

        text_ok && difficulty_ok && category_ok
    }
}
