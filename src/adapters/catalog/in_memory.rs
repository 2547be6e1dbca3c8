//! In-memory course catalog.

use async_trait::async_trait;
use std::sync::{PoisonError, RwLock};

use crate::domain::catalog::{Course, CourseQuery};
use crate::domain::foundation::{CourseId, DomainError, ValidationError};
use crate::ports::CourseCatalog;

/// Course catalog held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCourseCatalog {
    courses: RwLock<Vec<Course>>,
}

impl InMemoryCourseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a list of courses. Duplicate ids are rejected.
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Result<Self, ValidationError> {
        let catalog = Self::new();
        for course in courses {
            catalog.add_course(course)?;
        }
        Ok(catalog)
    }

    /// Adds a course. Published courses are immutable, so an existing id is an error.
    pub fn add_course(&self, course: Course) -> Result<(), ValidationError> {
        let mut courses = self.courses.write().unwrap_or_else(PoisonError::into_inner);
        if courses.iter().any(|c| c.id() == course.id()) {
            return Err(ValidationError::invalid_format(
                "course_id",
                format!("course '{}' is already in the catalog", course.id()),
            ));
        }
        courses.push(course);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.courses.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CourseCatalog for InMemoryCourseCatalog {
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
        Ok(self
            .courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|c| c.id() == id)
            .cloned())
    }

    async fn search(&self, query: &CourseQuery) -> Result<Vec<Course>, DomainError> {
        Ok(self
            .courses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{Difficulty, Lesson, LessonKind};
    use crate::domain::foundation::LessonId;

    fn course(id: &str, title: &str, category: &str, difficulty: Difficulty) -> Course {
        Course::new(
            CourseId::new(id).unwrap(),
            title,
            category,
            difficulty,
            vec![Lesson::new(LessonId::new("intro").unwrap(), "Intro", LessonKind::Video, 5)],
        )
        .unwrap()
    }

    fn catalog() -> InMemoryCourseCatalog {
        InMemoryCourseCatalog::from_courses(vec![
            course("3d-modeling", "Introduction to 3D Modeling", "Design", Difficulty::Beginner),
            course("rigging", "Character Rigging", "Animation", Difficulty::Advanced),
            course("shading", "Advanced Shading", "Design", Difficulty::Advanced),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn get_course_finds_by_id() {
        let catalog = catalog();
        let found = catalog
            .get_course(&CourseId::new("rigging").unwrap())
            .await
            .unwrap();
        assert_eq!(found.unwrap().title(), "Character Rigging");

        let missing = catalog
            .get_course(&CourseId::new("nope").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn search_combines_filters() {
        let catalog = catalog();

        let design = catalog
            .search(&CourseQuery {
                category: Some("design".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(design.len(), 2);

        let advanced_design = catalog
            .search(&CourseQuery {
                category: Some("Design".to_string()),
                difficulty: Some(Difficulty::Advanced),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(advanced_design.len(), 1);
        assert_eq!(advanced_design[0].id().as_str(), "shading");

        let text = catalog
            .search(&CourseQuery {
                text: Some("3d".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(text.len(), 1);
    }

    #[test]
    fn duplicate_course_is_rejected() {
        let catalog = catalog();
        let dup = course("rigging", "Again", "Animation", Difficulty::Beginner);
        assert!(catalog.add_course(dup).is_err());
        assert_eq!(catalog.len(), 3);
    }
}
