//! Course catalog port (read-only).

use async_trait::async_trait;

use crate::domain::catalog::{Course, CourseQuery};
use crate::domain::foundation::{CourseId, DomainError};

/// Read-only source of immutable courses.
///
/// Courses returned for the same id must not change for the lifetime of
/// the process; enrollments snapshot their lesson count.
#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// Fetch a course by id. `None` if the catalog does not know it.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, DomainError>;

    /// Courses matching the query, in catalog order.
    async fn search(&self, query: &CourseQuery) -> Result<Vec<Course>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn CourseCatalog) {}
}
