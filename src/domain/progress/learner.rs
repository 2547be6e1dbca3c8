//! LearnerRecord aggregate - everything the core tracks for one learner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{AchievementId, CourseId, Timestamp, UserId};
use crate::domain::leveling::ExperienceState;

use super::Enrollment;

/// Per-learner aggregate: enrollments, experience and earned achievements.
///
/// This is the unit of transactional update. Services clone it, apply a
/// whole operation to the clone and hand the clone to the repository in
/// a single save, so a partially applied operation is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerRecord {
    learner_id: UserId,
    enrollments: BTreeMap<CourseId, Enrollment>,
    experience: ExperienceState,
    earned: BTreeMap<AchievementId, Timestamp>,
}

impl LearnerRecord {
    pub fn new(learner_id: UserId) -> Self {
        Self {
            learner_id,
            enrollments: BTreeMap::new(),
            experience: ExperienceState::default(),
            earned: BTreeMap::new(),
        }
    }

    pub fn learner_id(&self) -> &UserId {
        &self.learner_id
    }

    pub fn enrollment(&self, course_id: &CourseId) -> Option<&Enrollment> {
        self.enrollments.get(course_id)
    }

    pub fn enrollment_mut(&mut self, course_id: &CourseId) -> Option<&mut Enrollment> {
        self.enrollments.get_mut(course_id)
    }

    pub fn enrollments(&self) -> impl Iterator<Item = &Enrollment> {
        self.enrollments.values()
    }

    /// Inserts the enrollment unless one already exists for the course.
    ///
    /// Returns the stored enrollment and whether it was newly created.
    pub fn enroll(&mut self, enrollment: Enrollment) -> (&Enrollment, bool) {
        let course_id = enrollment.course_id().clone();
        let created = !self.enrollments.contains_key(&course_id);
        let stored = self.enrollments.entry(course_id).or_insert(enrollment);
        (stored, created)
    }

    pub fn experience(&self) -> &ExperienceState {
        &self.experience
    }

    pub fn experience_mut(&mut self) -> &mut ExperienceState {
        &mut self.experience
    }

    /// Lessons completed across every course.
    pub fn lessons_completed(&self) -> u32 {
        self.enrollments.values().map(Enrollment::completed_count).sum()
    }

    /// Courses at 100% completion.
    pub fn courses_completed(&self) -> u32 {
        self.enrollments.values().filter(|e| e.is_complete()).count() as u32
    }

    pub fn earned_at(&self, id: &AchievementId) -> Option<Timestamp> {
        self.earned.get(id).copied()
    }

    pub fn has_earned(&self, id: &AchievementId) -> bool {
        self.earned.contains_key(id)
    }

    /// Records an achievement as earned. An existing timestamp is never overwritten.
    ///
    /// Returns `true` only on the first call for a given id.
    pub fn mark_earned(&mut self, id: AchievementId, at: Timestamp) -> bool {
        if self.earned.contains_key(&id) {
            return false;
        }
        self.earned.insert(id, at);
        true
    }

    pub fn earned(&self) -> impl Iterator<Item = (&AchievementId, &Timestamp)> {
        self.earned.iter()
    }
}
