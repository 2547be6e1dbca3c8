//! ProgressStore - enrollments, lesson completion and progress reads.
//!
//! `complete_lesson` is the one write that fans out: a newly completed
//! lesson awards XP through the leveling system and re-runs achievement
//! evaluation, all on one working copy of the learner record that is
//! saved once. Events go out only after that save succeeds.

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::catalog::{Course, Lesson};
use crate::domain::foundation::{
    AchievementId, CourseId, EventEnvelope, EventId, LessonId, Percentage,
    SerializableDomainEvent, Timestamp, UserId,
};
use crate::domain::leveling::LevelUpdate;
use crate::domain::progress::{DashboardSummary, Enrollment, LessonCompleted, ProgressError};
use crate::ports::{CourseCatalog, EventPublisher};

use super::delivery::publish_committed;
use super::{AchievementEngine, LearnerLedger, LearnerTransaction, LevelingSystem};

/// Outcome of `complete_lesson`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonCompletion {
    /// Enrollment after the call.
    pub enrollment: Enrollment,
    /// Present only when this call completed the lesson.
    pub event: Option<LessonCompleted>,
    /// XP award triggered by the completion.
    pub level: Option<LevelUpdate>,
    /// Achievements earned as a result, in registry order.
    pub unlocked: Vec<AchievementId>,
    /// Events the publisher rejected. The completion itself is saved.
    pub undelivered: Vec<EventId>,
}

impl LessonCompletion {
    /// False when the lesson had already been completed.
    pub fn changed(&self) -> bool {
        self.event.is_some()
    }

    pub fn progress(&self) -> Percentage {
        self.enrollment.progress()
    }

    fn unchanged(enrollment: Enrollment) -> Self {
        Self {
            enrollment,
            event: None,
            level: None,
            unlocked: Vec::new(),
            undelivered: Vec::new(),
        }
    }
}

/// Tracks which lessons each learner has completed.
pub struct ProgressStore {
    catalog: Arc<dyn CourseCatalog>,
    ledger: Arc<LearnerLedger>,
    leveling: Arc<LevelingSystem>,
    achievements: Arc<AchievementEngine>,
    publisher: Arc<dyn EventPublisher>,
}

impl ProgressStore {
    pub fn new(
        catalog: Arc<dyn CourseCatalog>,
        ledger: Arc<LearnerLedger>,
        leveling: Arc<LevelingSystem>,
        achievements: Arc<AchievementEngine>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            catalog,
            ledger,
            leveling,
            achievements,
            publisher,
        }
    }

    /// Enrolls a learner in a course. Enrolling twice returns the existing enrollment.
    pub async fn enroll(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Enrollment, ProgressError> {
        let mut tx = self.ledger.begin(learner_id).await?;
        if let Some(existing) = tx.record().enrollment(course_id) {
            debug!(%learner_id, %course_id, "already enrolled");
            return Ok(existing.clone());
        }

        let course = self.course(course_id).await?;
        let enrollment = Enrollment::new(learner_id.clone(), &course, Timestamp::now());
        tx.record_mut().enroll(enrollment.clone());
        tx.commit().await?;

        info!(
            %learner_id,
            %course_id,
            total_lessons = enrollment.total_lessons(),
            "learner enrolled"
        );
        Ok(enrollment)
    }

    /// Marks a lesson complete.
    ///
    /// Completing an already-completed lesson changes nothing, writes
    /// nothing and emits no event.
    pub async fn complete_lesson(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
        lesson_id: &LessonId,
    ) -> Result<LessonCompletion, ProgressError> {
        let mut tx = self.ledger.begin(learner_id).await?;

        let already_done = match tx.record().enrollment(course_id) {
            Some(enrollment) => enrollment.has_completed(lesson_id),
            None => return Err(ProgressError::not_enrolled(learner_id, course_id)),
        };

        let course = self.course(course_id).await?;
        let lesson = course
            .lesson(lesson_id)
            .cloned()
            .ok_or_else(|| ProgressError::unknown_lesson(course_id, lesson_id))?;

        if already_done {
            debug!(%learner_id, %course_id, %lesson_id, "lesson already completed");
            return self.unchanged(&tx, learner_id, course_id);
        }

        let now = Timestamp::now();
        let enrollment = {
            let enrollment = tx
                .record_mut()
                .enrollment_mut(course_id)
                .ok_or_else(|| ProgressError::not_enrolled(learner_id, course_id))?;
            if !enrollment.mark_complete(lesson_id.clone()) {
                // Enrollment already holds its full lesson count.
                return Ok(LessonCompletion::unchanged(enrollment.clone()));
            }
            enrollment.clone()
        };

        let event = LessonCompleted {
            event_id: EventId::new(),
            learner_id: learner_id.clone(),
            course_id: course_id.clone(),
            lesson_id: lesson_id.clone(),
            lesson_kind: lesson.kind(),
            progress: enrollment.progress(),
            course_completed: enrollment.is_complete(),
            completed_at: now,
        };

        let level = self
            .leveling
            .apply_award(tx.record_mut(), self.leveling.reward_for(lesson.kind()))?;
        let unlocked = self.achievements.apply(tx.record_mut(), now);
        let envelopes = self.completion_envelopes(&event, &level, &unlocked, now)?;

        tx.commit().await?;

        info!(
            %learner_id,
            %course_id,
            %lesson_id,
            progress = %enrollment.progress(),
            xp = level.amount,
            "lesson completed"
        );

        let undelivered = publish_committed(self.publisher.as_ref(), envelopes).await;

        Ok(LessonCompletion {
            enrollment,
            event: Some(event),
            level: Some(level),
            unlocked,
            undelivered,
        })
    }

    /// Completion percentage for one enrollment.
    pub async fn progress_of(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Percentage, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        record
            .enrollment(course_id)
            .map(Enrollment::progress)
            .ok_or_else(|| ProgressError::not_enrolled(learner_id, course_id))
    }

    /// All of a learner's enrollments, ordered by course id.
    pub async fn enrollments(&self, learner_id: &UserId) -> Result<Vec<Enrollment>, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        Ok(record.enrollments().cloned().collect())
    }

    /// First lesson in course order the learner has not completed yet.
    ///
    /// `None` once the course is finished.
    pub async fn next_lesson(
        &self,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<Option<Lesson>, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        let enrollment = record
            .enrollment(course_id)
            .ok_or_else(|| ProgressError::not_enrolled(learner_id, course_id))?;
        let course = self.course(course_id).await?;

        Ok(course
            .lessons()
            .iter()
            .find(|lesson| !enrollment.has_completed(lesson.id()))
            .cloned())
    }

    /// Aggregate numbers for the learner dashboard.
    pub async fn dashboard(&self, learner_id: &UserId) -> Result<DashboardSummary, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        let level = self
            .leveling
            .curve()
            .state_for(record.experience().total_xp());

        let mut courses = Vec::new();
        for enrollment in record.enrollments() {
            match self.catalog.get_course(enrollment.course_id()).await? {
                Some(course) => courses.push(course),
                None => debug!(course_id = %enrollment.course_id(), "enrolled course left the catalog"),
            }
        }
        Ok(DashboardSummary::from_record(&record, level, &courses))
    }

    async fn course(&self, course_id: &CourseId) -> Result<Course, ProgressError> {
        self.catalog
            .get_course(course_id)
            .await?
            .ok_or_else(|| ProgressError::course_not_found(course_id))
    }

    fn unchanged(
        &self,
        tx: &LearnerTransaction<'_>,
        learner_id: &UserId,
        course_id: &CourseId,
    ) -> Result<LessonCompletion, ProgressError> {
        tx.record()
            .enrollment(course_id)
            .cloned()
            .map(LessonCompletion::unchanged)
            .ok_or_else(|| ProgressError::not_enrolled(learner_id, course_id))
    }

    /// Envelopes for a completion, built before the save so nothing can
    /// fail between commit and delivery.
    fn completion_envelopes(
        &self,
        event: &LessonCompleted,
        level: &LevelUpdate,
        unlocked: &[AchievementId],
        at: Timestamp,
    ) -> Result<Vec<EventEnvelope>, ProgressError> {
        let learner_id = &event.learner_id;
        let cause = event.event_id.as_str();

        let mut envelopes: Vec<EventEnvelope> = Vec::with_capacity(2 + unlocked.len());
        envelopes.push(event.to_envelope()?.with_user_id(learner_id.as_str()));
        envelopes.push(
            self.leveling
                .experience_event(learner_id, level, at)
                .to_envelope()?
                .with_user_id(learner_id.as_str())
                .with_causation_id(cause),
        );
        for earned in self.achievements.earned_events(learner_id, unlocked, at) {
            envelopes.push(
                earned
                    .to_envelope()?
                    .with_user_id(learner_id.as_str())
                    .with_causation_id(cause),
            );
        }

        Ok(envelopes)
    }
}
