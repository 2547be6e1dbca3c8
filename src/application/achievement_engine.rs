//! AchievementEngine - idempotent, monotonic achievement unlocking.

use std::sync::Arc;
use tracing::info;

use crate::domain::achievement::{AchievementRegistry, AchievementStatus, LearnerSnapshot};
use crate::domain::foundation::{AchievementId, EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::leveling::LevelCurve;
use crate::domain::progress::{AchievementEarned, LearnerRecord, ProgressError};
use crate::ports::EventPublisher;

use super::delivery::publish_committed;
use super::LearnerLedger;

/// Evaluates registered achievements against learner state.
///
/// Earned achievements are stamped once and never re-checked, so calling
/// `evaluate` repeatedly is safe and can only add to the earned set.
pub struct AchievementEngine {
    registry: AchievementRegistry,
    curve: LevelCurve,
    ledger: Arc<LearnerLedger>,
    publisher: Arc<dyn EventPublisher>,
}

impl AchievementEngine {
    pub fn new(
        registry: AchievementRegistry,
        curve: LevelCurve,
        ledger: Arc<LearnerLedger>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            registry,
            curve,
            ledger,
            publisher,
        }
    }

    pub fn registry(&self) -> &AchievementRegistry {
        &self.registry
    }

    /// Unlocks every locked achievement whose predicate now holds.
    ///
    /// Returns the newly earned ids; empty when nothing changed, in which
    /// case nothing is written.
    pub async fn evaluate(&self, learner_id: &UserId) -> Result<Vec<AchievementId>, ProgressError> {
        let mut tx = self.ledger.begin(learner_id).await?;
        let now = Timestamp::now();
        let unlocked = self.apply(tx.record_mut(), now);
        if unlocked.is_empty() {
            return Ok(unlocked);
        }

        let mut envelopes = Vec::with_capacity(unlocked.len());
        for event in self.earned_events(learner_id, &unlocked, now) {
            envelopes.push(event.to_envelope()?.with_user_id(learner_id.as_str()));
        }
        tx.commit().await?;

        publish_committed(self.publisher.as_ref(), envelopes).await;
        Ok(unlocked)
    }

    /// Every registered achievement with this learner's earned/locked status.
    pub async fn achievements(
        &self,
        learner_id: &UserId,
    ) -> Result<Vec<AchievementStatus>, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        Ok(self.registry.statuses(&record))
    }

    /// Runs the registry against a working copy of the learner record.
    pub(crate) fn apply(&self, record: &mut LearnerRecord, at: Timestamp) -> Vec<AchievementId> {
        let snapshot = LearnerSnapshot::capture(record, &self.curve);
        let unlocked = self.registry.unlock(record, &snapshot, at);
        for id in &unlocked {
            info!(learner_id = %record.learner_id(), achievement_id = %id, "achievement earned");
        }
        unlocked
    }

    pub(crate) fn earned_events(
        &self,
        learner_id: &UserId,
        unlocked: &[AchievementId],
        at: Timestamp,
    ) -> Vec<AchievementEarned> {
        unlocked
            .iter()
            .map(|id| AchievementEarned {
                event_id: EventId::new(),
                learner_id: learner_id.clone(),
                achievement_id: id.clone(),
                earned_at: at,
            })
            .collect()
    }
}
