//! LevelingSystem - XP awards and level reads.

use std::sync::Arc;
use tracing::info;

use crate::domain::catalog::LessonKind;
use crate::domain::foundation::{EventId, SerializableDomainEvent, Timestamp, UserId};
use crate::domain::leveling::{LevelCurve, LevelState, LevelUpdate, XpRewards};
use crate::domain::progress::{ExperienceAwarded, LearnerRecord, ProgressError};
use crate::ports::EventPublisher;

use super::delivery::publish_committed;
use super::LearnerLedger;

/// Maps accumulated XP to levels and applies XP awards.
pub struct LevelingSystem {
    curve: LevelCurve,
    rewards: XpRewards,
    ledger: Arc<LearnerLedger>,
    publisher: Arc<dyn EventPublisher>,
}

impl LevelingSystem {
    pub fn new(
        curve: LevelCurve,
        rewards: XpRewards,
        ledger: Arc<LearnerLedger>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            curve,
            rewards,
            ledger,
            publisher,
        }
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// XP granted for completing a lesson of this kind.
    pub fn reward_for(&self, kind: LessonKind) -> u32 {
        self.rewards.for_kind(kind)
    }

    /// Adds XP to a learner and reports whether a level boundary was crossed.
    ///
    /// `amount` must be positive. A rejected `ExperienceAwarded` event is
    /// logged; the award stays saved. Achievements are not re-evaluated here;
    /// callers that grant XP outside lesson completion follow up with
    /// `AchievementEngine::evaluate`.
    pub async fn award_xp(
        &self,
        learner_id: &UserId,
        amount: u32,
    ) -> Result<LevelUpdate, ProgressError> {
        let mut tx = self.ledger.begin(learner_id).await?;
        let update = self.apply_award(tx.record_mut(), amount)?;
        let envelope = self
            .experience_event(learner_id, &update, Timestamp::now())
            .to_envelope()?
            .with_user_id(learner_id.as_str());
        tx.commit().await?;

        publish_committed(self.publisher.as_ref(), vec![envelope]).await;
        Ok(update)
    }

    /// Current level of a learner, derived from total XP.
    pub async fn level_of(&self, learner_id: &UserId) -> Result<LevelState, ProgressError> {
        let record = self.ledger.read(learner_id).await?;
        Ok(self.curve.state_for(record.experience().total_xp()))
    }

    /// Applies an award to a working copy of the learner record.
    pub(crate) fn apply_award(
        &self,
        record: &mut LearnerRecord,
        amount: u32,
    ) -> Result<LevelUpdate, ProgressError> {
        let previous_level = self.curve.state_for(record.experience().total_xp()).level;
        let total_xp = record.experience_mut().award(amount)?;
        let update = LevelUpdate {
            amount,
            total_xp,
            previous_level,
            state: self.curve.state_for(total_xp),
        };

        if update.leveled_up() {
            info!(
                learner_id = %record.learner_id(),
                level = update.state.level,
                total_xp,
                "learner leveled up"
            );
        }
        Ok(update)
    }

    pub(crate) fn experience_event(
        &self,
        learner_id: &UserId,
        update: &LevelUpdate,
        at: Timestamp,
    ) -> ExperienceAwarded {
        ExperienceAwarded {
            event_id: EventId::new(),
            learner_id: learner_id.clone(),
            amount: update.amount,
            total_xp: update.total_xp,
            level: update.state.level,
            leveled_up: update.leveled_up(),
            awarded_at: at,
        }
    }
}
