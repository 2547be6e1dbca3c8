//! Learner repository port.
//!
//! Persists whole `LearnerRecord` aggregates. A record is always written
//! in one `save` call, which is what makes lesson completion atomic: the
//! enrollment change, XP award and achievement stamps land together or
//! not at all.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::progress::LearnerRecord;

#[async_trait]
pub trait LearnerRepository: Send + Sync {
    /// Load a learner's record. `None` for a learner with no history.
    async fn load(&self, learner_id: &UserId) -> Result<Option<LearnerRecord>, DomainError>;

    /// Insert or replace the learner's record.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure; the previous record is kept
    async fn save(&self, record: &LearnerRecord) -> Result<(), DomainError>;
}
