//! Serialized, all-or-nothing access to learner records.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::foundation::UserId;
use crate::domain::progress::{LearnerRecord, ProgressError};
use crate::ports::LearnerRepository;

/// Gatekeeper for learner record mutations.
///
/// Writers hold an async mutex for the whole load-modify-save cycle and
/// work on a private copy of the record. Only `commit` writes, in one
/// `save` call; dropping a transaction discards its changes.
pub struct LearnerLedger {
    repository: Arc<dyn LearnerRepository>,
    write_lock: Mutex<()>,
}

impl LearnerLedger {
    pub fn new(repository: Arc<dyn LearnerRepository>) -> Self {
        Self {
            repository,
            write_lock: Mutex::new(()),
        }
    }

    /// Committed state of a learner. A learner with no history gets an empty record.
    pub async fn read(&self, learner_id: &UserId) -> Result<LearnerRecord, ProgressError> {
        Ok(self
            .repository
            .load(learner_id)
            .await?
            .unwrap_or_else(|| LearnerRecord::new(learner_id.clone())))
    }

    /// Starts a transaction, waiting for any in-progress writer to finish.
    pub async fn begin(&self, learner_id: &UserId) -> Result<LearnerTransaction<'_>, ProgressError> {
        let guard = self.write_lock.lock().await;
        let record = self.read(learner_id).await?;
        Ok(LearnerTransaction {
            _guard: guard,
            repository: self.repository.as_ref(),
            record,
        })
    }
}

/// Exclusive working copy of one learner record.
pub struct LearnerTransaction<'a> {
    _guard: MutexGuard<'a, ()>,
    repository: &'a dyn LearnerRepository,
    record: LearnerRecord,
}

impl LearnerTransaction<'_> {
    pub fn record(&self) -> &LearnerRecord {
        &self.record
    }

    pub fn record_mut(&mut self) -> &mut LearnerRecord {
        &mut self.record
    }

    /// Persists the working copy and releases the write lock.
    pub async fn commit(self) -> Result<LearnerRecord, ProgressError> {
        let LearnerTransaction {
            _guard,
            repository,
            record,
        } = self;
        repository.save(&record).await?;
        Ok(record)
    }
}
