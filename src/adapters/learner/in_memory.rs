//! In-memory learner repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::progress::LearnerRecord;
use crate::ports::LearnerRepository;

/// Learner records kept in a map keyed by learner id.
///
/// `fail_saves` lets tests exercise the path where the single write of a
/// transactional update fails.
#[derive(Debug, Default)]
pub struct InMemoryLearnerRepository {
    records: RwLock<HashMap<UserId, LearnerRecord>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryLearnerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `save` fail with `StorageError`.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl LearnerRepository for InMemoryLearnerRepository {
    async fn load(&self, learner_id: &UserId) -> Result<Option<LearnerRecord>, DomainError> {
        Ok(self.records.read().await.get(learner_id).cloned())
    }

    async fn save(&self, record: &LearnerRecord) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::StorageError,
                "learner store unavailable",
            ));
        }
        self.records
            .write()
            .await
            .insert(record.learner_id().clone(), record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
