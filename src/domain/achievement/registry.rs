//! Predicate registry keyed by achievement id.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::domain::foundation::{AchievementId, Timestamp, ValidationError};
use crate::domain::progress::LearnerRecord;

use super::{AchievementDefinition, AchievementStatus, LearnerSnapshot};

/// Pure unlock condition over a learner snapshot.
pub type AchievementPredicate = Arc<dyn Fn(&LearnerSnapshot) -> bool + Send + Sync>;

/// One entry in the registry.
#[derive(Clone)]
pub struct RegisteredAchievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    predicate: AchievementPredicate,
}

impl RegisteredAchievement {
    pub fn is_satisfied(&self, snapshot: &LearnerSnapshot) -> bool {
        (self.predicate)(snapshot)
    }
}

impl fmt::Debug for RegisteredAchievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredAchievement")
            .field("id", &self.id)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Ordered catalog of achievements and their predicates.
///
/// Evaluation iterates the registry; adding an achievement is a
/// `register` call and never touches the unlock logic.
#[derive(Debug, Clone, Default)]
pub struct AchievementRegistry {
    entries: Vec<RegisteredAchievement>,
    ids: HashSet<AchievementId>,
}

impl AchievementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `definitions` in order. Fails on the first repeated id.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = AchievementDefinition>,
    ) -> Result<Self, ValidationError> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register_definition(definition)?;
        }
        Ok(registry)
    }

    /// Registry holding the built-in dashboard achievements.
    pub fn with_defaults() -> Result<Self, ValidationError> {
        Self::from_definitions(AchievementDefinition::defaults())
    }

    /// Registers an arbitrary predicate. Ids must be unique.
    pub fn register<F>(
        &mut self,
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        predicate: F,
    ) -> Result<(), ValidationError>
    where
        F: Fn(&LearnerSnapshot) -> bool + Send + Sync + 'static,
    {
        if self.ids.contains(&id) {
            return Err(ValidationError::invalid_format(
                "achievement_id",
                format!("'{}' is already registered", id),
            ));
        }
        self.ids.insert(id.clone());
        self.entries.push(RegisteredAchievement {
            id,
            title: title.into(),
            description: description.into(),
            predicate: Arc::new(predicate),
        });
        Ok(())
    }

    /// Registers a declarative definition, typically loaded from configuration.
    pub fn register_definition(
        &mut self,
        definition: AchievementDefinition,
    ) -> Result<(), ValidationError> {
        let rule = definition.rule;
        self.register(
            definition.id,
            definition.title,
            definition.description,
            move |snapshot| rule.is_satisfied(snapshot),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &AchievementId) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredAchievement> {
        self.entries.iter()
    }

    /// Stamps every locked achievement whose predicate now holds.
    ///
    /// Earned achievements are skipped entirely, so a predicate that later
    /// turns false never revokes anything. Returns the newly earned ids in
    /// registry order.
    pub fn unlock(
        &self,
        record: &mut LearnerRecord,
        snapshot: &LearnerSnapshot,
        at: Timestamp,
    ) -> Vec<AchievementId> {
        let mut unlocked = Vec::new();
        for entry in &self.entries {
            if record.has_earned(&entry.id) {
                continue;
            }
            if entry.is_satisfied(snapshot) && record.mark_earned(entry.id.clone(), at) {
                unlocked.push(entry.id.clone());
            }
        }
        unlocked
    }

    /// Every registered achievement with the learner's earned/locked status.
    pub fn statuses(&self, record: &LearnerRecord) -> Vec<AchievementStatus> {
        self.entries
            .iter()
            .map(|entry| AchievementStatus {
                id: entry.id.clone(),
                title: entry.title.clone(),
                description: entry.description.clone(),
                earned_at: record.earned_at(&entry.id),
            })
            .collect()
    }
}
