//! Academy - composition root wiring the core from configuration.

use std::sync::Arc;

use crate::config::{AppConfig, ConfigError};
use crate::ports::{CourseCatalog, EventPublisher, IdentityProvider, LearnerRepository};

use super::{AchievementEngine, LearnerLedger, LevelingSystem, ProgressStore, SessionManager};

/// The collaborators the core consumes.
pub struct AcademyPorts {
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: Arc<dyn CourseCatalog>,
    pub learners: Arc<dyn LearnerRepository>,
    pub events: Arc<dyn EventPublisher>,
}

/// One running client: a session plus the progress services that share
/// a single learner ledger.
///
/// Session management and progress tracking are independent; the caller
/// passes the learner id from the session identity into the progress
/// services.
pub struct Academy {
    sessions: Arc<SessionManager>,
    progress: Arc<ProgressStore>,
    leveling: Arc<LevelingSystem>,
    achievements: Arc<AchievementEngine>,
}

impl Academy {
    /// Validates the configuration and wires every service.
    pub fn new(config: &AppConfig, ports: AcademyPorts) -> Result<Self, ConfigError> {
        config.validate()?;

        let curve = config.progression.level_curve()?;
        let registry = config.achievements.build_registry()?;
        let ledger = Arc::new(LearnerLedger::new(ports.learners));

        let leveling = Arc::new(LevelingSystem::new(
            curve,
            config.progression.xp,
            ledger.clone(),
            ports.events.clone(),
        ));
        let achievements = Arc::new(AchievementEngine::new(
            registry,
            curve,
            ledger.clone(),
            ports.events.clone(),
        ));
        let progress = Arc::new(ProgressStore::new(
            ports.catalog,
            ledger,
            leveling.clone(),
            achievements.clone(),
            ports.events,
        ));
        let sessions = Arc::new(SessionManager::new(ports.identity, config.auth.clone()));

        tracing::debug!(
            level_cost = curve.level_cost(),
            achievements = achievements.registry().len(),
            "academy core wired"
        );

        Ok(Self {
            sessions,
            progress,
            leveling,
            achievements,
        })
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    pub fn progress(&self) -> &Arc<ProgressStore> {
        &self.progress
    }

    pub fn leveling(&self) -> &Arc<LevelingSystem> {
        &self.leveling
    }

    pub fn achievements(&self) -> &Arc<AchievementEngine> {
        &self.achievements
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryCourseCatalog, InMemoryEventBus, InMemoryLearnerRepository, MockIdentityProvider,
    };
    use crate::config::ValidationError;

    fn ports() -> AcademyPorts {
        AcademyPorts {
            identity: Arc::new(MockIdentityProvider::new()),
            catalog: Arc::new(InMemoryCourseCatalog::new()),
            learners: Arc::new(InMemoryLearnerRepository::new()),
            events: Arc::new(InMemoryEventBus::new()),
        }
    }

    #[test]
    fn wires_from_default_config() {
        let academy = Academy::new(&AppConfig::default(), ports()).unwrap();
        assert_eq!(academy.achievements().registry().len(), 5);
        assert_eq!(academy.leveling().curve().level_cost(), 500);
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.auth.min_password_length = 0;

        let err = Academy::new(&config, ports()).err().unwrap();

        assert!(matches!(
            err,
            ConfigError::ValidationFailed(ValidationError::InvalidPasswordLength { .. })
        ));
    }
}
