//! Achievement catalog configuration

use serde::Deserialize;
use std::collections::HashSet;

use crate::domain::achievement::{AchievementDefinition, AchievementRegistry, AchievementRule};

use super::error::ValidationError;

/// Which achievements the engine evaluates.
///
/// The built-in dashboard achievements are on by default; `custom`
/// entries are appended after them.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AchievementsConfig {
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    #[serde(default)]
    pub custom: Vec<AchievementDefinition>,
}

impl AchievementsConfig {
    /// Every configured definition, built-ins first.
    pub fn definitions(&self) -> Vec<AchievementDefinition> {
        let mut definitions = if self.include_builtin {
            AchievementDefinition::defaults()
        } else {
            Vec::new()
        };
        definitions.extend(self.custom.iter().cloned());
        definitions
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for definition in self.definitions() {
            let id = definition.id.to_string();
            let zero_threshold = matches!(
                definition.rule,
                AchievementRule::LessonsCompleted { count: 0 }
                    | AchievementRule::CoursesCompleted { count: 0 }
                    | AchievementRule::LevelReached { level: 0 }
            );
            if zero_threshold {
                return Err(ValidationError::InvalidAchievementRule(id));
            }
            if !seen.insert(id.clone()) {
                return Err(ValidationError::DuplicateAchievement(id));
            }
        }
        Ok(())
    }

    /// Builds the predicate registry for the achievement engine.
    pub fn build_registry(&self) -> Result<AchievementRegistry, ValidationError> {
        self.validate()?;
        let mut registry = AchievementRegistry::new();
        for definition in self.definitions() {
            let id = definition.id.to_string();
            registry
                .register_definition(definition)
                .map_err(|_| ValidationError::DuplicateAchievement(id))?;
        }
        Ok(registry)
    }
}

impl Default for AchievementsConfig {
    fn default() -> Self {
        Self {
            include_builtin: default_include_builtin(),
            custom: Vec::new(),
        }
    }
}

fn default_include_builtin() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::AchievementId;

    fn custom(id: &str, rule: AchievementRule) -> AchievementDefinition {
        AchievementDefinition::new(AchievementId::new(id).unwrap(), id, "", rule)
    }

    #[test]
    fn test_defaults_build_builtin_registry() {
        let registry = AchievementsConfig::default().build_registry().unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_custom_appended_after_builtin() {
        let config = AchievementsConfig {
            include_builtin: true,
            custom: vec![custom("marathon", AchievementRule::LessonsCompleted { count: 50 })],
        };
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 6);
        assert_eq!(registry.iter().last().unwrap().id.as_str(), "marathon");
    }

    #[test]
    fn test_duplicate_of_builtin_rejected() {
        let config = AchievementsConfig {
            include_builtin: true,
            custom: vec![custom("first-steps", AchievementRule::FirstLesson)],
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::DuplicateAchievement("first-steps".to_string()))
        );
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let config = AchievementsConfig {
            include_builtin: false,
            custom: vec![custom("free", AchievementRule::CoursesCompleted { count: 0 })],
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidAchievementRule(_))
        ));
    }
}
