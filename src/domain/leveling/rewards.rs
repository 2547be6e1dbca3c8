//! XP granted per completed lesson.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::LessonKind;
use crate::domain::foundation::ValidationError;

/// XP table keyed by lesson kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpRewards {
    #[serde(default = "default_video_xp")]
    pub video: u32,
    #[serde(default = "default_interactive_xp")]
    pub interactive_3d: u32,
    #[serde(default = "default_quiz_xp")]
    pub quiz: u32,
}

impl XpRewards {
    pub fn for_kind(&self, kind: LessonKind) -> u32 {
        match kind {
            LessonKind::Video => self.video,
            LessonKind::Interactive3D => self.interactive_3d,
            LessonKind::Quiz => self.quiz,
        }
    }

    /// Every lesson must be worth something; a zero award is not a valid XP grant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("xp.video", self.video),
            ("xp.interactive_3d", self.interactive_3d),
            ("xp.quiz", self.quiz),
        ] {
            if value == 0 {
                return Err(ValidationError::out_of_range(field, 1, i64::from(u32::MAX), 0));
            }
        }
        Ok(())
    }
}

impl Default for XpRewards {
    fn default() -> Self {
        Self {
            video: default_video_xp(),
            interactive_3d: default_interactive_xp(),
            quiz: default_quiz_xp(),
        }
    }
}

fn default_video_xp() -> u32 {
    100
}

fn default_interactive_xp() -> u32 {
    150
}

fn default_quiz_xp() -> u32 {
    125
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_per_kind() {
        let rewards = XpRewards::default();
        assert_eq!(rewards.for_kind(LessonKind::Video), 100);
        assert_eq!(rewards.for_kind(LessonKind::Interactive3D), 150);
        assert_eq!(rewards.for_kind(LessonKind::Quiz), 125);
        assert!(rewards.validate().is_ok());
    }

    #[test]
    fn zero_reward_is_invalid() {
        let rewards = XpRewards {
            quiz: 0,
            ..Default::default()
        };
        assert!(rewards.validate().is_err());
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let rewards: XpRewards = serde_json::from_str(r#"{"video": 40}"#).unwrap();
        assert_eq!(rewards.video, 40);
        assert_eq!(rewards.quiz, 125);
    }
}
