//! Strongly-typed identifier value objects.
//!
//! Every identifier in this crate is issued by an external collaborator
//! (the identity provider or the course catalog), so they are opaque
//! non-empty strings rather than locally generated UUIDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning error if empty or blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Learner identifier, issued by the identity provider.
    UserId,
    "user_id"
);

impl UserId {
    /// Fresh provider-style id, for providers that mint their own accounts.
    pub fn generate() -> Self {
        Self(format!("user-{}", Uuid::new_v4()))
    }
}

string_id!(
    /// Course identifier, issued by the course catalog.
    CourseId,
    "course_id"
);

string_id!(
    /// Lesson identifier, unique within its course.
    LessonId,
    "lesson_id"
);

string_id!(
    /// Achievement identifier (e.g. `first-steps`).
    AchievementId,
    "achievement_id"
);
