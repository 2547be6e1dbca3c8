//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `session` - Authentication session snapshot, changes and auth errors
//! - `catalog` - Immutable courses and lessons
//! - `progress` - Enrollments, the learner record and progress events
//! - `leveling` - XP accumulation and the level curve
//! - `achievement` - Unlockable achievements and their predicate registry

pub mod achievement;
pub mod catalog;
pub mod foundation;
pub mod leveling;
pub mod progress;
pub mod session;
