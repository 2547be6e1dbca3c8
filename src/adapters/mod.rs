//! Adapters - Implementations of port interfaces.
//!
//! - `identity` - Identity provider stand-in
//! - `catalog` - In-memory course catalog
//! - `learner` - In-memory learner record store
//! - `events` - In-process event bus

pub mod catalog;
pub mod events;
pub mod identity;
pub mod learner;

pub use catalog::InMemoryCourseCatalog;
pub use events::InMemoryEventBus;
pub use identity::MockIdentityProvider;
pub use learner::InMemoryLearnerRepository;
