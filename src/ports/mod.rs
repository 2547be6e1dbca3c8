//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `IdentityProvider` - Credential verification, account creation, pushed sign-outs
//! - `CourseCatalog` - Read-only course source
//! - `LearnerRepository` - Learner record persistence
//!
//! ## Notification Ports
//!
//! - `SessionObserver` - Synchronous session change callbacks
//! - `EventPublisher` / `EventSubscriber` / `EventHandler` - Progress events

mod course_catalog;
mod event_publisher;
mod event_subscriber;
mod identity_provider;
mod learner_repository;
mod session_observer;

pub use course_catalog::CourseCatalog;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use identity_provider::{IdentityChange, IdentityProvider};
pub use learner_repository::LearnerRepository;
pub use session_observer::SessionObserver;
