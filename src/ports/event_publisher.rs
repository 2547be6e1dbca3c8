//! EventPublisher port - outbound progress events.
//!
//! Services publish `EventEnvelope`s after the learner record they describe
//! has been saved. The transport (in-memory bus, message broker) is the
//! adapter's concern.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must:
/// - Deliver envelopes in the order given
/// - Propagate delivery errors to the caller
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single envelope.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish a batch in order, stopping at the first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}
