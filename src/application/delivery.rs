//! Delivery of events describing an already-saved learner record.

use tracing::warn;

use crate::domain::foundation::{EventEnvelope, EventId};
use crate::ports::EventPublisher;

/// Publishes each envelope in order and returns the ids that failed.
///
/// The save is the outcome of the operation. A delivery failure is logged
/// and reported back; it never turns a committed change into an error,
/// and one failed envelope does not hold back the ones after it.
pub(crate) async fn publish_committed(
    publisher: &dyn EventPublisher,
    envelopes: Vec<EventEnvelope>,
) -> Vec<EventId> {
    let mut undelivered = Vec::new();
    for envelope in envelopes {
        let event_id = envelope.event_id.clone();
        let event_type = envelope.event_type.clone();
        if let Err(err) = publisher.publish(envelope).await {
            warn!(
                %event_id,
                %event_type,
                code = %err.code,
                error = %err,
                "event delivery failed after commit"
            );
            undelivered.push(event_id);
        }
    }
    undelivered
}
