//! Session domain module.
//!
//! Authentication state of the running client: the `Session` snapshot,
//! the `SessionChange` notifications delivered to observers and the
//! `AuthError` taxonomy that provider failures are classified into.

mod errors;
mod snapshot;

pub use errors::{AuthError, ProviderError};
pub use snapshot::{ResetReason, Session, SessionChange};
