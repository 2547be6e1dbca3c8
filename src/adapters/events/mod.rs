//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus used by the composition root and tests

mod in_memory;

pub use in_memory::InMemoryEventBus;
