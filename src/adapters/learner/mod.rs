//! Learner record adapters.

mod in_memory;

pub use in_memory::InMemoryLearnerRepository;
