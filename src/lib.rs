//! Academy core - session management and learner progress for the Academy
//! learning platform.
//!
//! The crate turns an external identity provider into a well-defined
//! authentication state machine and tracks course enrollment, lesson
//! completion, experience levels and achievements. Rendering and page
//! composition live elsewhere and call into this core.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
