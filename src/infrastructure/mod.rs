//! Infrastructure layer: I/O implementations and DI container
//!
//! Real and in-memory implementations of the I/O boundary traits
//! (filesystem, draft store, commands, picker, clock) and their wiring.

pub mod di;
pub mod error;
pub mod traits;

pub use error::InfraError;
