//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod catalog;
pub mod entities;
pub mod error;
pub mod state;

pub use catalog::{default_medications, Catalog, CatalogSource};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use state::{Action, HandoutState};
