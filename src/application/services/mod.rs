//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, KeyValueStore, etc.)
//! but are themselves concrete structs, not traits.

mod catalog;
mod draft;
mod handout;
mod print;

pub use catalog::CatalogService;
pub use draft::{DraftService, DRAFT_KEY};
pub use handout::HandoutService;
pub use print::{PrintService, PrintTarget};
