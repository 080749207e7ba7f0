//! medhandout: assemble printable medication handouts
//!
//! Layers, innermost first:
//! - [`domain`]: medications, plan entries, the handout state and its update function
//! - [`application`]: catalog loading, draft persistence, rendering, the session service
//! - [`infrastructure`]: filesystem, key-value store, picker and clock implementations
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
