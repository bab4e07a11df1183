//! Archivist Core - Pure domain logic with no external dependencies
//!
//! This crate contains the domain types, the error taxonomy, the selector
//! parsing rules, the confirmation state machine and the ports (interfaces)
//! for archiving a repository. It never talks to the network, git or the
//! terminal itself - those are handled by adapters.

pub mod domain;
pub mod ports;
pub mod app;
pub mod error;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
