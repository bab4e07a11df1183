//! Archivist application library
//!
//! Adapters that implement the core ports against GitHub, git and the
//! terminal, plus the service that runs the archive flow over them.

pub mod adapters;
pub mod services;
