pub mod repo;
pub mod request;

// Re-exports for convenience
pub use repo::*;
pub use request::*;
