pub mod config;
pub mod context;
pub mod identity;
pub mod io;
pub mod prompt;
pub mod repository;

// Re-exports
pub use config::*;
pub use context::*;
pub use identity::*;
pub use io::*;
pub use prompt::*;
pub use repository::*;
