use crate::domain::repo::RepoRef;
use anyhow::Result;

/// Port for finding the repository bound to the invocation environment
pub trait ContextPort: Send + Sync {
    /// Resolve the "current" repository, e.g. from the local checkout
    fn current_repo(&self) -> Result<RepoRef>;
}
