use crate::domain::repo::{RepoRef, RepositorySnapshot};
use anyhow::Result;
use thiserror::Error;

/// Failure of a repository read
#[derive(Error, Debug)]
pub enum FetchError {
    /// The repository does not exist or is not visible to the caller
    #[error("repository {repo} not found")]
    NotFound { repo: String },

    /// Network, HTTP or authentication failure
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Port for the remote repository API
pub trait RepositoryPort: Send + Sync {
    /// Read exactly `fields` of `repo`
    fn fetch_repository(
        &self,
        repo: &RepoRef,
        fields: &[&str],
    ) -> std::result::Result<RepositorySnapshot, FetchError>;

    /// Archive the repository with node id `id`, hosted where `repo` lives
    fn archive_repository(&self, repo: &RepoRef, id: &str) -> Result<()>;
}
