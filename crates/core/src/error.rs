use thiserror::Error;

/// Every way an archive invocation can fail.
///
/// All variants are terminal: nothing is retried. Adapter errors are kept as
/// the source so the full chain can be printed.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("could not determine current repository: {source:#}")]
    ContextResolution { source: anyhow::Error },

    #[error("argument error: expected the \"[HOST/]OWNER/REPO\" format, got {selector:?}")]
    MalformedSelector { selector: String },

    #[error("could not determine current user on {host}: {source:#}")]
    IdentityResolution { host: String, source: anyhow::Error },

    #[error("could not read configuration: {source:#}")]
    Config { source: anyhow::Error },

    #[error("could not resolve to a Repository with the name '{repo}'")]
    RepositoryNotFound { repo: String },

    #[error("failed to fetch repository {repo}: {source:#}")]
    Transport { repo: String, source: anyhow::Error },

    #[error("could not prompt: confirmation with prompt or --yes flag required")]
    ConfirmationRequired,

    #[error("failed to prompt: {source:#}")]
    Prompt { source: anyhow::Error },

    #[error("API call failed: {source:#}")]
    Mutation { source: anyhow::Error },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl ArchiveError {
    /// Process exit code for this error; usage mistakes get 2, everything else 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            ArchiveError::ConfirmationRequired | ArchiveError::MalformedSelector { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
