use archivist_core::app::{ensure_confirmable, ConfirmationGate, GateDecision, SelectorResolver};
use archivist_core::domain::{ArchiveOutcome, OperationRequest, RepoRef, RepositorySnapshot, SNAPSHOT_FIELDS};
use archivist_core::error::{ArchiveError, Result};
use archivist_core::ports::{ConfigPort, ContextPort, FetchError, IdentityPort, IoStreams, Prompter, RepositoryPort};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Runs one archive invocation over the ports:
/// resolve the selector, fetch the snapshot, pass the confirmation gate, archive.
pub struct ArchiveService {
    // Ports (dependency injection)
    context: Arc<dyn ContextPort>,
    config: Arc<dyn ConfigPort>,
    identity: Arc<dyn IdentityPort>,
    repositories: Arc<dyn RepositoryPort>,
    prompter: Arc<dyn Prompter>,
}

impl ArchiveService {
    pub fn new(
        context: Arc<dyn ContextPort>,
        config: Arc<dyn ConfigPort>,
        identity: Arc<dyn IdentityPort>,
        repositories: Arc<dyn RepositoryPort>,
        prompter: Arc<dyn Prompter>,
    ) -> Self {
        Self {
            context,
            config,
            identity,
            repositories,
            prompter,
        }
    }

    pub fn run(&self, request: &OperationRequest, io: &mut IoStreams<'_>) -> Result<ArchiveOutcome> {
        // Unattended runs must fail before any remote call
        ensure_confirmable(request)?;

        let repo = self.resolve(request)?;
        let snapshot = self.fetch(&repo)?;

        let mut gate = ConfirmationGate::new(request);
        match gate.evaluate(&repo, &snapshot, self.prompter.as_ref())? {
            GateDecision::AlreadyArchived => {
                warn!("{} is already archived, nothing to do", repo);
                writeln!(io.err, "{} Repository {} is already archived", io.colors.warning_icon, repo)?;
                Ok(ArchiveOutcome::AlreadyArchived)
            }
            GateDecision::Decline => {
                info!("Archiving {} declined", repo);
                Ok(ArchiveOutcome::Declined)
            }
            GateDecision::Archive => {
                self.archive(&repo, &snapshot)?;
                if io.stdout_is_tty {
                    writeln!(io.out, "{} Archived repository {}", io.colors.success_icon, repo)?;
                }
                Ok(ArchiveOutcome::Archived)
            }
        }
    }

    fn resolve(&self, request: &OperationRequest) -> Result<RepoRef> {
        let resolver = SelectorResolver::new(
            self.context.as_ref(),
            self.config.as_ref(),
            self.identity.as_ref(),
        );
        let repo = resolver.resolve(&request.selector)?;
        debug!("Selector {:?} resolved to {} on {}", request.selector, repo, repo.host);
        Ok(repo)
    }

    fn fetch(&self, repo: &RepoRef) -> Result<RepositorySnapshot> {
        self.repositories
            .fetch_repository(repo, &SNAPSHOT_FIELDS)
            .map_err(|e| match e {
                FetchError::NotFound { .. } => ArchiveError::RepositoryNotFound {
                    repo: repo.full_name(),
                },
                FetchError::Transport(source) => ArchiveError::Transport {
                    repo: repo.full_name(),
                    source,
                },
            })
    }

    fn archive(&self, repo: &RepoRef, snapshot: &RepositorySnapshot) -> Result<()> {
        info!("Archiving {} ({})", repo, snapshot.id);
        self.repositories
            .archive_repository(repo, &snapshot.id)
            .map_err(|source| ArchiveError::Mutation { source })
    }
}
