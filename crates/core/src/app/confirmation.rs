use crate::domain::{OperationRequest, RepoRef, RepositorySnapshot};
use crate::error::{ArchiveError, Result};
use crate::ports::Prompter;

/// What the gate has to do for a given request and snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// Nothing to archive; skip confirmation altogether
    AlreadyArchived,
    /// `--yes` was given
    PreAuthorized,
    /// No way to ask and no explicit override to fall back on
    CannotPrompt,
    /// Ask the user
    MustPrompt,
}

impl Assessment {
    /// Decide from the request alone, before anything remote is known.
    pub fn of_request(request: &OperationRequest) -> Self {
        if request.confirmed {
            Assessment::PreAuthorized
        } else if !request.can_prompt && !request.has_repo_override {
            Assessment::CannotPrompt
        } else {
            Assessment::MustPrompt
        }
    }

    pub fn of(request: &OperationRequest, snapshot: &RepositorySnapshot) -> Self {
        if snapshot.is_archived {
            Assessment::AlreadyArchived
        } else {
            Self::of_request(request)
        }
    }
}

/// Fail fast when an unattended invocation could never be confirmed.
pub fn ensure_confirmable(request: &OperationRequest) -> Result<()> {
    match Assessment::of_request(request) {
        Assessment::CannotPrompt => Err(ArchiveError::ConfirmationRequired),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    PendingConfirmation,
    Resolved { confirmed: bool },
}

/// Where the gate sends the flow next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    AlreadyArchived,
    Archive,
    Decline,
}

/// Confirmation state machine, evaluated once per invocation
#[derive(Debug)]
pub struct ConfirmationGate<'a> {
    request: &'a OperationRequest,
    state: ConfirmationState,
}

impl<'a> ConfirmationGate<'a> {
    pub fn new(request: &'a OperationRequest) -> Self {
        Self {
            request,
            state: ConfirmationState::PendingConfirmation,
        }
    }

    pub fn state(&self) -> ConfirmationState {
        self.state
    }

    pub fn evaluate(
        &mut self,
        repo: &RepoRef,
        snapshot: &RepositorySnapshot,
        prompter: &dyn Prompter,
    ) -> Result<GateDecision> {
        if self.state != ConfirmationState::PendingConfirmation {
            return Ok(self.decision());
        }

        match Assessment::of(self.request, snapshot) {
            Assessment::AlreadyArchived => return Ok(GateDecision::AlreadyArchived),
            Assessment::PreAuthorized => {
                self.state = ConfirmationState::Resolved { confirmed: true };
            }
            Assessment::CannotPrompt => return Err(ArchiveError::ConfirmationRequired),
            Assessment::MustPrompt => {
                let confirmed = prompter
                    .confirm(&format!("Archive {repo}?"), false)
                    .map_err(|source| ArchiveError::Prompt { source })?;
                self.state = ConfirmationState::Resolved { confirmed };
            }
        }

        Ok(self.decision())
    }

    fn decision(&self) -> GateDecision {
        match self.state {
            ConfirmationState::Resolved { confirmed: true } => GateDecision::Archive,
            _ => GateDecision::Decline,
        }
    }
}
