/// Parameters of one archive invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationRequest {
    /// Raw repository selector, possibly empty
    pub selector: String,
    /// The caller passed an explicit `--repo`
    pub has_repo_override: bool,
    /// Confirmation was pre-authorized with `--yes`
    pub confirmed: bool,
    /// The invoking terminal can answer an interactive prompt
    pub can_prompt: bool,
}

/// How a successful invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Archived,
    AlreadyArchived,
    Declined,
}
