//! End-to-end tests of the archive flow over fake ports

use anyhow::anyhow;
use archivist_app::services::ArchiveService;
use archivist_core::domain::{ArchiveOutcome, OperationRequest, RepoRef, RepositorySnapshot};
use archivist_core::error::ArchiveError;
use archivist_core::ports::{
    ConfigPort, ContextPort, FetchError, IdentityPort, IoStreams, Prompter, RepositoryPort,
};
use std::sync::{Arc, Mutex};

/// Shared log of every port call, in order
#[derive(Default, Clone)]
struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    fn push(&self, call: impl Into<String>) {
        self.0.lock().unwrap().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }
}

struct FakeContext {
    log: CallLog,
    bound: Option<RepoRef>,
}

impl ContextPort for FakeContext {
    fn current_repo(&self) -> anyhow::Result<RepoRef> {
        self.log.push("context");
        self.bound.clone().ok_or_else(|| anyhow!("not a git repository"))
    }
}

struct FakeConfig {
    log: CallLog,
}

impl ConfigPort for FakeConfig {
    fn default_host(&self) -> anyhow::Result<String> {
        self.log.push("default_host");
        Ok("github.com".to_string())
    }
}

struct FakeIdentity {
    log: CallLog,
    login: Option<String>,
}

impl IdentityPort for FakeIdentity {
    fn current_login(&self, host: &str) -> anyhow::Result<String> {
        self.log.push(format!("identity {host}"));
        self.login.clone().ok_or_else(|| anyhow!("not logged in to {host}"))
    }
}

enum FetchBehavior {
    Snapshot { is_archived: bool },
    NotFound,
    Offline,
}

struct FakeRepositories {
    log: CallLog,
    fetch: FetchBehavior,
    archive_fails: bool,
}

impl RepositoryPort for FakeRepositories {
    fn fetch_repository(&self, repo: &RepoRef, fields: &[&str]) -> Result<RepositorySnapshot, FetchError> {
        assert_eq!(fields, ["name", "owner", "isArchived", "id"]);
        self.log.push(format!("fetch {repo}"));
        match self.fetch {
            FetchBehavior::Snapshot { is_archived } => Ok(RepositorySnapshot {
                id: "R_kgDOHello".to_string(),
                name: repo.name.clone(),
                owner: repo.owner.clone(),
                is_archived,
            }),
            FetchBehavior::NotFound => Err(FetchError::NotFound { repo: repo.full_name() }),
            FetchBehavior::Offline => Err(FetchError::Transport(anyhow!("connection refused"))),
        }
    }

    fn archive_repository(&self, repo: &RepoRef, id: &str) -> anyhow::Result<()> {
        self.log.push(format!("archive {repo} {id}"));
        if self.archive_fails {
            return Err(anyhow!("Repository was already archived"));
        }
        Ok(())
    }
}

struct FakePrompter {
    log: CallLog,
    answer: anyhow::Result<bool>,
}

impl Prompter for FakePrompter {
    fn confirm(&self, message: &str, default: bool) -> anyhow::Result<bool> {
        self.log.push(format!("prompt {message} default={default}"));
        match &self.answer {
            Ok(answer) => Ok(*answer),
            Err(e) => Err(anyhow!("{e}")),
        }
    }
}

/// Builder for one scenario
struct Scenario {
    log: CallLog,
    bound: Option<RepoRef>,
    login: Option<String>,
    fetch: FetchBehavior,
    archive_fails: bool,
    answer: anyhow::Result<bool>,
    stdout_is_tty: bool,
}

struct RunResult {
    result: Result<ArchiveOutcome, ArchiveError>,
    out: String,
    err: String,
    log: CallLog,
}

impl Scenario {
    fn new() -> Self {
        Self {
            log: CallLog::default(),
            bound: None,
            login: None,
            fetch: FetchBehavior::Snapshot { is_archived: false },
            archive_fails: false,
            answer: Err(anyhow!("prompt should not be shown")),
            stdout_is_tty: true,
        }
    }

    fn bound_to(mut self, owner: &str, name: &str) -> Self {
        self.bound = Some(RepoRef::new("github.com", owner, name));
        self
    }

    fn login(mut self, login: &str) -> Self {
        self.login = Some(login.to_string());
        self
    }

    fn fetch(mut self, fetch: FetchBehavior) -> Self {
        self.fetch = fetch;
        self
    }

    fn answer(mut self, answer: bool) -> Self {
        self.answer = Ok(answer);
        self
    }

    fn prompt_fails(mut self) -> Self {
        self.answer = Err(anyhow!("terminal went away"));
        self
    }

    fn archive_fails(mut self) -> Self {
        self.archive_fails = true;
        self
    }

    fn piped_stdout(mut self) -> Self {
        self.stdout_is_tty = false;
        self
    }

    fn run(self, request: OperationRequest) -> RunResult {
        let log = self.log.clone();
        let service = ArchiveService::new(
            Arc::new(FakeContext { log: log.clone(), bound: self.bound }),
            Arc::new(FakeConfig { log: log.clone() }),
            Arc::new(FakeIdentity { log: log.clone(), login: self.login }),
            Arc::new(FakeRepositories {
                log: log.clone(),
                fetch: self.fetch,
                archive_fails: self.archive_fails,
            }),
            Arc::new(FakePrompter { log: log.clone(), answer: self.answer }),
        );

        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = {
            let mut io = IoStreams::new(&mut out, &mut err, self.stdout_is_tty);
            service.run(&request, &mut io)
        };

        RunResult {
            result,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
            log,
        }
    }
}

fn request(selector: &str, confirmed: bool, can_prompt: bool, has_repo_override: bool) -> OperationRequest {
    OperationRequest {
        selector: selector.to_string(),
        has_repo_override,
        confirmed,
        can_prompt,
    }
}

#[test]
fn test_qualified_selector_pre_authorized_archives_once() {
    let run = Scenario::new().run(request("octo/hello", true, true, true));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::Archived);
    assert_eq!(run.log.count("archive octo/hello R_kgDOHello"), 1);
    assert_eq!(run.log.count("prompt"), 0);
    assert_eq!(run.log.count("context"), 0);
    assert_eq!(run.log.count("identity"), 0);
    assert_eq!(run.out, "✓ Archived repository octo/hello\n");
    assert!(run.err.is_empty());
}

#[test]
fn test_success_is_silent_when_stdout_is_piped() {
    let run = Scenario::new()
        .piped_stdout()
        .run(request("octo/hello", true, false, true));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::Archived);
    assert_eq!(run.log.count("archive"), 1);
    assert!(run.out.is_empty());
    assert!(run.err.is_empty());
}

#[test]
fn test_empty_selector_already_archived_is_a_no_op() {
    let run = Scenario::new()
        .bound_to("octo", "hello")
        .fetch(FetchBehavior::Snapshot { is_archived: true })
        .run(request("", false, true, false));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::AlreadyArchived);
    assert_eq!(run.log.count("context"), 1);
    assert_eq!(run.log.count("identity"), 0);
    assert_eq!(run.log.count("prompt"), 0);
    assert_eq!(run.log.count("archive"), 0);
    assert!(run.out.is_empty());
    assert_eq!(run.err, "! Repository octo/hello is already archived\n");
}

#[test]
fn test_already_archived_even_when_pre_authorized() {
    let run = Scenario::new()
        .fetch(FetchBehavior::Snapshot { is_archived: true })
        .run(request("octo/hello", true, false, true));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::AlreadyArchived);
    assert_eq!(run.log.count("archive"), 0);
}

#[test]
fn test_bare_selector_declined_does_nothing() {
    let run = Scenario::new()
        .login("octo")
        .answer(false)
        .run(request("hello", false, true, false));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::Declined);
    assert_eq!(
        run.log.calls(),
        vec![
            "default_host".to_string(),
            "identity github.com".to_string(),
            "fetch octo/hello".to_string(),
            "prompt Archive octo/hello? default=false".to_string(),
        ]
    );
    assert!(run.out.is_empty());
    assert!(run.err.is_empty());
}

#[test]
fn test_prompt_accepted_archives() {
    let run = Scenario::new()
        .answer(true)
        .run(request("octo/hello", false, true, false));

    assert_eq!(run.result.unwrap(), ArchiveOutcome::Archived);
    assert_eq!(run.log.count("prompt"), 1);
    assert_eq!(run.log.count("archive"), 1);
}

#[test]
fn test_non_interactive_without_override_fails_before_any_call() {
    let run = Scenario::new()
        .bound_to("octo", "hello")
        .run(request("", false, false, false));

    assert!(matches!(run.result, Err(ArchiveError::ConfirmationRequired)));
    assert!(run.log.calls().is_empty());
}

#[test]
fn test_non_interactive_with_override_reaches_prompt() {
    let run = Scenario::new()
        .prompt_fails()
        .run(request("octo/hello", false, false, true));

    assert!(matches!(run.result, Err(ArchiveError::Prompt { .. })));
    assert_eq!(run.log.count("fetch"), 1);
    assert_eq!(run.log.count("archive"), 0);
}

#[test]
fn test_missing_context_binding() {
    let run = Scenario::new().run(request("", true, false, false));

    assert!(matches!(run.result, Err(ArchiveError::ContextResolution { .. })));
    assert_eq!(run.log.count("fetch"), 0);
}

#[test]
fn test_bare_selector_without_identity() {
    let run = Scenario::new().run(request("hello", true, false, false));

    assert!(matches!(run.result, Err(ArchiveError::IdentityResolution { .. })));
    assert_eq!(run.log.count("fetch"), 0);
}

#[test]
fn test_malformed_selector() {
    let run = Scenario::new().run(request("octo/hello/extra/parts", true, false, true));

    let err = run.result.unwrap_err();
    assert!(matches!(err, ArchiveError::MalformedSelector { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(run.log.count("fetch"), 0);
}

#[test]
fn test_fetch_failures_map_to_taxonomy() {
    let run = Scenario::new()
        .fetch(FetchBehavior::NotFound)
        .run(request("octo/missing", true, false, true));
    assert!(matches!(
        run.result,
        Err(ArchiveError::RepositoryNotFound { ref repo }) if repo == "octo/missing"
    ));

    let run = Scenario::new()
        .fetch(FetchBehavior::Offline)
        .run(request("octo/hello", true, false, true));
    assert!(matches!(run.result, Err(ArchiveError::Transport { .. })));
    assert_eq!(run.log.count("archive"), 0);
}

#[test]
fn test_mutation_conflict_is_surfaced() {
    let run = Scenario::new()
        .archive_fails()
        .run(request("octo/hello", true, true, true));

    let err = run.result.unwrap_err();
    assert!(matches!(err, ArchiveError::Mutation { .. }));
    assert_eq!(err.to_string(), "API call failed: Repository was already archived");
    assert!(run.out.is_empty());
}

#[test]
fn test_blank_override_does_not_fall_back_to_checkout() {
    let run = Scenario::new()
        .bound_to("octo", "checkout")
        .login("octo")
        .run(request("   ", false, false, true));

    assert!(matches!(run.result, Err(ArchiveError::MalformedSelector { .. })));
    assert_eq!(run.log.count("context"), 0);
    assert_eq!(run.log.count("fetch"), 0);
}
