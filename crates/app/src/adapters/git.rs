use anyhow::{anyhow, Context, Result};
use archivist_core::domain::{normalize_host, RepoRef, DEFAULT_HOST};
use archivist_core::ports::ContextPort;
use git2::Repository as GitRepository;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

use super::persistence::AppConfig;

/// Context adapter that binds to `GH_REPO` or the git checkout around `start_dir`
pub struct GitContextAdapter {
    start_dir: PathBuf,
    default_host: String,
    known_hosts: Vec<String>,
    repo_override: Option<String>,
}

impl GitContextAdapter {
    pub fn new<P: AsRef<Path>>(start_dir: P, config: &AppConfig) -> Self {
        let mut known_hosts = config.known_hosts();
        if !known_hosts.iter().any(|h| h == DEFAULT_HOST) {
            known_hosts.push(DEFAULT_HOST.to_string());
        }
        Self {
            start_dir: start_dir.as_ref().to_path_buf(),
            default_host: config.default_host(),
            known_hosts,
            repo_override: None,
        }
    }

    /// Value of `GH_REPO`, which wins over the checkout
    pub fn with_repo_override(mut self, value: Option<String>) -> Self {
        self.repo_override = value.filter(|v| !v.trim().is_empty());
        self
    }

    /// Remotes of the checkout that point at a known host, best first
    fn candidate_remotes(&self) -> Result<Vec<(String, RepoRef)>> {
        let repo = GitRepository::discover(&self.start_dir).with_context(|| {
            format!("{} is not inside a git repository", self.start_dir.display())
        })?;

        let names = repo.remotes().context("Failed to list git remotes")?;
        let mut candidates: Vec<(String, RepoRef)> = names
            .iter()
            .flatten()
            .filter_map(|name| {
                let remote = repo.find_remote(name).ok()?;
                let parsed = parse_remote_url(remote.url()?)?;
                Some((name.to_string(), parsed))
            })
            .filter(|(_, repo_ref)| self.known_hosts.contains(&repo_ref.host))
            .collect();

        candidates.sort_by(|(a, _), (b, _)| remote_rank(a).cmp(&remote_rank(b)).then_with(|| a.cmp(b)));
        Ok(candidates)
    }
}

impl ContextPort for GitContextAdapter {
    fn current_repo(&self) -> Result<RepoRef> {
        if let Some(value) = &self.repo_override {
            debug!("Using GH_REPO={}", value);
            return Ok(RepoRef::from_full_name(value.trim(), &self.default_host)?);
        }

        let candidates = self.candidate_remotes()?;
        let (remote, repo) = candidates.into_iter().next().ok_or_else(|| {
            anyhow!("none of the git remotes configured for this repository point to a known GitHub host")
        })?;
        debug!("Resolved current repository {} from remote {}", repo, remote);
        Ok(repo)
    }
}

/// Preference order of remote names
fn remote_rank(name: &str) -> u8 {
    match name {
        "upstream" => 0,
        "github" => 1,
        "origin" => 2,
        _ => 3,
    }
}

/// Parse a git remote URL into a repository reference.
///
/// Handles `https://`, `ssh://`, `git://` and scp-like `git@host:owner/repo`.
pub fn parse_remote_url(raw: &str) -> Option<RepoRef> {
    let raw = raw.trim();
    let (host, path) = if is_scp_like(raw) {
        let (user_host, path) = raw.split_once(':')?;
        let host = user_host.rsplit('@').next()?;
        (host.to_string(), path.to_string())
    } else {
        let url = Url::parse(raw).ok()?;
        if !matches!(url.scheme(), "https" | "http" | "ssh" | "git" | "git+ssh") {
            return None;
        }
        (url.host_str()?.to_string(), url.path().to_string())
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }

    let host = match normalize_host(&host).as_str() {
        "ssh.github.com" => DEFAULT_HOST.to_string(),
        other => other.to_string(),
    };
    Some(RepoRef::new(host, owner, name))
}

fn is_scp_like(raw: &str) -> bool {
    if raw.contains("://") {
        return false;
    }
    match (raw.find(':'), raw.find('/')) {
        (Some(colon), Some(slash)) => colon < slash,
        (Some(_), None) => true,
        _ => false,
    }
}
