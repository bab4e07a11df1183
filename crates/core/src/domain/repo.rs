use crate::error::ArchiveError;
use serde::{Deserialize, Serialize};

/// Host used when nothing else is configured
pub const DEFAULT_HOST: &str = "github.com";

/// Fully-qualified reference to a remote repository
///
/// Two references are equal when their `owner/name` match, ignoring ASCII
/// case. The host only decides which API endpoint is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoRef {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(host: impl Into<String>, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: normalize_host(&host.into()),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`.
    ///
    /// `default_host` is used for the two-segment form.
    pub fn from_full_name(full_name: &str, default_host: &str) -> Result<Self, ArchiveError> {
        let malformed = || ArchiveError::MalformedSelector {
            selector: full_name.to_string(),
        };

        let parts: Vec<&str> = full_name.split('/').collect();
        if parts
            .iter()
            .any(|part| part.is_empty() || part.chars().any(char::is_whitespace))
        {
            return Err(malformed());
        }

        match parts.as_slice() {
            [owner, name] => Ok(Self::new(default_host, *owner, *name)),
            [host, owner, name] => Ok(Self::new(*host, *owner, *name)),
            _ => Err(malformed()),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl PartialEq for RepoRef {
    fn eq(&self, other: &Self) -> bool {
        self.owner.eq_ignore_ascii_case(&other.owner) && self.name.eq_ignore_ascii_case(&other.name)
    }
}

impl Eq for RepoRef {}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Lowercase a hostname and drop a leading `www.`
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    }
}

/// Point-in-time view of the remote fields the archive flow needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Opaque node id passed to the archive mutation
    pub id: String,
    pub name: String,
    pub owner: String,
    pub is_archived: bool,
}

/// Fields requested from the repository query
pub const SNAPSHOT_FIELDS: [&str; 4] = ["name", "owner", "isArchived", "id"];
