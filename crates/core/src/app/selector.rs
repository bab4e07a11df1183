use crate::domain::repo::{normalize_host, RepoRef};
use crate::error::{ArchiveError, Result};
use crate::ports::{ConfigPort, ContextPort, IdentityPort};

/// Shape of a user-supplied repository selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// Nothing given: use the repository bound to the current context
    Current,
    /// A repository name owned by the authenticated user
    Bare(&'a str),
    /// `OWNER/REPO` or `HOST/OWNER/REPO`
    Qualified(&'a str),
}

impl<'a> Selector<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if raw.is_empty() {
            Selector::Current
        } else if raw.contains('/') {
            Selector::Qualified(raw)
        } else {
            Selector::Bare(raw)
        }
    }
}

/// Turns selectors into fully-qualified references.
///
/// Only the context, config and identity ports are consulted; the repository
/// API is never touched here.
pub struct SelectorResolver<'a> {
    context: &'a dyn ContextPort,
    config: &'a dyn ConfigPort,
    identity: &'a dyn IdentityPort,
}

impl<'a> SelectorResolver<'a> {
    pub fn new(
        context: &'a dyn ContextPort,
        config: &'a dyn ConfigPort,
        identity: &'a dyn IdentityPort,
    ) -> Self {
        Self {
            context,
            config,
            identity,
        }
    }

    pub fn resolve(&self, raw: &str) -> Result<RepoRef> {
        match Selector::classify(raw) {
            Selector::Current => self
                .context
                .current_repo()
                .map_err(|source| ArchiveError::ContextResolution { source }),
            Selector::Qualified(full_name) => {
                let host = self.default_host()?;
                RepoRef::from_full_name(full_name, &host)
            }
            Selector::Bare(name) => {
                if name.chars().any(char::is_whitespace) {
                    return Err(ArchiveError::MalformedSelector {
                        selector: name.to_string(),
                    });
                }
                let host = self.default_host()?;
                let login = self
                    .identity
                    .current_login(&host)
                    .map_err(|source| ArchiveError::IdentityResolution {
                        host: host.clone(),
                        source,
                    })?;
                RepoRef::from_full_name(&format!("{login}/{name}"), &host)
            }
        }
    }

    fn default_host(&self) -> Result<String> {
        self.config
            .default_host()
            .map(|host| normalize_host(&host))
            .map_err(|source| ArchiveError::Config { source })
    }
}
