use anyhow::Result;

/// Port for looking up who the caller is authenticated as
pub trait IdentityPort: Send + Sync {
    /// Login name of the authenticated user on `host`
    fn current_login(&self, host: &str) -> Result<String>;
}
