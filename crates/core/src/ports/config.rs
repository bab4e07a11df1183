use anyhow::Result;

/// Port for reading persisted user configuration
pub trait ConfigPort: Send + Sync {
    /// Host to authenticate against when a bare repository name is given
    fn default_host(&self) -> Result<String>;
}
