use anyhow::Result;

/// Port for interactive yes/no questions
pub trait Prompter: Send + Sync {
    /// Ask `message`, falling back to `default` on an empty answer
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;
}
