use archivist_core::domain::OperationRequest;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, PartialEq)]
#[command(name = "archivist", version)]
#[command(about = "Archive a GitHub repository")]
#[command(long_about = "Archive a GitHub repository.\n\nWith no --repo, archives the current repository.")]
pub struct CliArgs {
    /// Select another repository using the [HOST/]OWNER/REPO format
    #[arg(short = 'R', long, value_name = "[HOST/]OWNER/REPO")]
    pub repo: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long, visible_alias = "confirm")]
    pub yes: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl CliArgs {
    pub fn to_request(&self, can_prompt: bool) -> OperationRequest {
        OperationRequest {
            selector: self.repo.clone().unwrap_or_default(),
            has_repo_override: self.repo.is_some(),
            confirmed: self.yes,
            can_prompt,
        }
    }
}
