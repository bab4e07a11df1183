use archivist_app::adapters::git::GitContextAdapter;
use archivist_app::adapters::github::GithubClient;
use archivist_app::adapters::persistence::FileConfigStore;
use archivist_app::adapters::terminal::{color_enabled, color_scheme, TerminalInfo, TerminalPrompter};
use archivist_app::services::ArchiveService;
use archivist_core::domain::ArchiveOutcome;
use archivist_core::error::{ArchiveError, Result};
use archivist_core::ports::IoStreams;
use clap::Parser;
use std::io;
use std::sync::Arc;
use tracing::{debug, info};

mod cli;

use cli::CliArgs;

fn main() {
    // Logs go to stderr so stdout stays clean for pipelines
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(TerminalInfo::detect().log_ansi(std::env::var_os("NO_COLOR").is_some()))
        .init();

    let args = CliArgs::parse();

    let code = match run(args) {
        Ok(outcome) => {
            info!("Finished: {:?}", outcome);
            0
        }
        Err(err) => {
            debug!("Archive failed: {:?}", err);
            eprintln!("{err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}

fn run(args: CliArgs) -> Result<ArchiveOutcome> {
    let store = match &args.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new().map_err(|source| ArchiveError::Config { source })?,
    };
    let config = store
        .load()
        .map_err(|source| ArchiveError::Config { source })?
        .with_env_overrides(|key| std::env::var(key).ok());
    info!("Using config {} (default host {})", store.path().display(), config.default_host());

    let terminal = TerminalInfo::detect();
    let color = color_enabled(
        terminal.stdout_is_tty,
        args.no_color,
        std::env::var_os("NO_COLOR").is_some(),
    );
    let request = args.to_request(terminal.can_prompt(config.prompt_disabled()));

    let cwd = std::env::current_dir().map_err(|e| ArchiveError::ContextResolution { source: e.into() })?;
    let context = GitContextAdapter::new(cwd, &config).with_repo_override(std::env::var("GH_REPO").ok());
    let github = Arc::new(GithubClient::new(config.clone()).map_err(|source| ArchiveError::Config { source })?);

    let service = ArchiveService::new(
        Arc::new(context),
        Arc::new(config),
        github.clone(),
        github,
        Arc::new(TerminalPrompter::new(color)),
    );

    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    let mut streams = IoStreams::new(&mut out, &mut err, terminal.stdout_is_tty).with_colors(color_scheme(color));
    service.run(&request, &mut streams)
}
