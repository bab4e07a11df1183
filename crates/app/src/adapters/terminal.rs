use anyhow::{bail, Context, Result};
use archivist_core::ports::{ColorScheme, Prompter};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use std::io::{self, BufRead, Write};

/// Which standard streams are attached to a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalInfo {
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
}

impl TerminalInfo {
    pub fn detect() -> Self {
        Self {
            stdin_is_tty: io::stdin().is_tty(),
            stdout_is_tty: io::stdout().is_tty(),
            stderr_is_tty: io::stderr().is_tty(),
        }
    }

    /// Prompting needs both ends of the terminal and must not be disabled.
    pub fn can_prompt(&self, prompt_disabled: bool) -> bool {
        self.stdin_is_tty && self.stdout_is_tty && !prompt_disabled
    }

    /// Escape codes in log lines only when stderr is a terminal.
    pub fn log_ansi(&self, no_color_env: bool) -> bool {
        self.stderr_is_tty && !no_color_env
    }
}

/// Color is used only on a terminal, and never when `NO_COLOR` or `--no-color` is set.
pub fn color_enabled(stdout_is_tty: bool, no_color_flag: bool, no_color_env: bool) -> bool {
    stdout_is_tty && !no_color_flag && !no_color_env
}

pub fn color_scheme(enabled: bool) -> ColorScheme {
    if !enabled {
        return ColorScheme::plain();
    }
    ColorScheme {
        warning_icon: "!".yellow().to_string(),
        success_icon: "✓".green().to_string(),
    }
}

/// Ask a yes/no question on `writer`, reading answers from `reader`.
///
/// An empty answer picks `default`; anything unrecognised asks again.
pub fn ask_confirm<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    message: &str,
    default: bool,
    color: bool,
) -> Result<bool> {
    let marker = if color { "?".green().bold().to_string() } else { "?".to_string() };
    let hint = if default { "(Y/n)" } else { "(y/N)" };

    loop {
        write!(writer, "{marker} {message} {hint} ")?;
        writer.flush()?;

        let mut answer = String::new();
        let read = reader.read_line(&mut answer).context("Failed to read answer")?;
        if read == 0 {
            bail!("prompt aborted: end of input");
        }

        match answer.trim().to_ascii_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(writer, "Please answer y or n.")?,
        }
    }
}

/// Prompter that asks on stderr and reads stdin
pub struct TerminalPrompter {
    color: bool,
}

impl TerminalPrompter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        let stdin = io::stdin();
        if !stdin.is_tty() {
            bail!("stdin is not a terminal");
        }
        let mut reader = stdin.lock();
        let mut stderr = io::stderr();
        ask_confirm(&mut reader, &mut stderr, message, default, self.color)
    }
}
