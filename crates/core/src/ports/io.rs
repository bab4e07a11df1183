use std::io::Write;

/// Icons prefixed to user-facing notices
///
/// Adapters decide whether these carry terminal color codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub warning_icon: String,
    pub success_icon: String,
}

impl ColorScheme {
    /// Uncolored icons
    pub fn plain() -> Self {
        Self {
            warning_icon: "!".to_string(),
            success_icon: "✓".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::plain()
    }
}

/// Output side of the invocation: stdout for results, stderr for diagnostics
pub struct IoStreams<'a> {
    pub out: &'a mut dyn Write,
    pub err: &'a mut dyn Write,
    pub stdout_is_tty: bool,
    pub colors: ColorScheme,
}

impl<'a> IoStreams<'a> {
    pub fn new(out: &'a mut dyn Write, err: &'a mut dyn Write, stdout_is_tty: bool) -> Self {
        Self {
            out,
            err,
            stdout_is_tty,
            colors: ColorScheme::plain(),
        }
    }

    pub fn with_colors(mut self, colors: ColorScheme) -> Self {
        self.colors = colors;
        self
    }
}
