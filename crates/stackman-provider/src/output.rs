//! Typed compose output lines
//!
//! The compose process speaks a small text protocol: a line equal to
//! `[Complete]` marks success and lines starting with `ERROR:` report
//! failures. The text form only exists at the process boundary; everything
//! past [`OutputLine::parse`] works with the enum.

/// Line emitted after a clean compose exit
pub const COMPLETE_SENTINEL: &str = "[Complete]";

/// Prefix marking an error line
pub const ERROR_PREFIX: &str = "ERROR:";

/// Error prefixes that end a stream immediately
pub const CRITICAL_PREFIXES: [&str; 2] = ["ERROR: Failed to start command", "ERROR: Failed to create"];

/// One line of compose output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// Ordinary process output
    Data(String),
    /// An `ERROR:` line that does not stop the stream
    Warning(String),
    /// An `ERROR:` line the stream cannot recover from
    Fatal(String),
    /// The operation finished successfully
    Complete,
}

impl OutputLine {
    /// Classify a raw text line
    pub fn parse(text: impl Into<String>) -> Self {
        let text = text.into();
        if text == COMPLETE_SENTINEL {
            Self::Complete
        } else if CRITICAL_PREFIXES.iter().any(|p| text.starts_with(p)) {
            Self::Fatal(text)
        } else if text.starts_with(ERROR_PREFIX) {
            Self::Warning(text)
        } else {
            Self::Data(text)
        }
    }

    /// Line text exactly as it appears on the wire
    pub fn text(&self) -> &str {
        match self {
            Self::Data(text) | Self::Warning(text) | Self::Fatal(text) => text,
            Self::Complete => COMPLETE_SENTINEL,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Warning(_) | Self::Fatal(_))
    }

    /// Whether nothing meaningful can follow this line
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fatal(_) | Self::Complete)
    }
}

impl std::fmt::Display for OutputLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}
