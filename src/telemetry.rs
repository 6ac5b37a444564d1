//! Tracing initialization and event rendering.

use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::events::{Event, EventPayload};

const LINE_COLOR: &str = "\x1b[35m"; // magenta
const ERROR_COLOR: &str = "\x1b[31m"; // red
const RESET_COLOR: &str = "\x1b[0m";

/// Color mode for rendered telemetry output.
///
/// - [`FormatterMode::Auto`]: detects TTY capability via `stderr.is_terminal()`
/// - [`FormatterMode::Colored`]: always include ANSI color codes
/// - [`FormatterMode::Plain`]: never include color codes (logs/files)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatterMode {
    #[default]
    Auto,
    Colored,
    Plain,
}

impl FormatterMode {
    /// Auto-detects based on stderr TTY capability.
    #[must_use]
    pub fn auto_detect() -> Self {
        if std::io::stderr().is_terminal() {
            FormatterMode::Colored
        } else {
            FormatterMode::Plain
        }
    }

    /// True if this mode should use colored output. `Auto` performs TTY
    /// detection on each call.
    #[must_use]
    pub fn is_colored(&self) -> bool {
        match self {
            FormatterMode::Auto => std::io::stderr().is_terminal(),
            FormatterMode::Colored => true,
            FormatterMode::Plain => false,
        }
    }
}

/// Renders one event as a single display line, colored per mode.
#[must_use]
pub fn render_event(event: &Event, mode: FormatterMode) -> String {
    if !mode.is_colored() {
        return event.to_string();
    }
    let color = match event.payload {
        EventPayload::StageFailed { .. } => ERROR_COLOR,
        _ => LINE_COLOR,
    };
    format!("{color}{event}{RESET_COLOR}")
}

/// Installs the global tracing subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`; ANSI output follows
/// stderr TTY detection. Safe to call more than once; only the first call
/// installs.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(FormatterMode::auto_detect().is_colored())
        .with_writer(std::io::stderr)
        .try_init();
}
