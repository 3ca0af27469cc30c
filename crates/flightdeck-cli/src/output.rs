//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, tab-separated text for scripts,
//! or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / `--json` flag
//! 2. `FORMAT` env var, then the user config `output` key
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Steps 2 and 3 happen in [`flightdeck_core::config::resolve_config`]; this
//! module only lets the flags override the configured value.

use std::io::{self, Write};

use clap::ValueEnum;
use flightdeck_analytics::ProjectionError;
use flightdeck_core::ModelError;
use serde::Serialize;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<16} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, aligned columns).
    Pretty,
    /// Tab-separated rows for pipes and scripts.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Parse the canonical name produced by config resolution.
    fn from_configured(name: &str) -> Option<Self> {
        match name {
            "pretty" => Some(Self::Pretty),
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Let explicit flags override the configured mode.
///
/// `configured` is the already-resolved name from the effective config;
/// anything unrecognized falls back to text.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    configured: &str,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    OutputMode::from_configured(configured).unwrap_or(OutputMode::Text)
}

/// Render `value` into `w` with explicit pretty/text renderers.
pub fn render_mode_to<T: Serialize>(
    w: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *w, value)?;
            writeln!(w)?;
        }
        OutputMode::Text => text_fn(value, w)?,
        OutputMode::Pretty => pretty_fn(value, w)?,
    }
    Ok(())
}

/// Like [`render_mode_to`], writing to stdout.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_mode_to(&mut out, mode, value, text_fn, pretty_fn)
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E1002").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// Create an error with a suggestion and error code.
    pub fn with_details(
        message: impl Into<String>,
        suggestion: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            suggestion: Some(suggestion.into()),
            error_code: Some(error_code.into()),
        }
    }

    fn from_code(message: String, code: flightdeck_core::ErrorCode) -> Self {
        Self {
            message,
            suggestion: code.hint().map(ToString::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

impl From<&ModelError> for CliError {
    fn from(err: &ModelError) -> Self {
        Self {
            message: err.to_string(),
            suggestion: Some(err.suggestion()),
            error_code: Some(err.error_code().to_string()),
        }
    }
}

impl From<&ProjectionError> for CliError {
    fn from(err: &ProjectionError) -> Self {
        Self::from_code(err.to_string(), err.error_code())
    }
}

impl From<&flightdeck_analytics::FieldError> for CliError {
    fn from(err: &flightdeck_analytics::FieldError) -> Self {
        Self::from_code(err.to_string(), err.error_code())
    }
}

/// Render an error into `w` in the requested format.
pub fn render_error_to(w: &mut dyn Write, mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut *w, &wrapper)?;
            writeln!(w)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(w, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(w, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    render_error_to(&mut out, mode, error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flightdeck_analytics::BoundsError;
    use flightdeck_core::TicketId;

    // ── resolve_output_mode ─────────────────────────────────────────────────

    #[test]
    fn format_flag_wins_over_json_and_config() {
        let mode = resolve_output_mode(Some(OutputMode::Text), true, "pretty");
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_wins_over_config() {
        assert_eq!(resolve_output_mode(None, true, "pretty"), OutputMode::Json);
    }

    #[test]
    fn configured_mode_used_without_flags() {
        assert_eq!(resolve_output_mode(None, false, "pretty"), OutputMode::Pretty);
        assert_eq!(resolve_output_mode(None, false, "json"), OutputMode::Json);
        assert_eq!(resolve_output_mode(None, false, "bogus"), OutputMode::Text);
    }

    // ── render_mode_to ──────────────────────────────────────────────────────

    #[derive(Serialize)]
    struct Count {
        name: &'static str,
        count: usize,
    }

    fn render(mode: OutputMode) -> String {
        let value = Count { name: "open", count: 3 };
        let mut buf = Vec::new();
        render_mode_to(
            &mut buf,
            mode,
            &value,
            |v, w| writeln!(w, "{}\t{}", v.name, v.count),
            |v, w| pretty_kv(w, v.name, v.count.to_string()),
        )
        .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn render_dispatches_per_mode() {
        assert_eq!(render(OutputMode::Text), "open\t3\n");
        assert!(render(OutputMode::Pretty).starts_with("open:"));
        let json: serde_json::Value = serde_json::from_str(&render(OutputMode::Json)).unwrap();
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn pretty_section_draws_rule() {
        let mut buf = Vec::new();
        pretty_section(&mut buf, "Stats").unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.starts_with("Stats\n"));
        assert!(s.contains(&"-".repeat(PRETTY_RULE_WIDTH)));
    }

    // ── CliError ────────────────────────────────────────────────────────────

    #[test]
    fn model_error_maps_to_code_and_hint() {
        let err = ModelError::DuplicateTicket(TicketId::Num(7));
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E2001"));
        assert!(cli.message.contains('7'));
        assert!(cli.suggestion.is_some());
    }

    #[test]
    fn projection_error_maps_to_code() {
        let err = ProjectionError::from(BoundsError::Empty);
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E3001"));
        assert_eq!(cli.message, "cannot compute bounds of empty set");
    }

    #[test]
    fn error_renders_json_wrapper() {
        let cli = CliError::with_details("boom", "try again", "E1003");
        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Json, &cli).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["error"]["error_code"], "E1003");
        assert_eq!(json["error"]["suggestion"], "try again");

        let mut buf = Vec::new();
        render_error_to(&mut buf, OutputMode::Text, &cli).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "error: boom\n  suggestion: try again\n"
        );
    }
}
