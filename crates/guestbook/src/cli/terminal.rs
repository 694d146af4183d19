//! Terminal implementations of the display surface and confirmation.

use std::io::{BufRead, Write};

use tracing::{trace, warn};

use super::OutputFormat;
use crate::surface::{Confirm, Notice, Surface};
use crate::view::{GuestRow, GuestbookView};

/// Surface that prints views and notices to a writer.
#[derive(Debug)]
pub struct TerminalSurface<W> {
    out: W,
    format: OutputFormat,
    show_list: bool,
}

impl<W: Write> TerminalSurface<W> {
    /// Create a surface printing in `format`.
    #[must_use]
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            show_list: true,
        }
    }

    /// Create a surface that prints notices but not list refreshes.
    #[must_use]
    pub fn notices_only(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            show_list: false,
        }
    }

    /// Start or stop printing list refreshes.
    pub fn set_show_list(&mut self, show_list: bool) {
        self.show_list = show_list;
    }

    /// The underlying writer.
    #[must_use]
    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Mutable access to the underlying writer.
    #[must_use]
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Consume the surface and return the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

/// Format one row for plain output.
#[must_use]
pub fn format_row(row: &GuestRow) -> String {
    format!(
        "{}  {}  {}: {}  ({})",
        row.id, row.toggle.label, row.name, row.message, row.display_time
    )
}

/// Format a whole view for plain output.
#[must_use]
pub fn format_view(view: &GuestbookView) -> String {
    match view {
        GuestbookView::Empty { placeholder } => (*placeholder).to_string(),
        GuestbookView::Rows { rows } => rows.iter().map(format_row).collect::<Vec<_>>().join("\n"),
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn replace(&mut self, view: &GuestbookView) {
        if !self.show_list {
            return;
        }
        let text = match self.format {
            OutputFormat::Plain => format_view(view),
            OutputFormat::Json => match serde_json::to_string_pretty(view) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize view");
                    return;
                }
            },
        };
        self.emit(&text);
    }

    fn reset_form(&mut self) {
        trace!("Form reset");
    }

    fn clear_filter_input(&mut self) {
        trace!("Filter input cleared");
    }

    fn show_notice(&mut self, notice: &Notice) {
        // A terminal can't take a line back, so the notice is printed once
        // and its timing only logged.
        trace!(
            show_after_ms = notice.show_after.as_millis(),
            dismiss_after_ms = notice.dismiss_after.as_millis(),
            "Showing notice"
        );
        let text = match self.format {
            OutputFormat::Plain => format!("✔ {}", notice.message),
            OutputFormat::Json => match serde_json::to_string(notice) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "Failed to serialize notice");
                    return;
                }
            },
        };
        self.emit(&text);
    }
}

/// Confirmation read from a line of input.
///
/// Only `y` or `yes` (any case) confirm; anything else, including end of
/// input, declines.
#[derive(Debug)]
pub struct TerminalConfirm<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> TerminalConfirm<R, W> {
    /// Create a confirmation prompting on `out` and reading from `input`.
    #[must_use]
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }
}

impl<R: BufRead, W: Write> Confirm for TerminalConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if let Err(e) = write!(self.out, "{prompt} [y/N] ").and_then(|()| self.out.flush()) {
            warn!(error = %e, "Failed to write prompt");
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}
