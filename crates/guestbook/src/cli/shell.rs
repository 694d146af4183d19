//! Interactive guestbook session.
//!
//! The shell keeps one [`Guestbook`] open and feeds it one command per line,
//! so the search filter survives toggles and deletions the same way it does
//! in a live list.

use std::io::{self, BufRead, Write};

use tracing::debug;

use super::terminal::{TerminalConfirm, TerminalSurface};
use crate::controller::{AddOutcome, ClearOutcome, Guestbook};
use crate::record::{GuestForm, RecordId};
use crate::storage::SlotBackend;

/// Help text printed by `help`.
pub const HELP: &str = "\
Commands:
  add <name> | <message> [| attended]   sign the guestbook
  search [text]                         filter by name or message
  toggle <id>                           flip attendance
  delete <id>                           remove a visitor
  clear                                 remove every visitor
  list                                  show the list again
  help                                  show this help
  quit                                  leave the shell";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Sign the guestbook.
    Add(GuestForm),
    /// Set the filter.
    Search(String),
    /// Toggle attendance.
    Toggle(RecordId),
    /// Delete a visitor.
    Delete(RecordId),
    /// Clear everything.
    Clear,
    /// Re-render.
    List,
    /// Print help.
    Help,
    /// Leave.
    Quit,
    /// Blank line.
    Nothing,
}

/// Parse one line of shell input.
///
/// # Errors
///
/// Returns a message for the user when the line is not a known command or
/// lacks a required argument.
pub fn parse_line(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.trim().is_empty() {
        return Ok(ShellCommand::Nothing);
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (trimmed, ""),
    };

    match word.to_lowercase().as_str() {
        "add" => Ok(ShellCommand::Add(parse_form(rest))),
        // The filter is taken verbatim, surrounding spaces included.
        "search" | "find" => Ok(ShellCommand::Search(rest.to_string())),
        "toggle" => parse_id(rest).map(ShellCommand::Toggle),
        "delete" | "rm" => parse_id(rest).map(ShellCommand::Delete),
        "clear" => Ok(ShellCommand::Clear),
        "list" | "ls" => Ok(ShellCommand::List),
        "help" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

fn parse_form(rest: &str) -> GuestForm {
    let (name, message) = rest.split_once('|').unwrap_or((rest, ""));
    // Only a recognised trailing flag is split off; other `|` stay in the message.
    match message.rsplit_once('|') {
        Some((text, flag)) if is_attended_flag(flag) => GuestForm::new(name, text, true),
        _ => GuestForm::new(name, message, false),
    }
}

fn is_attended_flag(flag: &str) -> bool {
    matches!(flag.trim().to_lowercase().as_str(), "attended" | "yes" | "y")
}

fn parse_id(rest: &str) -> Result<RecordId, String> {
    let id = rest.trim();
    if id.is_empty() {
        Err("missing visitor id".to_string())
    } else {
        Ok(RecordId::from(id.to_lowercase()))
    }
}

/// Run the shell until `quit` or end of input.
///
/// `input` supplies both commands and confirmation answers; `prompt_out`
/// receives prompts and messages while the list itself goes to the
/// guestbook's surface.
///
/// # Errors
///
/// Returns an error if reading input or writing prompts fails. Guestbook
/// errors are reported on `prompt_out` and the session continues.
pub fn run<B, W, R, P>(
    guestbook: &mut Guestbook<B, TerminalSurface<W>>,
    mut input: R,
    mut prompt_out: P,
) -> io::Result<()>
where
    B: SlotBackend,
    W: Write,
    R: BufRead,
    P: Write,
{
    writeln!(prompt_out, "Type 'help' for commands.")?;
    loop {
        write!(prompt_out, "guestbook> ")?;
        prompt_out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(prompt_out)?;
            return Ok(());
        }

        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(message) => {
                writeln!(prompt_out, "{message}")?;
                continue;
            }
        };
        debug!(?command, "Shell command");

        let result = match command {
            ShellCommand::Nothing => Ok(()),
            ShellCommand::Quit => return Ok(()),
            ShellCommand::Help => {
                writeln!(prompt_out, "{HELP}")?;
                Ok(())
            }
            ShellCommand::List => {
                guestbook.refresh();
                Ok(())
            }
            ShellCommand::Search(filter) => {
                guestbook.search(filter);
                Ok(())
            }
            ShellCommand::Add(form) => guestbook.add(&form).map(|outcome| {
                if let AddOutcome::Rejected(field) = outcome {
                    debug!(?field, "Add ignored");
                }
            }),
            ShellCommand::Toggle(id) => guestbook.toggle_attendance(&id).map(|_| ()),
            ShellCommand::Delete(id) => guestbook.delete(&id).map(|_| ()),
            ShellCommand::Clear => {
                let mut confirm = TerminalConfirm::new(&mut input, &mut prompt_out);
                guestbook.clear_all(&mut confirm).map(|outcome| {
                    if outcome == ClearOutcome::Declined {
                        debug!("Clear declined");
                    }
                })
            }
        };

        if let Err(e) = result {
            writeln!(prompt_out, "error: {e}")?;
        }
    }
}
