//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::{GuestForm, RecordId};

/// Sign the guestbook.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Visitor name
    #[arg(short, long)]
    pub name: String,

    /// Message to leave
    #[arg(short, long)]
    pub message: String,

    /// Mark the visitor as attended
    #[arg(short, long)]
    pub attended: bool,
}

impl AddCommand {
    /// The form these arguments fill in.
    #[must_use]
    pub fn to_form(&self) -> GuestForm {
        GuestForm::new(self.name.as_str(), self.message.as_str(), self.attended)
    }
}

/// List visitors.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only show visitors whose name or message contains this text
    #[arg(default_value = "")]
    pub filter: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Arguments addressing one visitor.
#[derive(Debug, Args)]
pub struct IdCommand {
    /// Visitor id as shown by `list`
    pub id: String,
}

impl IdCommand {
    /// The addressed record id.
    ///
    /// Ids are lowercase hex, so pasted input is normalised to match.
    #[must_use]
    pub fn record_id(&self) -> RecordId {
        RecordId::from(self.id.trim().to_lowercase())
    }
}

/// Clear the guestbook.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_command_to_form() {
        let cmd = AddCommand {
            name: " Ana ".to_string(),
            message: "Hi".to_string(),
            attended: true,
        };
        let form = cmd.to_form();
        assert_eq!(form, GuestForm::new(" Ana ", "Hi", true));
        assert_eq!(form.trimmed_name(), "Ana");
    }

    #[test]
    fn test_id_command_trims() {
        let cmd = IdCommand {
            id: " a1b2c3d4e5f6\n".to_string(),
        };
        assert_eq!(cmd.record_id(), RecordId::from("a1b2c3d4e5f6"));
    }

    #[test]
    fn test_id_command_lowercases() {
        let cmd = IdCommand {
            id: "A1B2C3D4E5F6".to_string(),
        };
        assert_eq!(cmd.record_id(), RecordId::from("a1b2c3d4e5f6"));
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
