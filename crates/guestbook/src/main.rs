//! `guestbook` - CLI for the local guestbook
//!
//! This binary signs the guestbook, lists and filters visitors, and manages
//! attendance from the command line or an interactive shell.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use guestbook::cli::shell;
use guestbook::cli::terminal::{TerminalConfirm, TerminalSurface};
use guestbook::cli::{
    AddCommand, ClearCommand, Cli, Command, ConfigCommand, IdCommand, ListCommand, OutputFormat,
};
use guestbook::surface::FixedAnswer;
use guestbook::{
    init_logging, AddOutcome, ClearOutcome, Config, Confirm, GuestStore, Guestbook, Storage,
};

type CliGuestbook<W> = Guestbook<Storage, TerminalSurface<W>>;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    // Execute the command
    match cli.command {
        Command::Add(add_cmd) => handle_add(&config, &add_cmd),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Toggle(id_cmd) => handle_toggle(&config, &id_cmd),
        Command::Delete(id_cmd) => handle_delete(&config, &id_cmd),
        Command::Clear(clear_cmd) => handle_clear(&config, clear_cmd),
        Command::Shell => handle_shell(&config),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Open the configured guestbook, rendering to `surface`.
fn open_guestbook<W: Write>(
    config: &Config,
    surface: TerminalSurface<W>,
) -> anyhow::Result<CliGuestbook<W>> {
    let path = config.database_path();
    let storage = Storage::open(&path)
        .with_context(|| format!("failed to open guestbook at {}", path.display()))?;
    let store = GuestStore::new(storage, config.storage.slot_key.as_str());
    Ok(Guestbook::open(
        store,
        surface,
        config.guestbook_options(),
    ))
}

/// Open the guestbook printing only notices, so one-shot commands don't dump
/// the whole list.
fn open_quiet(config: &Config) -> anyhow::Result<CliGuestbook<io::Stdout>> {
    open_guestbook(
        config,
        TerminalSurface::notices_only(io::stdout(), OutputFormat::Plain),
    )
}

fn handle_add(config: &Config, cmd: &AddCommand) -> anyhow::Result<()> {
    let mut guestbook = open_quiet(config)?;
    if let Some(line) = add_report(&guestbook.add(&cmd.to_form())?) {
        println!("{line}");
    }
    Ok(())
}

/// Line printed after an add. Rejected forms are silent.
fn add_report(outcome: &AddOutcome) -> Option<String> {
    match outcome {
        AddOutcome::Added(id) => Some(format!("Visitor id: {id}")),
        AddOutcome::Rejected(field) => {
            debug!(?field, "Nothing added: name and message are required");
            None
        }
    }
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let mut guestbook = open_guestbook(
        config,
        TerminalSurface::notices_only(io::stdout(), cmd.format),
    )?;
    guestbook.surface_mut().set_show_list(true);
    guestbook.search(cmd.filter.as_str());
    Ok(())
}

fn handle_toggle(config: &Config, cmd: &IdCommand) -> anyhow::Result<()> {
    let mut guestbook = open_quiet(config)?;
    let id = cmd.record_id();
    let attended = guestbook.toggle_attendance(&id)?;
    println!(
        "{id} marked as {}",
        if attended { "visited" } else { "not visited" }
    );
    Ok(())
}

fn handle_delete(config: &Config, cmd: &IdCommand) -> anyhow::Result<()> {
    let mut guestbook = open_quiet(config)?;
    let removed = guestbook.delete(&cmd.record_id())?;
    println!("Removed {} ({})", removed.name, removed.id);
    Ok(())
}

fn handle_clear(config: &Config, cmd: ClearCommand) -> anyhow::Result<()> {
    let mut guestbook = open_quiet(config)?;
    let mut confirm: Box<dyn Confirm> = if cmd.yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(TerminalConfirm::new(io::stdin().lock(), io::stdout()))
    };

    match guestbook.clear_all(confirm.as_mut())? {
        ClearOutcome::NothingToClear => println!("The guestbook is already empty."),
        ClearOutcome::Declined => println!("Nothing removed."),
        ClearOutcome::Cleared(count) => println!("Removed {count} visitors."),
    }
    Ok(())
}

fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let mut guestbook = open_guestbook(
        config,
        TerminalSurface::new(io::stdout(), OutputFormat::Plain),
    )?;
    shell::run(&mut guestbook, io::stdin().lock(), io::stdout())?;
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let guestbook = open_quiet(config)?;
    let storage = guestbook.store().backend().stats()?;
    let stats = guestbook.stats();

    if json {
        let status = serde_json::json!({
            "database_path": config.database_path(),
            "slot_key": config.storage.slot_key,
            "visitors": stats.total,
            "attended": stats.attended,
            "newest": stats.newest,
            "oldest": stats.oldest,
            "slot_count": storage.slot_count,
            "last_write": storage.last_write,
            "db_size_bytes": storage.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("guestbook status");
        println!("----------------");
        println!("Database:      {}", config.database_path().display());
        println!("Slot:          {}", config.storage.slot_key);
        println!("Visitors:      {}", stats.total);
        println!("Attended:      {}", stats.attended);
        if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
            println!("Oldest entry:  {}", oldest.to_rfc3339());
            println!("Newest entry:  {}", newest.to_rfc3339());
        }
        println!(
            "Last write:    {}",
            storage.last_write.as_deref().unwrap_or("never")
        );
        println!("Size:          {} bytes", storage.db_size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Slot key:           {}", config.storage.slot_key);
                println!();
                println!("[Display]");
                println!("  Timestamp format:   {}", config.display.timestamp_format);
                match config.display.utc_offset_minutes {
                    Some(minutes) => println!("  UTC offset (min):   {minutes}"),
                    None => println!("  UTC offset (min):   local"),
                }
                println!(
                    "  Locale:             {}",
                    config.display.locale.as_deref().unwrap_or("default")
                );
                println!();
                println!("[Notice]");
                println!("  Show delay (ms):    {}", config.notice.show_delay_ms);
                println!("  Dismiss after (ms): {}", config.notice.dismiss_after_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
