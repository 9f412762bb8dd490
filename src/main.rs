use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notekeep::config::{self, Config};
use notekeep::logging::{self, LogTarget};
use notekeep::{Database, Note, NoteError, NoteId, NoteService};
use tracing::warn;

/// notekeep - a small personal note store
#[derive(Parser)]
#[command(name = "notekeep")]
#[command(about = "Keep titled notes with tags in a local SQLite file")]
#[command(version)]
struct Cli {
    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Runs the terminal UI when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Add a new note with an optional tag
    Add(AddCommand),
    /// Replace a note's title and content
    Update(UpdateCommand),
    /// Delete a note and its tags
    Delete {
        #[arg(value_name = "ID")]
        id: NoteId,
    },
    /// List every note
    List {
        /// Print notes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Find notes by title substring or exact tag
    Search {
        #[arg(value_name = "TERM")]
        term: String,
        /// Print notes as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open the interactive terminal UI
    Tui,
}

#[derive(Parser)]
struct AddCommand {
    #[arg(long)]
    title: String,

    #[arg(long)]
    content: String,

    /// Tag title; an existing tag with this title is reused
    #[arg(long, default_value = "")]
    tag: String,
}

#[derive(Parser)]
struct UpdateCommand {
    #[arg(value_name = "ID")]
    id: NoteId,

    #[arg(long)]
    title: String,

    #[arg(long)]
    content: String,
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Returns true for validation and not-found failures anywhere in the chain.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<NoteError>()
            .is_some_and(NoteError::is_user_error)
    })
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(path) = cli.db {
        config.database_path = path;
    }
    let command = cli.command.unwrap_or(Commands::Tui);

    config::ensure_database_directory(&config.database_path)?;

    let log_file = config.log_file();
    let target = match command {
        Commands::Tui => LogTarget::File(&log_file),
        _ => LogTarget::Stderr,
    };
    logging::init(&config.log_filter, target)?;

    let db = Database::open(&config.database_path).context("Failed to open database")?;
    let service = NoteService::with_tag_reuse(db, config.tag_reuse);

    let result = match command {
        Commands::Tui => notekeep::tui::run(&service),
        other => execute(&other, &service, &mut io::stdout().lock()),
    };

    if let Err(e) = service.database().close() {
        warn!(error = %e, "failed to close database");
    }

    result
}

/// Runs a one-shot command, writing its output to `out`.
///
/// Separated from `run` so commands can be tested against in-memory databases.
fn execute(command: &Commands, service: &NoteService, out: &mut impl Write) -> Result<()> {
    match command {
        Commands::Add(cmd) => {
            let note = service
                .add_note(&cmd.title, &cmd.content, &cmd.tag)
                .context("Failed to add note")?;
            write!(out, "Note created (id: {})", note.id())?;
            if let Some(tag) = note.tags().first() {
                write!(out, " with tag: {}", tag.title())?;
            }
            writeln!(out)?;
        }
        Commands::Update(cmd) => {
            let note = service
                .update_note(cmd.id, &cmd.title, &cmd.content)
                .context("Failed to update note")?;
            writeln!(out, "Note {} updated", note.id())?;
        }
        Commands::Delete { id } => {
            service.delete_note(*id).context("Failed to delete note")?;
            writeln!(out, "Note {id} deleted")?;
        }
        Commands::List { json } => {
            let notes = service.list_all_notes().context("Failed to list notes")?;
            print_notes(out, &notes, *json)?;
        }
        Commands::Search { term, json } => {
            let notes = service
                .search_notes(term)
                .context("Failed to search notes")?;
            print_notes(out, &notes, *json)?;
        }
        Commands::Tui => notekeep::tui::run(service)?,
    }
    Ok(())
}

fn print_notes(out: &mut impl Write, notes: &[Note], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, notes).context("Failed to serialize notes")?;
        writeln!(out)?;
        return Ok(());
    }

    if notes.is_empty() {
        writeln!(out, "No notes found.")?;
        return Ok(());
    }

    for note in notes {
        writeln!(out, "{}", format_note(note))?;
    }
    Ok(())
}

/// Formats a note as a header line followed by its content indented by four
/// spaces.
///
/// ```text
/// #3 Groceries [errands]
///     milk
///     eggs
/// ```
fn format_note(note: &Note) -> String {
    let mut text = note.to_string();
    for tag in note.tags() {
        text.push_str(&format!(" [{}]", tag.title()));
    }
    for line in note.content().lines() {
        text.push_str("\n    ");
        text.push_str(line);
    }
    text
}
