//! Terminal User Interface module for notekeep.
//!
//! A form-based screen with title, content and tag fields next to the note
//! list, using ratatui for rendering and crossterm for terminal management.
//! Every change goes through [`NoteService`].

use std::io;
use std::panic;

use anyhow::{Context, Result};
use crossterm::{
    event::{self as crossterm_event, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error};

use crate::service::NoteService;

mod app;
pub mod event;
mod ui;

pub use app::{App, Focus, Status, StatusKind};
use event::Action;

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode and enters the alternate screen.
fn init_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("failed to create terminal")?;
    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// Must run before exiting, including on error paths.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

/// Minimal terminal restoration for the panic hook. Errors are ignored.
fn restore_terminal_panic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Installs a panic hook that restores the terminal before the original
/// hook prints the panic.
fn init_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal_panic();
        original_hook(panic_info);
    }));
}

/// Replaces the listed notes with every stored note.
///
/// # Errors
///
/// Returns an error if the notes cannot be read.
pub fn load_notes(app: &mut App, service: &NoteService) -> Result<()> {
    let notes = service
        .list_all_notes()
        .context("Failed to load notes")?;
    app.set_notes(notes, None);
    Ok(())
}

/// Reloads the full list, reporting failures in the status line.
fn refresh(app: &mut App, service: &NoteService) {
    match service.list_all_notes() {
        Ok(notes) => app.set_notes(notes, None),
        Err(e) => app.set_error(&e),
    }
}

/// Carries out `action` against the note store and updates `app`.
///
/// Returns `true` if the application should quit.
pub fn perform(app: &mut App, service: &NoteService, action: Action) -> bool {
    debug!(?action, "performing action");

    match action {
        Action::None => {}
        Action::Quit => return true,
        Action::Add => {
            let result = service.add_note(app.title_input(), app.content_input(), app.tag_input());
            match result {
                Ok(_) => {
                    refresh(app, service);
                    app.clear_form();
                    app.set_info("Note added successfully.");
                }
                Err(e) => app.set_error(&e),
            }
        }
        Action::Update => {
            let Some(id) = app.selected_note().map(|note| note.id()) else {
                app.set_info("Select a note to update.");
                return false;
            };
            match service.update_note(id, app.title_input(), app.content_input()) {
                Ok(_) => {
                    refresh(app, service);
                    app.clear_form();
                    app.set_info("Note updated successfully.");
                }
                Err(e) => app.set_error(&e),
            }
        }
        Action::Delete => {
            let Some(id) = app.selected_note().map(|note| note.id()) else {
                app.set_info("Select a note to delete.");
                return false;
            };
            match service.delete_note(id) {
                Ok(()) => {
                    refresh(app, service);
                    app.clear_form();
                    app.set_info("Note deleted successfully.");
                }
                Err(e) => app.set_error(&e),
            }
        }
        Action::Search(term) => match service.search_notes(&term) {
            Ok(notes) => {
                let count = notes.len();
                app.set_notes(notes, Some(term.clone()));
                app.set_info(format!("{count} note(s) match \"{term}\"."));
            }
            Err(e) => app.set_error(&e),
        },
        Action::ShowAll => {
            refresh(app, service);
            app.set_info("Showing all notes.");
        }
    }

    false
}

/// Runs the main event loop for the TUI.
///
/// Terminal state is always restored, even on error.
pub fn run_event_loop(app: &mut App, service: &NoteService) -> Result<()> {
    let mut terminal = init_terminal()?;

    let result = run_event_loop_internal(app, service, &mut terminal);

    if let Err(e) = restore_terminal(&mut terminal) {
        error!(error = %e, "failed to restore terminal");
        eprintln!("Error restoring terminal: {e}");
    }

    result
}

fn run_event_loop_internal(
    app: &mut App,
    service: &NoteService,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::draw(frame, app);
        })?;

        if crossterm_event::poll(std::time::Duration::from_millis(100))?
            && let Event::Key(key) = crossterm_event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = event::handle_key_event(app, key);
            if perform(app, service, action) {
                break;
            }
        }
    }

    Ok(())
}

/// Entry point for the TUI application.
///
/// Loads every note once, then runs the event loop until the user quits.
/// The caller owns the service and closes its database afterwards.
///
/// # Errors
///
/// Returns an error if note loading or the terminal fails.
pub fn run(service: &NoteService) -> Result<()> {
    init_panic_hook();

    let mut app = App::new();
    load_notes(&mut app, service).context("Failed to load notes from database")?;

    run_event_loop(&mut app, service).context("TUI event loop failed")?;

    Ok(())
}
