//! Keyboard event handling for the TUI.
//!
//! Maps crossterm keyboard events to application state changes and to
//! [`Action`]s that need the note store. Key behavior depends on focus.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Focus};

/// Work the event loop must carry out against the note store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the state change already applied.
    None,
    Quit,
    /// Create a note from the form.
    Add,
    /// Overwrite the selected note with the form's title and content.
    Update,
    /// Delete the selected note.
    Delete,
    /// Run a search for the given term.
    Search(String),
    /// Reload the full note list.
    ShowAll,
}

/// Handles a keyboard event and updates the app state accordingly.
///
/// # Event Handling
///
/// - `Ctrl+Q` / `Ctrl+C`: quit
/// - `Ctrl+A` add, `Ctrl+U` update, `Ctrl+D` delete, `Ctrl+R` show all
/// - `Ctrl+F`: open the search prompt; `Enter` runs it, `Esc` cancels
/// - `Tab` / `Shift+Tab`: cycle focus
/// - `Esc`: clear the form and selection
/// - In form fields: typing edits the field; `Enter` adds a line break in
///   the content field and moves on from the others
/// - In the note list: `j`/`k` or arrows move the selection
///
/// # Examples
///
/// ```
/// use notekeep::tui::{App, event::{Action, handle_key_event}};
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
///
/// let mut app = App::new();
/// let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
/// assert_eq!(handle_key_event(&mut app, key), Action::Quit);
/// ```
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    if ctrl && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c')) {
        return Action::Quit;
    }

    if app.search_prompt().is_some() {
        return handle_search_prompt(app, key);
    }

    if ctrl {
        return match key.code {
            KeyCode::Char('a') => Action::Add,
            KeyCode::Char('u') => Action::Update,
            KeyCode::Char('d') => Action::Delete,
            KeyCode::Char('r') => Action::ShowAll,
            KeyCode::Char('f') => {
                app.open_search();
                Action::None
            }
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Tab => app.next_focus(),
        KeyCode::BackTab => app.prev_focus(),
        KeyCode::Esc => {
            app.clear_form();
            app.clear_selection();
        }
        _ => match app.focus() {
            Focus::NoteList => handle_note_list(app, key),
            Focus::Title | Focus::Content | Focus::Tag => handle_form_field(app, key),
        },
    }

    Action::None
}

/// Handles keys while the search prompt is open.
fn handle_search_prompt(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => app.close_search().map_or(Action::None, Action::Search),
        KeyCode::Esc => {
            app.close_search();
            Action::None
        }
        KeyCode::Backspace => {
            app.pop_search_char();
            Action::None
        }
        KeyCode::Char(c) => {
            app.push_search_char(c);
            Action::None
        }
        _ => Action::None,
    }
}

/// Handles keyboard input when a form field is focused.
fn handle_form_field(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            app.push_char(c);
        }
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Enter if app.focus() == Focus::Content => app.push_char('\n'),
        KeyCode::Enter => app.next_focus(),
        _ => {}
    }
}

/// Handles keyboard input when note list is focused.
///
/// Supports Vim-style navigation (j/k) and arrow keys.
fn handle_note_list(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NoteBuilder, NoteId};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn ctrl_q_and_ctrl_c_quit() {
        let mut app = App::new();
        assert_eq!(handle_key_event(&mut app, ctrl('q')), Action::Quit);
        assert_eq!(handle_key_event(&mut app, ctrl('c')), Action::Quit);
    }

    #[test]
    fn plain_q_is_typed_not_quit() {
        let mut app = App::new();
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.title_input(), "q");
    }

    #[test]
    fn ctrl_shortcuts_map_to_actions() {
        let mut app = App::new();
        assert_eq!(handle_key_event(&mut app, ctrl('a')), Action::Add);
        assert_eq!(handle_key_event(&mut app, ctrl('u')), Action::Update);
        assert_eq!(handle_key_event(&mut app, ctrl('d')), Action::Delete);
        assert_eq!(handle_key_event(&mut app, ctrl('r')), Action::ShowAll);
    }

    #[test]
    fn typing_fills_form_fields() {
        let mut app = App::new();
        type_text(&mut app, "Title");
        handle_key_event(&mut app, key(KeyCode::Enter));
        type_text(&mut app, "line one");
        handle_key_event(&mut app, key(KeyCode::Enter));
        type_text(&mut app, "line two");
        handle_key_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, "tagg");
        handle_key_event(&mut app, key(KeyCode::Backspace));

        assert_eq!(app.title_input(), "Title");
        assert_eq!(app.content_input(), "line one\nline two");
        assert_eq!(app.tag_input(), "tag");
    }

    #[test]
    fn shifted_characters_are_typed() {
        let mut app = App::new();
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT));
        assert_eq!(app.title_input(), "A");
    }

    #[test]
    fn search_prompt_returns_term_on_enter() {
        let mut app = App::new();
        handle_key_event(&mut app, ctrl('f'));
        assert_eq!(app.search_prompt(), Some(""));

        // Typing goes to the prompt, not the form
        type_text(&mut app, "work");
        assert_eq!(app.title_input(), "");

        let action = handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(action, Action::Search("work".to_string()));
        assert_eq!(app.search_prompt(), None);
    }

    #[test]
    fn esc_cancels_search_prompt() {
        let mut app = App::new();
        handle_key_event(&mut app, ctrl('f'));
        type_text(&mut app, "x");

        assert_eq!(handle_key_event(&mut app, key(KeyCode::Esc)), Action::None);
        assert_eq!(app.search_prompt(), None);
    }

    #[test]
    fn ctrl_keys_type_into_open_search_prompt() {
        let mut app = App::new();
        handle_key_event(&mut app, ctrl('f'));
        assert_eq!(handle_key_event(&mut app, ctrl('d')), Action::None);
        assert_eq!(app.search_prompt(), Some("d"));
    }

    #[test]
    fn list_navigation_loads_selected_note() {
        let mut app = App::new();
        app.set_notes(
            vec![
                NoteBuilder::new().id(NoteId::new(1)).title("One").content("1").build(),
                NoteBuilder::new().id(NoteId::new(2)).title("Two").content("2").build(),
            ],
            None,
        );

        handle_key_event(&mut app, KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        assert_eq!(app.focus(), Focus::NoteList);
        assert_eq!(app.selected_index(), Some(0));

        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.title_input(), "Two");

        handle_key_event(&mut app, key(KeyCode::Up));
        assert_eq!(app.title_input(), "One");
    }

    #[test]
    fn esc_clears_form_and_selection() {
        let mut app = App::new();
        type_text(&mut app, "draft");
        handle_key_event(&mut app, key(KeyCode::Esc));

        assert_eq!(app.title_input(), "");
        assert_eq!(app.selected_index(), None);
    }
}
