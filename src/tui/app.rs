use crate::error::NoteError;
use crate::models::Note;

/// Application state for the TUI.
///
/// Holds the note form (title, content, tag), the listed notes with their
/// selection, an optional open search prompt and the last status message.
#[derive(Debug, Clone)]
pub struct App {
    /// Notes currently listed (all notes or the last search results)
    notes: Vec<Note>,
    /// Currently selected note index (None if no selection)
    selected_index: Option<usize>,
    title_input: String,
    content_input: String,
    tag_input: String,
    /// Currently focused panel
    focus: Focus,
    /// Search prompt buffer; `Some` while the prompt is open
    search_prompt: Option<String>,
    /// Term whose results are listed, if the list is filtered
    active_search: Option<String>,
    status: Option<Status>,
}

/// Panel focus state for keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Title,
    Content,
    Tag,
    /// Note list panel (j/k navigation)
    NoteList,
}

/// Message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub kind: StatusKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Creates a new App with an empty form focused on the title field.
    ///
    /// # Examples
    ///
    /// ```
    /// use notekeep::tui::{App, Focus};
    ///
    /// let app = App::new();
    /// assert!(app.notes().is_empty());
    /// assert_eq!(app.focus(), Focus::Title);
    /// ```
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            selected_index: None,
            title_input: String::new(),
            content_input: String::new(),
            tag_input: String::new(),
            focus: Focus::Title,
            search_prompt: None,
            active_search: None,
            status: None,
        }
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_index
    }

    /// Returns the currently selected note, if any.
    pub fn selected_note(&self) -> Option<&Note> {
        self.selected_index.and_then(|i| self.notes.get(i))
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn title_input(&self) -> &str {
        &self.title_input
    }

    pub fn content_input(&self) -> &str {
        &self.content_input
    }

    pub fn tag_input(&self) -> &str {
        &self.tag_input
    }

    /// Returns the search prompt buffer while the prompt is open.
    pub fn search_prompt(&self) -> Option<&str> {
        self.search_prompt.as_deref()
    }

    /// Returns the term the listed notes were filtered by.
    pub fn active_search(&self) -> Option<&str> {
        self.active_search.as_deref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Replaces the listed notes and clears the selection.
    ///
    /// `search` records which term produced the list; `None` means the full
    /// list.
    pub fn set_notes(&mut self, notes: Vec<Note>, search: Option<String>) {
        self.notes = notes;
        self.active_search = search;
        self.selected_index = None;
    }

    /// Cycles focus: Title -> Content -> Tag -> NoteList -> Title.
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Title => Focus::Content,
            Focus::Content => Focus::Tag,
            Focus::Tag => Focus::NoteList,
            Focus::NoteList => Focus::Title,
        };
        self.auto_select_on_note_list_focus();
    }

    /// Cycles focus in reverse order.
    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Title => Focus::NoteList,
            Focus::Content => Focus::Title,
            Focus::Tag => Focus::Content,
            Focus::NoteList => Focus::Tag,
        };
        self.auto_select_on_note_list_focus();
    }

    /// Auto-selects first note when entering NoteList focus with no selection.
    fn auto_select_on_note_list_focus(&mut self) {
        if self.focus == Focus::NoteList && self.selected_index.is_none() && !self.notes.is_empty()
        {
            self.select(0);
        }
    }

    /// Moves selection down the list, wrapping to the top.
    ///
    /// The selected note's title and content are copied into the form.
    ///
    /// # Examples
    ///
    /// ```
    /// use notekeep::tui::App;
    /// use notekeep::{NoteBuilder, NoteId};
    ///
    /// let mut app = App::new();
    /// let notes = vec![
    ///     NoteBuilder::new().id(NoteId::new(1)).title("A").content("a").build(),
    ///     NoteBuilder::new().id(NoteId::new(2)).title("B").content("b").build(),
    /// ];
    /// app.set_notes(notes, None);
    ///
    /// app.select_next();
    /// assert_eq!(app.selected_index(), Some(0));
    /// assert_eq!(app.title_input(), "A");
    ///
    /// app.select_next();
    /// app.select_next(); // wraps
    /// assert_eq!(app.selected_index(), Some(0));
    /// ```
    pub fn select_next(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        let next = match self.selected_index {
            Some(i) if i + 1 < self.notes.len() => i + 1,
            Some(_) | None => 0,
        };
        self.select(next);
    }

    /// Moves selection up the list, wrapping to the bottom.
    pub fn select_previous(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        let last = self.notes.len() - 1;
        let previous = match self.selected_index {
            Some(0) | None => last,
            Some(i) => i - 1,
        };
        self.select(previous);
    }

    fn select(&mut self, index: usize) {
        self.selected_index = Some(index);
        if let Some(note) = self.notes.get(index) {
            self.title_input = note.title().to_string();
            self.content_input = note.content().to_string();
            self.tag_input.clear();
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_index = None;
    }

    /// Empties the title, content and tag fields.
    pub fn clear_form(&mut self) {
        self.title_input.clear();
        self.content_input.clear();
        self.tag_input.clear();
    }

    /// Returns the focused form field, or `None` when the list is focused.
    fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Title => Some(&mut self.title_input),
            Focus::Content => Some(&mut self.content_input),
            Focus::Tag => Some(&mut self.tag_input),
            Focus::NoteList => None,
        }
    }

    /// Appends a character to the focused field.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused_field() {
            field.push(c);
        }
    }

    /// Removes the last character from the focused field.
    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused_field() {
            field.pop();
        }
    }

    pub fn open_search(&mut self) {
        self.search_prompt = Some(String::new());
    }

    pub fn push_search_char(&mut self, c: char) {
        if let Some(prompt) = self.search_prompt.as_mut() {
            prompt.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Some(prompt) = self.search_prompt.as_mut() {
            prompt.pop();
        }
    }

    /// Closes the search prompt and returns what was typed.
    pub fn close_search(&mut self) -> Option<String> {
        self.search_prompt.take()
    }

    pub fn set_info(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            message: message.into(),
            kind: StatusKind::Info,
        });
    }

    /// Shows an error, distinguishing "nothing changed" from failures.
    pub fn set_error(&mut self, err: &NoteError) {
        self.status = Some(Status {
            message: err.user_message(),
            kind: StatusKind::Error,
        });
    }
}
