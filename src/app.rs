//! App state for the terminal page
//!
//! Owns the page model plus the two controllers and maps key presses onto
//! them. Anything that needs the network comes back as an `Action` so the
//! event loop can run it on a task and feed the result back in.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{ApiError, DownloadApi};
use crate::download::DownloadError;
use crate::models::{Format, ThemeMode, VideoInfo};
use crate::page::Page;
use crate::storage::KeyValueStore;
use crate::submit::{SubmissionController, SubmitOutcome, Ticket};
use crate::theme::{current_theme, ThemeController};
use crate::ui::Palette;

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Navigating the result list
    Normal,
    /// URL input focused
    #[default]
    Editing,
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for the format list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to `index` if it exists
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.selected = index;
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Work the event loop must run after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    /// Send the request described by the ticket
    Fetch(Ticket),
    /// Save a format of the displayed video
    Download { format: Format, title: String },
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App {
    pub page: Page,
    pub input_mode: InputMode,
    pub running: bool,
    pub formats: ListState,
    /// One-line status (download progress/result)
    pub status: Option<String>,
    pub downloading: bool,

    submission: SubmissionController<dyn DownloadApi>,
    theme: ThemeController<Box<dyn KeyValueStore>>,
}

impl App {
    /// Create the app and apply the stored theme
    pub fn new(api: Arc<dyn DownloadApi>, store: Box<dyn KeyValueStore>) -> Self {
        let mut page = Page::new();
        let theme = ThemeController::new(store);
        theme.init(&mut page);

        Self {
            page,
            input_mode: InputMode::Editing,
            running: true,
            formats: ListState::default(),
            status: None,
            downloading: false,
            submission: SubmissionController::new(api),
            theme,
        }
    }

    pub fn api(&self) -> Arc<dyn DownloadApi> {
        self.submission.api()
    }

    pub fn theme_mode(&self) -> ThemeMode {
        current_theme(&self.page)
    }

    pub fn palette(&self) -> &'static Palette {
        Palette::for_mode(self.theme_mode())
    }

    pub fn is_fetching(&self) -> bool {
        self.submission.is_in_flight()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.theme.toggle_theme(&mut self.page)
    }

    /// Submit the URL input
    pub fn submit(&mut self) -> Action {
        match self.submission.begin(&mut self.page) {
            Ok(ticket) => {
                self.status = None;
                Action::Fetch(ticket)
            }
            Err(_) => Action::None,
        }
    }

    /// Feed back the response for a ticket
    pub fn complete_fetch(
        &mut self,
        token: u64,
        result: Result<VideoInfo, ApiError>,
    ) -> SubmitOutcome {
        let outcome = self.submission.complete(&mut self.page, token, result);
        if outcome == SubmitOutcome::Displayed {
            let len = self
                .page
                .visible_result()
                .map(|view| view.links.len())
                .unwrap_or(0);
            self.formats = ListState::new(len);
            self.input_mode = InputMode::Normal;
        }
        outcome
    }

    /// Format under the selection marker
    pub fn selected_format(&self) -> Option<&Format> {
        self.page
            .visible_result()
            .and_then(|view| view.links.get(self.formats.selected))
            .map(|link| &link.format)
    }

    /// Start saving the selected format
    pub fn request_download(&mut self) -> Action {
        if self.downloading {
            return Action::None;
        }
        let Some(view) = self.page.visible_result() else {
            return Action::None;
        };
        let Some(link) = view.links.get(self.formats.selected) else {
            return Action::None;
        };

        let action = Action::Download {
            format: link.format.clone(),
            title: view.title.clone(),
        };
        self.status = Some(format!("Downloading {}...", link.format.label));
        self.downloading = true;
        action
    }

    pub fn finish_download(&mut self, result: Result<PathBuf, DownloadError>) {
        self.downloading = false;
        self.status = Some(match result {
            Ok(path) => format!("Saved {}", path.display()),
            Err(e) => format!("Download failed: {}", e),
        });
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return Action::None;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    /// Bracketed paste into the URL input
    pub fn handle_paste(&mut self, text: &str) {
        if self.input_mode == InputMode::Editing {
            self.page.input.insert_str(text);
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Action {
        let input = &mut self.page.input;
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc | KeyCode::Tab => self.input_mode = InputMode::Normal,
            KeyCode::Char(c) => input.insert(c),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => input.cursor_left(),
            KeyCode::Right => input.cursor_right(),
            KeyCode::Home => input.cursor_home(),
            KeyCode::End => input.cursor_end(),
            _ => {}
        }
        Action::None
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Tab => {
                self.input_mode = InputMode::Editing
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
            }
            KeyCode::Up | KeyCode::Char('k') => self.formats.up(),
            KeyCode::Down | KeyCode::Char('j') => self.formats.down(),
            KeyCode::Char(c @ '1'..='9') => self.formats.select((c as usize) - ('1' as usize)),
            KeyCode::Enter | KeyCode::Char('d') => return self.request_download(),
            KeyCode::Char('r') => return self.submit(),
            _ => {}
        }
        Action::None
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
