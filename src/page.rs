//! Page view model
//!
//! Explicit stand-in for the document the controllers mutate: the root theme
//! flag, the two theme icons, the URL input, the submit control, the loading
//! placeholder and the result/error areas. Front ends only read it.

use crate::render::ResultView;

/// Submit control label while idle
pub const SUBMIT_LABEL: &str = "Download";

/// Submit control label while a request is in flight
pub const SUBMIT_BUSY_LABEL: &str = "Fetching...";

// =============================================================================
// Text Input
// =============================================================================

/// Single-line text input. `cursor` counts chars, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.value
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn len_chars(&self) -> usize {
        self.value.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    /// Insert a pasted string at cursor
    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars().filter(|c| !c.is_control()) {
            self.insert(c);
        }
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.len_chars() {
            let idx = self.byte_index(self.cursor);
            self.value.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.len_chars() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.len_chars();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Split the value around the cursor (for drawing a caret)
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_index(self.cursor))
    }
}

// =============================================================================
// Controls and Areas
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub label: String,
}

impl Default for SubmitButton {
    fn default() -> Self {
        Self {
            disabled: false,
            label: SUBMIT_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArea {
    pub hidden: bool,
    pub view: Option<ResultView>,
}

impl Default for ResultArea {
    fn default() -> Self {
        Self {
            hidden: true,
            view: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorArea {
    pub hidden: bool,
    pub text: String,
}

impl Default for ErrorArea {
    fn default() -> Self {
        Self {
            hidden: true,
            text: String::new(),
        }
    }
}

// =============================================================================
// Page
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Document-level dark flag
    pub dark: bool,
    pub light_icon_hidden: bool,
    pub dark_icon_hidden: bool,

    pub input: TextInput,
    pub submit: SubmitButton,
    pub skeleton_hidden: bool,
    pub result: ResultArea,
    pub error: ErrorArea,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            dark: false,
            light_icon_hidden: false,
            dark_icon_hidden: false,
            input: TextInput::default(),
            submit: SubmitButton::default(),
            skeleton_hidden: true,
            result: ResultArea::default(),
            error: ErrorArea::default(),
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page with the URL input pre-filled
    pub fn with_input(url: impl Into<String>) -> Self {
        Self {
            input: TextInput::new(url),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.skeleton_hidden
    }

    /// Visible result view, if any
    pub fn visible_result(&self) -> Option<&ResultView> {
        if self.result.hidden {
            None
        } else {
            self.result.view.as_ref()
        }
    }

    /// Visible error text, if any
    pub fn visible_error(&self) -> Option<&str> {
        if self.error.hidden {
            None
        } else {
            Some(&self.error.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_is_idle() {
        let page = Page::new();
        assert!(!page.submit.disabled);
        assert_eq!(page.submit.label, SUBMIT_LABEL);
        assert!(!page.is_loading());
        assert!(page.visible_result().is_none());
        assert!(page.visible_error().is_none());
    }

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();
        for c in "tiktk".chars() {
            input.insert(c);
        }
        input.cursor_left();
        input.insert('o');
        assert_eq!(input.value, "tiktok");
        assert_eq!(input.cursor, 5);

        input.cursor_end();
        input.backspace();
        assert_eq!(input.value, "tikto");

        input.cursor_home();
        input.delete();
        assert_eq!(input.value, "ikto");
        assert_eq!(input.cursor, 0);

        input.clear();
        assert!(input.value.is_empty());
    }

    #[test]
    fn test_text_input_multibyte_cursor() {
        let mut input = TextInput::new("héllo");
        assert_eq!(input.cursor, 5);
        input.cursor_left();
        input.cursor_left();
        input.cursor_left();
        input.backspace();
        assert_eq!(input.value, "hllo");
        let (before, after) = input.split_at_cursor();
        assert_eq!(before, "h");
        assert_eq!(after, "llo");
    }

    #[test]
    fn test_insert_str_skips_control_chars() {
        let mut input = TextInput::default();
        input.insert_str("https://vm.tiktok.com/x\n");
        assert_eq!(input.value, "https://vm.tiktok.com/x");
    }
}
