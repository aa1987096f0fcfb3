//! Light/dark theme controller
//!
//! Applies the theme to the page and persists the choice under the `theme`
//! key. The store is injected so the controller runs without a live page.

use crate::models::ThemeMode;
use crate::page::Page;
use crate::storage::KeyValueStore;

/// Storage key of the theme preference
pub const THEME_KEY: &str = "theme";

pub struct ThemeController<S> {
    store: S,
}

impl<S: KeyValueStore> ThemeController<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored preference resolved to a mode (absent or unknown → dark)
    pub fn preference(&self) -> ThemeMode {
        ThemeMode::from_stored(self.store.get(THEME_KEY).as_deref())
    }

    /// Apply the stored preference on load
    pub fn init(&self, page: &mut Page) -> ThemeMode {
        let mode = self.preference();
        apply_theme(page, mode);
        tracing::debug!("theme initialized to {}", mode);
        mode
    }

    /// Flip the applied mode, persist it and apply it
    pub fn toggle_theme(&mut self, page: &mut Page) -> ThemeMode {
        let next = current_theme(page).opposite();
        if let Err(e) = self.store.set(THEME_KEY, next.as_str()) {
            tracing::warn!("could not persist theme preference: {}", e);
        }
        apply_theme(page, next);
        tracing::info!("theme switched to {}", next);
        next
    }
}

/// Mode currently applied to the page
pub fn current_theme(page: &Page) -> ThemeMode {
    if page.dark {
        ThemeMode::Dark
    } else {
        ThemeMode::Light
    }
}

/// Set the document flag and swap the icon visibility
pub fn apply_theme(page: &mut Page, mode: ThemeMode) {
    match mode {
        ThemeMode::Dark => {
            page.dark = true;
            page.light_icon_hidden = false;
            page.dark_icon_hidden = true;
        }
        ThemeMode::Light => {
            page.dark = false;
            page.light_icon_hidden = true;
            page.dark_icon_hidden = false;
        }
    }
}
