//! Dark and light palettes for the terminal page
//!
//! Both palettes expose the same style helpers, so drawing code never
//! branches on the mode. Colors follow the Tailwind tones of the web page
//! (slate/gray surfaces, rose accent).

use ratatui::style::{Color, Modifier, Style};

use crate::models::ThemeMode;

/// Color palette for one theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    /// Panels, input and status bar
    pub surface: Color,
    pub text: Color,
    pub dim: Color,
    /// Rose accent (buttons, focus, titles)
    pub primary: Color,
    /// Text drawn on top of `primary`
    pub on_primary: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
}

impl Palette {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTES
    // ═══════════════════════════════════════════════════════════════════════

    /// slate-900 surface, gray-100 text, rose-500 accent
    pub const DARK: Palette = Palette {
        background: Color::Rgb(0x0f, 0x17, 0x2a),
        surface: Color::Rgb(0x1e, 0x29, 0x3b),
        text: Color::Rgb(0xf3, 0xf4, 0xf6),
        dim: Color::Rgb(0x9c, 0xa3, 0xaf),
        primary: Color::Rgb(0xf4, 0x3f, 0x5e),
        on_primary: Color::Rgb(0x0f, 0x17, 0x2a),
        border: Color::Rgb(0x33, 0x41, 0x55),
        success: Color::Rgb(0x34, 0xd3, 0x99),
        error: Color::Rgb(0xf8, 0x71, 0x71),
    };

    /// gray-50 surface, gray-900 text, rose-600 accent
    pub const LIGHT: Palette = Palette {
        background: Color::Rgb(0xf9, 0xfa, 0xfb),
        surface: Color::Rgb(0xf3, 0xf4, 0xf6),
        text: Color::Rgb(0x11, 0x18, 0x27),
        dim: Color::Rgb(0x6b, 0x72, 0x80),
        primary: Color::Rgb(0xe1, 0x1d, 0x48),
        on_primary: Color::Rgb(0xff, 0xff, 0xff),
        border: Color::Rgb(0xd1, 0xd5, 0xdb),
        success: Color::Rgb(0x04, 0x78, 0x57),
        error: Color::Rgb(0xdc, 0x26, 0x26),
    };

    pub fn for_mode(mode: ThemeMode) -> &'static Palette {
        match mode {
            ThemeMode::Dark => &Self::DARK,
            ThemeMode::Light => &Self::LIGHT,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Inverted primary (selected list item, enabled button)
    pub fn highlighted(&self) -> Style {
        Style::default()
            .fg(self.on_primary)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    /// Submit control, greyed out while disabled
    pub fn button(&self, disabled: bool) -> Style {
        if disabled {
            Style::default().fg(self.dim).bg(self.surface)
        } else {
            self.highlighted()
        }
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Loading placeholder
    pub fn loading(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Link targets (URLs)
    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.dim)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn keybind(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Calculate relative luminance for a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text (>= 4.5:1)
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// WCAG AA for large text (>= 3:1)
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// Extract RGB tuple from ratatui Color (only works for Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
