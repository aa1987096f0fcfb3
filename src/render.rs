//! Result and error rendering
//!
//! `display_video_info` builds a structured `ResultView` from the backend
//! response instead of splicing strings into markup. `ResultView::to_html`
//! produces the same card the web page shows, with every server-supplied
//! string escaped for its context.

use crate::models::{Format, VideoInfo};
use crate::page::Page;

/// Thumbnail alt text
pub const THUMBNAIL_ALT: &str = "Video thumbnail";

/// One download link of the result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Visible text, `Download <label>`
    pub text: String,
    pub href: String,
    /// Browser `download` directive
    pub download: bool,
    pub format: Format,
}

impl DownloadLink {
    fn from_format(format: &Format) -> Self {
        Self {
            text: format!("Download {}", format.label),
            href: format.url.clone(),
            download: true,
            format: format.clone(),
        }
    }
}

/// Rendered result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub thumbnail_src: String,
    pub title: String,
    /// `Duration: <duration>`
    pub duration_text: String,
    pub links: Vec<DownloadLink>,
}

impl ResultView {
    pub fn from_info(info: &VideoInfo) -> Self {
        Self {
            thumbnail_src: info.thumbnail.clone(),
            title: info.title.clone(),
            duration_text: format!("Duration: {}", info.duration),
            links: info.formats.iter().map(DownloadLink::from_format).collect(),
        }
    }

    /// Markup of the card (Tailwind classes as on the web page)
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        html.push_str("<div class=\"flex flex-col sm:flex-row gap-4 items-center\">\n");
        html.push_str(&format!(
            "  <img src=\"{}\" alt=\"{}\" class=\"w-32 h-32 object-cover rounded-lg shadow-md\">\n",
            html_escape(&self.thumbnail_src),
            THUMBNAIL_ALT
        ));
        html.push_str("  <div class=\"text-center sm:text-left\">\n");
        html.push_str(&format!(
            "    <h2 class=\"text-lg font-semibold\">{}</h2>\n",
            html_escape(&self.title)
        ));
        html.push_str(&format!(
            "    <p class=\"text-sm text-gray-500 dark:text-gray-400\">{}</p>\n",
            html_escape(&self.duration_text)
        ));
        html.push_str("  </div>\n</div>\n");
        html.push_str("<div class=\"mt-4 grid grid-cols-1 sm:grid-cols-2 gap-2\">\n");
        for link in &self.links {
            html.push_str(&format!(
                "  <a href=\"{}\"{} class=\"block w-full text-center bg-rose-500 text-white font-semibold py-2 px-4 rounded-md hover:bg-rose-600 transition-all transform hover:scale-105\">{}</a>\n",
                html_escape(&link.href),
                if link.download { " download" } else { "" },
                html_escape(&link.text)
            ));
        }
        html.push_str("</div>\n");
        html
    }
}

/// Escape HTML special characters (safe for text and quoted attributes)
pub fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Show `message` in the error area and hide the result area
pub fn show_error(page: &mut Page, message: &str) {
    page.error.text = message.to_string();
    page.error.hidden = false;
    page.result.hidden = true;
}

/// Replace the result area with a card for `info` and show it
pub fn display_video_info(page: &mut Page, info: &VideoInfo) {
    page.result.view = Some(ResultView::from_info(info));
    page.result.hidden = false;
}
