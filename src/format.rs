//! Markdown/HTML/clipboard interop
//!
//! The bridge between three text shapes: rich clipboard content, Markdown
//! source, and sanitized HTML. Sanitization happens after Markdown parsing
//! and before anything is previewed or exported - parsing Markdown can
//! itself introduce HTML, so the sanitizer is the single trust boundary
//! between model-generated or pasted text and rendered/exported HTML.

use pulldown_cmark::{Options, Parser, html};
use tracing::{debug, warn};

/// Convert HTML to Markdown source
pub fn html_to_markdown(html: &str) -> String {
    html2md::rewrite_html(html, false)
}

/// Parse Markdown and sanitize the result against the default allow-list
///
/// Empty or whitespace-only input yields an empty string, never an error.
pub fn markdown_to_safe_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(markdown, Options::empty());
    let mut raw = String::new();
    html::push_html(&mut raw, parser);

    ammonia::clean(&raw)
}

/// Wrap a sanitized fragment in a minimal standalone HTML document
///
/// The exported document must render on its own, independent of any page it
/// was copied from.
pub fn wrap_as_document(sanitized_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n<body>\n{}\n</body>\n</html>\n",
        sanitized_html
    )
}

/// Clipboard capability, injected so tests can substitute an in-memory fake
///
/// Every method degrades silently: a denied or unsupported clipboard returns
/// `None`/`false` and the caller falls back or leaves state untouched.
pub trait ClipboardPort {
    /// Read the plain-text clipboard item, if any
    fn read_text(&mut self) -> Option<String>;

    /// Read the HTML clipboard item, if any
    fn read_html(&mut self) -> Option<String>;

    /// Write plain text; returns false when the platform refuses
    fn write_text(&mut self, text: &str) -> bool;

    /// Write an HTML item with a plain-text alternate; returns false when
    /// the platform refuses rich writes
    fn write_html(&mut self, html: &str, alt_text: &str) -> bool;
}

/// System clipboard backed by arboard
///
/// Construction failure (headless environment, missing display server) is
/// tolerated: the port then reports nothing to read and refuses writes.
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        let inner = match arboard::Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                warn!(error = %e, "SystemClipboard::new: clipboard unavailable");
                None
            }
        };
        Self { inner }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardPort for SystemClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.inner.as_mut()?.get_text().ok()
    }

    fn read_html(&mut self) -> Option<String> {
        // arboard exposes no HTML read on most platforms; callers fall back
        // to the plain-text item.
        None
    }

    fn write_text(&mut self, text: &str) -> bool {
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_text(text.to_string()).is_ok(),
            None => false,
        }
    }

    fn write_html(&mut self, html: &str, alt_text: &str) -> bool {
        match self.inner.as_mut() {
            Some(clipboard) => clipboard.set_html(html.to_string(), Some(alt_text.to_string())).is_ok(),
            None => false,
        }
    }
}

/// Read the clipboard as Markdown source
///
/// Prefers the HTML item (converted to Markdown), falls back to plain text.
/// Returns `None` when the clipboard is empty or access is denied - the
/// caller leaves its current text unchanged.
pub fn paste_as_markdown(clipboard: &mut dyn ClipboardPort) -> Option<String> {
    if let Some(html) = clipboard.read_html() {
        debug!("paste_as_markdown: converting HTML clipboard item");
        return Some(html_to_markdown(&html));
    }
    clipboard.read_text()
}

/// Write a sanitized HTML fragment to the clipboard as a rich item
///
/// The fragment is wrapped as a standalone document first. When the platform
/// rejects rich writes, the wrapped document is written as plain text
/// instead.
pub fn export_html(clipboard: &mut dyn ClipboardPort, sanitized_html: &str, alt_text: &str) -> bool {
    let document = wrap_as_document(sanitized_html);
    if clipboard.write_html(&document, alt_text) {
        return true;
    }
    debug!("export_html: rich write refused, falling back to plain text");
    clipboard.write_text(&document)
}

/// Write the literal output string to the clipboard as plain text
pub fn export_text(clipboard: &mut dyn ClipboardPort, text: &str) -> bool {
    clipboard.write_text(text)
}
