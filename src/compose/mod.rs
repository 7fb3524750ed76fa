//! Layout composer
//!
//! Turns a request, a palette, a resolved background and highlighted markup
//! into one self-contained HTML document. Composition is deterministic and
//! has no side effects; the same inputs always yield the same bytes.

pub mod icons;
pub mod layout;
pub mod style;

use std::fmt::Write;

use crate::request::RenderRequest;
use crate::theme::ThemeSpec;

pub use layout::{display_file_name, line_count, line_numbers, prepare_source};

/// CSS selector of the element that is rasterized
pub const ROOT_SELECTOR: &str = ".snapshot-frame";

/// A fully assembled markup + style document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument {
    html: String,
}

impl ComposedDocument {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }
}

/// Escape text for embedding in HTML element content or attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Drop characters that could close the `<style>` element. Values are
/// otherwise passed through unvalidated.
pub(crate) fn css_safe(value: &str) -> String {
    value.chars().filter(|c| *c != '<' && *c != '>').collect()
}

/// Assemble the document.
///
/// `source` is the normalized code (see [`prepare_source`]) and drives the
/// line-number column; `highlighted` is the highlighter's markup for the same
/// source and is embedded verbatim.
pub fn compose(
    request: &RenderRequest,
    theme: &ThemeSpec,
    background: &str,
    source: &str,
    highlighted: &str,
) -> ComposedDocument {
    let css = style::stylesheet(request, theme, background);
    let mut html = String::with_capacity(css.len() + highlighted.len() + 2048);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><style>\n{css}</style></head><body>\n\
         <div class=\"snapshot-frame\">\n<div class=\"container\">\n<div class=\"header\">\n"
    );

    if request.show_window_controls {
        html.push_str(
            "<div class=\"window-controls\"><div class=\"window-control close\"></div>\
             <div class=\"window-control minimize\"></div>\
             <div class=\"window-control maximize\"></div></div>\n",
        );
    }

    html.push_str("<div class=\"tabs\">");
    if request.show_tab {
        let _ = write!(
            html,
            "<div class=\"tab\"><div class=\"tab-icon\">{}</div><span class=\"tab-name\">{}</span></div>",
            icons::icon_for(&request.language),
            escape_html(&display_file_name(request)),
        );
    }
    html.push_str("</div>\n");

    if !request.title.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"window-title\">{}</div>",
            escape_html(&request.title)
        );
    }
    html.push_str("</div>\n<div class=\"code-container\">\n");

    if request.show_line_numbers {
        let _ = writeln!(
            html,
            "<pre class=\"line-numbers\"><code>{}</code></pre>",
            line_numbers(source)
        );
    }

    let _ = writeln!(
        html,
        "<div class=\"code-content\"><pre><code class=\"highlighted\">{}</code></pre></div>",
        highlighted
    );
    html.push_str("</div>\n");

    if !request.watermark.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"watermark\">{}</div>",
            escape_html(&request.watermark)
        );
    }

    html.push_str("</div>\n</div>\n</body></html>\n");

    ComposedDocument { html }
}
