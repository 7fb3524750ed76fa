//! Source normalization and the small derived facts the document needs:
//! brace-driven indentation, the line-number column and the tab label.

use crate::languages;
use crate::request::RenderRequest;

/// One indentation level in re-indented output
pub const INDENT_UNIT: &str = "  ";

/// Convert CRLF line endings to LF
pub fn normalize_line_endings(code: &str) -> String {
    code.replace("\r\n", "\n")
}

/// Re-derive indentation from brace nesting.
///
/// A line that closes a scope without opening one is dedented before it is
/// emitted; a line that opens a scope without closing one indents the lines
/// after it. Blank lines stay empty.
pub fn reindent(code: &str) -> String {
    let mut depth: usize = 0;
    code.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            let opens = trimmed.contains('{');
            let closes = trimmed.contains('}');

            if closes && !opens {
                depth = depth.saturating_sub(1);
            }
            let current = depth;
            if opens && !closes {
                depth += 1;
            }

            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT_UNIT.repeat(current), trimmed)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize code the way it will be both highlighted and counted.
pub fn prepare_source(code: &str, language: &str) -> String {
    let normalized = normalize_line_endings(code);
    if languages::reindents(language) {
        reindent(&normalized)
    } else {
        normalized
    }
}

/// Number of lines in normalized source, trailing blank lines included
pub fn line_count(source: &str) -> usize {
    source.split('\n').count()
}

/// The `1..=N` column text, newline separated
pub fn line_numbers(source: &str) -> String {
    (1..=line_count(source))
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// File name shown in the tab: explicit name, else title, else a
/// language-derived default such as `script.js`.
pub fn display_file_name(request: &RenderRequest) -> String {
    if !request.file_name.is_empty() {
        return request.file_name.clone();
    }
    if !request.title.is_empty() {
        return request.title.clone();
    }
    format!(
        "{}.{}",
        languages::default_stem(&request.language),
        languages::extension_for(&request.language)
    )
}
