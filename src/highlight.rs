//! Syntax highlighting
//!
//! The composer only needs `highlight(code, language) -> markup`; the
//! default implementation emits syntect class-annotated spans which the
//! stylesheet colors from the active theme.

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::compose::escape_html;
use crate::languages;

/// Prefix applied to every highlighter class so it cannot clash with layout classes
pub const CLASS_PREFIX: &str = "hl-";

/// Pure `code + language -> HTML markup` function
pub trait Highlighter: Send + Sync {
    /// Return escaped, highlighted markup. Must not fail; unknown languages
    /// produce escaped plain text.
    fn highlight(&self, code: &str, language: &str) -> String;
}

/// syntect-backed highlighter with the bundled syntax definitions
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }

    fn syntax_for(&self, language: &str) -> &SyntaxReference {
        let lang = language.to_lowercase();
        // The bundled set has no TypeScript grammar; JavaScript is the closest.
        let token = match lang.as_str() {
            "typescript" => "js",
            _ => languages::extension_for(&lang),
        };
        self.syntaxes
            .find_syntax_by_token(token)
            .or_else(|| self.syntaxes.find_syntax_by_token(&lang))
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> String {
        let syntax = self.syntax_for(language);
        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntaxes,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                log::debug!("highlighting failed for {}; emitting plain text", language);
                return escape_html(code);
            }
        }
        generator.finalize()
    }
}
