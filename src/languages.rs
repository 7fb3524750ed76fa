//! Per-language presentation facts: file extension, default file stem and
//! whether brace-driven re-indentation applies.

/// Extension used when a language is not in the table
pub const FALLBACK_EXTENSION: &str = "txt";

const EXTENSIONS: &[(&str, &str)] = &[
    ("javascript", "js"),
    ("typescript", "ts"),
    ("python", "py"),
    ("java", "java"),
    ("csharp", "cs"),
    ("cpp", "cpp"),
    ("php", "php"),
    ("ruby", "rb"),
    ("go", "go"),
    ("rust", "rs"),
    ("swift", "swift"),
    ("kotlin", "kt"),
    ("html", "html"),
    ("css", "css"),
];

const REINDENTED: &[&str] = &["javascript", "typescript"];

/// File extension for `language` (case-insensitive), or [`FALLBACK_EXTENSION`]
pub fn extension_for(language: &str) -> &'static str {
    let lang = language.to_lowercase();
    EXTENSIONS
        .iter()
        .find(|(name, _)| *name == lang)
        .map(|(_, ext)| *ext)
        .unwrap_or(FALLBACK_EXTENSION)
}

/// File stem used when the request names neither a file nor a title
pub fn default_stem(language: &str) -> &str {
    if language == "javascript" {
        "script"
    } else {
        language
    }
}

/// Languages whose indentation is re-derived from brace depth
pub fn reindents(language: &str) -> bool {
    REINDENTED.contains(&language)
}
