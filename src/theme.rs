//! Named color palettes and background gradients
//!
//! Pure lookup tables. Nothing here fails: unknown theme names fall back to
//! the default palette and unknown backgrounds pass through as literal CSS.

use crate::request::BackgroundSelector;

/// Name of the palette used when a theme is unknown
pub const DEFAULT_THEME: &str = "light";

/// Immutable palette with the eight color roles used by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSpec {
    pub name: &'static str,
    /// Code card background (may itself be a CSS gradient)
    pub background: &'static str,
    pub foreground: &'static str,
    /// Keywords, function names
    pub accent: &'static str,
    pub comment: &'static str,
    /// Window header / chrome background
    pub chrome: &'static str,
    pub string: &'static str,
    pub number: &'static str,
    pub property: &'static str,
}

const THEMES: &[ThemeSpec] = &[
    ThemeSpec {
        name: "dracula",
        background: "#282a36",
        foreground: "#f8f8f2",
        accent: "#ff79c6",
        comment: "#6272a4",
        chrome: "#1e1f29",
        string: "#a9dc76",
        number: "#bd93f9",
        property: "#66d9ef",
    },
    ThemeSpec {
        name: "light",
        background: "#ffffff",
        foreground: "#333333",
        accent: "#0077b5",
        comment: "#888888",
        chrome: "#f5f5f5",
        string: "#50a14f",
        number: "#986801",
        property: "#e45649",
    },
    ThemeSpec {
        name: "gradient",
        background: "linear-gradient(135deg, #0077b5, #00a0dc)",
        foreground: "#ffffff",
        accent: "#ffffff",
        comment: "#e1e1e1",
        chrome: "#ffffff",
        string: "#d4ff80",
        number: "#ffcfd7",
        property: "#a2eeff",
    },
    ThemeSpec {
        name: "github",
        background: "#ffffff",
        foreground: "#24292e",
        accent: "#005cc5",
        comment: "#6a737d",
        chrome: "#f6f8fa",
        string: "#22863a",
        number: "#e36209",
        property: "#d73a49",
    },
    ThemeSpec {
        name: "modern",
        background: "#1a1a1a",
        foreground: "#f8f8f2",
        accent: "#79b8ff",
        comment: "#959da5",
        chrome: "#121212",
        string: "#9ece6a",
        number: "#ff79c6",
        property: "#7dcfff",
    },
    ThemeSpec {
        name: "minimal",
        background: "#ffffff",
        foreground: "#222222",
        accent: "#2d68c4",
        comment: "#989898",
        chrome: "#fafafa",
        string: "#3e8774",
        number: "#b76b01",
        property: "#df4353",
    },
    ThemeSpec {
        name: "carbon",
        background: "#151718",
        foreground: "#e6e6e6",
        accent: "#5ab3ff",
        comment: "#a0a0a0",
        chrome: "#0d0e0f",
        string: "#9ece6a",
        number: "#ffb86c",
        property: "#5ab3ff",
    },
    ThemeSpec {
        name: "nord",
        background: "#2e3440",
        foreground: "#d8dee9",
        accent: "#88c0d0",
        comment: "#636f88",
        chrome: "#232730",
        string: "#a3be8c",
        number: "#b48ead",
        property: "#81a1c1",
    },
    ThemeSpec {
        name: "solarized",
        background: "#fdf6e3",
        foreground: "#657b83",
        accent: "#268bd2",
        comment: "#93a1a1",
        chrome: "#eee8d5",
        string: "#2aa198",
        number: "#d33682",
        property: "#6c71c4",
    },
    ThemeSpec {
        name: "onedark",
        background: "#282c34",
        foreground: "#abb2bf",
        accent: "#61afef",
        comment: "#5c6370",
        chrome: "#21252b",
        string: "#98c379",
        number: "#d19a66",
        property: "#e06c75",
    },
    ThemeSpec {
        name: "linkedin-pro",
        background: "#1d2026",
        foreground: "#e4e6eb",
        accent: "#0a66c2",
        comment: "#8f9299",
        chrome: "#16181d",
        string: "#5caa70",
        number: "#c27ba0",
        property: "#64a5d6",
    },
];

const GRADIENTS: &[(&str, &str)] = &[
    ("linkedin", "linear-gradient(135deg, #0077b5, #00a0dc)"),
    ("bluemarine", "linear-gradient(135deg, #1e3c72, #2a5298)"),
    ("sunset", "linear-gradient(135deg, #ff7e5f, #feb47b)"),
    ("emerald", "linear-gradient(135deg, #43cea2, #185a9d)"),
    ("passion", "linear-gradient(135deg, #f43b47, #453a94)"),
    ("cool", "linear-gradient(135deg, #4facfe, #00f2fe)"),
    ("warm", "linear-gradient(135deg, #ff9966, #ff5e62)"),
    ("night", "linear-gradient(135deg, #0f2027, #203a43, #2c5364)"),
    ("royal", "linear-gradient(135deg, #141e30, #243b55)"),
    ("silver", "linear-gradient(135deg, #bdc3c7, #2c3e50)"),
    ("subtle", "linear-gradient(135deg, #f5f7fa, #c3cfe2)"),
    ("elegant", "linear-gradient(135deg, #08203e, #557c93)"),
    ("tech", "linear-gradient(135deg, #051937, #004d7a, #008793)"),
    ("faded", "linear-gradient(135deg, rgba(0,0,0,0.03), rgba(0,0,0,0.08))"),
    ("shadow", "linear-gradient(135deg, rgba(15,23,42,0.2), rgba(15,23,42,0.1))"),
    ("fiery", "linear-gradient(135deg, #f12711, #f5af19)"),
    ("vivid", "linear-gradient(135deg, #ee0979, #ff6a00)"),
    ("crimson", "linear-gradient(135deg, #8E0E00, #1F1C18)"),
    ("redhot", "linear-gradient(135deg, #CB356B, #BD3F32)"),
    ("ember", "linear-gradient(135deg, #ff4e50, #f9d423)"),
    ("flame", "linear-gradient(135deg, #ff416c, #ff4b2b)"),
];

/// Look up a palette by name, falling back to [`DEFAULT_THEME`].
pub fn resolve_theme(name: &str) -> &'static ThemeSpec {
    THEMES
        .iter()
        .find(|t| t.name == name)
        .unwrap_or_else(default_theme)
}

fn default_theme() -> &'static ThemeSpec {
    // THEMES[1] is "light"; kept in sync by `default_theme_is_light`.
    &THEMES[1]
}

/// Names of every registered palette
pub fn theme_names() -> impl Iterator<Item = &'static str> {
    THEMES.iter().map(|t| t.name)
}

/// Look up a named gradient template
pub fn named_gradient(name: &str) -> Option<&'static str> {
    GRADIENTS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, css)| *css)
}

/// Resolve a background selector to a CSS `background` value.
///
/// Order: `transparent` → named gradient → stop list (two or more entries,
/// combined with `angle`) → literal passthrough. Literals are not validated.
pub fn resolve_background(selector: &BackgroundSelector, angle: &str) -> String {
    match selector {
        BackgroundSelector::Named(name) if name == "transparent" => "transparent".to_string(),
        BackgroundSelector::Named(name) => named_gradient(name)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone()),
        BackgroundSelector::Stops(stops) if stops.len() >= 2 => {
            format!("linear-gradient({}, {})", angle, stops.join(", "))
        }
        BackgroundSelector::Stops(stops) => stops.join(", "),
    }
}
