//! Stylesheet synthesis

use std::fmt::Write;

use crate::request::{LineNumberStyle, RenderRequest};
use crate::theme::ThemeSpec;

use super::css_safe;

/// Monospace stack for code and line numbers
const CODE_FONT: &str = "'Fira Code', 'JetBrains Mono', Menlo, Consolas, monospace";
/// Sans stack for tab label, title and watermark
const UI_FONT: &str = "'Poppins', 'Segoe UI', Helvetica, Arial, sans-serif";

/// Page padding when the square layout is requested
const SQUARE_PAGE_PADDING: &str = "50px";

/// Build the full stylesheet for one document.
pub fn stylesheet(request: &RenderRequest, theme: &ThemeSpec, background: &str) -> String {
    let radius = css_safe(&request.radius);
    let padding = css_safe(&request.padding);
    let font_size = css_safe(&request.font_size);
    let page_padding = if request.square_image {
        SQUARE_PAGE_PADDING.to_string()
    } else {
        css_safe(&request.gradient_padding)
    };
    let header_height = if request.show_tab || request.show_window_controls {
        "42px"
    } else {
        "0"
    };
    let shadow = if request.shadow {
        format!("box-shadow: {};", request.shadow_intensity.box_shadow())
    } else {
        String::new()
    };

    let mut css = String::with_capacity(4096);

    let _ = write!(
        css,
        "html, body {{ margin: 0; padding: 0; width: 100%; height: 100%; box-sizing: border-box; }}\n\
         body {{ display: flex; justify-content: center; align-items: center; background: {background}; font-family: {UI_FONT}; padding: {page_padding}; }}\n\
         .snapshot-frame {{ padding: {margin}; border-radius: {radius}; display: flex; justify-content: center; align-items: center; width: {width}; aspect-ratio: {aspect}; opacity: {opacity}; }}\n\
         .container {{ position: relative; border-radius: {radius}; {shadow} overflow: hidden; max-width: 850px; width: 100%; background: {bg}; }}\n",
        background = css_safe(background),
        margin = css_safe(&request.container_margin),
        width = if request.square_image { "auto" } else { "100%" },
        aspect = if request.square_image { "1/1" } else { "auto" },
        opacity = request.gradient_opacity,
        bg = theme.background,
    );

    let _ = write!(
        css,
        ".header {{ display: flex; align-items: center; background: {chrome}; height: {header_height}; padding: 0; border-radius: {radius} {radius} 0 0; border-bottom: 1px solid rgba(255,255,255,0.05); }}\n\
         .window-controls {{ display: flex; gap: 8px; align-items: center; padding: 0 16px; }}\n\
         .window-control {{ width: 12px; height: 12px; border-radius: 50%; }}\n\
         .window-control.close {{ background-color: #ff5f56; }}\n\
         .window-control.minimize {{ background-color: #ffbd2e; }}\n\
         .window-control.maximize {{ background-color: #27c93f; }}\n\
         .tabs {{ display: flex; flex-grow: 1; height: 100%; padding-left: 10px; }}\n\
         .tab {{ display: flex; align-items: center; padding: 0 16px; height: 100%; background: {bg}; border-top-left-radius: 5px; border-top-right-radius: 5px; position: relative; }}\n\
         .tab::after {{ content: ''; position: absolute; bottom: -1px; left: 0; right: 0; height: 1px; background: {bg}; z-index: 2; }}\n\
         .tab-icon {{ margin-right: 8px; display: flex; }}\n\
         .tab-name {{ font-size: 13px; font-weight: 500; color: {fg}; white-space: nowrap; }}\n\
         .window-title {{ margin-left: auto; font-size: 13px; color: {comment}; padding: 0 16px; }}\n",
        chrome = theme.chrome,
        bg = theme.background,
        fg = theme.foreground,
        comment = theme.comment,
    );

    let (number_opacity, number_border) = match request.line_numbers_style {
        LineNumberStyle::Minimal => ("0.7", "1px solid rgba(255, 255, 255, 0.1)"),
        LineNumberStyle::Plain => ("1", "none"),
    };

    let _ = write!(
        css,
        ".code-container {{ display: flex; background: {bg}; padding: {padding} 0; }}\n\
         .line-numbers, .code-content pre code {{ font-family: {CODE_FONT}; font-size: {font_size}; line-height: 1.8; white-space: pre; tab-size: 2; -moz-tab-size: 2; }}\n\
         .line-numbers {{ margin: 0; text-align: right; user-select: none; padding-left: {padding}; padding-right: 12px; color: {comment}; opacity: {number_opacity}; border-right: {number_border}; }}\n\
         .code-content {{ overflow-x: auto; flex-grow: 1; padding-left: 16px; padding-right: {padding}; }}\n\
         pre {{ margin: 0; padding: 0; }}\n\
         .code-content pre code {{ color: {fg}; background: transparent; padding: 0; display: block; }}\n",
        bg = theme.background,
        fg = theme.foreground,
        comment = theme.comment,
    );

    let _ = write!(
        css,
        ".hl-keyword, .hl-storage, .hl-support.hl-function {{ color: {accent}; }}\n\
         .hl-string, .hl-entity.hl-other.hl-attribute-name {{ color: {string}; }}\n\
         .hl-constant.hl-numeric, .hl-constant.hl-language {{ color: {number}; }}\n\
         .hl-entity.hl-name.hl-function, .hl-entity.hl-name.hl-class, .hl-entity.hl-name.hl-type {{ color: {accent}; font-weight: 600; }}\n\
         .hl-comment, .hl-meta.hl-annotation {{ color: {comment}; font-style: italic; }}\n\
         .hl-variable.hl-other.hl-property, .hl-support.hl-type.hl-property-name, .hl-meta.hl-object-literal.hl-key {{ color: {property}; }}\n",
        accent = theme.accent,
        string = theme.string,
        number = theme.number,
        comment = theme.comment,
        property = theme.property,
    );

    let _ = write!(
        css,
        ".watermark {{ font-family: {UI_FONT}; position: absolute; bottom: 12px; right: 15px; font-size: 12px; font-weight: 500; color: {comment}; opacity: 0.8; z-index: 10; }}\n",
        comment = theme.comment,
    );

    css
}
