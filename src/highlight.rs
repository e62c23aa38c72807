//! Syntax highlighting for code blocks in assistant replies.
//!
//! Every block is highlighted as Python; fence language tags are not parsed.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SyntectStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

const CODE_LANGUAGE: &str = "python";
const THEME_NAME: &str = "base16-ocean.dark";

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(|| {
        let mut themes = ThemeSet::load_defaults();
        themes.themes.remove(THEME_NAME).unwrap_or_default()
    })
}

fn to_style(style: SyntectStyle) -> Style {
    let mut out = Style::default().fg(Color::Rgb(
        style.foreground.r,
        style.foreground.g,
        style.foreground.b,
    ));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

fn strip_newline(text: &str) -> &str {
    text.trim_end_matches(|c| c == '\n' || c == '\r')
}

/// Highlight `code` into one terminal line per source line.
///
/// Falls back to plain text for any line the highlighter rejects. An empty
/// block still yields one (empty) line.
pub fn highlight_code(code: &str) -> Vec<Line<'static>> {
    let syntaxes = syntax_set();
    let syntax = syntaxes
        .find_syntax_by_token(CODE_LANGUAGE)
        .unwrap_or_else(|| syntaxes.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme());

    let mut lines: Vec<Line<'static>> = Vec::new();
    for raw_line in LinesWithEndings::from(code) {
        let spans: Vec<Span<'static>> = match highlighter.highlight_line(raw_line, syntaxes) {
            Ok(ranges) => ranges
                .into_iter()
                .map(|(style, text)| (style, strip_newline(text)))
                .filter(|(_, text)| !text.is_empty())
                .map(|(style, text)| Span::styled(text.to_string(), to_style(style)))
                .collect(),
            Err(e) => {
                tracing::debug!(error = %e, "highlighting failed, rendering plain");
                vec![Span::raw(strip_newline(raw_line).to_string())]
            }
        };
        lines.push(Line::from(spans));
    }

    if lines.is_empty() {
        lines.push(Line::default());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn test_one_line_per_source_line_with_indentation() {
        let lines = highlight_code("def f(x):\n    return x + 1");
        assert_eq!(lines.len(), 2);
        assert_eq!(plain(&lines[0]), "def f(x):");
        assert_eq!(plain(&lines[1]), "    return x + 1");
    }

    #[test]
    fn test_keywords_are_colored() {
        let lines = highlight_code("def f(): pass");
        assert!(lines[0].spans.iter().any(|span| span.style.fg.is_some()));
    }

    #[test]
    fn test_empty_block_yields_blank_line() {
        let lines = highlight_code("");
        assert_eq!(lines.len(), 1);
        assert!(plain(&lines[0]).is_empty());
    }
}
