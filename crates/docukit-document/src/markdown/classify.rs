// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line classification — maps one raw Markdown line to its display text, font
// size, and emphasis. Only leading block syntax is recognised; inline markers
// are stripped in a single, non-recursive pass per marker kind.

use once_cell::sync::Lazy;
use regex::Regex;

use docukit_core::types::Emphasis;

/// Font size for body text, list items, and quotes.
pub const BODY_FONT_SIZE: f32 = 12.0;

/// Font sizes for heading levels 1..=3.
pub const HEADING_FONT_SIZES: [f32; 3] = [24.0, 20.0, 16.0];

/// Glyph that replaces `- ` / `* ` list markers.
pub const BULLET: &str = "\u{2022} ";

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").expect("valid regex"));
static RE_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static RE_ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").expect("valid regex"));

/// Block-level role of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Heading level 1..=3.
    Heading(u8),
    Bullet,
    Numbered,
    Blockquote,
    Paragraph,
    /// Empty or whitespace-only line; produces no text.
    Blank,
}

/// A classified line, ready for wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownLine {
    pub kind: LineKind,
    /// Display text with block prefix and inline markers removed.
    pub text: String,
    pub font_size: f32,
    pub emphasis: Emphasis,
}

impl MarkdownLine {
    fn new(kind: LineKind, text: String, font_size: f32, emphasis: Emphasis) -> Self {
        Self {
            kind,
            text,
            font_size,
            emphasis,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind == LineKind::Blank
    }
}

/// Classify a single raw line (without its line terminator).
pub fn classify_line(raw: &str) -> MarkdownLine {
    if raw.trim().is_empty() {
        return MarkdownLine::new(LineKind::Blank, String::new(), BODY_FONT_SIZE, Emphasis::Normal);
    }

    let (kind, text, font_size, emphasis) = if let Some(rest) = raw.strip_prefix("# ") {
        (LineKind::Heading(1), rest.to_owned(), HEADING_FONT_SIZES[0], Emphasis::Bold)
    } else if let Some(rest) = raw.strip_prefix("## ") {
        (LineKind::Heading(2), rest.to_owned(), HEADING_FONT_SIZES[1], Emphasis::Bold)
    } else if let Some(rest) = raw.strip_prefix("### ") {
        (LineKind::Heading(3), rest.to_owned(), HEADING_FONT_SIZES[2], Emphasis::Bold)
    } else if let Some(rest) = raw.strip_prefix("- ").or_else(|| raw.strip_prefix("* ")) {
        (LineKind::Bullet, format!("{BULLET}{rest}"), BODY_FONT_SIZE, Emphasis::Normal)
    } else if RE_NUMBERED.is_match(raw) {
        (LineKind::Numbered, raw.to_owned(), BODY_FONT_SIZE, Emphasis::Normal)
    } else if let Some(rest) = raw.strip_prefix("> ") {
        (LineKind::Blockquote, format!("  {rest}"), BODY_FONT_SIZE, Emphasis::Italic)
    } else {
        (LineKind::Paragraph, raw.to_owned(), BODY_FONT_SIZE, Emphasis::Normal)
    };

    MarkdownLine::new(kind, strip_inline_markup(&text), font_size, emphasis)
}

/// Remove bold, italic, inline code, and link markers, in that order.
///
/// Each marker kind gets exactly one left-to-right pass, so nested or
/// malformed markup may survive partially.
pub fn strip_inline_markup(text: &str) -> String {
    let text = RE_BOLD.replace_all(text, "$1");
    let text = RE_ITALIC.replace_all(&text, "$1");
    let text = RE_CODE.replace_all(&text, "$1");
    RE_LINK.replace_all(&text, "$1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings() {
        let h1 = classify_line("# Title");
        assert_eq!(h1.kind, LineKind::Heading(1));
        assert_eq!(h1.text, "Title");
        assert_eq!(h1.font_size, 24.0);
        assert_eq!(h1.emphasis, Emphasis::Bold);

        assert_eq!(classify_line("## Sub").font_size, 20.0);
        assert_eq!(classify_line("### Minor").font_size, 16.0);
        assert_eq!(classify_line("### Minor").text, "Minor");
    }

    #[test]
    fn hash_without_space_is_a_paragraph() {
        let line = classify_line("#hashtag");
        assert_eq!(line.kind, LineKind::Paragraph);
        assert_eq!(line.text, "#hashtag");
        assert_eq!(classify_line("#### Deep").kind, LineKind::Paragraph);
    }

    #[test]
    fn bullets_get_a_glyph() {
        assert_eq!(classify_line("- milk").text, "\u{2022} milk");
        let star = classify_line("* eggs");
        assert_eq!(star.kind, LineKind::Bullet);
        assert_eq!(star.text, "\u{2022} eggs");
        assert_eq!(star.emphasis, Emphasis::Normal);
    }

    #[test]
    fn numbered_items_are_untouched() {
        let line = classify_line("12. Twelfth");
        assert_eq!(line.kind, LineKind::Numbered);
        assert_eq!(line.text, "12. Twelfth");
        assert_eq!(classify_line("3.no space").kind, LineKind::Paragraph);
    }

    #[test]
    fn blockquotes_are_indented_italics() {
        let line = classify_line("> quoted");
        assert_eq!(line.kind, LineKind::Blockquote);
        assert_eq!(line.text, "  quoted");
        assert_eq!(line.emphasis, Emphasis::Italic);
    }

    #[test]
    fn blank_lines() {
        assert!(classify_line("").is_blank());
        assert!(classify_line("   \t").is_blank());
    }

    #[test]
    fn strips_inline_markers() {
        assert_eq!(strip_inline_markup("**bold** and *italic*"), "bold and italic");
        assert_eq!(strip_inline_markup("run `cargo` now"), "run cargo now");
        assert_eq!(strip_inline_markup("see [the docs](https://x.io) here"), "see the docs here");
    }

    #[test]
    fn markers_inside_headings_are_stripped() {
        assert_eq!(classify_line("## A **loud** [link](u)").text, "A loud link");
    }

    #[test]
    fn fixed_order_is_not_code_aware() {
        // Italic markers are stripped before code spans are considered.
        assert_eq!(strip_inline_markup("`a*b*c`"), "abc");
    }

    #[test]
    fn unmatched_markers_survive() {
        assert_eq!(strip_inline_markup("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(strip_inline_markup("[dangling](oops"), "[dangling](oops");
    }

    #[test]
    fn nested_emphasis_loses_every_marker() {
        assert_eq!(
            strip_inline_markup("**bold *italic* still bold**"),
            "bold italic still bold"
        );
        assert_eq!(strip_inline_markup("*a **b** c*"), "a b c");
        // Bold takes `***x**`, leaving `*x*` for the italic pass.
        assert_eq!(strip_inline_markup("***x***"), "x");
    }

    #[test]
    fn unclosed_bold_is_eaten_by_the_italic_pass() {
        // `**` is an empty italic span.
        assert_eq!(strip_inline_markup("**a"), "a");
        assert_eq!(strip_inline_markup("say **hi"), "say hi");
        assert_eq!(strip_inline_markup("*a"), "*a");
    }
}
