// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown line-layout pass — turns classified lines into wrapped text blocks
// positioned on numbered pages. Coordinates are millimetres with the origin
// at the top-left corner of the page; y grows downwards.

use tracing::debug;

use docukit_core::types::{Emphasis, FontFamily, PageGeometry};

use super::classify::{LineKind, classify_line};

/// Line height as a multiple of the font size (points to page units).
pub const LINE_HEIGHT_FACTOR: f32 = 0.4;

/// Space after every emitted block.
pub const BLOCK_GAP: f32 = 4.0;

/// Space consumed by a blank source line.
pub const BLANK_LINE_GAP: f32 = 6.0;

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 0.3528;

/// Splits text into physical lines that fit a given width.
pub trait TextMetrics {
    /// Wrap `text` set at `font_size` points so no line exceeds `max_width`.
    /// Always returns at least one line.
    fn split_text_to_size(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String>;
}

/// Width estimate based on an average glyph advance.
///
/// The built-in PDF fonts carry no metrics we can query cheaply, so a fixed
/// fraction of the em is used per character.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageGlyphMetrics {
    /// Average advance width as a fraction of the font size.
    pub char_width_em: f32,
}

impl AverageGlyphMetrics {
    pub fn for_family(family: FontFamily) -> Self {
        let char_width_em = match family {
            FontFamily::Helvetica => 0.50,
            FontFamily::Times => 0.45,
            // Monospaced: every glyph is 600/1000 em.
            FontFamily::Courier => 0.60,
        };
        Self { char_width_em }
    }

    /// Number of characters that fit in `max_width` millimetres.
    pub fn chars_per_line(&self, max_width: f32, font_size: f32) -> usize {
        let char_width_mm = self.char_width_em * font_size * MM_PER_PT;
        ((max_width / char_width_mm) as usize).max(1)
    }
}

impl Default for AverageGlyphMetrics {
    fn default() -> Self {
        Self::for_family(FontFamily::Helvetica)
    }
}

impl TextMetrics for AverageGlyphMetrics {
    fn split_text_to_size(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
        wrap_line(text, self.chars_per_line(max_width, font_size))
    }
}

/// Mutable position of the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub y: f32,
    pub page_index: usize,
    /// Whether a block has been placed on the current page.
    pub has_content: bool,
}

impl PageCursor {
    fn at_top(page: &PageGeometry) -> Self {
        Self {
            y: page.margin,
            page_index: 0,
            has_content: false,
        }
    }

    fn new_page(&mut self, page: &PageGeometry) {
        self.page_index += 1;
        self.y = page.margin;
        self.has_content = false;
    }
}

/// A wrapped block of text at a fixed position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedBlock {
    pub page_index: usize,
    pub x: f32,
    /// Baseline of the first line.
    pub y: f32,
    pub lines: Vec<String>,
    pub font_size: f32,
    pub emphasis: Emphasis,
    pub kind: LineKind,
}

impl PositionedBlock {
    /// Vertical space taken by the wrapped lines.
    pub fn height(&self) -> f32 {
        block_height(self.lines.len(), self.font_size)
    }

    /// The block's text with wrapped lines joined by single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

/// Result of laying out a Markdown document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkdownLayout {
    pub blocks: Vec<PositionedBlock>,
    /// Number of pages the blocks span (at least one).
    pub page_count: usize,
}

impl MarkdownLayout {
    /// Blocks placed on the given page.
    pub fn blocks_on_page(&self, page_index: usize) -> impl Iterator<Item = &PositionedBlock> {
        self.blocks.iter().filter(move |b| b.page_index == page_index)
    }
}

/// Lay out `markdown` on pages of the given geometry using Helvetica metrics.
pub fn layout_markdown(markdown: &str, page: &PageGeometry) -> MarkdownLayout {
    layout_markdown_with(markdown, page, &AverageGlyphMetrics::default())
}

/// Lay out `markdown` using the supplied line splitter.
pub fn layout_markdown_with(
    markdown: &str,
    page: &PageGeometry,
    metrics: &impl TextMetrics,
) -> MarkdownLayout {
    let mut cursor = PageCursor::at_top(page);
    let mut blocks = Vec::new();

    for raw in markdown.lines() {
        let line = classify_line(raw);
        if line.is_blank() {
            cursor.y += BLANK_LINE_GAP;
            continue;
        }

        let lines = metrics.split_text_to_size(&line.text, page.content_width(), line.font_size);
        let height = block_height(lines.len(), line.font_size);

        // A block that overflows a page with nothing on it yet stays put.
        if cursor.y + height > page.bottom_limit() && cursor.has_content {
            cursor.new_page(page);
            debug!(page = cursor.page_index, "page break");
        }

        blocks.push(PositionedBlock {
            page_index: cursor.page_index,
            x: page.margin,
            y: cursor.y,
            lines,
            font_size: line.font_size,
            emphasis: line.emphasis,
            kind: line.kind,
        });
        cursor.y += height + BLOCK_GAP;
        cursor.has_content = true;
    }

    debug!(blocks = blocks.len(), pages = cursor.page_index + 1, "markdown layout complete");

    MarkdownLayout {
        blocks,
        page_count: cursor.page_index + 1,
    }
}

fn block_height(line_count: usize, font_size: f32) -> f32 {
    line_count as f32 * font_size * LINE_HEIGHT_FACTOR
}

// -- Text wrapping helper -----------------------------------------------------

/// Word-wrap a single line so that no physical line exceeds `max_chars`
/// characters.
///
/// Leading indentation is kept on the first line. Words longer than
/// `max_chars` are force-broken.
pub fn wrap_line(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let body = text.trim_start();
    if body.is_empty() {
        return vec![text.to_owned()];
    }

    let indent = &text[..text.len() - body.len()];
    let mut result = Vec::new();
    let mut current_line = indent.to_owned();
    let mut current_len = indent.chars().count();
    let mut line_has_word = false;

    for word in body.split_whitespace() {
        let word_len = word.chars().count();

        if !line_has_word && current_len + word_len <= max_chars {
            current_line.push_str(word);
            current_len += word_len;
            line_has_word = true;
        } else if line_has_word && current_len + 1 + word_len <= max_chars {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else if word_len <= max_chars {
            if line_has_word {
                result.push(std::mem::take(&mut current_line));
            } else {
                // The indent alone would leave no room for the word.
                current_line.clear();
            }
            current_line.push_str(word);
            current_len = word_len;
            line_has_word = true;
        } else {
            // Flush what we have, then force-break the oversized word.
            if line_has_word {
                result.push(std::mem::take(&mut current_line));
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(max_chars).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    result.push(piece);
                } else {
                    current_len = piece.chars().count();
                    current_line = piece;
                }
            }
            line_has_word = true;
        }
    }

    if line_has_word {
        result.push(current_line);
    }
    result
}
