// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-based document renderer abstraction.
//
// The layout and fit calculations only produce positions; a renderer turns
// those positions into a paged document. Coordinates are page units
// (millimetres) with a top-left origin. A freshly created renderer already has
// its first page.

use docukit_core::error::Result;
use docukit_core::types::{Emphasis, FontFamily};

use crate::image::{DecodedImage, PlacementRect};

/// Draw-command sink for a paged document.
pub trait DocumentRenderer {
    /// Page width in page units.
    fn page_width(&self) -> f32;

    /// Page height in page units.
    fn page_height(&self) -> f32;

    /// Pages created so far (at least one).
    fn page_count(&self) -> usize;

    /// Append a page and make it current.
    fn add_page(&mut self);

    /// Font size in points for subsequent text.
    fn set_font_size(&mut self, size_pt: f32);

    /// Typeface for subsequent text.
    fn set_font(&mut self, family: FontFamily, emphasis: Emphasis);

    /// Wrap `text` at the current font size so every line fits `max_width`.
    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String>;

    /// Draw `lines` on the current page; `y` is the first baseline.
    fn text(&mut self, lines: &[String], x: f32, y: f32);

    /// Draw an image on the current page inside `rect`.
    fn add_image(&mut self, image: &DecodedImage, rect: &PlacementRect) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use crate::markdown::layout::{AverageGlyphMetrics, TextMetrics, wrap_line};

    /// One recorded renderer call.
    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum DrawCommand {
        AddPage,
        Font(FontFamily, Emphasis),
        FontSize(f32),
        Text { page: usize, lines: Vec<String>, x: f32, y: f32 },
        Image { page: usize, rect: PlacementRect },
    }

    /// Renderer that records calls instead of producing a document.
    pub(crate) struct RecordingRenderer {
        pub width: f32,
        pub height: f32,
        pub pages: usize,
        pub font_size: f32,
        /// Fixed characters per line instead of glyph-width estimates.
        pub split_at: Option<usize>,
        pub commands: Vec<DrawCommand>,
    }

    impl RecordingRenderer {
        pub(crate) fn a4() -> Self {
            Self {
                width: 210.0,
                height: 297.0,
                pages: 1,
                font_size: 12.0,
                split_at: None,
                commands: Vec::new(),
            }
        }

        pub(crate) fn texts(&self) -> Vec<(usize, Vec<String>)> {
            self.commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Text { page, lines, .. } => Some((*page, lines.clone())),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn images(&self) -> Vec<(usize, PlacementRect)> {
            self.commands
                .iter()
                .filter_map(|c| match c {
                    DrawCommand::Image { page, rect } => Some((*page, *rect)),
                    _ => None,
                })
                .collect()
        }
    }

    impl DocumentRenderer for RecordingRenderer {
        fn page_width(&self) -> f32 {
            self.width
        }

        fn page_height(&self) -> f32 {
            self.height
        }

        fn page_count(&self) -> usize {
            self.pages
        }

        fn add_page(&mut self) {
            self.pages += 1;
            self.commands.push(DrawCommand::AddPage);
        }

        fn set_font_size(&mut self, size_pt: f32) {
            self.font_size = size_pt;
            self.commands.push(DrawCommand::FontSize(size_pt));
        }

        fn set_font(&mut self, family: FontFamily, emphasis: Emphasis) {
            self.commands.push(DrawCommand::Font(family, emphasis));
        }

        fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String> {
            match self.split_at {
                Some(max_chars) => wrap_line(text, max_chars),
                None => AverageGlyphMetrics::default().split_text_to_size(
                    text,
                    max_width,
                    self.font_size,
                ),
            }
        }

        fn text(&mut self, lines: &[String], x: f32, y: f32) {
            self.commands.push(DrawCommand::Text {
                page: self.pages - 1,
                lines: lines.to_vec(),
                x,
                y,
            });
        }

        fn add_image(&mut self, _image: &DecodedImage, rect: &PlacementRect) -> Result<()> {
            self.commands.push(DrawCommand::Image {
                page: self.pages - 1,
                rect: *rect,
            });
            Ok(())
        }
    }
}
