// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markdown module — line classification and the page layout pass.

pub mod classify;
pub mod layout;

pub use classify::{LineKind, MarkdownLine, classify_line, strip_inline_markup};
pub use layout::{
    AverageGlyphMetrics, MarkdownLayout, PageCursor, PositionedBlock, TextMetrics, layout_markdown,
    layout_markdown_with,
};
