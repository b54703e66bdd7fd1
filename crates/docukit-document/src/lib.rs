// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docukit-document — Document processing for the Docukit toolkit.
//
// Provides text statistics, Markdown classification and page layout, image
// decoding and page fitting, the ordered image list, and PDF output through a
// renderer abstraction (printpdf for writing, lopdf for reading back).

pub mod convert;
pub mod image;
pub mod markdown;
pub mod pdf;
pub mod stats;

// Re-export the primary structs so callers can use `docukit_document::PdfWriter` etc.
pub use convert::{ImageMerger, MarkdownConverter};
pub use image::{ImageList, PlacementRect, fit_image_to_page};
pub use markdown::{MarkdownLayout, layout_markdown};
pub use pdf::{DocumentRenderer, PdfReader, PdfWriter};
pub use stats::{StatisticsOptions, TextStatistics, compute_statistics, compute_statistics_with};
