// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image page-fit calculator — shrink a bitmap into the page's content box and
// centre it. Bitmap pixels map 1:1 onto page units before scaling.

use serde::Serialize;

use docukit_core::types::PageGeometry;

/// Where an image lands on its page (top-left origin, page units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacementRect {
    pub source_width: u32,
    pub source_height: u32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Fit a `bitmap_width` x `bitmap_height` image onto a page, never upscaling.
///
/// Width is constrained first; the height constraint is applied afterwards to
/// the already-scaled size and may shrink the width further.
pub fn fit_image_to_page(
    bitmap_width: u32,
    bitmap_height: u32,
    page_width: f32,
    page_height: f32,
    margin: f32,
) -> PlacementRect {
    let max_width = page_width - 2.0 * margin;
    let max_height = page_height - 2.0 * margin;

    let mut width = bitmap_width as f32;
    let mut height = bitmap_height as f32;

    if width > max_width {
        let ratio = max_width / width;
        width *= ratio;
        height *= ratio;
    }
    if height > max_height {
        let ratio = max_height / height;
        width *= ratio;
        height *= ratio;
    }

    PlacementRect {
        source_width: bitmap_width,
        source_height: bitmap_height,
        x: (page_width - width) / 2.0,
        y: (page_height - height) / 2.0,
        width,
        height,
    }
}

/// [`fit_image_to_page`] for a [`PageGeometry`].
pub fn fit_to_geometry(bitmap_width: u32, bitmap_height: u32, page: &PageGeometry) -> PlacementRect {
    fit_image_to_page(bitmap_width, bitmap_height, page.width, page.height, page.margin)
}
