// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, page fitting, and the ordered image list.

pub mod decode;
pub mod fit;
pub mod list;

pub use decode::DecodedImage;
pub use fit::{PlacementRect, fit_image_to_page, fit_to_geometry};
pub use list::{AddReport, ImageItem, ImageList, InMemoryPreviewStore, PreviewHandle, PreviewStore};
