// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image decoding — turn uploaded bytes into a bitmap with known natural
// dimensions, using the `image` crate.

use image::DynamicImage;
use tracing::{debug, instrument};

use docukit_core::error::{DocukitError, Result};

/// A decoded bitmap ready to be placed on a page.
pub struct DecodedImage {
    image: DynamicImage,
}

impl DecodedImage {
    /// Decode raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| DocukitError::ImageDecode(format!("failed to decode image: {}", err)))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Packed 8-bit RGB pixels, row-major.
    pub fn to_rgb8_bytes(&self) -> Vec<u8> {
        self.image.to_rgb8().into_raw()
    }
}
