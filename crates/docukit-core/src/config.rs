// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolkit configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DocukitError, Result};
use crate::types::{FontFamily, PageGeometry, PaperSize, SentenceCounting};

/// User settings shared by all three tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Paper size for generated documents.
    pub paper_size: PaperSize,
    /// Uniform page margin in millimetres.
    pub margin_mm: f32,
    /// Font family used by the Markdown converter.
    pub font_family: FontFamily,
    /// Reading speed used for the reading-time estimate.
    pub words_per_minute: u32,
    /// Sentence counting variant for the statistics engine.
    pub sentence_counting: SentenceCounting,
    /// Default output file name for the Markdown converter.
    pub markdown_output: String,
    /// Default output file name for the image merger.
    pub images_output: String,
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margin_mm: 10.0,
            font_family: FontFamily::Helvetica,
            words_per_minute: 200,
            sentence_counting: SentenceCounting::PerLine,
            markdown_output: "document.pdf".into(),
            images_output: "images.pdf".into(),
        }
    }
}

impl ToolkitConfig {
    /// Page geometry derived from the paper size and margin.
    pub fn page_geometry(&self) -> PageGeometry {
        PageGeometry::from_paper(self.paper_size, self.margin_mm)
    }

    /// Reject settings the tools cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.words_per_minute == 0 {
            return Err(DocukitError::Config(
                "words_per_minute must be greater than zero".into(),
            ));
        }
        let page = self.page_geometry();
        if self.margin_mm < 0.0 || page.content_width() <= 0.0 || page.content_height() <= 0.0 {
            return Err(DocukitError::Config(format!(
                "margin of {} mm leaves no room on a {:?} page",
                self.margin_mm, self.paper_size
            )));
        }
        Ok(())
    }

    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Write settings as pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
