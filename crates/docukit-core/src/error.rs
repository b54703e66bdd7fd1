// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Docukit.

use thiserror::Error;

/// Top-level error type for all Docukit operations.
///
/// Every failure is terminal for the action that triggered it. Invalid input
/// types only abort the offending item; everything else aborts the whole
/// conversion.
#[derive(Debug, Error)]
pub enum DocukitError {
    // -- Input errors --
    #[error("'{name}' is not a supported input: {reason}")]
    InvalidInputType { name: String, reason: String },

    #[error("nothing to convert: {0}")]
    EmptyInput(String),

    // -- Decode / read errors --
    #[error("failed to read input: {0}")]
    Read(String),

    #[error("image decoding failed: {0}")]
    ImageDecode(String),

    // -- Rendering --
    #[error("PDF rendering failed: {0}")]
    Render(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DocukitError {
    /// Shorthand for an [`DocukitError::InvalidInputType`] about a named file.
    pub fn invalid_input(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInputType {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error only affects a single item of a batch.
    pub fn is_item_local(&self) -> bool {
        matches!(self, Self::InvalidInputType { .. })
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocukitError>;
