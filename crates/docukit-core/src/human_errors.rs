// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the transient notifications shown after a
// failed action.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how the front end presents the notification.

use crate::error::DocukitError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// One item was skipped; the rest of the action went ahead.
    Skipped,
    /// Nothing happened because the user has to provide something first.
    ActionRequired,
    /// The action was aborted and produced no output.
    Failed,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Severity level.
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `DocukitError` into a `HumanError` suitable for a notification.
pub fn humanize_error(err: &DocukitError) -> HumanError {
    match err {
        DocukitError::InvalidInputType { name, reason } => HumanError {
            message: format!("\"{name}\" was skipped."),
            suggestion: format!("It isn't a file this tool can use ({reason})."),
            severity: Severity::Skipped,
        },

        DocukitError::EmptyInput(what) => HumanError {
            message: "There's nothing to convert yet.".into(),
            suggestion: format!("Add {what} first, then try again."),
            severity: Severity::ActionRequired,
        },

        DocukitError::Read(_) => HumanError {
            message: "The file couldn't be read.".into(),
            suggestion: "Make sure it is a plain text or Markdown file saved as UTF-8.".into(),
            severity: Severity::Failed,
        },

        DocukitError::ImageDecode(_) => HumanError {
            message: "One of the images couldn't be opened.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            severity: Severity::Failed,
        },

        // Renderer failures are reported generically.
        DocukitError::Render(_) => HumanError {
            message: "The PDF couldn't be created.".into(),
            suggestion: "Please try again.".into(),
            severity: Severity::Failed,
        },

        DocukitError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or delete the configuration file. ({detail})"),
            severity: Severity::ActionRequired,
        },

        DocukitError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError {
                message: "The file couldn't be found.".into(),
                suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                severity: Severity::ActionRequired,
            },
            std::io::ErrorKind::PermissionDenied => HumanError {
                message: "There is no permission to use that file.".into(),
                suggestion: "Check the file permissions, or choose a different location.".into(),
                severity: Severity::ActionRequired,
            },
            _ => HumanError {
                message: "There was a problem reading or writing a file.".into(),
                suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                severity: Severity::Failed,
            },
        },

        DocukitError::Serialization(_) => HumanError {
            message: "The settings file couldn't be understood.".into(),
            suggestion: "Check that it is valid JSON, or delete it to go back to the defaults.".into(),
            severity: Severity::ActionRequired,
        },
    }
}
