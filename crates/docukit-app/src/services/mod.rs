// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the command line to the docukit backend crates.
//
// The session owns the configuration and the image list, and wraps the
// document crate's APIs in calls that return data the CLI can print directly.

pub mod data_dir;
pub mod session;
