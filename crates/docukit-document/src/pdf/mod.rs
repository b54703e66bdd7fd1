// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — the renderer abstraction, its printpdf-backed writer with the
// WinAnsi text encoding it needs, and a lopdf-backed reader for checking output.

pub mod reader;
pub mod renderer;
pub mod winansi;
pub mod writer;

pub use reader::PdfReader;
pub use renderer::DocumentRenderer;
pub use writer::PdfWriter;
