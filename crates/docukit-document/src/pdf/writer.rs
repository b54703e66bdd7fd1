// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — the `DocumentRenderer` backed by `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Draw calls arrive in top-left-origin millimetres and
// are converted to PDF's bottom-left-origin points here.
//
// printpdf writes builtin-font strings as UTF-8, but the standard 14 fonts are
// shown through WinAnsiEncoding. Text is restricted to that repertoire when it
// is drawn, and the serialised file is passed through lopdf once to re-encode
// the string operands and declare the encoding on the fonts.

use docukit_core::error::{DocukitError, Result};
use docukit_core::types::{Emphasis, FontFamily, PageGeometry};
use lopdf::{Document, Object};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};

use super::renderer::DocumentRenderer;
use super::winansi;
use crate::image::{DecodedImage, PlacementRect};
use crate::markdown::layout::{AverageGlyphMetrics, LINE_HEIGHT_FACTOR, TextMetrics};

/// Images are embedded at 72 DPI so one pixel starts out as one point.
const IMAGE_DPI: f32 = 72.0;

/// Builds a PDF page by page from renderer draw calls.
pub struct PdfWriter {
    geometry: PageGeometry,
    doc: PdfDocument,
    /// Operation lists, one per page. Never empty.
    pages: Vec<Vec<Op>>,
    font: BuiltinFont,
    font_size: f32,
    metrics: AverageGlyphMetrics,
}

impl PdfWriter {
    /// Start a new document with one empty page.
    pub fn new(geometry: PageGeometry, title: &str) -> Self {
        info!(
            width = geometry.width,
            height = geometry.height,
            title,
            "Creating PDF document"
        );
        Self {
            geometry,
            doc: PdfDocument::new(title),
            pages: vec![Vec::new()],
            font: BuiltinFont::Helvetica,
            font_size: 12.0,
            metrics: AverageGlyphMetrics::default(),
        }
    }

    /// Serialise the document.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn save_to_bytes(mut self) -> Result<Vec<u8>> {
        let page_w = Mm(self.geometry.width);
        let page_h = Mm(self.geometry.height);
        let pages: Vec<PdfPage> = std::mem::take(&mut self.pages)
            .into_iter()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();

        self.doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = output.len(),
            warnings = warnings.len(),
            "PDF serialised"
        );

        if output.is_empty() {
            return Err(DocukitError::Render("PDF serialiser produced no output".into()));
        }
        encode_builtin_text(&output)
    }

    fn current_page(&mut self) -> &mut Vec<Op> {
        // `pages` starts with one entry and only ever grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Convert a top-left-origin y (mm) into a PDF y (pt).
    fn pdf_y(&self, y_mm: f32) -> Pt {
        Mm(self.geometry.height - y_mm).into_pt()
    }
}

impl DocumentRenderer for PdfWriter {
    fn page_width(&self) -> f32 {
        self.geometry.width
    }

    fn page_height(&self) -> f32 {
        self.geometry.height
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) {
        self.pages.push(Vec::new());
        debug!(page = self.pages.len(), "Page added");
    }

    fn set_font_size(&mut self, size_pt: f32) {
        self.font_size = size_pt;
    }

    fn set_font(&mut self, family: FontFamily, emphasis: Emphasis) {
        self.font = builtin_font(family, emphasis);
        self.metrics = AverageGlyphMetrics::for_family(family);
    }

    fn split_text_to_size(&self, text: &str, max_width: f32) -> Vec<String> {
        self.metrics.split_text_to_size(text, max_width, self.font_size)
    }

    fn text(&mut self, lines: &[String], x: f32, y: f32) {
        let line_height = self.font_size * LINE_HEIGHT_FACTOR;
        let x_pt = Mm(x).into_pt();
        let font = self.font;
        let size = Pt(self.font_size);

        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y_pt = self.pdf_y(y + index as f32 * line_height);
            let ops = self.current_page();
            ops.push(Op::StartTextSection);
            ops.push(Op::SetTextCursor {
                pos: Point { x: x_pt, y: y_pt },
            });
            ops.push(Op::SetFontSizeBuiltinFont { size, font });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(winansi::sanitize(line))],
                font,
            });
            ops.push(Op::EndTextSection);
        }
    }

    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn add_image(&mut self, image: &DecodedImage, rect: &PlacementRect) -> Result<()> {
        let (px_w, px_h) = (image.width(), image.height());
        if px_w == 0 || px_h == 0 {
            return Err(DocukitError::Render("image has no pixels".into()));
        }

        let raw = RawImage {
            pixels: RawImageData::U8(image.to_rgb8_bytes()),
            width: px_w as usize,
            height: px_h as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let xobject_id = self.doc.add_image(&raw);

        // At IMAGE_DPI the natural size in points equals the pixel count.
        let scale_x = Mm(rect.width).into_pt().0 / px_w as f32;
        let scale_y = Mm(rect.height).into_pt().0 / px_h as f32;
        let translate_x = Mm(rect.x).into_pt();
        let translate_y = self.pdf_y(rect.y + rect.height);

        self.current_page().push(Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(translate_x),
                translate_y: Some(translate_y),
                scale_x: Some(scale_x),
                scale_y: Some(scale_y),
                dpi: Some(IMAGE_DPI),
                rotate: None,
            },
        });

        debug!(
            x = rect.x,
            y = rect.y,
            w = rect.width,
            h = rect.height,
            "Image placed on page"
        );
        Ok(())
    }
}

/// Re-encode the text operands of every page as WinAnsi and mark the
/// standard fonts with that encoding.
fn encode_builtin_text(pdf: &[u8]) -> Result<Vec<u8>> {
    let render_err =
        |err: lopdf::Error| DocukitError::Render(format!("failed to re-encode text: {err}"));

    let mut document = Document::load_mem(pdf).map_err(render_err)?;
    let mut reencoded_pages = 0;
    for page_id in document.get_pages().into_values() {
        let mut content = document
            .get_and_decode_page_content(page_id)
            .map_err(render_err)?;
        let mut changed = false;
        for operation in &mut content.operations {
            if matches!(operation.operator.as_str(), "Tj" | "TJ" | "'" | "\"") {
                for operand in &mut operation.operands {
                    changed |= reencode_strings(operand);
                }
            }
        }
        if changed {
            let encoded = content.encode().map_err(render_err)?;
            document
                .change_page_content(page_id, encoded)
                .map_err(render_err)?;
            reencoded_pages += 1;
        }
    }

    for object in document.objects.values_mut() {
        mark_winansi_fonts(object);
    }
    document.compress();

    let mut output = Vec::new();
    document.save_to(&mut output).map_err(|err| render_err(err.into()))?;
    debug!(reencoded_pages, bytes = output.len(), "text encoded as WinAnsi");
    Ok(output)
}

fn reencode_strings(object: &mut Object) -> bool {
    match object {
        Object::String(bytes, _) => match winansi::transcode_utf8(bytes) {
            Some(encoded) => {
                *bytes = encoded;
                true
            }
            None => false,
        },
        Object::Array(items) => items
            .iter_mut()
            .fold(false, |changed, item| reencode_strings(item) | changed),
        _ => false,
    }
}

/// Set `/Encoding /WinAnsiEncoding` on every Type1 font dictionary, wherever
/// it is nested.
fn mark_winansi_fonts(object: &mut Object) {
    match object {
        Object::Dictionary(dict) => {
            let is_name = |key: &[u8], value: &[u8]| {
                dict.get(key).and_then(Object::as_name).ok() == Some(value)
            };
            if is_name(b"Type", b"Font") && is_name(b"Subtype", b"Type1") {
                dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
            }
            for (_, value) in dict.iter_mut() {
                mark_winansi_fonts(value);
            }
        }
        Object::Array(items) => items.iter_mut().for_each(mark_winansi_fonts),
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                mark_winansi_fonts(value);
            }
        }
        _ => {}
    }
}

/// Map a family and emphasis onto one of the 14 standard PDF fonts.
fn builtin_font(family: FontFamily, emphasis: Emphasis) -> BuiltinFont {
    match (family, emphasis) {
        (FontFamily::Helvetica, Emphasis::Normal) => BuiltinFont::Helvetica,
        (FontFamily::Helvetica, Emphasis::Bold) => BuiltinFont::HelveticaBold,
        (FontFamily::Helvetica, Emphasis::Italic) => BuiltinFont::HelveticaOblique,
        (FontFamily::Times, Emphasis::Normal) => BuiltinFont::TimesRoman,
        (FontFamily::Times, Emphasis::Bold) => BuiltinFont::TimesBold,
        (FontFamily::Times, Emphasis::Italic) => BuiltinFont::TimesItalic,
        (FontFamily::Courier, Emphasis::Normal) => BuiltinFont::Courier,
        (FontFamily::Courier, Emphasis::Bold) => BuiltinFont::CourierBold,
        (FontFamily::Courier, Emphasis::Italic) => BuiltinFont::CourierOblique,
    }
}
