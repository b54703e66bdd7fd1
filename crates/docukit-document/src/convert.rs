// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Conversions — feed the pure layout and fit calculations into a renderer.
//
// Markdown: classify and lay out every line, wrapping with the renderer's own
// text metrics, then replay the positioned blocks onto pages. Images: decode one at a time in list order and give each its own
// page. Any decode failure aborts the whole conversion; output bytes only exist
// once the full document has been serialised.

use std::cell::RefCell;

use tracing::{debug, info, instrument};

use docukit_core::ToolkitConfig;
use docukit_core::error::{DocukitError, Result};
use docukit_core::types::{Emphasis, FontFamily, PageGeometry, UploadedFile};

use crate::image::{DecodedImage, ImageItem, PlacementRect, fit_image_to_page};
use crate::markdown::layout::{MarkdownLayout, TextMetrics, layout_markdown_with};
use crate::pdf::renderer::DocumentRenderer;
use crate::pdf::writer::PdfWriter;

/// Converts Markdown text into a paginated PDF.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    geometry: PageGeometry,
    font_family: FontFamily,
    title: Option<String>,
}

impl MarkdownConverter {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            font_family: FontFamily::Helvetica,
            title: None,
        }
    }

    pub fn from_config(config: &ToolkitConfig) -> Self {
        let mut converter = Self::new(config.page_geometry());
        converter.set_font_family(config.font_family);
        converter
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.font_family = family;
    }

    /// Extract the text of an uploaded `.md` / `.txt` file.
    pub fn read_upload(upload: &UploadedFile) -> Result<String> {
        if !upload.is_markdown_source() {
            return Err(DocukitError::invalid_input(
                &upload.name,
                "only .md and .txt files can be converted",
            ));
        }

        let text = std::str::from_utf8(&upload.bytes).map_err(|err| {
            DocukitError::Read(format!("{} is not valid UTF-8: {}", upload.name, err))
        })?;
        Ok(text.trim_start_matches('\u{feff}').to_owned())
    }

    /// Convert Markdown text into PDF bytes.
    #[instrument(skip(self, markdown), fields(text_len = markdown.len()))]
    pub fn convert(&self, markdown: &str) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Markdown Document");
        let mut writer = PdfWriter::new(self.geometry, title);
        let layout = self.render_into(markdown, &mut writer)?;
        info!(
            blocks = layout.blocks.len(),
            pages = layout.page_count,
            "Markdown laid out"
        );
        writer.save_to_bytes()
    }

    /// Read an uploaded file and convert it.
    pub fn convert_upload(&self, upload: &UploadedFile) -> Result<Vec<u8>> {
        let text = Self::read_upload(upload)?;
        self.convert(&text)
    }

    /// Lay out `markdown` and draw it onto `renderer`.
    pub fn render_into<R: DocumentRenderer>(
        &self,
        markdown: &str,
        renderer: &mut R,
    ) -> Result<MarkdownLayout> {
        if markdown.trim().is_empty() {
            return Err(DocukitError::EmptyInput("some Markdown text".into()));
        }

        let layout = {
            let metrics = RendererMetrics::new(renderer, self.font_family);
            layout_markdown_with(markdown, &self.geometry, &metrics)
        };

        for block in &layout.blocks {
            while renderer.page_count() <= block.page_index {
                renderer.add_page();
            }
            renderer.set_font(self.font_family, block.emphasis);
            renderer.set_font_size(block.font_size);
            renderer.text(&block.lines, block.x, block.y);
        }
        while renderer.page_count() < layout.page_count {
            renderer.add_page();
        }

        Ok(layout)
    }
}

/// Wraps lines through [`DocumentRenderer::split_text_to_size`] so the layout
/// pass and the drawn text agree on where lines break.
struct RendererMetrics<'r, R> {
    renderer: RefCell<&'r mut R>,
}

impl<'r, R: DocumentRenderer> RendererMetrics<'r, R> {
    fn new(renderer: &'r mut R, family: FontFamily) -> Self {
        renderer.set_font(family, Emphasis::Normal);
        Self {
            renderer: RefCell::new(renderer),
        }
    }
}

impl<R: DocumentRenderer> TextMetrics for RendererMetrics<'_, R> {
    fn split_text_to_size(&self, text: &str, max_width: f32, font_size: f32) -> Vec<String> {
        let mut renderer = self.renderer.borrow_mut();
        renderer.set_font_size(font_size);
        renderer.split_text_to_size(text, max_width)
    }
}

/// Merges an ordered set of images into a PDF, one image per page.
#[derive(Debug, Clone)]
pub struct ImageMerger {
    geometry: PageGeometry,
    title: Option<String>,
}

impl ImageMerger {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            title: None,
        }
    }

    pub fn from_config(config: &ToolkitConfig) -> Self {
        Self::new(config.page_geometry())
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Merge `images`, in order, into PDF bytes.
    #[instrument(skip_all)]
    pub fn merge<'a>(&self, images: impl IntoIterator<Item = &'a ImageItem>) -> Result<Vec<u8>> {
        let title = self.title.as_deref().unwrap_or("Image Document");
        let mut writer = PdfWriter::new(self.geometry, title);
        let placements = self.render_into(images, &mut writer)?;
        info!(images = placements.len(), "Images merged");
        writer.save_to_bytes()
    }

    /// Decode, fit, and draw each image on its own page of `renderer`.
    pub fn render_into<'a, R: DocumentRenderer>(
        &self,
        images: impl IntoIterator<Item = &'a ImageItem>,
        renderer: &mut R,
    ) -> Result<Vec<PlacementRect>> {
        let images: Vec<&ImageItem> = images.into_iter().collect();
        if images.is_empty() {
            return Err(DocukitError::EmptyInput("some images".into()));
        }

        let mut placements = Vec::with_capacity(images.len());
        for (index, item) in images.into_iter().enumerate() {
            let decoded = DecodedImage::from_bytes(&item.bytes).map_err(|err| match err {
                DocukitError::ImageDecode(detail) => {
                    DocukitError::ImageDecode(format!("{}: {}", item.name, detail))
                }
                other => other,
            })?;

            if index > 0 {
                renderer.add_page();
            }

            let rect = fit_image_to_page(
                decoded.width(),
                decoded.height(),
                renderer.page_width(),
                renderer.page_height(),
                self.geometry.margin,
            );
            renderer.add_image(&decoded, &rect)?;
            debug!(index, name = %item.name, "image placed");
            placements.push(rect);
        }

        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageList;
    use crate::image::decode::tests::png_bytes;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::renderer::recording::{DrawCommand, RecordingRenderer};

    fn markdown() -> MarkdownConverter {
        MarkdownConverter::new(PageGeometry::default())
    }

    fn merger() -> ImageMerger {
        ImageMerger::new(PageGeometry::default())
    }

    fn image_list(sizes: &[(u32, u32)]) -> ImageList {
        let mut list = ImageList::new();
        for (i, (w, h)) in sizes.iter().enumerate() {
            list.push(UploadedFile::new(format!("img{i}.png"), png_bytes(*w, *h)))
                .expect("push");
        }
        list
    }

    #[test]
    fn heading_is_drawn_bold_at_24pt() {
        let mut renderer = RecordingRenderer::a4();
        markdown().render_into("# Title", &mut renderer).expect("render");
        assert_eq!(
            renderer.commands,
            vec![
                // Wrapping.
                DrawCommand::Font(FontFamily::Helvetica, Emphasis::Normal),
                DrawCommand::FontSize(24.0),
                // Drawing.
                DrawCommand::Font(FontFamily::Helvetica, Emphasis::Bold),
                DrawCommand::FontSize(24.0),
                DrawCommand::Text {
                    page: 0,
                    lines: vec!["Title".into()],
                    x: 10.0,
                    y: 10.0
                },
            ]
        );
    }

    #[test]
    fn lines_wrap_where_the_renderer_says() {
        let mut renderer = RecordingRenderer {
            split_at: Some(5),
            ..RecordingRenderer::a4()
        };
        let layout = markdown()
            .render_into("hello world again", &mut renderer)
            .expect("render");
        let expected: Vec<String> = vec!["hello".into(), "world".into(), "again".into()];
        assert_eq!(layout.blocks[0].lines, expected);
        assert_eq!(renderer.texts(), vec![(0, expected)]);
    }

    #[test]
    fn wrapping_uses_the_configured_family() {
        let mut converter = markdown();
        converter.set_font_family(FontFamily::Courier);
        let mut renderer = RecordingRenderer::a4();
        converter.render_into("plain", &mut renderer).expect("render");
        assert_eq!(
            renderer.commands.first(),
            Some(&DrawCommand::Font(FontFamily::Courier, Emphasis::Normal))
        );
    }

    #[test]
    fn blank_markdown_is_empty_input() {
        let mut renderer = RecordingRenderer::a4();
        let result = markdown().render_into(" \n\n ", &mut renderer);
        assert!(matches!(result, Err(DocukitError::EmptyInput(_))));
        assert!(renderer.commands.is_empty());
    }

    #[test]
    fn long_document_adds_pages_in_order() {
        let text = vec!["paragraph line"; 80].join("\n");
        let mut renderer = RecordingRenderer::a4();
        let layout = markdown().render_into(&text, &mut renderer).expect("render");
        assert_eq!(layout.page_count, 3);
        assert_eq!(renderer.pages, 3);
        let pages: Vec<usize> = renderer.texts().iter().map(|(page, _)| *page).collect();
        assert!(pages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(pages.last().copied(), Some(2));
    }

    #[test]
    fn markdown_pdf_has_expected_pages() {
        let text = format!("# Report\n\n{}", vec!["- item"; 60].join("\n"));
        let bytes = markdown().convert(&text).expect("convert");
        let reader = PdfReader::from_bytes(&bytes).expect("parse");
        assert_eq!(reader.page_count(), 2);
    }

    #[test]
    fn bullet_item_extracts_as_bullet() {
        let bytes = markdown().convert("- milk").expect("convert");
        let text = lopdf::Document::load_mem(&bytes)
            .expect("parse")
            .extract_text(&[1])
            .expect("extract text");
        assert_eq!(text.trim_end(), "\u{2022} milk");
    }

    #[test]
    fn upload_extension_is_checked() {
        let upload = UploadedFile::new("slides.pptx", b"# hi".to_vec());
        let err = markdown().convert_upload(&upload).expect_err("rejected");
        assert!(matches!(err, DocukitError::InvalidInputType { .. }));
    }

    #[test]
    fn only_md_and_txt_extensions_are_read() {
        let long_form = UploadedFile::new("notes.markdown", b"# hi".to_vec());
        assert!(matches!(
            MarkdownConverter::read_upload(&long_form),
            Err(DocukitError::InvalidInputType { .. })
        ));
        let upper = UploadedFile::new("NOTES.MD", b"# hi".to_vec());
        assert_eq!(MarkdownConverter::read_upload(&upper).expect("read"), "# hi");
    }

    #[test]
    fn upload_must_be_utf8() {
        let upload = UploadedFile::new("notes.md", vec![0xff, 0xfe, 0x00]);
        assert!(matches!(
            MarkdownConverter::read_upload(&upload),
            Err(DocukitError::Read(_))
        ));
    }

    #[test]
    fn upload_bom_is_dropped() {
        let upload = UploadedFile::new("notes.txt", "\u{feff}# Hi".as_bytes().to_vec());
        assert_eq!(MarkdownConverter::read_upload(&upload).expect("read"), "# Hi");
    }

    #[test]
    fn each_image_gets_its_own_page() {
        let list = image_list(&[(10, 10), (2000, 1000), (5, 5)]);
        let mut renderer = RecordingRenderer::a4();
        let rects = merger().render_into(&list, &mut renderer).expect("render");

        assert_eq!(rects.len(), 3);
        assert_eq!(renderer.pages, 3);
        let pages: Vec<usize> = renderer.images().iter().map(|(page, _)| *page).collect();
        assert_eq!(pages, vec![0, 1, 2]);
        assert_eq!((rects[0].width, rects[0].height), (10.0, 10.0));
        assert!((rects[1].width - 190.0).abs() < 1e-3);
    }

    #[test]
    fn image_order_follows_the_list() {
        let mut list = image_list(&[(10, 10), (20, 20)]);
        let second = list.ids()[1];
        list.move_to(second, 0);
        let mut renderer = RecordingRenderer::a4();
        let rects = merger().render_into(&list, &mut renderer).expect("render");
        assert_eq!(rects[0].source_width, 20);
        assert_eq!(rects[1].source_width, 10);
    }

    #[test]
    fn no_images_is_empty_input() {
        let list = ImageList::new();
        let result = merger().merge(&list);
        assert!(matches!(result, Err(DocukitError::EmptyInput(_))));
    }

    #[test]
    fn corrupt_image_aborts_the_merge() {
        let mut list = image_list(&[(10, 10)]);
        list.push(UploadedFile::new("broken.png", b"not really a png".to_vec()))
            .expect("push");
        let mut renderer = RecordingRenderer::a4();
        let err = merger().render_into(&list, &mut renderer).expect_err("aborted");
        match err {
            DocukitError::ImageDecode(detail) => assert!(detail.contains("broken.png")),
            other => panic!("unexpected error variant: {other}"),
        }
        assert!(merger().merge(&list).is_err());
    }

    #[test]
    fn merged_pdf_has_one_page_per_image() {
        let list = image_list(&[(30, 60), (60, 30)]);
        let bytes = merger().merge(&list).expect("merge");
        assert_eq!(PdfReader::from_bytes(&bytes).expect("parse").page_count(), 2);
    }
}
