// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session — owns the configuration and the ordered image list for one run,
// and exposes the three tools as calls the CLI can use directly.
//
// Reading uploads is the only asynchronous boundary. Files are awaited one at
// a time in the order given so the image list (and the page order of the
// merged PDF) always matches the command line.

use std::path::{Path, PathBuf};

use docukit_core::ToolkitConfig;
use docukit_core::error::Result;
use docukit_core::types::{ImageId, UploadedFile};
use docukit_document::image::AddReport;
use docukit_document::{
    ImageList, ImageMerger, MarkdownConverter, PdfReader, StatisticsOptions, TextStatistics,
    compute_statistics_with,
};
use tracing::{debug, info, instrument, warn};

use super::data_dir;

/// State for a single invocation of the toolkit.
pub struct Session {
    config: ToolkitConfig,
    config_path: PathBuf,
    images: ImageList,
}

impl Session {
    /// Load the config from `config_path` (or the default location) and start
    /// with an empty image list.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = config_path.unwrap_or_else(data_dir::default_config_path);
        let config = ToolkitConfig::load(&config_path)?;
        info!(path = %config_path.display(), "session ready");
        Ok(Self::with_config(config, config_path))
    }

    pub fn with_config(config: ToolkitConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            images: ImageList::new(),
        }
    }

    pub fn config(&self) -> &ToolkitConfig {
        &self.config
    }

    /// Mutable access for per-invocation overrides. Call
    /// [`ToolkitConfig::validate`] afterwards.
    pub fn config_mut(&mut self) -> &mut ToolkitConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Persist the current config to its path.
    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path)?;
        info!(path = %self.config_path.display(), "config saved");
        Ok(())
    }

    // -- Text statistics -----------------------------------------------------

    pub fn statistics(&self, text: &str) -> TextStatistics {
        compute_statistics_with(text, &StatisticsOptions::from_config(&self.config))
    }

    // -- Uploads -------------------------------------------------------------

    /// Read a file from disk as an upload; the MIME type follows the extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn read_upload(path: impl AsRef<Path>) -> Result<UploadedFile> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(bytes = bytes.len(), %name, "upload read");
        Ok(UploadedFile::new(name, bytes))
    }

    /// Read several files sequentially, in order.
    pub async fn read_uploads(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
        let mut uploads = Vec::with_capacity(paths.len());
        for path in paths {
            uploads.push(Self::read_upload(path).await?);
        }
        Ok(uploads)
    }

    // -- Markdown to PDF -----------------------------------------------------

    pub fn convert_markdown(&self, upload: &UploadedFile, title: Option<&str>) -> Result<Vec<u8>> {
        let mut converter = MarkdownConverter::from_config(&self.config);
        if let Some(title) = title {
            converter.set_title(title);
        }
        converter.convert_upload(upload)
    }

    // -- Image list ----------------------------------------------------------

    /// Append uploads to the image list. Non-images are skipped and reported.
    pub fn add_images(&mut self, uploads: Vec<UploadedFile>) -> AddReport {
        self.images.add_uploads(uploads)
    }

    pub fn images(&self) -> &ImageList {
        &self.images
    }

    /// Image names in list order.
    pub fn image_names(&self) -> Vec<&str> {
        self.images.iter().map(|item| item.name.as_str()).collect()
    }

    fn find_image(&self, name: &str) -> Option<ImageId> {
        self.images
            .iter()
            .find(|item| item.name == name)
            .map(|item| item.id)
    }

    /// Remove the first image called `name`.
    pub fn remove_image(&mut self, name: &str) -> bool {
        match self.find_image(name) {
            Some(id) => self.images.remove(id),
            None => {
                warn!(name, "no image with that name to remove");
                false
            }
        }
    }

    /// Move the first image called `name` to `index`.
    pub fn move_image(&mut self, name: &str, index: usize) -> bool {
        match self.find_image(name) {
            Some(id) => self.images.move_to(id, index),
            None => {
                warn!(name, "no image with that name to move");
                false
            }
        }
    }

    /// Merge the current image list into PDF bytes.
    pub fn merge_images(&self, title: Option<&str>) -> Result<Vec<u8>> {
        let mut merger = ImageMerger::from_config(&self.config);
        if let Some(title) = title {
            merger.set_title(title);
        }
        merger.merge(&self.images)
    }

    // -- Output --------------------------------------------------------------

    /// Write a finished PDF and return its page count.
    #[instrument(skip_all, fields(path = %path.display(), bytes = bytes.len()))]
    pub async fn write_pdf(path: &Path, bytes: &[u8]) -> Result<usize> {
        let pages = PdfReader::from_bytes(bytes)?.page_count();
        tokio::fs::write(path, bytes).await?;
        info!(pages, "PDF written");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docukit_core::error::DocukitError;
    use docukit_core::types::SentenceCounting;

    fn session() -> Session {
        Session::with_config(ToolkitConfig::default(), PathBuf::from("unused.json"))
    }

    fn fake_image(name: &str) -> UploadedFile {
        UploadedFile::new(name, vec![0u8; 4])
    }

    #[test]
    fn statistics_follow_config() {
        let mut session = session();
        assert_eq!(session.statistics("a b c").sentence_count, 1);
        session.config_mut().sentence_counting = SentenceCounting::TerminatorRuns;
        assert_eq!(session.statistics("one. two. three.").sentence_count, 3);
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let session = Session::load(Some(dir.path().join("none.json"))).expect("load");
        assert_eq!(session.config(), &ToolkitConfig::default());
    }

    #[test]
    fn save_config_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        let mut session = Session::with_config(ToolkitConfig::default(), path.clone());
        session.config_mut().words_per_minute = 250;
        session.save_config().expect("save");
        let reloaded = Session::load(Some(path)).expect("load");
        assert_eq!(reloaded.config().words_per_minute, 250);
    }

    #[test]
    fn non_images_are_skipped() {
        let mut session = session();
        let report = session.add_images(vec![
            fake_image("a.png"),
            UploadedFile::new("notes.txt", b"hi".to_vec()),
            fake_image("b.jpg"),
        ]);
        assert_eq!(report.added.len(), 2);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(session.image_names(), vec!["a.png", "b.jpg"]);
    }

    #[test]
    fn remove_and_move_by_name() {
        let mut session = session();
        session.add_images(vec![fake_image("a.png"), fake_image("b.png"), fake_image("c.png")]);
        assert!(session.remove_image("b.png"));
        assert!(!session.remove_image("b.png"));
        assert!(session.move_image("c.png", 0));
        assert_eq!(session.image_names(), vec!["c.png", "a.png"]);
        assert_eq!(session.images().store().live_count(), 2);
        assert_eq!(session.images().store().released_count(), 1);
    }

    #[test]
    fn merge_of_empty_list_needs_images() {
        assert!(matches!(
            session().merge_images(None),
            Err(DocukitError::EmptyInput(_))
        ));
    }

    #[test]
    fn undecodable_image_aborts_merge() {
        let mut session = session();
        session.add_images(vec![fake_image("broken.png")]);
        assert!(matches!(
            session.merge_images(None),
            Err(DocukitError::ImageDecode(_))
        ));
    }

    #[tokio::test]
    async fn markdown_file_to_pdf() {
        let dir = tempfile::tempdir().expect("tempdir");
        let input = dir.path().join("notes.md");
        tokio::fs::write(&input, "# Notes\n\n- one\n- two\n")
            .await
            .expect("write input");

        let upload = Session::read_upload(&input).await.expect("read");
        assert_eq!(upload.name, "notes.md");

        let bytes = session()
            .convert_markdown(&upload, Some("Notes"))
            .expect("convert");
        let output = dir.path().join("notes.pdf");
        let pages = Session::write_pdf(&output, &bytes).await.expect("write");
        assert_eq!(pages, 1);
        assert!(output.exists());
    }

    #[tokio::test]
    async fn missing_upload_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = Session::read_upload(dir.path().join("absent.md")).await;
        assert!(matches!(result, Err(DocukitError::Io(_))));
    }

    #[tokio::test]
    async fn uploads_keep_command_line_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut paths = Vec::new();
        for name in ["z.png", "a.png", "m.png"] {
            let path = dir.path().join(name);
            tokio::fs::write(&path, [0u8; 4]).await.expect("write");
            paths.push(path);
        }
        let uploads = Session::read_uploads(&paths).await.expect("read");
        let names: Vec<&str> = uploads.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["z.png", "a.png", "m.png"]);
    }
}
