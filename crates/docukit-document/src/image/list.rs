// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered image list — the reorderable set of images queued for merging.
//
// Each entry holds a preview handle obtained from a `PreviewStore`. Handles
// are move-only, so the list is the single place that can give one back:
// removal, clearing, and dropping the list each release a handle exactly once.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use docukit_core::error::{DocukitError, Result};
use docukit_core::types::{ImageId, UploadedFile};

/// Token for a previewable bitmap resource held by a [`PreviewStore`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PreviewHandle(u64);

impl PreviewHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Owner of the preview resources backing listed images.
pub trait PreviewStore {
    /// Register a preview for the given image bytes.
    fn acquire(&mut self, name: &str, bytes: &[u8]) -> PreviewHandle;

    /// Give a preview back. Consumes the handle.
    fn release(&mut self, handle: PreviewHandle);
}

/// Preview store that keeps track of live handles in memory.
#[derive(Debug, Default)]
pub struct InMemoryPreviewStore {
    next_id: u64,
    live: HashMap<u64, String>,
    released: u64,
}

impl InMemoryPreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles acquired and not yet released.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Total number of releases so far.
    pub fn released_count(&self) -> u64 {
        self.released
    }

    pub fn is_live(&self, raw: u64) -> bool {
        self.live.contains_key(&raw)
    }
}

impl PreviewStore for InMemoryPreviewStore {
    fn acquire(&mut self, name: &str, _bytes: &[u8]) -> PreviewHandle {
        self.next_id += 1;
        self.live.insert(self.next_id, name.to_owned());
        PreviewHandle::new(self.next_id)
    }

    fn release(&mut self, handle: PreviewHandle) {
        match self.live.remove(&handle.raw()) {
            Some(name) => {
                self.released += 1;
                debug!(handle = handle.raw(), name = %name, "preview released");
            }
            None => warn!(handle = handle.raw(), "release of unknown preview handle"),
        }
    }
}

/// An image queued for merging.
#[derive(Debug)]
pub struct ImageItem {
    pub id: ImageId,
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl ImageItem {
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Outcome of adding several uploads at once.
#[derive(Debug, Default)]
pub struct AddReport {
    pub added: Vec<ImageId>,
    /// One error per rejected upload; siblings are unaffected.
    pub rejected: Vec<DocukitError>,
}

/// Ordered, reorderable list of images.
pub struct ImageList<S: PreviewStore = InMemoryPreviewStore> {
    items: Vec<ImageItem>,
    store: S,
}

impl ImageList<InMemoryPreviewStore> {
    pub fn new() -> Self {
        Self::with_store(InMemoryPreviewStore::new())
    }
}

impl Default for ImageList<InMemoryPreviewStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: PreviewStore> ImageList<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            items: Vec::new(),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageItem> {
        self.items.iter()
    }

    pub fn get(&self, id: ImageId) -> Option<&ImageItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ImageId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Identity tokens in list order.
    pub fn ids(&self) -> Vec<ImageId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Append an upload. Anything whose MIME type is not `image/*` is rejected.
    pub fn push(&mut self, upload: UploadedFile) -> Result<ImageId> {
        if !upload.is_image() {
            warn!(name = %upload.name, mime = %upload.mime_type, "rejected non-image upload");
            return Err(DocukitError::invalid_input(
                upload.name,
                format!("{} is not an image type", upload.mime_type),
            ));
        }

        let preview = self.store.acquire(&upload.name, &upload.bytes);
        let id = ImageId::new();
        debug!(%id, name = %upload.name, position = self.items.len(), "image added");
        self.items.push(ImageItem {
            id,
            name: upload.name,
            mime_type: upload.mime_type,
            bytes: upload.bytes,
            preview,
        });
        Ok(id)
    }

    /// Append several uploads, skipping the ones that are not images.
    pub fn add_uploads(&mut self, uploads: impl IntoIterator<Item = UploadedFile>) -> AddReport {
        let mut report = AddReport::default();
        for upload in uploads {
            match self.push(upload) {
                Ok(id) => report.added.push(id),
                Err(err) => report.rejected.push(err),
            }
        }
        info!(
            added = report.added.len(),
            rejected = report.rejected.len(),
            total = self.items.len(),
            "uploads processed"
        );
        report
    }

    /// Remove an image by identity, releasing its preview. Returns whether it
    /// was present.
    pub fn remove(&mut self, id: ImageId) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let item = self.items.remove(position);
        debug!(%id, name = %item.name, "image removed");
        self.store.release(item.preview);
        true
    }

    /// Move an image to `index` (clamped to the end of the list).
    ///
    /// Implemented as remove-then-insert, so `index` refers to positions in the
    /// list without the moved item. The preview stays live.
    pub fn move_to(&mut self, id: ImageId, index: usize) -> bool {
        let Some(position) = self.position(id) else {
            return false;
        };
        let item = self.items.remove(position);
        let target = index.min(self.items.len());
        self.items.insert(target, item);
        debug!(%id, from = position, to = target, "image moved");
        true
    }

    /// Remove every image, releasing each preview before dropping the entry.
    pub fn clear(&mut self) {
        let items = std::mem::take(&mut self.items);
        let count = items.len();
        for item in items {
            self.store.release(item.preview);
        }
        debug!(count, "image list cleared");
    }
}

impl<S: PreviewStore> Drop for ImageList<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'a, S: PreviewStore> IntoIterator for &'a ImageList<S> {
    type Item = &'a ImageItem;
    type IntoIter = std::slice::Iter<'a, ImageItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn upload(name: &str) -> UploadedFile {
        UploadedFile::new(name, vec![0u8; 4])
    }

    fn names<S: PreviewStore>(list: &ImageList<S>) -> Vec<&str> {
        list.iter().map(|item| item.name.as_str()).collect()
    }

    /// Records every release into a shared log that outlives the list.
    #[derive(Default, Clone)]
    struct LoggingStore {
        next: u64,
        released: Rc<RefCell<Vec<u64>>>,
    }

    impl PreviewStore for LoggingStore {
        fn acquire(&mut self, _name: &str, _bytes: &[u8]) -> PreviewHandle {
            self.next += 1;
            PreviewHandle::new(self.next)
        }

        fn release(&mut self, handle: PreviewHandle) {
            self.released.borrow_mut().push(handle.raw());
        }
    }

    #[test]
    fn remove_keeps_order_and_releases_once() {
        let mut list = ImageList::new();
        let a = list.push(upload("a.png")).expect("a");
        let b = list.push(upload("b.png")).expect("b");
        let c = list.push(upload("c.png")).expect("c");
        let b_handle = list.get(b).expect("b present").preview().raw();

        assert!(list.remove(b));
        assert_eq!(list.ids(), vec![a, c]);
        assert_eq!(list.store().released_count(), 1);
        assert!(!list.store().is_live(b_handle));
        assert_eq!(list.store().live_count(), 2);

        // A second removal of the same id is a no-op.
        assert!(!list.remove(b));
        assert_eq!(list.store().released_count(), 1);
    }

    #[test]
    fn non_images_are_rejected_individually() {
        let mut list = ImageList::new();
        let report = list.add_uploads(vec![
            upload("one.jpg"),
            upload("notes.txt"),
            UploadedFile::with_mime_type("blob", "image/heic", vec![1]),
            upload("two.png"),
        ]);
        assert_eq!(report.added.len(), 3);
        assert_eq!(report.rejected.len(), 1);
        assert!(report.rejected[0].is_item_local());
        assert_eq!(names(&list), vec!["one.jpg", "blob", "two.png"]);
        assert_eq!(list.store().live_count(), 3);
    }

    #[test]
    fn move_to_reorders_without_releasing() {
        let mut list = ImageList::new();
        let a = list.push(upload("a.png")).expect("a");
        list.push(upload("b.png")).expect("b");
        list.push(upload("c.png")).expect("c");

        assert!(list.move_to(a, 2));
        assert_eq!(names(&list), vec!["b.png", "c.png", "a.png"]);

        assert!(list.move_to(a, 0));
        assert_eq!(names(&list), vec!["a.png", "b.png", "c.png"]);

        // Out-of-range targets land at the end.
        assert!(list.move_to(a, 99));
        assert_eq!(names(&list), vec!["b.png", "c.png", "a.png"]);

        assert_eq!(list.store().released_count(), 0);
        assert!(!list.move_to(ImageId::new(), 0));
    }

    #[test]
    fn clear_releases_everything() {
        let mut list = ImageList::new();
        for name in ["a.png", "b.png", "c.png"] {
            list.push(upload(name)).expect("push");
        }
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.store().released_count(), 3);
        assert_eq!(list.store().live_count(), 0);
    }

    #[test]
    fn dropping_the_list_releases_remaining_handles() {
        let store = LoggingStore::default();
        let log = Rc::clone(&store.released);
        {
            let mut list = ImageList::with_store(store);
            let a = list.push(upload("a.png")).expect("a");
            list.push(upload("b.png")).expect("b");
            list.remove(a);
        }
        let mut released = log.borrow().clone();
        released.sort_unstable();
        assert_eq!(released, vec![1, 2]);
    }

    #[test]
    fn unknown_handle_release_is_ignored() {
        let mut store = InMemoryPreviewStore::new();
        store.release(PreviewHandle::new(42));
        assert_eq!(store.released_count(), 0);
    }
}
