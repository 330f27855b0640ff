use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use super::{MediaError, MediaKind, PreviewHandle, PreviewProvider, StagedFile};

/// A staged file together with the preview handle it owns
#[derive(Debug)]
pub struct StagedAsset {
    file: StagedFile,
    preview: PreviewHandle,
}

impl StagedAsset {
    pub fn file(&self) -> &StagedFile {
        &self.file
    }

    pub fn preview_url(&self) -> &str {
        self.preview.url()
    }
}

/// Files added locally for upload, per media kind, in the order they were
/// staged. Every staged file owns one preview handle until it is unstaged
/// or the area is released; dropping the area releases whatever is left.
pub struct MediaStagingArea {
    provider: Arc<dyn PreviewProvider>,
    images: Vec<StagedAsset>,
    videos: Vec<StagedAsset>,
}

impl MediaStagingArea {
    pub fn new(provider: Arc<dyn PreviewProvider>) -> Self {
        Self {
            provider,
            images: Vec::new(),
            videos: Vec::new(),
        }
    }

    /// Append files to the list of `kind`, one preview handle each
    pub fn stage<I>(&mut self, kind: MediaKind, files: I)
    where
        I: IntoIterator<Item = StagedFile>,
    {
        let provider = Arc::clone(&self.provider);
        let list = self.list_mut(kind);
        let before = list.len();
        list.extend(files.into_iter().map(|file| {
            let preview = provider.create(&file);
            StagedAsset { file, preview }
        }));
        debug!("Staged {} {:?} file(s)", list.len() - before, kind);
    }

    /// Read a local file and stage it
    pub async fn stage_path(
        &mut self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> Result<(), MediaError> {
        let file = StagedFile::from_path(path).await?;
        if !kind.accepts(&file.content_type) {
            return Err(MediaError::UnexpectedType {
                file_name: file.file_name,
                content_type: file.content_type,
                kind,
            });
        }
        self.stage(kind, [file]);
        Ok(())
    }

    /// Remove one staged file and release its preview right away.
    /// Returns `None` when nothing is staged at `index`.
    pub fn unstage(&mut self, kind: MediaKind, index: usize) -> Option<StagedFile> {
        let list = self.list_mut(kind);
        if index >= list.len() {
            return None;
        }
        let StagedAsset { file, preview } = list.remove(index);
        self.provider.revoke(preview);
        debug!("Unstaged {:?} file {}", kind, file.file_name);
        Some(file)
    }

    /// Release every outstanding preview and forget all staged files
    pub fn release_all(&mut self) {
        let released = self.images.len() + self.videos.len();
        if released == 0 {
            return;
        }
        for asset in self.images.drain(..).chain(self.videos.drain(..)) {
            self.provider.revoke(asset.preview);
        }
        info!("Released {} staged preview(s)", released);
    }

    pub fn staged(&self, kind: MediaKind) -> &[StagedAsset] {
        match kind {
            MediaKind::Image => &self.images,
            MediaKind::Video => &self.videos,
        }
    }

    /// Staged files of `kind` in staging order
    pub fn files(&self, kind: MediaKind) -> impl Iterator<Item = &StagedFile> {
        self.staged(kind).iter().map(StagedAsset::file)
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty() && self.videos.is_empty()
    }

    fn list_mut(&mut self, kind: MediaKind) -> &mut Vec<StagedAsset> {
        match kind {
            MediaKind::Image => &mut self.images,
            MediaKind::Video => &mut self.videos,
        }
    }
}

impl fmt::Debug for MediaStagingArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaStagingArea")
            .field("images", &self.images)
            .field("videos", &self.videos)
            .finish_non_exhaustive()
    }
}

impl Drop for MediaStagingArea {
    fn drop(&mut self) {
        self.release_all();
    }
}
