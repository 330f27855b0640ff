use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tracing::{debug, warn};
use uuid::Uuid;

use super::StagedFile;

/// Session-local reference used to render a staged file before upload.
///
/// A handle has exactly one owner and is consumed when released, so it can
/// neither be released twice nor read afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct PreviewHandle {
    url: String,
}

impl PreviewHandle {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Source of preview handles for staged files
pub trait PreviewProvider: Send + Sync {
    /// Allocate a handle for a newly staged file
    fn create(&self, file: &StagedFile) -> PreviewHandle;

    /// Release a handle previously returned by [`PreviewProvider::create`]
    fn revoke(&self, handle: PreviewHandle);
}

/// Allocation counters of a [`LocalPreviewProvider`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewStats {
    pub created: usize,
    pub revoked: usize,
    pub live: usize,
}

/// In-process provider issuing `blob:nest/<uuid>` handles
#[derive(Debug, Default)]
pub struct LocalPreviewProvider {
    live: Mutex<HashMap<String, String>>,
    created: AtomicUsize,
    revoked: AtomicUsize,
}

impl LocalPreviewProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> PreviewStats {
        PreviewStats {
            created: self.created.load(Ordering::SeqCst),
            revoked: self.revoked.load(Ordering::SeqCst),
            live: self.live_map().len(),
        }
    }

    /// Whether a handle URL is still outstanding
    pub fn is_live(&self, url: &str) -> bool {
        self.live_map().contains_key(url)
    }

    fn live_map(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds valid entries.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl PreviewProvider for LocalPreviewProvider {
    fn create(&self, file: &StagedFile) -> PreviewHandle {
        let url = format!("blob:nest/{}", Uuid::new_v4());
        self.live_map().insert(url.clone(), file.file_name.clone());
        self.created.fetch_add(1, Ordering::SeqCst);
        debug!("Created preview {} for {}", url, file.file_name);
        PreviewHandle::new(url)
    }

    fn revoke(&self, handle: PreviewHandle) {
        match self.live_map().remove(handle.url()) {
            Some(name) => {
                self.revoked.fetch_add(1, Ordering::SeqCst);
                debug!("Revoked preview {} for {}", handle.url(), name);
            }
            None => warn!("Preview {} was not issued by this provider", handle.url()),
        }
    }
}
