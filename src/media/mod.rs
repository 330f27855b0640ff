pub mod preview;
pub mod staging;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use preview::{LocalPreviewProvider, PreviewHandle, PreviewProvider, PreviewStats};
pub use staging::{MediaStagingArea, StagedAsset};

/// Media list a staged file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Repeated multipart key for this kind
    pub fn key(self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Whether a MIME type is acceptable for this kind
    pub fn accepts(self, content_type: &str) -> bool {
        match self {
            MediaKind::Image => content_type.starts_with("image/"),
            MediaKind::Video => content_type.starts_with("video/"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} has no usable file name")]
    MissingFileName { path: PathBuf },

    #[error("{file_name} is {content_type}, not a valid {kind:?} file")]
    UnexpectedType {
        file_name: String,
        content_type: String,
        kind: MediaKind,
    },
}

/// A locally selected file not yet sent to the Listing Service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

impl StagedFile {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }

    /// Read a file from disk, guessing its content type from the extension
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, MediaError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MediaError::MissingFileName {
                path: path.to_path_buf(),
            })?
            .to_string();

        let bytes = tokio::fs::read(path).await.map_err(|source| MediaError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            bytes,
            file_name,
            content_type,
        })
    }
}
