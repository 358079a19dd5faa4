//! Content error types

use std::path::PathBuf;
use thiserror::Error;

use super::PostId;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Malformed front-matter in {path:?}: {reason}")]
    MalformedFrontMatter { path: PathBuf, reason: String },

    #[error("Post not found: {0}")]
    NotFound(PostId),

    #[error("Duplicate post id {id} from {path:?}")]
    DuplicateId { id: PostId, path: PathBuf },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ContentError::MalformedFrontMatter {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a missing-post lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound(_))
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
