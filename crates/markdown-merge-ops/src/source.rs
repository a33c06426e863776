//! Reading source documents from the source root.

use std::fs;
use std::io;
use std::path::Path;

use crate::summary::SourceIssueKind;

/// Decoded contents of one source document, before link normalisation.
#[derive(Clone, Debug)]
pub struct SourceDocument {
    pub path: String,
    pub content: String,
}

/// Per-source failure. Never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("missing source: {path}")]
    Missing { path: String },
    #[error("failed to read {path}: {source}")]
    Unreadable { path: String, source: io::Error },
}

impl SourceError {
    pub fn path(&self) -> &str {
        match self {
            SourceError::Missing { path } | SourceError::Unreadable { path, .. } => path,
        }
    }

    /// Underlying error text for unreadable sources.
    pub fn reason(&self) -> Option<String> {
        match self {
            SourceError::Missing { .. } => None,
            SourceError::Unreadable { source, .. } => Some(source.to_string()),
        }
    }

    pub fn kind(&self) -> SourceIssueKind {
        match self {
            SourceError::Missing { .. } => SourceIssueKind::Missing,
            SourceError::Unreadable { .. } => SourceIssueKind::Unreadable,
        }
    }
}

/// Load `relative` from `root` as UTF-8 text.
///
/// A path that does not exist yields [`SourceError::Missing`]; anything that
/// exists but cannot be read or decoded (directories, invalid UTF-8, permission
/// errors) yields [`SourceError::Unreadable`].
pub fn read_source(root: &Path, relative: &str) -> Result<SourceDocument, SourceError> {
    let absolute = root.join(relative);
    if !absolute.exists() {
        return Err(SourceError::Missing {
            path: relative.to_owned(),
        });
    }

    match fs::read_to_string(&absolute) {
        Ok(content) => Ok(SourceDocument {
            path: relative.to_owned(),
            content,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(SourceError::Missing {
            path: relative.to_owned(),
        }),
        Err(source) => Err(SourceError::Unreadable {
            path: relative.to_owned(),
            source,
        }),
    }
}
