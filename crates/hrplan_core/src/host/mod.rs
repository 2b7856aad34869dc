//! Host collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the document-view and vault seams the core talks to.
//! - Provide in-memory implementations for tests/embedding and filesystem
//!   implementations for command-line hosts.
//!
//! # Invariants
//! - Persist requests are fire-and-forget; failures are logged, not returned.
//! - Vault paths are relative and never escape the vault root.

mod document_view;
mod vault;

pub use document_view::{DocumentView, FileDocumentView, MemoryDocumentView};
pub use vault::{FsVault, MemoryVault, Vault};

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type HostResult<T> = Result<T, HostError>;

/// Host storage error.
#[derive(Debug)]
pub enum HostError {
    /// Path is empty, absolute or climbs out of the vault root.
    InvalidPath(String),
    /// Target does not exist.
    NotFound(String),
    /// Create was asked to overwrite an existing document.
    AlreadyExists(String),
    /// Underlying filesystem failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for HostError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPath(path) => write!(f, "invalid vault path: `{path}`"),
            Self::NotFound(path) => write!(f, "document not found: `{path}`"),
            Self::AlreadyExists(path) => write!(f, "document already exists: `{path}`"),
            Self::Io { path, source } => write!(f, "I/O error at `{}`: {source}", path.display()),
        }
    }
}

impl Error for HostError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
