use super::{HostError, HostResult};
use log::{error, info};
use std::path::{Path, PathBuf};

/// Open document as seen by the editor.
///
/// The core reads the raw text once per load, replaces it after every edit,
/// then asks the host to persist without waiting for the result.
pub trait DocumentView {
    fn raw_text(&self) -> String;
    fn set_raw_text(&mut self, text: String);
    fn request_persist(&mut self);
}

/// Document view held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocumentView {
    text: String,
    persist_requests: usize,
}

impl MemoryDocumentView {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            persist_requests: 0,
        }
    }

    /// Number of persist requests received so far.
    pub fn persist_requests(&self) -> usize {
        self.persist_requests
    }
}

impl DocumentView for MemoryDocumentView {
    fn raw_text(&self) -> String {
        self.text.clone()
    }

    fn set_raw_text(&mut self, text: String) {
        self.text = text;
    }

    fn request_persist(&mut self) {
        self.persist_requests += 1;
    }
}

/// Document view backed by one file; persisting writes the current text.
#[derive(Debug)]
pub struct FileDocumentView {
    path: PathBuf,
    text: String,
}

impl FileDocumentView {
    /// Loads `path` into a new view.
    ///
    /// # Errors
    /// - `HostError::NotFound` when the file does not exist.
    /// - `HostError::Io` for any other read failure.
    pub fn open(path: impl AsRef<Path>) -> HostResult<Self> {
        let path = path.as_ref().to_path_buf();
        let text = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                HostError::NotFound(path.display().to_string())
            } else {
                HostError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        Ok(Self { path, text })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentView for FileDocumentView {
    fn raw_text(&self) -> String {
        self.text.clone()
    }

    fn set_raw_text(&mut self, text: String) {
        self.text = text;
    }

    fn request_persist(&mut self) {
        match std::fs::write(&self.path, self.text.as_bytes()) {
            Ok(()) => info!(
                "event=document_persist module=host status=ok bytes={}",
                self.text.len()
            ),
            Err(err) => error!(
                "event=document_persist module=host status=error path={} error={}",
                self.path.display(),
                err
            ),
        }
    }
}
