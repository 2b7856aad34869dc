use super::{HostError, HostResult};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Document store addressed by vault-relative paths.
pub trait Vault {
    fn exists(&self, path: &str) -> bool;
    fn read(&self, path: &str) -> HostResult<String>;
    /// Creates a new document; never overwrites.
    fn create(&mut self, path: &str, contents: &str) -> HostResult<()>;
}

/// In-memory vault.
#[derive(Debug, Clone, Default)]
pub struct MemoryVault {
    files: BTreeMap<String, String>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}

impl Vault for MemoryVault {
    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read(&self, path: &str) -> HostResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_string()))
    }

    fn create(&mut self, path: &str, contents: &str) -> HostResult<()> {
        if self.files.contains_key(path) {
            return Err(HostError::AlreadyExists(path.to_string()));
        }
        self.files.insert(path.to_string(), contents.to_string());
        Ok(())
    }
}

/// Vault rooted at a filesystem directory.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a vault path onto the filesystem, rejecting escapes.
    pub fn resolve(&self, path: &str) -> HostResult<PathBuf> {
        let relative = Path::new(path);
        let well_formed = !path.trim().is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        if !well_formed {
            return Err(HostError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl Vault for FsVault {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path)
            .map(|resolved| resolved.exists())
            .unwrap_or(false)
    }

    fn read(&self, path: &str) -> HostResult<String> {
        let resolved = self.resolve(path)?;
        std::fs::read_to_string(&resolved).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                HostError::NotFound(path.to_string())
            } else {
                HostError::Io {
                    path: resolved.clone(),
                    source,
                }
            }
        })
    }

    fn create(&mut self, path: &str, contents: &str) -> HostResult<()> {
        let resolved = self.resolve(path)?;
        if let Some(parent) = resolved.parent() {
            std::fs::create_dir_all(parent).map_err(|source| HostError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&resolved)
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::AlreadyExists {
                    HostError::AlreadyExists(path.to_string())
                } else {
                    HostError::Io {
                        path: resolved.clone(),
                        source,
                    }
                }
            })?;
        file.write_all(contents.as_bytes())
            .map_err(|source| HostError::Io {
                path: resolved.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::{FsVault, MemoryVault, Vault};
    use crate::host::HostError;

    #[test]
    fn fs_vault_rejects_escaping_paths() {
        let vault = FsVault::new("/tmp/vault");
        assert!(matches!(
            vault.resolve("../secret.hrplan"),
            Err(HostError::InvalidPath(_))
        ));
        assert!(matches!(vault.resolve("/etc/passwd"), Err(HostError::InvalidPath(_))));
        assert!(matches!(vault.resolve(""), Err(HostError::InvalidPath(_))));
        assert!(vault.resolve("plans/a.hrplan").is_ok());
    }

    #[test]
    fn fs_vault_create_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut vault = FsVault::new(dir.path());
        vault.create("a.hrplan", "first").unwrap();
        let err = vault.create("a.hrplan", "second").unwrap_err();
        assert!(matches!(err, HostError::AlreadyExists(_)));
        assert_eq!(vault.read("a.hrplan").unwrap(), "first");
        assert!(matches!(vault.read("b.hrplan"), Err(HostError::NotFound(_))));
    }

    #[test]
    fn memory_vault_tracks_files() {
        let mut vault = MemoryVault::new().with_file("x.hrplan", "x");
        assert!(vault.exists("x.hrplan"));
        assert!(vault.create("x.hrplan", "y").is_err());
        vault.create("y.hrplan", "y").unwrap();
        assert_eq!(vault.paths(), vec!["x.hrplan", "y.hrplan"]);
    }
}
