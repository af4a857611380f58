//! Document-store abstraction.
//!
//! The pipeline only ever talks to the store through the [`Vault`] trait:
//! enumerate files, copy, rename, remove, existence checks, and resolution of
//! store-relative paths to absolute filesystem paths. [`FsVault`] is the
//! plain-directory implementation. Each primitive is assumed atomic at
//! single-call granularity; the pipeline provides no locking beyond strict
//! sequencing.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Handle to a file tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHandle {
    rel_path: PathBuf,
    abs_path: PathBuf,
}

impl VaultHandle {
    pub fn new(rel_path: PathBuf, abs_path: PathBuf) -> Self {
        Self { rel_path, abs_path }
    }

    /// Store-relative path of the file.
    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    /// Absolute filesystem path of the file.
    pub fn abs_path(&self) -> &Path {
        &self.abs_path
    }

    /// File name without extension.
    pub fn stem(&self) -> String {
        self.rel_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Lowercased extension without the dot; empty when there is none.
    pub fn extension(&self) -> String {
        self.rel_path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// Store operations the pipeline depends on.
pub trait Vault {
    /// Enumerates every file in the store, in the store's native order.
    fn files(&self) -> CoreResult<Vec<VaultHandle>>;

    /// Copies a file to a store-relative destination path.
    fn copy(&self, handle: &VaultHandle, dest: &Path) -> CoreResult<()>;

    /// Renames (moves) a file to a store-relative destination path.
    fn rename(&self, handle: &VaultHandle, dest: &Path) -> CoreResult<()>;

    /// Removes the file at a store-relative path.
    fn remove(&self, path: &Path) -> CoreResult<()>;

    /// True when a file exists at the store-relative path.
    fn exists(&self, path: &Path) -> bool;

    /// Resolves a store-relative path to an absolute filesystem path.
    fn absolute(&self, path: &Path) -> PathBuf;
}

/// Store implementation over a plain directory tree.
#[derive(Debug, Clone)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Opens a vault rooted at an existing directory.
    pub fn open(root: &Path) -> CoreResult<Self> {
        let root = root
            .canonicalize()
            .map_err(|e| CoreError::PathError(format!("{}: {e}", root.display())))?;
        if !root.is_dir() {
            return Err(CoreError::PathError(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Vault for FsVault {
    fn files(&self) -> CoreResult<Vec<VaultHandle>> {
        let mut handles = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| CoreError::Vault(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let abs_path = entry.path().to_path_buf();
            let rel_path = abs_path
                .strip_prefix(&self.root)
                .map_err(|e| CoreError::Vault(e.to_string()))?
                .to_path_buf();
            handles.push(VaultHandle::new(rel_path, abs_path));
        }
        Ok(handles)
    }

    fn copy(&self, handle: &VaultHandle, dest: &Path) -> CoreResult<()> {
        std::fs::copy(handle.abs_path(), self.absolute(dest))?;
        Ok(())
    }

    fn rename(&self, handle: &VaultHandle, dest: &Path) -> CoreResult<()> {
        std::fs::rename(handle.abs_path(), self.absolute(dest))?;
        Ok(())
    }

    fn remove(&self, path: &Path) -> CoreResult<()> {
        std::fs::remove_file(self.absolute(path))?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.absolute(path).exists()
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn enumeration_is_recursive_and_relative() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("notes/media")).unwrap();
        fs::write(dir.path().join("a.png"), b"x").unwrap();
        fs::write(dir.path().join("notes/media/b.mp3"), b"x").unwrap();

        let vault = FsVault::open(dir.path()).unwrap();
        let files = vault.files().unwrap();
        let rel: Vec<_> = files.iter().map(|h| h.rel_path().to_path_buf()).collect();
        assert_eq!(
            rel,
            vec![PathBuf::from("a.png"), PathBuf::from("notes/media/b.mp3")]
        );
        assert_eq!(files[1].stem(), "b");
        assert_eq!(files[1].extension(), "mp3");
    }

    #[test]
    fn copy_rename_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"payload").unwrap();
        let vault = FsVault::open(dir.path()).unwrap();

        let handle = vault.files().unwrap().remove(0);
        vault.copy(&handle, Path::new("a_copy.png")).unwrap();
        assert!(vault.exists(Path::new("a_copy.png")));
        assert!(vault.exists(Path::new("a.png")));

        vault.rename(&handle, Path::new("b.png")).unwrap();
        assert!(!vault.exists(Path::new("a.png")));
        assert!(vault.exists(Path::new("b.png")));

        vault.remove(Path::new("b.png")).unwrap();
        assert!(!vault.exists(Path::new("b.png")));
    }
}
