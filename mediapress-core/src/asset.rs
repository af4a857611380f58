//! Asset descriptors: the logical identity of a file eligible for conversion.

use crate::formats::MediaKind;
use crate::vault::VaultHandle;
use std::path::{Path, PathBuf};

/// A file's logical identity: stem, extension, media kind and its location
/// inside and outside the store, plus the handle it was discovered through.
///
/// Immutable once constructed. Working variants (the staged temp copy, the
/// output file) are produced by [`with_name`](Self::with_name) /
/// [`with_extension`](Self::with_extension), which clone with overrides and
/// keep the original handle as the back-reference to the store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDescriptor {
    name: String,
    extension: String,
    kind: MediaKind,
    rel_dir: PathBuf,
    abs_dir: PathBuf,
    handle: VaultHandle,
}

impl AssetDescriptor {
    /// Builds a descriptor from a store handle at discovery time.
    pub fn from_handle(handle: &VaultHandle, kind: MediaKind) -> Self {
        let rel_dir = handle
            .rel_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let abs_dir = handle
            .abs_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            name: handle.stem(),
            extension: handle.extension(),
            kind,
            rel_dir,
            abs_dir,
            handle: handle.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// The store handle this descriptor was discovered through. Clones keep
    /// pointing at the original entry.
    pub fn handle(&self) -> &VaultHandle {
        &self.handle
    }

    /// File name with extension.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.extension)
    }

    /// Store-relative path with extension.
    pub fn rel_path(&self) -> PathBuf {
        self.rel_dir.join(self.file_name())
    }

    /// Absolute path with extension.
    pub fn abs_path(&self) -> PathBuf {
        self.abs_dir.join(self.file_name())
    }

    /// Clone with a different stem.
    pub fn with_name(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    /// Clone with a different extension.
    pub fn with_extension(&self, extension: &str) -> Self {
        Self {
            extension: extension.to_string(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> VaultHandle {
        VaultHandle::new(
            PathBuf::from("notes/media/photo.PNG"),
            PathBuf::from("/vault/notes/media/photo.PNG"),
        )
    }

    #[test]
    fn descriptor_normalizes_and_derives_paths() {
        let asset = AssetDescriptor::from_handle(&handle(), MediaKind::Image);
        assert_eq!(asset.name(), "photo");
        assert_eq!(asset.extension(), "png");
        assert_eq!(asset.file_name(), "photo.png");
        assert_eq!(asset.rel_path(), PathBuf::from("notes/media/photo.png"));
        assert_eq!(
            asset.abs_path(),
            PathBuf::from("/vault/notes/media/photo.png")
        );
    }

    #[test]
    fn clones_override_without_mutating() {
        let asset = AssetDescriptor::from_handle(&handle(), MediaKind::Image);
        let tmp = asset.with_name("photo_png_aB3dK9").with_extension("tmp");

        assert_eq!(tmp.file_name(), "photo_png_aB3dK9.tmp");
        assert_eq!(tmp.rel_path(), PathBuf::from("notes/media/photo_png_aB3dK9.tmp"));
        // Original untouched, handle shared
        assert_eq!(asset.file_name(), "photo.png");
        assert_eq!(tmp.handle(), asset.handle());
    }
}
