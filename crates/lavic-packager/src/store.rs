// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem-backed [`KeyedStore`].

use std::path::{Path, PathBuf};

use lavic_core::{KeyedStore, LavicError};

/// Stores artifacts as `<dir>/<key><suffix>`. A key is present iff its file exists.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
    suffix: String,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            suffix: suffix.into(),
        }
    }

    /// Thumbnail images: `<key>.png`.
    pub fn images(dir: &Path) -> Self {
        Self::new(dir, ".png")
    }

    /// Rendered military symbols: `<key>_mil.png`.
    pub fn symbols(dir: &Path) -> Self {
        Self::new(dir, "_mil.png")
    }

    /// Generated meshes: `<key>_AI_Rodin.glb`.
    pub fn meshes(dir: &Path) -> Self {
        Self::new(dir, "_AI_Rodin.glb")
    }
}

impl KeyedStore for DiskStore {
    fn target(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}{}", self.suffix))
    }

    fn contains(&self, key: &str) -> bool {
        self.target(key).is_file()
    }
}

/// Writes `bytes` to `target` through a `.part` sibling so an interrupted
/// write never leaves a file that looks cached.
pub async fn write_artifact(target: &Path, bytes: &[u8]) -> Result<(), LavicError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| LavicError::io(parent, e))?;
    }
    let partial = partial_path(target);
    tokio::fs::write(&partial, bytes)
        .await
        .map_err(|e| LavicError::io(&partial, e))?;
    tokio::fs::rename(&partial, target)
        .await
        .map_err(|e| LavicError::io(target, e))
}

/// The in-progress sibling of `target`.
pub fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
