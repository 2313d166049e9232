// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Package directory and zip archive assembly.
//!
//! Layout under the models directory:
//!
//! ```text
//! <key>/agent.json
//! <key>/<key>/<key>.png
//! <key>/<key>/<key>_mil.png
//! <key>/<key>/<key>_AI_Rodin.glb
//! <key>.zip
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use lavic_core::{AssetBundle, LavicError};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::manifest::{ManifestTemplate, PackageInfo};

/// Builds packages from a template into a models directory.
#[derive(Debug, Clone)]
pub struct PackageAssembler {
    models_dir: PathBuf,
    template: ManifestTemplate,
}

impl PackageAssembler {
    pub fn new(models_dir: impl Into<PathBuf>, template: ManifestTemplate) -> Self {
        Self {
            models_dir: models_dir.into(),
            template,
        }
    }

    /// Path of the archive for `key`.
    pub fn archive_path(&self, key: &str) -> PathBuf {
        self.models_dir.join(format!("{key}.zip"))
    }

    /// Writes the package directory and archive, returning the archive path.
    ///
    /// Absent assets are skipped. Partial output is left on disk on failure.
    pub fn assemble(&self, info: &PackageInfo, bundle: &AssetBundle) -> Result<PathBuf, LavicError> {
        info!(key = %info.key, "creating package");
        let key = info.key.as_str();
        let package_dir = self.models_dir.join(key);
        let asset_dir = package_dir.join(key);
        std::fs::create_dir_all(&asset_dir).map_err(|e| LavicError::io(&asset_dir, e))?;

        let copies = [
            (&bundle.thumbnail, format!("{key}.png")),
            (&bundle.symbol, format!("{key}_mil.png")),
            (&bundle.mesh, format!("{key}_AI_Rodin.glb")),
        ];
        for (source, name) in copies {
            if let Some(source) = source {
                let dest = asset_dir.join(&name);
                std::fs::copy(source, &dest).map_err(|e| LavicError::io(source, e))?;
                debug!(from = %source.display(), to = %dest.display(), "asset copied");
            }
        }

        let agent = self.template.render(info)?;
        let manifest_path = package_dir.join("agent.json");
        let manifest = manifest_bytes(&agent)?;
        std::fs::write(&manifest_path, &manifest).map_err(|e| LavicError::io(&manifest_path, e))?;

        let archive = self.archive_path(key);
        write_archive(&archive, &manifest, key, &asset_dir)?;
        info!(key = %info.key, path = %archive.display(), "package created");
        Ok(archive)
    }
}

/// `[agent]` with 4-space indentation, non-ASCII unescaped.
pub fn manifest_bytes(agent: &Value) -> Result<Vec<u8>, LavicError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    [agent]
        .serialize(&mut ser)
        .map_err(|e| LavicError::Archive(format!("failed to encode agent.json: {e}")))?;
    Ok(buf)
}

fn write_archive(
    archive: &Path,
    manifest: &[u8],
    key: &str,
    asset_dir: &Path,
) -> Result<(), LavicError> {
    let zip_err = |e: zip::result::ZipError| LavicError::Archive(format!("{}: {e}", archive.display()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let file = File::create(archive).map_err(|e| LavicError::io(archive, e))?;
    let mut zip = ZipWriter::new(file);

    zip.start_file("agent.json", options).map_err(zip_err)?;
    zip.write_all(manifest).map_err(|e| LavicError::io(archive, e))?;

    let mut entries: Vec<PathBuf> = std::fs::read_dir(asset_dir)
        .map_err(|e| LavicError::io(asset_dir, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    for path in entries {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let mut contents = Vec::new();
        File::open(&path)
            .and_then(|mut f| f.read_to_end(&mut contents))
            .map_err(|e| LavicError::io(&path, e))?;
        zip.start_file(format!("{key}/{name}"), options).map_err(zip_err)?;
        zip.write_all(&contents).map_err(|e| LavicError::io(archive, e))?;
    }

    zip.finish().map_err(zip_err)?;
    Ok(())
}
