// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Batch packaging of spreadsheet rows.
//!
//! Rows are processed one after another. A failing row is logged and
//! recorded in the [`BatchReport`]; the next row still runs.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lavic_config::{CatalogEntry, LavicConfig};
use lavic_core::{AssetBundle, LavicError};
use tracing::{error, info, warn};

use crate::assemble::PackageAssembler;
use crate::catalog::Catalog;
use crate::dynamics::parse_dynamics;
use crate::fetch::{AssetFetcher, DuckDuckGoImages};
use crate::generate::MeshGenerator;
use crate::manifest::{ManifestTemplate, PackageInfo};
use crate::rodin::RodinClient;
use crate::sheet::SheetRow;
use crate::store::DiskStore;
use crate::symbol::{SvgSymbolRenderer, SymbolGenerator};

/// What happened to each row of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// `(key, archive path)` of every package written.
    pub packaged: Vec<(String, PathBuf)>,
    /// Display names not found in the catalog (or filtered out).
    pub skipped: Vec<String>,
    /// `(key, error)` of every row that failed.
    pub failed: Vec<(String, LavicError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The stages a row goes through, wired to concrete collaborators.
pub struct Pipeline {
    catalog: Catalog,
    fetcher: AssetFetcher,
    symbols: SymbolGenerator,
    meshes: MeshGenerator,
    assembler: PackageAssembler,
    only: Option<String>,
}

impl Pipeline {
    pub fn new(
        catalog: Catalog,
        fetcher: AssetFetcher,
        symbols: SymbolGenerator,
        meshes: MeshGenerator,
        assembler: PackageAssembler,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            symbols,
            meshes,
            assembler,
            only: None,
        }
    }

    /// Wires the production services from config.
    pub fn from_config(config: &LavicConfig) -> Result<Self, LavicError> {
        let proxy = config.network.proxy.as_deref();
        let downloads = Path::new(&config.packager.downloads_dir);

        let images = DuckDuckGoImages::new(&config.image_search, proxy)?;
        let fetcher = AssetFetcher::new(Arc::new(images), Arc::new(DiskStore::images(downloads)));
        let symbols = SymbolGenerator::new(
            Arc::new(SvgSymbolRenderer),
            Arc::new(DiskStore::symbols(downloads)),
        );
        let rodin = RodinClient::new(&config.rodin, proxy)?;
        let meshes = MeshGenerator::new(Arc::new(rodin), Arc::new(DiskStore::meshes(downloads)))
            .with_config(&config.rodin);
        let template = ManifestTemplate::load(Path::new(&config.packager.template_path))?;
        let assembler = PackageAssembler::new(&config.packager.models_dir, template);

        Ok(Self::new(
            Catalog::new(config.catalog.clone()),
            fetcher,
            symbols,
            meshes,
            assembler,
        ))
    }

    /// Restricts the batch to the row whose catalog key is `key`.
    pub fn only(mut self, key: impl Into<String>) -> Self {
        self.only = Some(key.into());
        self
    }

    /// Processes every row, isolating failures.
    pub async fn run(&self, rows: &[SheetRow]) -> BatchReport {
        let mut report = BatchReport::default();

        for row in rows {
            let Some(entry) = self.catalog.lookup(&row.display_name) else {
                info!(name = %row.display_name, "skipping unknown model");
                report.skipped.push(row.display_name.clone());
                continue;
            };
            if self.only.as_deref().is_some_and(|only| only != entry.key) {
                report.skipped.push(row.display_name.clone());
                continue;
            }

            info!(key = %entry.key, "processing");
            match self.process(entry, row).await {
                Ok(archive) => report.packaged.push((entry.key.clone(), archive)),
                Err(e) => {
                    error!(key = %entry.key, error = %e, "package failed");
                    report.failed.push((entry.key.clone(), e));
                }
            }
        }

        info!(
            packaged = report.packaged.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "batch finished"
        );
        report
    }

    /// Runs every stage for one catalog row.
    pub async fn process(&self, entry: &CatalogEntry, row: &SheetRow) -> Result<PathBuf, LavicError> {
        let info = PackageInfo::new(
            &entry.key,
            &entry.display_name,
            &row.category,
            parse_dynamics(&row.dynamics_text),
        );
        if info.dynamics.is_empty() {
            warn!(key = %entry.key, "no dynamics parameters recognized");
        }

        let image = self.fetcher.fetch_image(&entry.key, &entry.search_term).await;
        let symbol = self.symbols.generate(&entry.key).await;

        let thumbnail = match (&image, &symbol) {
            (None, Some(symbol)) => {
                info!(key = %entry.key, "using symbol as thumbnail");
                Some(symbol.clone())
            }
            _ => image.clone(),
        };

        let mesh = self
            .meshes
            .generate(&entry.key, &entry.search_term, image.as_deref())
            .await;

        let bundle = AssetBundle {
            thumbnail,
            symbol,
            mesh,
        };
        self.assembler.assemble(&info, &bundle)
    }
}
