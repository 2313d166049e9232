// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fighter asset package builder.
//!
//! Turns spreadsheet rows into importable agent packages: parse the dynamics
//! text, fetch a thumbnail, render the military symbol, generate and
//! normalize a 3D mesh, then render the manifest and zip everything up.

pub mod assemble;
pub mod catalog;
pub mod dynamics;
pub mod fetch;
pub mod generate;
pub mod http;
pub mod manifest;
pub mod mesh;
pub mod pipeline;
pub mod poll;
pub mod rodin;
pub mod sheet;
pub mod store;
pub mod symbol;

pub use assemble::PackageAssembler;
pub use catalog::Catalog;
pub use dynamics::parse_dynamics;
pub use fetch::{AssetFetcher, DuckDuckGoImages};
pub use generate::MeshGenerator;
pub use manifest::{DynamicsDocument, ManifestTemplate, PackageInfo};
pub use mesh::{normalize_file, normalize_glb};
pub use pipeline::{BatchReport, Pipeline};
pub use poll::{PollPolicy, poll_until_terminal};
pub use rodin::RodinClient;
pub use sheet::{SheetColumns, SheetRow, read_rows};
pub use store::DiskStore;
pub use symbol::{SvgSymbolRenderer, SymbolGenerator};
