// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the LaViC toolkit.
//!
//! Provides TOML configuration parsing with strict validation (`deny_unknown_fields`),
//! XDG file hierarchy lookup, `LAVIC_*` environment variable overrides, and
//! miette diagnostics with typo suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use lavic_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("simulation API: {}", config.simulation.base_url);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{CatalogEntry, LavicConfig};

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<LavicConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<LavicConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<LavicConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(loaded: Result<LavicConfig, figment::Error>) -> Result<LavicConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    tracing::debug!(catalog = config.catalog.len(), "configuration loaded");
    Ok(config)
}
