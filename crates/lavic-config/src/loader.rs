// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./lavic.toml` > `~/.config/lavic/lavic.toml` > `/etc/lavic/lavic.toml`
//! with environment variable overrides via `LAVIC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LavicConfig;

/// Sections whose scalar keys can be set from `LAVIC_<SECTION>_<KEY>`.
const ENV_SECTIONS: &[&str] = &[
    "image_search",
    "simulation",
    "packager",
    "network",
    "rodin",
    "log",
];

/// Unprefixed variable names the simulation tool server has always read.
const LEGACY_SIMULATION_KEYS: &[(&str, &str)] = &[
    ("api_base_url", "simulation.base_url"),
    ("user_id", "simulation.user_id"),
    ("api_token", "simulation.api_token"),
];

/// Config files consulted by [`load_config`], lowest precedence first.
pub fn config_file_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/lavic/lavic.toml")];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("lavic/lavic.toml"));
    }
    paths.push(PathBuf::from("lavic.toml"));
    paths
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/lavic/lavic.toml` (system-wide)
/// 3. `~/.config/lavic/lavic.toml` (user XDG config)
/// 4. `./lavic.toml` (local directory)
/// 5. `LAVIC_*` environment variables
pub fn load_config() -> Result<LavicConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<LavicConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LavicConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LavicConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LavicConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for the default lookup, before extraction.
pub fn build_figment() -> Figment {
    config_file_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(LavicConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Maps a lowercased, prefix-stripped env var name to a config key path.
///
/// Section names are matched as whole prefixes so that underscores inside
/// key names survive: `simulation_api_token` -> `simulation.api_token`,
/// `image_search_base_url` -> `image_search.base_url`.
pub fn map_env_key(key: &str) -> String {
    if let Some((_, mapped)) = LEGACY_SIMULATION_KEYS.iter().find(|(k, _)| *k == key) {
        return (*mapped).to_string();
    }
    for section in ENV_SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|r| !r.is_empty())
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

fn env_provider() -> Env {
    Env::prefixed("LAVIC_").map(|key| map_env_key(key.as_str()).into())
}
