// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints serde attributes cannot express. All failures
//! are collected rather than stopping at the first.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::LavicConfig;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &LavicConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    for (name, url) in [
        ("rodin.base_url", &config.rodin.base_url),
        ("image_search.base_url", &config.image_search.base_url),
        ("simulation.base_url", &config.simulation.base_url),
    ] {
        let url = url.trim();
        if url.is_empty() {
            fail(format!("{name} must not be empty"));
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            fail(format!("{name} `{url}` must start with http:// or https://"));
        }
    }

    if let Some(proxy) = &config.network.proxy {
        if proxy.trim().is_empty() {
            fail("network.proxy must not be empty when set".to_string());
        }
    }

    if config.rodin.poll_interval_secs == 0 {
        fail("rodin.poll_interval_secs must be at least 1".to_string());
    }
    if config.rodin.max_poll_attempts == 0 {
        fail("rodin.max_poll_attempts must be at least 1".to_string());
    }
    if config.image_search.timeout_secs == 0 {
        fail("image_search.timeout_secs must be at least 1".to_string());
    }
    if config.simulation.page_batch_size == 0 {
        fail("simulation.page_batch_size must be at least 1".to_string());
    }

    for (name, value) in [
        ("packager.models_dir", &config.packager.models_dir),
        ("packager.downloads_dir", &config.packager.downloads_dir),
        ("packager.template_path", &config.packager.template_path),
        ("simulation.user_id", &config.simulation.user_id),
    ] {
        if value.trim().is_empty() {
            fail(format!("{name} must not be empty"));
        }
    }

    let mut seen_keys = HashSet::new();
    let mut seen_names = HashSet::new();
    for (i, entry) in config.catalog.iter().enumerate() {
        if entry.key.trim().is_empty() {
            fail(format!("catalog[{i}].key must not be empty"));
        } else if entry.key.contains(['/', '\\']) || entry.key == "." || entry.key == ".." {
            fail(format!(
                "catalog[{i}].key `{}` must be a plain file name",
                entry.key
            ));
        }
        if !seen_keys.insert(entry.key.as_str()) {
            fail(format!("duplicate catalog key `{}`", entry.key));
        }
        if !seen_names.insert(entry.display_name.as_str()) {
            fail(format!(
                "duplicate catalog display_name `{}`",
                entry.display_name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
