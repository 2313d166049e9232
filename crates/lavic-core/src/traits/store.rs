// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-addressed artifact store.
//!
//! Every generated artifact has a deterministic location derived from its
//! key. If the store already holds the key, producing it again is skipped.

use std::future::Future;
use std::path::PathBuf;

use tracing::debug;

use crate::error::LavicError;

/// A store mapping artifact keys to deterministic file locations.
pub trait KeyedStore: Send + Sync {
    /// Location an artifact with this key lives at (whether or not it exists).
    fn target(&self, key: &str) -> PathBuf;

    /// True when the artifact for `key` is already present.
    fn contains(&self, key: &str) -> bool;

    /// Notes that `key` was produced. Stores that derive presence from the
    /// filesystem need not do anything.
    fn record(&self, _key: &str) {}
}

/// Returns the stored artifact for `key`, or runs `compute` to produce it.
///
/// `compute` receives the target location and yields the produced path, or
/// `None` when nothing could be produced. A `None` is not cached, so the next
/// call will try again.
pub async fn get_or_compute<S, F, Fut>(
    store: &S,
    key: &str,
    compute: F,
) -> Result<Option<PathBuf>, LavicError>
where
    S: KeyedStore + ?Sized,
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = Result<Option<PathBuf>, LavicError>>,
{
    let target = store.target(key);
    if store.contains(key) {
        debug!(key, path = %target.display(), "artifact already present");
        return Ok(Some(target));
    }

    let produced = compute(target).await?;
    if produced.is_some() {
        store.record(key);
    }
    Ok(produced)
}
