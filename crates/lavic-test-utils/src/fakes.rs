// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting image/symbol sources and an in-memory store.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lavic_core::{ImageSource, KeyedStore, LavicError, SymbolRenderer};

/// PNG signature followed by a marker, enough for tests that only copy files.
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// Image source returning a fixed answer and counting lookups.
pub struct CountingImageSource {
    image: Option<Vec<u8>>,
    fail: bool,
    calls: AtomicUsize,
}

impl CountingImageSource {
    /// Always finds [`FAKE_PNG`].
    pub fn found() -> Self {
        Self::with_result(Some(FAKE_PNG.to_vec()))
    }

    /// Never finds anything.
    pub fn empty() -> Self {
        Self::with_result(None)
    }

    /// Every lookup fails with a transport error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::with_result(None)
        }
    }

    pub fn with_result(image: Option<Vec<u8>>) -> Self {
        Self {
            image,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageSource for CountingImageSource {
    async fn find_image(&self, _search_term: &str) -> Result<Option<Vec<u8>>, LavicError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LavicError::Transport {
                message: "simulated network failure".into(),
                source: None,
            });
        }
        Ok(self.image.clone())
    }
}

/// Symbol renderer returning [`FAKE_PNG`] (or failing) and counting renders.
#[derive(Default)]
pub struct CountingSymbolRenderer {
    fail: bool,
    calls: AtomicUsize,
}

impl CountingSymbolRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SymbolRenderer for CountingSymbolRenderer {
    fn render_png(&self, sidc: &str) -> Result<Vec<u8>, LavicError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(LavicError::Render(format!("cannot render {sidc}")));
        }
        Ok(FAKE_PNG.to_vec())
    }
}

/// Keyed store whose presence set lives in memory.
///
/// Targets still point under `root` so callers can write real files there;
/// presence, however, is only what was recorded or seeded.
pub struct MemoryStore {
    root: PathBuf,
    suffix: String,
    present: Mutex<HashSet<String>>,
}

impl MemoryStore {
    pub fn new(root: impl Into<PathBuf>, suffix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix.into(),
            present: Mutex::new(HashSet::new()),
        }
    }

    /// Marks `key` as already present.
    pub fn seed(&self, key: &str) {
        self.record(key);
    }

    pub fn len(&self) -> usize {
        self.present.lock().map(|set| set.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyedStore for MemoryStore {
    fn target(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}{}", self.suffix))
    }

    fn contains(&self, key: &str) -> bool {
        self.present
            .lock()
            .map(|set| set.contains(key))
            .unwrap_or(false)
    }

    fn record(&self, key: &str) {
        if let Ok(mut set) = self.present.lock() {
            set.insert(key.to_string());
        }
    }
}
