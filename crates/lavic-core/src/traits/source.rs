// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image and symbol sources.

use async_trait::async_trait;

use crate::error::LavicError;

/// Looks up a representative image for a search phrase.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Returns image bytes, `Ok(None)` when the search produced nothing usable.
    async fn find_image(&self, search_term: &str) -> Result<Option<Vec<u8>>, LavicError>;
}

/// Renders a military symbol identified by its SIDC to PNG bytes.
pub trait SymbolRenderer: Send + Sync {
    fn render_png(&self, sidc: &str) -> Result<Vec<u8>, LavicError>;
}
