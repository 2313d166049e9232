// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Military symbol rendering.
//!
//! Packages carry a map icon in MIL-STD-2525D style. The frame shape and
//! fill come from the SIDC's standard identity and symbol set; the icon is
//! a fixed-wing aircraft with the fighter ("F") modifier.

use std::path::PathBuf;
use std::sync::Arc;

use lavic_core::{KeyedStore, LavicError, SymbolRenderer, get_or_compute};
use resvg::{tiny_skia, usvg};
use tracing::{info, warn};

use crate::store::write_artifact;

/// Friendly / air / fixed wing / fighter.
pub const FIGHTER_SIDC: &str = "10030102011203000000";

/// Padding around the frame, in SVG user units.
const BOUNDING_PADDING: u32 = 4;

/// Standard identity, from SIDC position 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Identity {
    Unknown,
    Friend,
    Neutral,
    Hostile,
}

impl Identity {
    fn from_sidc(sidc: &str) -> Self {
        match sidc.as_bytes().get(3) {
            Some(b'2' | b'3') => Self::Friend,
            Some(b'4') => Self::Neutral,
            Some(b'5' | b'6') => Self::Hostile,
            _ => Self::Unknown,
        }
    }

    /// Light-style fill colors.
    fn fill(self) -> &'static str {
        match self {
            Self::Unknown => "#FFFF80",
            Self::Friend => "#80E0FF",
            Self::Neutral => "#AAFFAA",
            Self::Hostile => "#FF8080",
        }
    }

    /// Frame outline for the air symbol set (open at the bottom edge).
    fn air_frame(self) -> &'static str {
        match self {
            Self::Friend => "M 25,150 C 25,40 175,40 175,150",
            Self::Hostile => "M 45,150 L 45,70 L 100,20 L 155,70 L 155,150",
            Self::Neutral => "M 45,150 L 45,30 L 155,30 L 155,150",
            Self::Unknown => "M 65,150 C 25,150 25,80 65,80 C 65,30 135,30 135,80 C 175,80 175,150 135,150",
        }
    }

    /// Closed frame used for every other symbol set.
    fn ground_frame(self) -> &'static str {
        match self {
            Self::Friend => "M 25,50 L 175,50 L 175,150 L 25,150 Z",
            Self::Hostile => "M 100,28 L 172,100 L 100,172 L 28,100 Z",
            Self::Neutral => "M 45,45 L 155,45 L 155,155 L 45,155 Z",
            Self::Unknown => "M 100,30 C 150,30 170,50 170,100 C 170,150 150,170 100,170 C 50,170 30,150 30,100 C 30,50 50,30 100,30 Z",
        }
    }
}

/// Builds the SVG document for `sidc`.
pub fn symbol_svg(sidc: &str) -> String {
    let identity = Identity::from_sidc(sidc);
    let is_air = sidc.get(4..6) == Some("01");
    let (frame, closing) = if is_air {
        (identity.air_frame(), " Z")
    } else {
        (identity.ground_frame(), "")
    };
    let pad = BOUNDING_PADDING;
    let (x, y, w, h) = (20 - pad, 15 - pad, 160 + 2 * pad, 160 + 2 * pad);

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="{x} {y} {w} {h}">
  <path d="{frame}{closing}" fill="{fill}" stroke="none"/>
  <path d="{frame}" fill="none" stroke="#000000" stroke-width="4"/>
  <path d="M 100,70 L 106,95 L 145,110 L 145,117 L 106,110 L 104,130 L 116,138 L 116,143 L 100,140 L 84,143 L 84,138 L 96,130 L 94,110 L 55,117 L 55,110 L 94,95 Z" fill="#000000"/>
  <path d="M 92,118 L 108,118 L 108,121 L 95,121 L 95,126 L 105,126 L 105,129 L 95,129 L 95,136 L 92,136 Z" fill="{fill}"/>
</svg>"##,
        fill = identity.fill(),
    )
}

/// Renders symbols by rasterizing [`symbol_svg`] with resvg.
#[derive(Debug, Default, Clone, Copy)]
pub struct SvgSymbolRenderer;

impl SymbolRenderer for SvgSymbolRenderer {
    fn render_png(&self, sidc: &str) -> Result<Vec<u8>, LavicError> {
        let svg = symbol_svg(sidc);
        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default())
            .map_err(|e| LavicError::Render(format!("invalid symbol SVG: {e}")))?;
        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| LavicError::Render("symbol has zero size".into()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        pixmap
            .encode_png()
            .map_err(|e| LavicError::Render(format!("PNG encoding failed: {e}")))
    }
}

/// Cached symbol generator.
pub struct SymbolGenerator {
    renderer: Arc<dyn SymbolRenderer>,
    store: Arc<dyn KeyedStore>,
    sidc: String,
}

impl SymbolGenerator {
    pub fn new(renderer: Arc<dyn SymbolRenderer>, store: Arc<dyn KeyedStore>) -> Self {
        Self {
            renderer,
            store,
            sidc: FIGHTER_SIDC.to_string(),
        }
    }

    /// Overrides the symbol identification code.
    pub fn with_sidc(mut self, sidc: impl Into<String>) -> Self {
        self.sidc = sidc.into();
        self
    }

    /// Returns the cached or freshly rendered symbol for `key`.
    pub async fn generate(&self, key: &str) -> Option<PathBuf> {
        info!(key, sidc = %self.sidc, "generating military symbol");
        let result = get_or_compute(self.store.as_ref(), key, |target| async move {
            match self.renderer.render_png(&self.sidc) {
                Ok(png) => {
                    write_artifact(&target, &png).await?;
                    Ok(Some(target))
                }
                Err(e) => {
                    warn!(key, error = %e, "symbol generation failed");
                    Ok(None)
                }
            }
        })
        .await;

        result.unwrap_or_else(|e| {
            warn!(key, error = %e, "could not store rendered symbol");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fighter_symbol_is_friendly_air() {
        let svg = symbol_svg(FIGHTER_SIDC);
        assert!(svg.contains("#80E0FF"));
        assert!(svg.contains("C 25,40 175,40 175,150"));
    }

    #[test]
    fn identity_selects_fill() {
        assert!(symbol_svg("10060100001101000000").contains("#FF8080"));
        assert!(symbol_svg("10040100001101000000").contains("#AAFFAA"));
        assert!(symbol_svg("x").contains("#FFFF80"));
    }

    #[test]
    fn renders_png() {
        let png = SvgSymbolRenderer.render_png(FIGHTER_SIDC).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
