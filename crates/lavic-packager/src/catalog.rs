// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Display-name to key/search-term lookup.

use std::collections::HashMap;

use lavic_config::CatalogEntry;

/// Known aircraft, keyed by the display name used in the spreadsheet.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| (e.display_name.clone(), e))
                .collect(),
        }
    }

    pub fn lookup(&self, display_name: &str) -> Option<&CatalogEntry> {
        self.entries.get(display_name.trim())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use lavic_config::LavicConfig;

    use super::*;

    #[test]
    fn default_catalog_covers_four_fighters() {
        let catalog = Catalog::new(LavicConfig::default().catalog);
        assert_eq!(catalog.len(), 4);
        let entry = catalog.lookup(" Su-57威罪战斗机 ").unwrap();
        assert_eq!(entry.key, "Su-57_Felon");
        assert_eq!(catalog.lookup("J-20威龙战斗机").unwrap().key, "J-20_Mighty_Dragon");
        assert!(catalog.lookup("歼-10").is_none());
    }
}
