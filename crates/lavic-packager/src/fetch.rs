// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thumbnail image fetching.
//!
//! [`DuckDuckGoImages`] scrapes the first result thumbnail from the HTML
//! search page. [`AssetFetcher`] wraps any [`ImageSource`] with the on-disk
//! cache and turns every failure into "no image".

use std::path::PathBuf;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use lavic_config::model::ImageSearchConfig;
use lavic_core::{ImageSource, KeyedStore, LavicError, get_or_compute};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::http::build_client;
use crate::store::write_artifact;

/// CSS class of result thumbnails on the HTML search page.
const RESULT_IMAGE_CLASS: &str = "tile--img__img";

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<img\b[^>]*>").expect("valid img tag pattern")
});
static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\sclass\s*=\s*["']([^"']*)["']"#).expect("valid class pattern")
});
static SRC_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bsrc\s*=\s*["']([^"']+)["']"#).expect("valid src pattern")
});

/// Image search backed by the DuckDuckGo HTML endpoint.
#[derive(Debug, Clone)]
pub struct DuckDuckGoImages {
    client: reqwest::Client,
    search_url: String,
}

impl DuckDuckGoImages {
    /// Creates a source from config, routed through `proxy` when given.
    pub fn new(config: &ImageSearchConfig, proxy: Option<&str>) -> Result<Self, LavicError> {
        let client = build_client(
            &config.user_agent,
            Some(Duration::from_secs(config.timeout_secs)),
            proxy,
        )?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    /// Creates a source from an existing client and search endpoint.
    pub fn with_client(client: reqwest::Client, search_url: String) -> Self {
        Self { client, search_url }
    }

    async fn get_bytes(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, LavicError> {
        let response = request
            .send()
            .await
            .map_err(|e| LavicError::transport("image search request failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LavicError::Remote {
                message: format!("image search returned {status}"),
                status: status.as_u16(),
            });
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| LavicError::transport("failed to read image search body", e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageSource for DuckDuckGoImages {
    async fn find_image(&self, search_term: &str) -> Result<Option<Vec<u8>>, LavicError> {
        let page = self
            .get_bytes(self.client.get(&self.search_url).query(&[("q", search_term)]))
            .await?;
        let html = String::from_utf8_lossy(&page);

        let Some(url) = first_result_image(&html) else {
            debug!(search_term, "search page had no result thumbnails");
            return Ok(None);
        };

        info!(url = %url, "downloading result thumbnail");
        let image = self.get_bytes(self.client.get(&url)).await?;
        Ok((!image.is_empty()).then_some(image))
    }
}

/// Returns the absolute URL of the first result thumbnail in a search page.
pub fn first_result_image(html: &str) -> Option<String> {
    IMG_TAG
        .find_iter(html)
        .map(|tag| tag.as_str())
        .filter(|tag| has_result_class(tag))
        .find_map(|tag| SRC_ATTR.captures(tag))
        .and_then(|c| c.get(1))
        .map(|src| absolutize(&src.as_str().replace("&amp;", "&")))
}

fn has_result_class(tag: &str) -> bool {
    CLASS_ATTR
        .captures(tag)
        .and_then(|c| c.get(1))
        .is_some_and(|classes| {
            classes
                .as_str()
                .split_whitespace()
                .any(|class| class == RESULT_IMAGE_CLASS)
        })
}

fn absolutize(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        src.to_string()
    }
}

/// Cached thumbnail fetcher. A miss on the cache and on the network is `None`, never an error.
pub struct AssetFetcher {
    source: Arc<dyn ImageSource>,
    store: Arc<dyn KeyedStore>,
}

impl AssetFetcher {
    pub fn new(source: Arc<dyn ImageSource>, store: Arc<dyn KeyedStore>) -> Self {
        Self { source, store }
    }

    /// Returns the cached or freshly fetched image for `key`.
    pub async fn fetch_image(&self, key: &str, search_term: &str) -> Option<PathBuf> {
        info!(key, search_term, "fetching thumbnail image");
        let result = get_or_compute(self.store.as_ref(), key, |target| async move {
            match self.source.find_image(search_term).await {
                Ok(Some(bytes)) => {
                    write_artifact(&target, &bytes).await?;
                    Ok(Some(target))
                }
                Ok(None) => {
                    info!(key, "no image found");
                    Ok(None)
                }
                Err(e) => {
                    warn!(key, error = %e, "image search failed");
                    Ok(None)
                }
            }
        })
        .await;

        result.unwrap_or_else(|e| {
            warn!(key, error = %e, "could not store fetched image");
            None
        })
    }
}
