// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared reqwest client construction for the package builder's remote services.

use std::time::Duration;

use lavic_core::LavicError;

/// Builds a client with the given User-Agent, optional timeout, and optional proxy.
///
/// The proxy applies to this client only; process environment is left alone.
pub fn build_client(
    user_agent: &str,
    timeout: Option<Duration>,
    proxy: Option<&str>,
) -> Result<reqwest::Client, LavicError> {
    let mut builder = reqwest::Client::builder().user_agent(user_agent);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|e| LavicError::Config(format!("invalid proxy URL `{proxy}`: {e}")))?;
        builder = builder.proxy(proxy);
    }
    builder
        .build()
        .map_err(|e| LavicError::Config(format!("failed to build HTTP client: {e}")))
}
