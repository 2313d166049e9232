// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated HTTP client for the simulation platform REST API.
//!
//! Every request carries `Authorization: admin-Token=<token>`,
//! `Content-Type: application/json`, and an `X-UserId` header (the per-call
//! override, else the configured default).

use std::time::Duration;

use lavic_config::model::SimulationConfig;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::ApiError;

/// Header naming the acting user.
const USER_ID_HEADER: &str = "X-UserId";

/// HTTP client for simulation platform calls.
#[derive(Debug, Clone)]
pub struct SimClient {
    client: reqwest::Client,
    base_url: String,
    default_user_id: String,
}

impl SimClient {
    /// Builds a client from the `[simulation]` config section.
    pub fn new(config: &SimulationConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("admin-Token={}", config.api_token)).map_err(|e| {
                ApiError {
                    message: format!("invalid API token header value: {e}"),
                    status_code: None,
                    details: None,
                }
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ApiError::transport(&e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            default_user_id: config.user_id.clone(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        user_id: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{endpoint}", self.base_url);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(USER_ID_HEADER, user_id.unwrap_or(&self.default_user_id));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| ApiError::transport(&e))?;
        let status = response.status();
        debug!(%method, endpoint, status = %status, "simulation api response");

        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_response(status, &url, &body))
    }

    /// Sends a request and decodes the body (JSON, SSE, or plain text).
    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
        user_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        let response = self.send(method, endpoint, query, body, user_id).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await.map_err(|e| ApiError::transport(&e))?;
        Ok(decode_body(&content_type, &text))
    }

    pub async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        user_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.call(Method::GET, endpoint, query, None, user_id).await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        body: &Value,
        user_id: Option<&str>,
    ) -> Result<Value, ApiError> {
        self.call(Method::POST, endpoint, &[], Some(body), user_id)
            .await
    }

    /// POSTs and returns the undecoded response body.
    pub async fn post_raw(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        user_id: Option<&str>,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self
            .send(Method::POST, endpoint, query, None, user_id)
            .await?;
        let bytes = response.bytes().await.map_err(|e| ApiError::transport(&e))?;
        Ok(bytes.to_vec())
    }
}

/// Decodes a success body.
///
/// Event streams yield the first `data:` line that parses as JSON. Anything
/// that is not JSON becomes `{"message": text}`, and an empty body `{}`.
pub fn decode_body(content_type: &str, text: &str) -> Value {
    if content_type.contains("text/event-stream") {
        let event = text
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .find_map(|data| serde_json::from_str::<Value>(data.trim()).ok());
        if let Some(event) = event {
            return event;
        }
    }

    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) if text.trim().is_empty() => json!({}),
        Err(_) => json!({ "message": text }),
    }
}
