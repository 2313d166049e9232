// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Hyper3D Rodin generation API.
//!
//! Provides [`RodinClient`], the production [`JobProvider`]: multipart job
//! submission, sub-job status polling, file listing, and streamed downloads.

use std::path::Path;

use async_trait::async_trait;
use futures::StreamExt;
use lavic_config::model::RodinConfig;
use lavic_core::{JobFile, JobHandle, JobProvider, LavicError, SubJobStatus, SubmitRequest};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::http::build_client;
use crate::store::partial_path;

/// Response to a job submission. The subscription key has shipped both
/// nested under `jobs` and at the top level.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    uuid: Option<String>,
    subscription_key: Option<String>,
    jobs: Option<SubmitJobs>,
}

#[derive(Debug, Deserialize)]
struct SubmitJobs {
    subscription_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    jobs: Vec<StatusJob>,
}

#[derive(Debug, Deserialize)]
struct StatusJob {
    status: String,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    #[serde(default)]
    list: Vec<JobFile>,
}

/// Rodin API client.
#[derive(Debug, Clone)]
pub struct RodinClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl RodinClient {
    /// Creates a client from config. Fails when no API key is configured.
    pub fn new(config: &RodinConfig, proxy: Option<&str>) -> Result<Self, LavicError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LavicError::Config("rodin.api_key is not set".into()))?;
        let client = build_client(&config.user_agent, None, proxy)?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url)
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        name: &str,
        body: &serde_json::Value,
    ) -> Result<T, LavicError> {
        let response = self
            .client
            .post(self.endpoint(name))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| LavicError::transport(format!("rodin {name} request failed"), e))?;
        parse_response(name, response).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    name: &str,
    response: reqwest::Response,
) -> Result<T, LavicError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| LavicError::transport(format!("failed to read rodin {name} body"), e))?;
    debug!(endpoint = name, status = %status, "rodin response received");

    if !status.is_success() {
        return Err(LavicError::Remote {
            message: format!("rodin {name} failed: {body}"),
            status: status.as_u16(),
        });
    }
    serde_json::from_str(&body)
        .map_err(|e| LavicError::MalformedResponse(format!("rodin {name} response: {e}")))
}

#[async_trait]
impl JobProvider for RodinClient {
    async fn submit(&self, request: &SubmitRequest) -> Result<JobHandle, LavicError> {
        let mut form = Form::new();
        if let Some(image) = &request.image {
            let part = Part::bytes(image.clone())
                .file_name("0000.png")
                .mime_str("image/png")
                .map_err(|e| LavicError::Config(format!("invalid image part: {e}")))?;
            form = form.part("images", part);
        }
        let form = form
            .text("tier", request.tier.clone())
            .text("mesh_mode", request.mesh_mode.clone())
            .text("prompt", request.prompt.clone());

        let response = self
            .client
            .post(self.endpoint("rodin"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LavicError::transport("rodin submit request failed", e))?;
        let submitted: SubmitResponse = parse_response("rodin", response).await?;

        let uuid = submitted
            .uuid
            .ok_or_else(|| LavicError::MalformedResponse("submit response has no uuid".into()))?;
        let subscription_key = submitted
            .jobs
            .and_then(|j| j.subscription_key)
            .or(submitted.subscription_key)
            .ok_or_else(|| {
                LavicError::MalformedResponse("submit response has no subscription_key".into())
            })?;
        Ok(JobHandle {
            uuid,
            subscription_key,
        })
    }

    async fn poll(&self, handle: &JobHandle) -> Result<Vec<SubJobStatus>, LavicError> {
        let status: StatusResponse = self
            .post_json(
                "status",
                &serde_json::json!({ "subscription_key": handle.subscription_key }),
            )
            .await?;
        Ok(status
            .jobs
            .iter()
            .map(|j| SubJobStatus::from(j.status.as_str()))
            .collect())
    }

    async fn files(&self, handle: &JobHandle) -> Result<Vec<JobFile>, LavicError> {
        let listing: DownloadResponse = self
            .post_json("download", &serde_json::json!({ "task_uuid": handle.uuid }))
            .await?;
        Ok(listing.list)
    }

    async fn download(&self, file: &JobFile, dest: &Path) -> Result<(), LavicError> {
        let response = self
            .client
            .get(&file.url)
            .send()
            .await
            .map_err(|e| LavicError::transport("mesh download request failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(LavicError::Remote {
                message: format!("mesh download of {} failed", file.name),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LavicError::io(parent, e))?;
        }
        let partial = partial_path(dest);
        let mut out = tokio::fs::File::create(&partial)
            .await
            .map_err(|e| LavicError::io(&partial, e))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LavicError::transport("mesh download interrupted", e))?;
            out.write_all(&chunk)
                .await
                .map_err(|e| LavicError::io(&partial, e))?;
        }
        out.flush().await.map_err(|e| LavicError::io(&partial, e))?;
        drop(out);
        tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| LavicError::io(dest, e))
    }
}
