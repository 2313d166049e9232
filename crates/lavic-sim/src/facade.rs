// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Listing, lifecycle control, and record download on the simulation platform.
//!
//! Every operation returns a JSON value or a [`SimError`]; transport and
//! HTTP failures arrive as [`SimError::Api`] and never panic.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use lavic_config::model::SimulationConfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::SimClient;
use crate::error::{ApiError, SimError};

/// Hard ceiling on pages fetched by a single fetch-all.
pub const MAX_PAGES: u32 = 1000;

/// Record statuses that count as running.
fn is_running(status: &Value) -> bool {
    match status {
        Value::String(s) => matches!(s.as_str(), "Running" | "running" | "1"),
        Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    }
}

/// Scenario listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListScenarios {
    pub page: u32,
    pub size: u32,
    pub fetch_all: bool,
    /// `1` for system scenarios, absent for the caller's own.
    pub simulation_tag: Option<String>,
    pub user_id: Option<String>,
}

impl Default for ListScenarios {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            fetch_all: false,
            simulation_tag: None,
            user_id: None,
        }
    }
}

/// Model (agent) listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListModels {
    pub keyword: Option<String>,
    pub page: u32,
    pub size: u32,
    pub fetch_all: bool,
    /// Restrict to model cases (`agentTag=1`).
    pub is_model_case: bool,
    pub user_id: Option<String>,
}

impl Default for ListModels {
    fn default() -> Self {
        Self {
            keyword: None,
            page: 1,
            size: 10,
            fetch_all: false,
            is_model_case: false,
            user_id: None,
        }
    }
}

/// Lifecycle action on a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ControlAction {
    Start,
    Pause,
    Resume,
    Stop,
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        })
    }
}

/// Operations exposed to tools and the CLI.
#[derive(Debug, Clone)]
pub struct SimFacade {
    client: SimClient,
    batch_size: u32,
    data_dir: PathBuf,
}

impl SimFacade {
    pub fn new(client: SimClient, config: &SimulationConfig) -> Self {
        Self {
            client,
            batch_size: config.page_batch_size.max(1),
            data_dir: PathBuf::from(&config.data_dir),
        }
    }

    /// Builds the client and facade from config.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimError> {
        Ok(Self::new(SimClient::new(config)?, config))
    }

    pub async fn list_scenarios(&self, params: &ListScenarios) -> Result<Value, SimError> {
        let mut query = Vec::new();
        if let Some(tag) = params.simulation_tag.as_deref().filter(|t| !t.is_empty()) {
            query.push(("simulationTag", tag.to_string()));
        }
        self.list(
            "/getAllSysOfSysStep",
            query,
            params.page,
            params.size,
            params.fetch_all,
            params.user_id.as_deref(),
        )
        .await
    }

    pub async fn list_models(&self, params: &ListModels) -> Result<Value, SimError> {
        let mut query = Vec::new();
        if let Some(keyword) = params.keyword.as_deref().filter(|k| !k.is_empty()) {
            query.push(("agentKwd", keyword.to_string()));
        }
        if params.is_model_case {
            query.push(("agentTag", "1".to_string()));
        }
        self.list(
            "/getAllAgent",
            query,
            params.page,
            params.size,
            params.fetch_all,
            params.user_id.as_deref(),
        )
        .await
    }

    async fn list(
        &self,
        endpoint: &str,
        filters: Vec<(&'static str, String)>,
        page: u32,
        size: u32,
        fetch_all: bool,
        user_id: Option<&str>,
    ) -> Result<Value, SimError> {
        if fetch_all {
            return self.fetch_all(endpoint, &filters, user_id).await;
        }
        let mut query = vec![("pageNum", page.to_string()), ("pageSize", size.to_string())];
        query.extend(filters);
        Ok(self.client.get(endpoint, &query, user_id).await?)
    }

    /// Walks every page with the batch size and concatenates the content.
    ///
    /// Stops at the first of: a non-200 `code` or failed request, the last
    /// page per `totalPages`, an empty page, or [`MAX_PAGES`]. A short page
    /// only ends the walk when the response carries no usable `totalPages`,
    /// since backends may clamp the page size. A failure on the first page
    /// is returned as the error.
    async fn fetch_all(
        &self,
        endpoint: &str,
        filters: &[(&'static str, String)],
        user_id: Option<&str>,
    ) -> Result<Value, SimError> {
        let mut content: Vec<Value> = Vec::new();

        for page in 1..=MAX_PAGES {
            let mut query = vec![
                ("pageNum", page.to_string()),
                ("pageSize", self.batch_size.to_string()),
            ];
            query.extend(filters.iter().cloned());

            let result = match self.client.get(endpoint, &query, user_id).await {
                Ok(result) => result,
                Err(e) if page == 1 => return Err(e.into()),
                Err(e) => {
                    warn!(endpoint, page, error = %e, "page request failed, stopping");
                    break;
                }
            };

            if result.get("code").and_then(Value::as_i64) != Some(200) {
                if page == 1 {
                    return Err(ApiError {
                        message: format!("{endpoint} returned an unsuccessful code"),
                        status_code: None,
                        details: Some(result),
                    }
                    .into());
                }
                warn!(endpoint, page, "page returned an unsuccessful code, stopping");
                break;
            }

            let data = &result["data"];
            let items = data["content"].as_array().cloned().unwrap_or_default();
            let received = items.len();
            content.extend(items);

            let last_page = match data["totalPages"].as_u64() {
                Some(total_pages) => u64::from(page) >= total_pages,
                None => received < self.batch_size as usize,
            };
            if last_page || received == 0 {
                break;
            }
            if page == MAX_PAGES {
                warn!(endpoint, "page cap reached");
            }
        }

        info!(endpoint, items = content.len(), "fetched all pages");
        let total = content.len();
        Ok(json!({
            "code": 200,
            "message": "Fetched all items",
            "data": {
                "content": content,
                "totalElements": total,
            }
        }))
    }

    /// Finds the signature of the first running record of a simulation.
    pub async fn resolve_running_record(
        &self,
        simulation_id: &str,
        user_id: Option<&str>,
    ) -> Result<Option<String>, SimError> {
        let query = [
            ("simulationSig", simulation_id.to_string()),
            ("pageNum", "1".to_string()),
            ("pageSize", "20".to_string()),
        ];
        let result = self.client.get("/getAllRecord", &query, user_id).await?;
        let signature = result["data"]["content"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|record| is_running(&record["recordStatus"]))
            .and_then(|record| match &record["recordSig"] {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
        Ok(signature)
    }

    /// Starts, pauses, resumes, or stops a scenario.
    ///
    /// Without `record_id`, pause/resume/stop act on the running record; if
    /// there is none, no control request is sent.
    pub async fn control(
        &self,
        action: ControlAction,
        simulation_id: &str,
        record_id: Option<&str>,
        user_id: Option<&str>,
    ) -> Result<Value, SimError> {
        info!(%action, simulation_id, "scenario control");
        let endpoint = match action {
            ControlAction::Start => {
                let body = json!({ "simulationId": simulation_id, "startType": "simulation" });
                return Ok(self.client.post("/startSimulation", &body, user_id).await?);
            }
            ControlAction::Stop => "/stopSimulation",
            ControlAction::Pause => "/pauseSimulation",
            ControlAction::Resume => "/resumeSimulation",
        };

        let record = match record_id.filter(|r| !r.is_empty()) {
            Some(record) => record.to_string(),
            None => self
                .resolve_running_record(simulation_id, user_id)
                .await?
                .ok_or_else(|| SimError::NoRunningRecord {
                    simulation_id: simulation_id.to_string(),
                })?,
        };

        let body = if action == ControlAction::Stop {
            json!({ "isStopAll": false, "recordSig": record, "configId": null })
        } else {
            json!({ "ctrlDoe": false, "recordSig": record })
        };
        Ok(self.client.post(endpoint, &body, user_id).await?)
    }

    /// Default extraction directory for a record.
    pub fn record_dir(&self, record_id: &str) -> PathBuf {
        self.data_dir.join(record_id)
    }

    /// Downloads a record's data archive and extracts it.
    pub async fn download_record_data(
        &self,
        record_id: &str,
        output_dir: Option<&Path>,
        user_id: Option<&str>,
    ) -> Result<Value, SimError> {
        let dir = output_dir.map_or_else(|| self.record_dir(record_id), Path::to_path_buf);
        let bytes = self
            .client
            .post_raw("/getRecordData", &[("recordSig", record_id.to_string())], user_id)
            .await?;

        let extract_dir = dir.clone();
        let files = tokio::task::spawn_blocking(move || extract_archive(bytes, &extract_dir))
            .await
            .map_err(|e| SimError::Io {
                path: dir.clone(),
                source: std::io::Error::other(e),
            })??;

        let local_path = std::path::absolute(&dir).unwrap_or_else(|_| dir.clone());
        info!(record_id, files = files.len(), path = %local_path.display(), "record data extracted");
        Ok(json!({
            "success": true,
            "message": format!("Data downloaded and extracted to {}", dir.display()),
            "files": files,
            "local_path": local_path.display().to_string(),
        }))
    }
}

fn extract_archive(bytes: Vec<u8>, dir: &Path) -> Result<Vec<String>, SimError> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|_| SimError::InvalidArchive)?;
    let mut files: Vec<String> = archive.file_names().map(str::to_string).collect();
    files.sort();

    std::fs::create_dir_all(dir).map_err(|e| SimError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;
    archive.extract(dir).map_err(|e| SimError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::other(e),
    })?;
    Ok(files)
}
