// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool parameter types. Field names and defaults are part of the tool contract.

use lavic_sim::{ControlAction, ListModels, ListScenarios};
use schemars::JsonSchema;
use serde::Deserialize;

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    10
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListScenariosRequest {
    #[schemars(description = "Page number (default 1)")]
    #[serde(default = "default_page")]
    pub page: u32,
    #[schemars(description = "Page size (default 10)")]
    #[serde(default = "default_size")]
    pub size: u32,
    #[schemars(description = "If true, fetches all pages. Overrides page/size.")]
    #[serde(default)]
    pub fetch_all: bool,
    #[schemars(
        description = "Filter by simulation tag (Integer). '1' for System/Admin Scenarios (including MicroScenarios), empty for User Scenarios."
    )]
    pub simulation_tag: Option<String>,
    #[schemars(description = "Optional User ID override")]
    pub user_id: Option<String>,
}

impl From<ListScenariosRequest> for ListScenarios {
    fn from(req: ListScenariosRequest) -> Self {
        Self {
            page: req.page,
            size: req.size,
            fetch_all: req.fetch_all,
            simulation_tag: req.simulation_tag,
            user_id: req.user_id,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListModelsRequest {
    #[schemars(description = "Search keyword for model name")]
    pub keyword: Option<String>,
    #[schemars(description = "Page number (default 1)")]
    #[serde(default = "default_page")]
    pub page: u32,
    #[schemars(description = "Page size (default 10)")]
    #[serde(default = "default_size")]
    pub size: u32,
    #[schemars(description = "If true, fetches all pages. Overrides page/size.")]
    #[serde(default)]
    pub fetch_all: bool,
    #[schemars(description = "If true, filters for 'Model Cases' (agentTag=1).")]
    #[serde(default)]
    pub is_model_case: bool,
    #[schemars(description = "Optional User ID override")]
    pub user_id: Option<String>,
}

impl From<ListModelsRequest> for ListModels {
    fn from(req: ListModelsRequest) -> Self {
        Self {
            keyword: req.keyword,
            page: req.page,
            size: req.size,
            fetch_all: req.fetch_all,
            is_model_case: req.is_model_case,
            user_id: req.user_id,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ControlScenarioRequest {
    #[schemars(description = "Action to perform")]
    pub action: ControlAction,
    #[schemars(description = "Simulation ID")]
    pub simulation_id: String,
    #[schemars(description = "Record ID (required for pause/resume/stop if available)")]
    pub record_id: Option<String>,
    #[schemars(description = "Optional User ID override")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DownloadRecordDataRequest {
    #[schemars(description = "Record ID (recordSig)")]
    pub record_id: String,
    #[schemars(
        description = "Directory to save data (optional, defaults to ./data/<record_id>)"
    )]
    pub output_dir: Option<String>,
    #[schemars(description = "Optional User ID override")]
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn listing_defaults() {
        let req: ListScenariosRequest = serde_json::from_value(json!({})).unwrap();
        let params = ListScenarios::from(req);
        assert_eq!(params, ListScenarios::default());

        let req: ListModelsRequest =
            serde_json::from_value(json!({"keyword": "J-20", "is_model_case": true})).unwrap();
        let params = ListModels::from(req);
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 10);
        assert!(params.is_model_case);
    }

    #[test]
    fn control_requires_known_action() {
        let ok: ControlScenarioRequest =
            serde_json::from_value(json!({"action": "pause", "simulation_id": "s"})).unwrap();
        assert_eq!(ok.action, ControlAction::Pause);
        assert!(
            serde_json::from_value::<ControlScenarioRequest>(
                json!({"action": "reboot", "simulation_id": "s"})
            )
            .is_err()
        );
    }

    #[test]
    fn action_schema_lists_variants() {
        let schema = serde_json::to_value(schemars::schema_for!(ControlScenarioRequest)).unwrap();
        let text = schema.to_string();
        for action in ["start", "pause", "resume", "stop"] {
            assert!(text.contains(&format!("\"{action}\"")), "{action} missing");
        }
    }
}
