// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool handlers.

use std::path::PathBuf;
use std::sync::Arc;

use lavic_sim::{ListModels, ListScenarios, SimError, SimFacade};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use serde_json::Value;
use tracing::{debug, warn};

use crate::tools::{
    ControlScenarioRequest, DownloadRecordDataRequest, ListModelsRequest, ListScenariosRequest,
};

const INSTRUCTIONS: &str = "Control and inspect LaViC simulations: list scenarios and models, \
start/pause/resume/stop scenarios, and download record data.";

/// MCP server wrapping a [`SimFacade`].
#[derive(Clone)]
pub struct LavicMcpServer {
    facade: Arc<SimFacade>,
    tool_router: ToolRouter<Self>,
}

/// Pretty JSON text result. Facade failures become error results that
/// carry the structured payload instead of protocol errors.
fn respond(tool: &str, outcome: Result<Value, SimError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(pretty(&value)?)])),
        Err(e) => {
            warn!(tool, error = %e, "tool call failed");
            Ok(CallToolResult::error(vec![Content::text(pretty(
                &e.to_payload(),
            )?)]))
        }
    }
}

fn pretty(value: &Value) -> Result<String, McpError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("failed to encode result: {e}"), None))
}

#[tool_router]
impl LavicMcpServer {
    pub fn new(facade: Arc<SimFacade>) -> Self {
        Self {
            facade,
            tool_router: Self::tool_router(),
        }
    }

    /// Names of the registered tools.
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect()
    }

    #[tool(
        description = "List available simulation scenarios. Use fetch_all=true to retrieve all pages."
    )]
    pub async fn list_scenarios(
        &self,
        Parameters(req): Parameters<ListScenariosRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(?req, "list_scenarios");
        let params = ListScenarios::from(req);
        respond("list_scenarios", self.facade.list_scenarios(&params).await)
    }

    #[tool(
        description = "Search for models in the library. Use fetch_all=true to retrieve all pages."
    )]
    pub async fn list_models(
        &self,
        Parameters(req): Parameters<ListModelsRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(?req, "list_models");
        let params = ListModels::from(req);
        respond("list_models", self.facade.list_models(&params).await)
    }

    #[tool(
        description = "Control a scenario: start, pause, resume, or stop. Without record_id, pause/resume/stop act on the currently running record."
    )]
    pub async fn control_scenario(
        &self,
        Parameters(req): Parameters<ControlScenarioRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(?req, "control_scenario");
        let outcome = self
            .facade
            .control(
                req.action,
                &req.simulation_id,
                req.record_id.as_deref(),
                req.user_id.as_deref(),
            )
            .await;
        respond("control_scenario", outcome)
    }

    #[tool(
        description = "Download and extract simulation record data (zip) for analysis. Returns the list of extracted files."
    )]
    pub async fn download_record_data(
        &self,
        Parameters(req): Parameters<DownloadRecordDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        debug!(?req, "download_record_data");
        let output_dir = req
            .output_dir
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from);
        let outcome = self
            .facade
            .download_record_data(&req.record_id, output_dir.as_deref(), req.user_id.as_deref())
            .await;
        respond("download_record_data", outcome)
    }
}

#[tool_handler]
impl ServerHandler for LavicMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lavic-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}
