// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool handlers against a mock simulation platform.

use std::sync::Arc;

use lavic_config::model::SimulationConfig;
use lavic_mcp_server::LavicMcpServer;
use lavic_mcp_server::tools::{ControlScenarioRequest, ListModelsRequest, ListScenariosRequest};
use lavic_sim::{ControlAction, SimClient, SimFacade};
use rmcp::ServerHandler;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server_for(mock: &MockServer) -> LavicMcpServer {
    let config = SimulationConfig::default();
    let client = SimClient::new(&config).unwrap().with_base_url(mock.uri());
    LavicMcpServer::new(Arc::new(SimFacade::new(client, &config)))
}

fn body(result: &CallToolResult) -> Value {
    let text = &result.content[0].as_text().unwrap().text;
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn registers_four_tools() {
    let mock = MockServer::start().await;
    let server = server_for(&mock);
    let mut names = server.tool_names();
    names.sort();
    assert_eq!(
        names,
        [
            "control_scenario",
            "download_record_data",
            "list_models",
            "list_scenarios"
        ]
    );
    let info = server.get_info();
    assert!(info.capabilities.tools.is_some());
    assert_eq!(info.server_info.name, "lavic-mcp");
}

#[tokio::test]
async fn list_scenarios_returns_platform_body() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllSysOfSysStep"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"content": [{"id": "s1"}], "totalPages": 1}
        })))
        .expect(1)
        .mount(&mock)
        .await;

    let req: ListScenariosRequest = serde_json::from_value(json!({})).unwrap();
    let result = server_for(&mock)
        .list_scenarios(Parameters(req))
        .await
        .unwrap();
    assert_ne!(result.is_error, Some(true));
    assert_eq!(body(&result)["data"]["content"][0]["id"], "s1");
}

#[tokio::test]
async fn api_failure_is_error_result_with_payload() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllAgent"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"msg": "denied"})))
        .mount(&mock)
        .await;

    let req: ListModelsRequest = serde_json::from_value(json!({"keyword": "J-20"})).unwrap();
    let result = server_for(&mock).list_models(Parameters(req)).await.unwrap();
    assert_eq!(result.is_error, Some(true));
    let payload = body(&result);
    assert_eq!(payload["status_code"], 403);
    assert_eq!(payload["details"]["msg"], "denied");
}

#[tokio::test]
async fn control_without_running_record_reports_failure() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllRecord"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"content": [{"recordSig": "rec-old", "recordStatus": "Finished"}]}
        })))
        .mount(&mock)
        .await;
    Mock::given(method("POST"))
        .and(path("/stopSimulation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock)
        .await;

    let req = ControlScenarioRequest {
        action: ControlAction::Stop,
        simulation_id: "sim-9".into(),
        record_id: None,
        user_id: None,
    };
    let result = server_for(&mock)
        .control_scenario(Parameters(req))
        .await
        .unwrap();
    assert_eq!(result.is_error, Some(true));
    let payload = body(&result);
    assert_eq!(payload["success"], false);
    assert!(payload["message"].as_str().unwrap().contains("sim-9"));
}
