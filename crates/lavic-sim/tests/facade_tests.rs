// SPDX-FileCopyrightText: 2026 LaViC Toolkit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-level tests for the simulation facade against a mock platform.

use std::io::{Cursor, Write};

use lavic_config::model::SimulationConfig;
use lavic_sim::{ControlAction, ListModels, ListScenarios, SimClient, SimError, SimFacade};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn facade(server: &MockServer, data_dir: &str) -> SimFacade {
    let config = SimulationConfig {
        api_token: "tok-123".into(),
        data_dir: data_dir.into(),
        ..Default::default()
    };
    let client = SimClient::new(&config).unwrap().with_base_url(server.uri());
    SimFacade::new(client, &config)
}

fn items(start: usize, count: usize) -> Vec<Value> {
    (start..start + count).map(|i| json!({"id": i})).collect()
}

fn page_body(content: Vec<Value>, total_pages: u64) -> Value {
    json!({"code": 200, "data": {"content": content, "totalPages": total_pages}})
}

fn query_value(req: &Request, key: &str) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test]
async fn fetch_all_concatenates_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllSysOfSysStep"))
        .and(query_param("pageSize", "50"))
        .respond_with(|req: &Request| {
            let page = query_value(req, "pageNum").unwrap_or_default();
            let content = match page.as_str() {
                "1" => items(0, 50),
                "2" => items(50, 50),
                "3" => items(100, 10),
                _ => Vec::new(),
            };
            ResponseTemplate::new(200).set_body_json(page_body(content, 3))
        })
        .expect(3)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_scenarios(&ListScenarios {
            fetch_all: true,
            size: 5,
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(result["code"], 200);
    assert_eq!(result["message"], "Fetched all items");
    assert_eq!(result["data"]["totalElements"], 110);
    let content = result["data"]["content"].as_array().unwrap();
    assert_eq!(content.len(), 110);
    assert_eq!(content[109]["id"], 109);
}

#[tokio::test]
async fn fetch_all_without_total_stops_on_short_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllAgent"))
        .respond_with(|req: &Request| {
            let content = match query_value(req, "pageNum").as_deref() {
                Some("1") => items(0, 50),
                _ => items(50, 7),
            };
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 200, "data": {"content": content}}))
        })
        .expect(2)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_models(&ListModels {
            fetch_all: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result["data"]["totalElements"], 57);
}

#[tokio::test]
async fn fetch_all_follows_total_pages_when_backend_clamps_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllSysOfSysStep"))
        .and(query_param("pageSize", "50"))
        .respond_with(|req: &Request| {
            let page: usize = query_value(req, "pageNum")
                .and_then(|p| p.parse().ok())
                .unwrap_or(1);
            let content = if page <= 3 { items((page - 1) * 20, 20) } else { Vec::new() };
            ResponseTemplate::new(200).set_body_json(page_body(content, 3))
        })
        .expect(3)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_scenarios(&ListScenarios {
            fetch_all: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result["data"]["totalElements"], 60);
    assert_eq!(result["data"]["content"][59]["id"], 59);
}

#[tokio::test]
async fn fetch_all_stops_on_empty_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllAgent"))
        .respond_with(|req: &Request| {
            let content = match query_value(req, "pageNum").as_deref() {
                Some("1") => items(0, 50),
                _ => Vec::new(),
            };
            ResponseTemplate::new(200).set_body_json(page_body(content, 99))
        })
        .expect(2)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_models(&ListModels {
            fetch_all: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result["data"]["totalElements"], 50);
}

#[tokio::test]
async fn fetch_all_keeps_pages_before_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllAgent"))
        .respond_with(|req: &Request| match query_value(req, "pageNum").as_deref() {
            Some("1") => ResponseTemplate::new(200).set_body_json(page_body(items(0, 50), 5)),
            _ => ResponseTemplate::new(200).set_body_json(json!({"code": 500, "msg": "busy"})),
        })
        .expect(2)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_models(&ListModels {
            fetch_all: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result["data"]["totalElements"], 50);
}

#[tokio::test]
async fn fetch_all_first_page_failure_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllSysOfSysStep"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .expect(1)
        .mount(&server)
        .await;

    let err = facade(&server, "data")
        .list_scenarios(&ListScenarios {
            fetch_all: true,
            ..Default::default()
        })
        .await
        .unwrap_err();
    match err {
        SimError::Api(e) => {
            assert_eq!(e.status_code, Some(500));
            assert_eq!(e.details, Some(json!("internal")));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn single_page_listing_sends_headers_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllSysOfSysStep"))
        .and(query_param("pageNum", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("simulationTag", "1"))
        .and(header("X-UserId", "42"))
        .and(header("Authorization", "admin-Token=tok-123"))
        .and(header("Content-Type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(items(0, 3), 1)))
        .expect(1)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .list_scenarios(&ListScenarios {
            page: 2,
            simulation_tag: Some("1".into()),
            user_id: Some("42".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(result["data"]["content"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn model_listing_uses_keyword_and_case_tag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllAgent"))
        .and(query_param("agentKwd", "F-22"))
        .and(query_param("agentTag", "1"))
        .and(header("X-UserId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(items(0, 1), 1)))
        .expect(1)
        .mount(&server)
        .await;

    facade(&server, "data")
        .list_models(&ListModels {
            keyword: Some("F-22".into()),
            is_model_case: true,
            ..Default::default()
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn pause_resolves_running_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllRecord"))
        .and(query_param("simulationSig", "sim-9"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"content": [
                {"recordSig": "rec-old", "recordStatus": "Stopped"},
                {"recordSig": "rec-live", "recordStatus": 1},
                {"recordSig": "rec-other", "recordStatus": "Running"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pauseSimulation"))
        .and(body_json(json!({"ctrlDoe": false, "recordSig": "rec-live"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
        .expect(1)
        .mount(&server)
        .await;

    let result = facade(&server, "data")
        .control(ControlAction::Pause, "sim-9", None, None)
        .await
        .unwrap();
    assert_eq!(result["code"], 200);
}

#[tokio::test]
async fn no_running_record_sends_no_control_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getAllRecord"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"content": [{"recordSig": "rec-old", "recordStatus": "Finished"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/pauseSimulation"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = facade(&server, "data")
        .control(ControlAction::Pause, "sim-9", None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, SimError::NoRunningRecord { ref simulation_id } if simulation_id == "sim-9"));
    assert_eq!(err.to_payload()["success"], false);
}

#[tokio::test]
async fn start_and_explicit_stop_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/startSimulation"))
        .and(body_json(json!({"simulationId": "sim-1", "startType": "simulation"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("data: {\"code\":200,\"msg\":\"started\"}\n\n"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/stopSimulation"))
        .and(body_json(json!({"isStopAll": false, "recordSig": "rec-5", "configId": null})))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getAllRecord"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let facade = facade(&server, "data");
    let started = facade
        .control(ControlAction::Start, "sim-1", None, None)
        .await
        .unwrap();
    assert_eq!(started["msg"], "started");

    let stopped = facade
        .control(ControlAction::Stop, "sim-1", Some("rec-5"), None)
        .await
        .unwrap();
    assert_eq!(stopped, json!({}));
}

#[tokio::test]
async fn pause_and_resume_hit_their_own_endpoints() {
    let server = MockServer::start().await;
    for endpoint in ["/pauseSimulation", "/resumeSimulation"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(body_json(json!({"ctrlDoe": false, "recordSig": "rec-2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 200})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let facade = facade(&server, "data");
    for action in [ControlAction::Pause, ControlAction::Resume] {
        let result = facade
            .control(action, "sim-1", Some("rec-2"), None)
            .await
            .unwrap();
        assert_eq!(result["code"], 200);
    }
}

#[tokio::test]
async fn http_errors_normalize() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/resumeSimulation"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"msg": "forbidden"})))
        .mount(&server)
        .await;

    let err = facade(&server, "data")
        .control(ControlAction::Resume, "sim-1", Some("rec-1"), None)
        .await
        .unwrap_err();
    let payload = err.to_payload();
    assert_eq!(payload["status_code"], 403);
    assert_eq!(payload["details"], json!({"msg": "forbidden"}));
    assert!(payload["error"].as_str().unwrap().contains("403"));
}

fn record_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    writer.start_file("positions.csv", options).unwrap();
    writer.write_all(b"t,x,y\n0,1,2\n").unwrap();
    writer.start_file("events/log.csv", options).unwrap();
    writer.write_all(b"t,event\n").unwrap();
    writer.finish().unwrap().into_inner()
}

#[tokio::test]
async fn download_extracts_record_archive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getRecordData"))
        .and(query_param("recordSig", "rec-7"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(record_zip()))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    let result = facade(&server, data_dir.to_str().unwrap())
        .download_record_data("rec-7", None, None)
        .await
        .unwrap();

    let target = data_dir.join("rec-7");
    assert_eq!(result["success"], true);
    assert_eq!(result["files"], json!(["events/log.csv", "positions.csv"]));
    assert_eq!(result["local_path"], target.display().to_string());
    assert_eq!(
        std::fs::read_to_string(target.join("positions.csv")).unwrap(),
        "t,x,y\n0,1,2\n"
    );
    assert!(target.join("events/log.csv").is_file());
}

#[tokio::test]
async fn download_rejects_non_zip_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/getRecordData"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": 404, "msg": "no data"})))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    let err = facade(&server, "data")
        .download_record_data("rec-7", Some(out.as_path()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidArchive));
    assert_eq!(err.to_payload()["message"], "Response was not a valid ZIP file.");
}
