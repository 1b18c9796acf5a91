//! End-to-end: RunService over a real EngineClient against a mock engine server.

use runplane_config::PlatformConfig;
use runplane_domain::{RunService, RunState};
use runplane_types::{ContainerSpec, RunStartRequest};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(server: &MockServer) -> RunService {
    let config = PlatformConfig::from_toml(&format!(
        r#"
[engine]
url = "{}"
namespace = "sims"
"#,
        server.uri()
    ))
    .unwrap();
    RunService::from_config(&config).unwrap()
}

fn request() -> RunStartRequest {
    RunStartRequest::new(
        "sim-42",
        vec![
            ContainerSpec::new("fetchData", "fetch:1"),
            ContainerSpec::new("orchestrator", "orch:1").with_dependencies(["fetchData"]),
        ],
    )
}

#[tokio::test]
async fn test_submit_then_logs_from_archive() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/workflows/sims"))
        .and(body_partial_json(json!({
            "workflow": {
                "metadata": {"labels": {"runplane.io/simulation-id": "sim-42"}},
                "spec": {"entrypoint": "entrypoint"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"name": "workflow-abcde", "uid": "u-77"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/sims/workflow-abcde"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"name": "workflow-abcde", "uid": "u-77"},
            "status": {
                "phase": "Running",
                "nodes": {
                    "workflow-abcde-2": {
                        "id": "workflow-abcde-2",
                        "displayName": "orchestrator",
                        "type": "Pod"
                    }
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/sims/workflow-abcde/log"))
        .and(query_param("podName", "workflow-abcde-2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 5,
            "message": "pods \"workflow-abcde-2\" not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/artifacts-by-uid/u-77/workflow-abcde-2/main-logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("archived output"))
        .expect(1)
        .mount(&server)
        .await;

    let service = service(&server);
    let mut run = service.submit(&request()).await.unwrap();
    assert_eq!(run.workflow_name(), "workflow-abcde");

    let status = service.refresh(&mut run).await;
    assert_eq!(status.phase.as_deref(), Some("Running"));
    assert_eq!(run.state, RunState::Running);

    let logs = service.get_logs(&run).await.unwrap();
    assert_eq!(logs, "archived output");
}

#[tokio::test]
async fn test_logs_stream_error_falls_back_to_archive() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/sims/wf-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"name": "wf-1", "uid": "u-1"},
            "status": {
                "phase": "Running",
                "nodes": {
                    "wf-1-2": {"id": "wf-1-2", "displayName": "orchestrator", "type": "Pod"}
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/workflows/sims/wf-1/log"))
        .and(query_param("podName", "wf-1-2"))
        .and(query_param("logOptions.container", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_string(concat!(
            "{\"error\":{\"grpc_code\":5,\"http_code\":404,",
            "\"message\":\"pods \\\"wf-1-2\\\" not found\",\"http_status\":\"Not Found\"}}\n"
        )))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/artifacts-by-uid/u-1/wf-1-2/main-logs"))
        .respond_with(ResponseTemplate::new(200).set_body_string("archived output"))
        .expect(1)
        .mount(&server)
        .await;

    let run = runplane_types::Run::submitted("u-1", "wf-1", &request());
    let logs = service(&server).get_logs(&run).await.unwrap();
    assert_eq!(logs, "archived output");
}

#[tokio::test]
async fn test_stop_against_server() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/workflows/sims/wf-1/stop"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 5,
            "message": "not found"
        })))
        .mount(&server)
        .await;

    let req = request();
    let mut run = runplane_types::Run::submitted("u-1", "wf-1", &req);
    run.state = RunState::Failed;
    let status = service(&server).stop(&mut run).await;
    assert_eq!(status.phase.as_deref(), Some("Failed"));
    assert_eq!(run.state, RunState::Failed);
}
