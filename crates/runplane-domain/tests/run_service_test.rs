//! RunService behavior against an in-memory engine.

mod common;

use std::sync::Arc;

use common::{MockEngine, Reply, StaticProbe, created, pod, request, run, service, workflow};
use runplane_domain::{LabelSelector, RunError};
use runplane_types::{ContainerSpec, IngestionState, RunStartRequest, RunState};

// ─────────────────────────────────────────────────────────────────────────────
// Submission
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_submit_creates_running_run() {
    let engine = Arc::new(MockEngine::default());
    *engine.create.lock() = Reply::Ok(created("u-9", "workflow-x7k2p"));

    let run = service(&engine).submit(&request()).await.unwrap();

    assert_eq!(run.workflow_id(), "u-9");
    assert_eq!(run.workflow_name(), "workflow-x7k2p");
    assert_eq!(run.state, RunState::Running);
    assert_eq!(run.simulation_id, "sim-42");
    assert_eq!(engine.calls(), vec!["create sims"]);

    let submitted = engine.submitted.lock();
    let doc = &submitted[0];
    assert_eq!(doc.spec.entrypoint, "entrypoint");
    assert_eq!(doc.spec.templates.len(), 3);
    assert_eq!(doc.metadata.labels["runner-id"], "r-1");
}

#[tokio::test]
async fn test_submit_missing_identifiers() {
    let engine = Arc::new(MockEngine::default());
    *engine.create.lock() = Reply::Ok(created("", "workflow-x7k2p"));

    let err = service(&engine).submit(&request()).await.unwrap_err();
    match err {
        RunError::Submission { status, body } => {
            assert!(status.is_none());
            assert!(body.contains("workflow-x7k2p"));
        }
        other => panic!("Expected Submission error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_submit_rejected_by_engine() {
    let engine = Arc::new(MockEngine::default());
    *engine.create.lock() = Reply::Fail(400, "dependency cycle detected");

    let err = service(&engine).submit(&request()).await.unwrap_err();
    match err {
        RunError::Submission { status, body } => {
            assert_eq!(status, Some(400));
            assert_eq!(body, "dependency cycle detected");
        }
        other => panic!("Expected Submission error, got: {other:?}"),
    }
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_submit_invalid_request_never_reaches_engine() {
    let engine = Arc::new(MockEngine::default());
    let service = service(&engine);

    let empty = RunStartRequest::new("sim", vec![]);
    assert!(matches!(
        service.submit(&empty).await,
        Err(RunError::InvalidRequest(_))
    ));

    let reserved = RunStartRequest::new("sim", vec![ContainerSpec::new("Entrypoint", "img")]);
    assert!(matches!(
        service.submit(&reserved).await,
        Err(RunError::InvalidRequest(_))
    ));

    assert!(engine.calls().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Status
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_failed_run_reports_failed_phase() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![]));

    let mut run = run();
    run.state = RunState::Failed;
    let status = service(&engine).get_status(&run).await;
    assert_eq!(status.phase.as_deref(), Some("Failed"));
}

#[tokio::test]
async fn test_status_falls_back_to_archive() {
    let engine = Arc::new(MockEngine::default());
    *engine.archived.lock() = Reply::Ok(workflow("Succeeded", vec![pod("wf-1-1", "fetchData")]));

    let status = service(&engine).get_status(&run()).await;
    assert_eq!(status.phase.as_deref(), Some("Succeeded"));
    assert_eq!(status.nodes.len(), 1);
    assert_eq!(engine.calls(), vec!["get sims/wf-1", "archived u-1"]);
}

#[tokio::test]
async fn test_status_unknown_on_engine_failure() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Fail(503, "unavailable");

    let status = service(&engine).get_status(&run()).await;
    assert!(status.is_unknown());
    assert_eq!(engine.calls(), vec!["get sims/wf-1"]);
}

#[tokio::test]
async fn test_garbage_collected_workflow_is_unknown() {
    let engine = Arc::new(MockEngine::default());

    let mut run = run();
    let status = service(&engine).refresh(&mut run).await;
    assert!(status.is_unknown());
    assert_eq!(run.state, RunState::Unknown);
    assert_eq!(engine.calls(), vec!["get sims/wf-1", "archived u-1"]);
}

#[tokio::test]
async fn test_garbage_collected_keeps_terminal_state() {
    let engine = Arc::new(MockEngine::default());
    let service = service(&engine);

    let mut run = run();
    run.state = RunState::Successful;
    service.refresh(&mut run).await;
    assert_eq!(run.state, RunState::Successful);

    run.state = RunState::Failed;
    service.refresh(&mut run).await;
    assert_eq!(run.state, RunState::Failed);
}

#[tokio::test]
async fn test_unreachable_engine_keeps_state() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Fail(503, "unavailable");

    let mut run = run();
    let status = service(&engine).refresh(&mut run).await;
    assert!(status.is_unknown());
    assert_eq!(run.state, RunState::Running);
}

#[tokio::test]
async fn test_archive_failure_keeps_state() {
    let engine = Arc::new(MockEngine::default());
    *engine.archived.lock() = Reply::Fail(500, "archive down");

    let mut run = run();
    service(&engine).refresh(&mut run).await;
    assert_eq!(run.state, RunState::Running);
}

#[tokio::test]
async fn test_refresh_updates_state_and_times() {
    let engine = Arc::new(MockEngine::default());
    let mut wf = workflow("Failed", vec![]);
    if let Some(s) = wf.status.as_mut() {
        s.finished_at = Some("2024-05-01T11:00:00Z".into());
    }
    *engine.live.lock() = Reply::Ok(wf);

    let mut run = run();
    service(&engine).refresh(&mut run).await;
    assert_eq!(run.state, RunState::Failed);
    assert_eq!(run.start_time.as_deref(), Some("2024-05-01T10:00:00Z"));
    assert_eq!(run.end_time.as_deref(), Some("2024-05-01T11:00:00Z"));
    assert!(run.has_ended());
}

#[tokio::test]
async fn test_refresh_consults_probe_only_on_success() {
    let engine = Arc::new(MockEngine::default());
    let probe = StaticProbe::new(Some(IngestionState::InProgress));
    let service = service(&engine).with_ingestion_probe(probe.clone());

    *engine.live.lock() = Reply::Ok(workflow("Running", vec![]));
    let mut run = run();
    service.refresh(&mut run).await;
    assert_eq!(run.state, RunState::Running);
    assert_eq!(*probe.asked.lock(), 0);

    *engine.live.lock() = Reply::Ok(workflow("Succeeded", vec![]));
    service.refresh(&mut run).await;
    assert_eq!(run.state, RunState::DataIngestionInProgress);
    assert_eq!(*probe.asked.lock(), 1);
}

#[tokio::test]
async fn test_refresh_ingestion_failure_fails_run() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Succeeded", vec![]));
    let service = service(&engine).with_ingestion_probe(StaticProbe::new(Some(IngestionState::Failure)));

    let mut run = run();
    service.refresh(&mut run).await;
    assert_eq!(run.state, RunState::Failed);
}

#[tokio::test]
async fn test_refresh_never_leaves_failed() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![]));

    let mut run = run();
    run.state = RunState::Failed;
    let status = service(&engine).refresh(&mut run).await;
    assert_eq!(run.state, RunState::Failed);
    assert_eq!(status.phase.as_deref(), Some("Failed"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Stop
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_stop_unknown_workflow_returns_last_known() {
    let engine = Arc::new(MockEngine::default());

    let mut run = run();
    run.start_time = Some("2024-05-01T10:00:00Z".into());
    let status = service(&engine).stop(&mut run).await;

    assert!(status.phase.is_none());
    assert_eq!(status.start_time.as_deref(), Some("2024-05-01T10:00:00Z"));
    assert_eq!(run.state, RunState::Running);
    assert_eq!(engine.calls(), vec!["stop sims/wf-1"]);
}

#[tokio::test]
async fn test_stop_applies_returned_status() {
    let engine = Arc::new(MockEngine::default());
    *engine.stop.lock() = Reply::Ok(workflow("Failed", vec![]));

    let mut run = run();
    let status = service(&engine).stop(&mut run).await;
    assert_eq!(status.phase.as_deref(), Some("Failed"));
    assert_eq!(run.state, RunState::Failed);
}

// ─────────────────────────────────────────────────────────────────────────────
// Logs
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_live_logs_joined() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![pod("wf-1-22", "orchestrator")]));
    *engine.pod_logs.lock() = Reply::Ok(vec!["loading".into(), "done".into()]);

    let logs = service(&engine).get_logs(&run()).await.unwrap();
    assert_eq!(logs, "loading\ndone");
}

#[tokio::test]
async fn test_logs_fall_back_to_archived_artifact() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![pod("wf-1-22", "orchestrator")]));
    *engine.artifact.lock() = Reply::Ok(b"archived line".to_vec());

    let logs = service(&engine).get_logs(&run()).await.unwrap();
    assert_eq!(logs, "archived line");
    assert_eq!(
        engine.calls(),
        vec![
            "get sims/wf-1",
            "logs sims/wf-1/wf-1-22/main",
            "artifact u-1/wf-1-22/main-logs",
        ]
    );
}

#[tokio::test]
async fn test_logs_live_error_kept_when_archive_fails() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![pod("wf-1-22", "orchestrator")]));
    *engine.artifact.lock() = Reply::Fail(500, "storage down");

    let err = service(&engine).get_logs(&run()).await.unwrap_err();
    match err {
        RunError::Engine(e) => assert!(e.is_not_found()),
        other => panic!("Expected Engine error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logs_other_errors_propagate() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![pod("wf-1-22", "orchestrator")]));
    *engine.pod_logs.lock() = Reply::Fail(500, "boom");

    let err = service(&engine).get_logs(&run()).await.unwrap_err();
    assert!(matches!(err, RunError::Engine(e) if e.status_code() == Some(500)));
    assert!(!engine.calls().iter().any(|c| c.starts_with("artifact")));
}

#[tokio::test]
async fn test_ended_run_reads_archive() {
    let engine = Arc::new(MockEngine::default());
    *engine.archived.lock() = Reply::Ok(workflow("Succeeded", vec![pod("wf-1-22", "orchestrator")]));
    *engine.artifact.lock() = Reply::Ok(b"final".to_vec());

    let mut run = run();
    run.end_time = Some("2024-05-01T11:00:00Z".into());
    let logs = service(&engine).get_logs(&run).await.unwrap();
    assert_eq!(logs, "final");
    assert_eq!(
        engine.calls(),
        vec!["archived u-1", "artifact u-1/wf-1-22/main-logs"]
    );
}

#[tokio::test]
async fn test_ended_run_not_archived_uses_live() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Succeeded", vec![pod("wf-1-22", "orchestrator")]));
    *engine.pod_logs.lock() = Reply::Ok(vec!["still here".into()]);

    let mut run = run();
    run.end_time = Some("2024-05-01T11:00:00Z".into());
    let logs = service(&engine).get_logs(&run).await.unwrap();
    assert_eq!(logs, "still here");
}

#[tokio::test]
async fn test_missing_workflow_uses_archive() {
    let engine = Arc::new(MockEngine::default());
    *engine.archived.lock() = Reply::Ok(workflow("Succeeded", vec![pod("wf-1-22", "orchestrator")]));
    *engine.artifact.lock() = Reply::Ok(b"from archive".to_vec());

    let logs = service(&engine).get_logs(&run()).await.unwrap();
    assert_eq!(logs, "from archive");
    assert!(!engine.calls().iter().any(|c| c.starts_with("logs")));
}

#[tokio::test]
async fn test_missing_workflow_keeps_live_error_when_archive_fails() {
    let engine = Arc::new(MockEngine::default());
    *engine.archived.lock() = Reply::Fail(500, "archive down");

    let err = service(&engine).get_logs(&run()).await.unwrap_err();
    match err {
        RunError::Engine(e) => assert!(e.is_not_found()),
        other => panic!("Expected Engine error, got: {other:?}"),
    }
    assert_eq!(engine.calls(), vec!["get sims/wf-1", "archived u-1"]);
}

#[tokio::test]
async fn test_no_orchestrator_node_is_empty() {
    let engine = Arc::new(MockEngine::default());
    *engine.live.lock() = Reply::Ok(workflow("Running", vec![pod("wf-1-1", "fetchData")]));

    let logs = service(&engine).get_logs(&run()).await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_all_logs_per_container() {
    let engine = Arc::new(MockEngine::default());
    let mut dag = pod("wf-1", "wf-1");
    dag.node_type = Some("DAG".into());
    *engine.live.lock() = Reply::Ok(workflow(
        "Running",
        vec![dag, pod("wf-1-1", "fetchData"), pod("wf-1-2", "orchestrator")],
    ));
    *engine.pod_logs.lock() = Reply::Ok(vec!["line".into()]);

    let logs = service(&engine).get_all_logs(&run()).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs["fetchData"], "line");
    assert_eq!(logs["orchestrator"], "line");
}

// ─────────────────────────────────────────────────────────────────────────────
// Label lookup
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_find_runs_by_labels() {
    let engine = Arc::new(MockEngine::default());
    *engine.list.lock() = Reply::Ok(vec![workflow("Running", vec![])]);

    let selector = LabelSelector::from([
        ("runner-id".to_string(), "r-1".to_string()),
        ("organization-id".to_string(), "o-1".to_string()),
    ]);
    let runs = service(&engine).find_runs(&selector).await.unwrap();

    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].workflow_name.as_deref(), Some("wf-1"));
    assert_eq!(runs[0].phase.as_deref(), Some("Running"));
    assert_eq!(
        engine.calls(),
        vec!["list sims organization-id=o-1,runner-id=r-1"]
    );
}

#[tokio::test]
async fn test_find_runs_error_propagates() {
    let engine = Arc::new(MockEngine::default());
    *engine.list.lock() = Reply::Fail(403, "forbidden");

    let err = service(&engine)
        .find_runs(&LabelSelector::new())
        .await
        .unwrap_err();
    assert!(matches!(err, RunError::Engine(_)));
}
