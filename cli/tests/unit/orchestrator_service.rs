//! Unit tests for `DeploymentOrchestrator` through its public API.
//!
//! Runs on a paused tokio clock, so elapsed times are exact.

#![allow(clippy::expect_used)]

use std::time::Duration;

use converge_cli::application::{DeploymentOrchestrator, WaitPolicy};
use converge_common::ApplicationDefinition;
use tokio_util::sync::CancellationToken;
use converge_cli::domain::{ClientConfig, ConvergeError};
use tokio::time::Instant;

use crate::mocks::{RecordingReporter, ScriptedScheduler, snapshot, with_checks};

fn converge_error(err: &anyhow::Error) -> &ConvergeError {
    err.downcast_ref::<ConvergeError>().expect("typed error")
}

#[tokio::test(start_paused = true)]
async fn test_batch_job_that_never_converges_times_out_after_two_seconds() {
    let sched = ScriptedScheduler::new(&["/batch-9"], vec![snapshot("/batch-9", 4, 1)]);
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default());

    let started = Instant::now();
    let err = orch
        .wait_for_steady_state("batch-9", Duration::from_secs(2))
        .await
        .expect_err("never reaches parity");
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(2), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2600), "overran: {elapsed:?}");
    assert!(matches!(
        converge_error(&err),
        ConvergeError::Timeout { id, timeout } if id == "/batch-9" && *timeout == Duration::from_secs(2)
    ));
    assert_eq!(converge_error(&err).code(), "timeout");
}

#[tokio::test(start_paused = true)]
async fn test_all_checks_alive_is_healthy() {
    let app = with_checks(snapshot("/web-1", 3, 3), 2, true);
    let orch = DeploymentOrchestrator::new(
        ScriptedScheduler::new(&["/web-1"], vec![app]),
        &ClientConfig::default(),
    );
    assert!(orch.is_application_healthy("/web-1").await.expect("query"));
}

#[tokio::test(start_paused = true)]
async fn test_running_below_desired_is_not_healthy() {
    let app = with_checks(snapshot("/web-1", 3, 2), 2, true);
    let orch = DeploymentOrchestrator::new(
        ScriptedScheduler::new(&["/web-1"], vec![app]),
        &ClientConfig::default(),
    );
    assert!(!orch.is_application_healthy("/web-1").await.expect("query"));
}

#[tokio::test(start_paused = true)]
async fn test_unlisted_app_is_not_found() {
    let orch = DeploymentOrchestrator::new(
        ScriptedScheduler::new(&["/api"], Vec::new()),
        &ClientConfig::default(),
    );
    let err = orch.is_application_healthy("/web-1").await.expect_err("missing");
    assert!(matches!(converge_error(&err), ConvergeError::NotFound(id) if id == "/web-1"));
}

#[tokio::test(start_paused = true)]
async fn test_scale_with_wait_reports_progress_and_converges() {
    let sched = ScriptedScheduler::new(
        &["/web-1"],
        vec![snapshot("/web-1", 5, 3), snapshot("/web-1", 5, 5)],
    );
    let reporter = RecordingReporter::default();
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default()).with_reporter(&reporter);

    let handle = orch
        .scale_application("web-1", 5, true, WaitPolicy::SteadyState(Duration::from_secs(10)))
        .await
        .expect("scaled");

    assert_eq!(handle.deployment_id, "dep-7");
    assert_eq!(orch.scheduler().submitted(), vec!["scale /web-1 5 force=true"]);
    let lines = reporter.lines();
    assert_eq!(lines.first().map(String::as_str), Some("step: scaling /web-1 to 5..."));
    assert!(lines.iter().any(|l| l.starts_with("step: waiting for /web-1")));
    assert_eq!(lines.last().map(String::as_str), Some("ok: /web-1 converged"));
}

#[tokio::test(start_paused = true)]
async fn test_wait_until_healthy_requires_green_checks() {
    let sched = ScriptedScheduler::new(
        &["/web-1"],
        vec![
            with_checks(snapshot("/web-1", 2, 2), 1, false),
            with_checks(snapshot("/web-1", 2, 2), 1, true),
        ],
    );
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default());
    orch.wait_until_healthy("/web-1", Duration::from_secs(5))
        .await
        .expect("healthy");
    assert!(orch.scheduler().fetches() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_id_never_reaches_scheduler() {
    let orch = DeploymentOrchestrator::new(
        ScriptedScheduler::new(&["/web-1"], vec![snapshot("/web-1", 1, 1)]),
        &ClientConfig::default(),
    );
    let err = orch
        .wait_for_steady_state("Web_1", Duration::from_secs(1))
        .await
        .expect_err("rejected");
    assert!(matches!(converge_error(&err), ConvergeError::InvalidArgument(_)));
    assert_eq!(orch.scheduler().fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_listing_does_not_stretch_the_timeout() {
    let sched = ScriptedScheduler::new(&["/batch-9"], vec![snapshot("/batch-9", 4, 1)])
        .with_list_delay(Duration::from_secs(8));
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default());

    let started = Instant::now();
    let err = orch
        .wait_for_steady_state("/batch-9", Duration::from_secs(2))
        .await
        .expect_err("stalled");
    let elapsed = started.elapsed();

    assert!(matches!(converge_error(&err), ConvergeError::Timeout { .. }));
    assert!(elapsed >= Duration::from_secs(2), "returned early: {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2500), "held by the stalled request: {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_stalled_listing_returns_promptly() {
    let sched = ScriptedScheduler::new(&["/web-1"], vec![snapshot("/web-1", 3, 1)])
        .with_list_delay(Duration::from_secs(10));
    let token = CancellationToken::new();
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default())
        .with_cancellation(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(400)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = orch
        .wait_for_steady_state("/web-1", Duration::from_secs(60))
        .await
        .expect_err("cancelled");
    assert!(matches!(converge_error(&err), ConvergeError::Cancelled(_)));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(400) && elapsed < Duration::from_secs(1), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_oversized_timeout_still_converges() {
    let sched = ScriptedScheduler::new(
        &["/web-1"],
        vec![snapshot("/web-1", 2, 1), snapshot("/web-1", 2, 2)],
    );
    let orch = DeploymentOrchestrator::new(sched, &ClientConfig::default());
    orch.wait_for_steady_state("/web-1", Duration::from_secs(u64::MAX))
        .await
        .expect("converges");
}

#[tokio::test(start_paused = true)]
async fn test_create_without_instances_submits_none() {
    let orch = DeploymentOrchestrator::new(
        ScriptedScheduler::new(&[], Vec::new()),
        &ClientConfig::default(),
    );
    let definition = ApplicationDefinition {
        id: "web-1".into(),
        ..ApplicationDefinition::default()
    };
    let created = orch
        .create_application(&definition, WaitPolicy::Return)
        .await
        .expect("created");
    assert_eq!(created.instances, 1);
    assert_eq!(orch.scheduler().submitted(), vec!["create /web-1 instances=None"]);
}
