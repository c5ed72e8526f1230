use std::time::Duration;

use fanout_config::DemoConfig;
use fanout_demos::{run, run_all, Demo, DemoError, RunSummary};
use tracing_test::traced_test;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn run_all_finishes_within_budget() {
    let config = DemoConfig::default()
        .with_work_delay(Duration::from_millis(5))
        .with_long_process_delay(Duration::from_millis(200))
        .with_run_for(Duration::from_secs(10));

    let summary = run_all(&config).await.expect("buffered demo succeeds");
    assert_eq!(
        summary,
        RunSummary {
            finished: true,
            outstanding: 0,
        }
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[traced_test]
async fn run_all_over_budget_returns_with_a_warning() {
    let config = DemoConfig::default()
        .with_work_delay(Duration::from_millis(200))
        .with_long_process_delay(Duration::from_secs(30))
        .with_run_for(Duration::from_millis(20));

    let summary = run_all(&config).await.expect("buffered demo succeeds");
    assert!(!summary.finished);
    assert!(summary.outstanding > 0);
    assert!(logs_contain("run budget elapsed"));
}

#[tokio::test]
async fn run_dispatches_a_single_demonstration() {
    let config = DemoConfig::default().with_work_delay(Duration::from_millis(1));
    run(Demo::Buffered, &config)
        .await
        .expect("buffered demo succeeds");
    run(Demo::OtherTasks, &config)
        .await
        .expect("nothing to fail");
}

#[tokio::test]
async fn run_surfaces_demonstration_errors() {
    let mut config = DemoConfig::default().with_work_delay(Duration::from_millis(1));
    config.buffer_capacity = 1;

    let result = run(Demo::Buffered, &config).await;
    assert!(matches!(result, Err(DemoError::Channel(_))));
}

#[test]
fn every_demo_is_reachable_by_name() {
    let names: Vec<&str> = Demo::EVERY.iter().map(|demo| demo.name()).collect();
    assert_eq!(
        names,
        vec![
            "all",
            "sequential",
            "spawned",
            "unbuffered",
            "buffered",
            "ranged",
            "closing",
            "selecting",
            "wait-group",
            "other-tasks",
        ]
    );
    assert!("wait_group".parse::<Demo>().is_err());
}
