use std::time::Duration;

use fanout_channels::Selected;
use fanout_config::DemoConfig;
use fanout_demos::{
    buffered, closing, ranged, selecting, sequential, unbuffered, wait_group, CloseReport,
};

fn quick_config() -> DemoConfig {
    DemoConfig::default()
        .with_work_delay(Duration::from_millis(10))
        .with_long_process_delay(Duration::from_secs(30))
        .with_run_for(Duration::from_secs(5))
}

fn tripled_one_to_ten() -> Vec<i64> {
    (1..=10).map(|input| input * 3).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn unbuffered_receives_every_tripled_value() {
    let mut received = unbuffered(&quick_config()).await.expect("producers finish");
    received.sort_unstable();
    assert_eq!(received, tripled_one_to_ten());
}

#[tokio::test]
async fn buffered_holds_both_values_without_a_receiver() {
    assert_eq!(buffered(&quick_config()).await.expect("buffer has room"), (9, 90));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn ranged_stops_once_the_producers_close_the_channel() {
    let mut received = ranged(&quick_config()).await.expect("closer finishes");
    received.sort_unstable();
    assert_eq!(received, tripled_one_to_ten());
}

#[tokio::test]
async fn closing_reports_the_channel_as_drained() {
    let report = closing(&quick_config()).await.expect("both values arrive");
    assert_eq!(
        report,
        CloseReport {
            first: 9,
            second: 15,
            open_after_close: false,
        }
    );
}

#[tokio::test]
async fn selecting_prefers_the_tripling_when_it_is_faster() {
    let selected = selecting(&quick_config()).await.expect("a channel delivers");
    assert_eq!(selected, Selected::Left(Some(9)));
}

#[tokio::test]
async fn selecting_reports_the_long_process_when_it_is_faster() {
    let config = quick_config()
        .with_work_delay(Duration::from_secs(30))
        .with_long_process_delay(Duration::from_millis(5));

    let selected = selecting(&config).await.expect("a channel delivers");
    assert_eq!(
        selected,
        Selected::Right(Some(String::from("After 0.005 seconds")))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn wait_group_joins_every_worker() {
    let items = wait_group(&quick_config()).await.expect("workers finish");

    let mut outputs: Vec<i64> = items.iter().map(|item| item.output).collect();
    outputs.sort_unstable();
    assert_eq!(outputs, tripled_one_to_ten());
}

#[tokio::test]
async fn sequential_runs_in_input_order() {
    let mut config = quick_config().with_work_delay(Duration::from_millis(1));
    config.spawned_workers = 4;

    let items = sequential(&config).await;
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec!["1 tripled: 3", "2 tripled: 6", "3 tripled: 9", "4 tripled: 12"]
    );
}
