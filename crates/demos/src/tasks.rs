use fanout_config::DemoConfig;
use fanout_sync::{fan_out, WaitGroup};
use tokio::task::JoinHandle;

use crate::work::{calc_triple_and_print, WorkItem};

/// Triples `1..=spawned_workers` one after another. Takes the full sum of
/// every delay.
pub async fn sequential(config: &DemoConfig) -> Vec<WorkItem> {
    let mut items = Vec::new();
    for input in 1..=config.spawned_workers {
        items.push(calc_triple_and_print(input, config.work_delay).await);
    }
    items
}

/// Triples `1..=spawned_workers` in one task each, returning right away.
///
/// The units are registered on `group`, so the caller decides when (and how
/// long) to wait for them instead of leaking them.
pub fn spawned(config: &DemoConfig, group: &WaitGroup) -> Vec<JoinHandle<WorkItem>> {
    let delay = config.work_delay;
    let handles = fan_out(group, 1..=config.spawned_workers, move |input| {
        calc_triple_and_print(input, delay)
    });

    fanout_trace::info!(units = handles.len(), "spawned tripling tasks");
    handles
}
