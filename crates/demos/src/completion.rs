use fanout_config::DemoConfig;
use fanout_sync::{fan_out, WaitGroup};

use crate::{
    errors::DemoResult,
    work::{calc_triple_and_print, WorkItem},
};

/// Walks a wait group through one manual cycle, then reuses it to join
/// `wait_group_workers` tripling tasks.
///
/// Prints `Marco` once the manual cycle is released and `Polo` once every
/// worker finished.
///
/// # Errors
///
/// [`crate::DemoError::Sync`] when workers are still running after the run
/// budget.
pub async fn wait_group(config: &DemoConfig) -> DemoResult<Vec<WorkItem>> {
    let group = WaitGroup::new();
    let delay = config.work_delay;

    group.add(3);
    group.done();
    group.done();

    let straggler = group.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        straggler.done();
    });

    // blocks for one work delay, until the straggler releases the last unit
    group.wait().await;
    println!("Marco");

    let handles = fan_out(&group, 1..=config.wait_group_workers, move |input| {
        calc_triple_and_print(input, delay)
    });
    group.wait_timeout(config.run_for).await?;
    println!("Polo");

    let mut items = Vec::with_capacity(handles.len());
    for handle in handles {
        items.push(handle.await?);
    }
    Ok(items)
}
