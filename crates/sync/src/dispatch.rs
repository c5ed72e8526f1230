use std::future::Future;

use tokio::task::JoinHandle;

use crate::WaitGroup;

/// Registers one unit on `group`, then spawns `unit` on the tokio runtime.
/// The unit is released when the task ends, however it ends.
pub fn spawn_tracked<F>(group: &WaitGroup, unit: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let guard = group.enter();
    tokio::spawn(async move {
        let _guard = guard;
        unit.await
    })
}

/// Spawns one task per input, each running `work(input)` as a unit of `group`.
///
/// Every unit is registered before its task is spawned, so a `group.wait()`
/// issued after this returns covers all of them. Results come back in input
/// order through the handles, while the units themselves may finish in any
/// order.
pub fn fan_out<I, F, Fut>(group: &WaitGroup, inputs: I, mut work: F) -> Vec<JoinHandle<Fut::Output>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future + Send + 'static,
    Fut::Output: Send + 'static,
{
    let handles: Vec<_> = inputs
        .into_iter()
        .map(|input| spawn_tracked(group, work(input)))
        .collect();

    fanout_trace::debug!(units = handles.len(), "dispatched units");
    handles
}
