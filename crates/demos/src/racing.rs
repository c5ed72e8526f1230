use std::time::Duration;

use fanout_channels::{select, SendChannel, Selected};
use fanout_config::DemoConfig;
use fanout_sync::{spawn_tracked, WaitGroup};

use crate::{
    errors::{DemoError, DemoResult},
    work::calc_triple_to_channel,
};

pub async fn a_very_long_time_process(delay: Duration, channel: &SendChannel<String>) {
    tokio::time::sleep(delay).await;
    channel
        .send(format!("After {} seconds", delay.as_secs_f64()))
        .await;
}

/// Races a tripling against a slow process and reports whichever channel
/// delivers first. The losing operand is cancelled rather than left blocked
/// on a channel nobody reads anymore.
///
/// # Errors
///
/// [`DemoError::ChannelDrained`] if the winning channel closed without a value.
pub async fn selecting(config: &DemoConfig) -> DemoResult<Selected<i64, String>> {
    let (triple_tx, triple_rx) = fanout_channels::unbuffered::<i64>();
    let (text_tx, text_rx) = fanout_channels::unbuffered::<String>();
    let operands = WaitGroup::new();

    let delay = config.work_delay;
    let fast = spawn_tracked(&operands, async move {
        calc_triple_to_channel(3, delay, &triple_tx).await;
    });

    let long_delay = config.long_process_delay;
    let slow = spawn_tracked(&operands, async move {
        a_very_long_time_process(long_delay, &text_tx).await;
    });

    let selected = select(&triple_rx, &text_rx).await;

    fast.abort();
    slow.abort();
    operands.wait_timeout(config.run_for).await?;

    match &selected {
        Selected::Left(Some(tripled)) => {
            println!("Received from channel3, value: {tripled}");
        }
        Selected::Right(Some(text)) => println!("{text}"),
        Selected::Left(None) | Selected::Right(None) => return Err(DemoError::ChannelDrained),
    }

    Ok(selected)
}
