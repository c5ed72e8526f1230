use std::time::Duration;

use fanout_channels::{ReceiveChannel, SendChannel};
use fanout_config::DemoConfig;
use fanout_sync::{spawn_tracked, WaitGroup};
use futures::StreamExt;

use crate::{
    errors::{DemoError, DemoResult},
    work::{calc_triple_to_channel, triple},
};

/// What [`closing`] observed on either side of the close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseReport {
    pub first: i64,
    pub second: i64,
    pub open_after_close: bool,
}

/// Spawns one task per input in `1..=count`, each sending its tripled input
/// into `channel`. The tasks are units of `group`.
pub fn send_to_channel(count: i64, delay: Duration, channel: &SendChannel<i64>, group: &WaitGroup) {
    for input in 1..=count {
        println!("Emitting {input}");
        let channel = channel.clone();
        spawn_tracked(group, async move {
            calc_triple_to_channel(input, delay, &channel).await;
        });
    }
}

/// Receives exactly `count` times, printing a notice for every receive that
/// found the channel closed.
pub async fn receive_from_channel(count: i64, channel: &ReceiveChannel<i64>) -> Vec<i64> {
    let mut received = Vec::new();
    for _ in 0..count {
        match channel.receive().await {
            Some(tripled) => {
                println!("Receiving from channel: {tripled}");
                received.push(tripled);
            }
            None => println!("Channel Closed"),
        }
    }
    received
}

/// Producers and a consumer meeting on an unbuffered channel: every send
/// completes only when the consumer takes the value.
///
/// # Errors
///
/// [`DemoError::Sync`] when producers are still blocked after the run budget.
pub async fn unbuffered(config: &DemoConfig) -> DemoResult<Vec<i64>> {
    let (sender, receiver) = fanout_channels::unbuffered::<i64>();
    let producers = WaitGroup::new();

    send_to_channel(config.channel_workers, config.work_delay, &sender, &producers);
    let received = receive_from_channel(config.channel_workers, &receiver).await;

    producers.wait_timeout(config.run_for).await?;
    Ok(received)
}

/// Two sends from one task into a buffered channel succeed with nobody
/// receiving, as long as the buffer has room for both. A third would block.
///
/// # Errors
///
/// [`DemoError::Channel`] with [`fanout_channels::ChannelError::Full`] when the
/// configured capacity is below two.
pub async fn buffered(config: &DemoConfig) -> DemoResult<(i64, i64)> {
    let (sender, receiver) = fanout_channels::buffered::<i64>(config.buffer_capacity);

    sender.try_send(triple(3, config.work_delay).await)?;
    sender.try_send(triple(30, config.work_delay).await)?;
    fanout_trace::debug!(
        pending = sender.pending_message_count(),
        capacity = sender.capacity(),
        "buffer filled without a receiver"
    );

    let first = receiver.try_receive()?;
    let second = receiver.try_receive()?;
    println!("{first} {second}");
    Ok((first, second))
}

/// Consumes the channel until it is closed. The producers' group closes it once
/// the last of them has handed over its value.
///
/// # Errors
///
/// [`DemoError::TaskFailed`] when the closing task panicked.
pub async fn ranged(config: &DemoConfig) -> DemoResult<Vec<i64>> {
    let (sender, receiver) = fanout_channels::unbuffered::<i64>();
    let producers = WaitGroup::new();

    send_to_channel(config.channel_workers, config.work_delay, &sender, &producers);

    let closer = tokio::spawn(async move {
        producers.wait().await;
        sender.close();
    });

    let received: Vec<i64> = receiver
        .into_stream()
        .inspect(|tripled| println!("{tripled}"))
        .collect()
        .await;

    closer.await?;
    Ok(received)
}

/// Receives two values, closes the channel, then shows a receive on the
/// closed channel reporting that no value is left.
///
/// # Errors
///
/// [`DemoError::ChannelDrained`] if a producer's value never arrives.
pub async fn closing(config: &DemoConfig) -> DemoResult<CloseReport> {
    let (sender, receiver) = fanout_channels::unbuffered::<i64>();
    let producers = WaitGroup::new();
    let delay = config.work_delay;

    let channel = sender.clone();
    spawn_tracked(&producers, async move {
        calc_triple_to_channel(3, delay, &channel).await;
    });
    let first = receiver.receive().await.ok_or(DemoError::ChannelDrained)?;
    println!("{first}");

    let channel = sender.clone();
    spawn_tracked(&producers, async move {
        calc_triple_to_channel(5, delay, &channel).await;
    });
    let second = receiver.receive().await.ok_or(DemoError::ChannelDrained)?;
    println!("{second}");

    producers.wait_timeout(config.run_for).await?;
    sender.close();

    // any send from here on panics with "send on closed channel".
    let open_after_close = receiver.receive().await.is_some();
    println!("{open_after_close}");

    Ok(CloseReport {
        first,
        second,
        open_after_close,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout_channels::ChannelError;

    fn quick_config() -> DemoConfig {
        DemoConfig::default()
            .with_work_delay(Duration::from_millis(5))
            .with_run_for(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn receive_from_channel_reports_closed_receives() {
        let (sender, receiver) = fanout_channels::buffered::<i64>(2);
        sender.try_send(3).expect("slot is free");
        sender.close();

        assert_eq!(receive_from_channel(3, &receiver).await, vec![3]);
    }

    #[tokio::test]
    async fn buffered_with_a_single_slot_cannot_take_both_sends() {
        let mut config = quick_config();
        config.buffer_capacity = 1;

        let result = buffered(&config).await;
        assert!(matches!(
            result,
            Err(DemoError::Channel(ChannelError::Full))
        ));
    }

    #[tokio::test]
    async fn ranged_with_no_producers_ends_immediately() {
        let mut config = quick_config();
        config.channel_workers = 0;

        assert!(ranged(&config).await.expect("nothing to receive").is_empty());
    }
}
