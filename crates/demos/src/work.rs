use std::{fmt, time::Duration};

use fanout_channels::SendChannel;

/// One unit of simulated work: an input and its tripled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkItem {
    pub input: i64,
    pub output: i64,
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tripled: {}", self.input, self.output)
    }
}

/// Triples `input` after `delay`, standing in for anything slow enough to be
/// worth running in parallel: sending an email, a database insert.
pub async fn triple(input: i64, delay: Duration) -> i64 {
    tokio::time::sleep(delay).await;
    input * 3
}

pub async fn calc_triple(input: i64, delay: Duration) -> WorkItem {
    WorkItem {
        input,
        output: triple(input, delay).await,
    }
}

pub async fn calc_triple_and_print(input: i64, delay: Duration) -> WorkItem {
    let item = calc_triple(input, delay).await;
    println!("{item}");
    item
}

pub async fn calc_triple_to_channel(input: i64, delay: Duration, channel: &SendChannel<i64>) {
    let output = triple(input, delay).await;
    channel.send(output).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanout_channels::buffered;

    #[test]
    fn work_item_displays_input_and_output() {
        let item = WorkItem {
            input: 4,
            output: 12,
        };
        assert_eq!(item.to_string(), "4 tripled: 12");
    }

    #[tokio::test]
    async fn triple_waits_then_triples() {
        let started = tokio::time::Instant::now();
        assert_eq!(triple(7, Duration::from_millis(15)).await, 21);
        assert!(started.elapsed() >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn calc_triple_to_channel_sends_the_output() {
        let (sender, receiver) = buffered::<i64>(1);
        calc_triple_to_channel(30, Duration::ZERO, &sender).await;
        assert_eq!(receiver.try_receive().expect("output queued"), 90);
    }
}
