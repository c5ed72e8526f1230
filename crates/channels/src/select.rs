use crate::ReceiveChannel;

/// Outcome of [`select`]: which channel was received from, and what it gave.
/// A `None` payload means that channel is closed and drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selected<A, B> {
    Left(Option<A>),
    Right(Option<B>),
}

/// Waits until either channel can be received from and receives from exactly
/// one of them. When both are ready the branch is picked at random; the other
/// channel keeps its value for a later receive.
pub async fn select<A, B>(left: &ReceiveChannel<A>, right: &ReceiveChannel<B>) -> Selected<A, B> {
    tokio::select! {
        value = left.receive() => Selected::Left(value),
        value = right.receive() => Selected::Right(value),
    }
}

/// [`select`] over any number of channels carrying the same type. Returns the
/// index of the channel received from alongside the value.
///
/// # Panics
///
/// Panics when `channels` is empty, since nothing could ever become ready.
pub async fn select_any<T>(channels: &[ReceiveChannel<T>]) -> (usize, Option<T>) {
    assert!(!channels.is_empty(), "select over no channels never completes");

    let pending = channels.iter().map(|channel| Box::pin(channel.receive()));
    let (value, index, _rest) = futures::future::select_all(pending).await;
    (index, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{buffered, unbuffered, ChannelError};
    use std::time::Duration;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn select_waits_for_the_first_ready_channel() {
        let (fast_tx, fast_rx) = buffered::<i64>(1);
        let (_slow_tx, slow_rx) = buffered::<String>(1);

        let mut selecting = task::spawn(select(&fast_rx, &slow_rx));
        assert_pending!(selecting.poll());

        fast_tx.try_send(9).expect("slot is free");
        assert!(selecting.is_woken());
        assert_eq!(assert_ready!(selecting.poll()), Selected::Left(Some(9)));
    }

    #[tokio::test]
    async fn select_prefers_whichever_finishes_first() {
        let (fast_tx, fast_rx) = unbuffered::<i64>();
        let (slow_tx, slow_rx) = unbuffered::<String>();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            fast_tx.send(9).await;
        });
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(30)).await;
            slow_tx.send(String::from("After 30 seconds")).await;
        });

        assert_eq!(select(&fast_rx, &slow_rx).await, Selected::Left(Some(9)));
    }

    #[test]
    fn only_one_branch_consumes_when_both_are_ready() {
        for _ in 0..32 {
            let (left_tx, left_rx) = buffered::<i64>(1);
            let (right_tx, right_rx) = buffered::<&'static str>(1);
            left_tx.try_send(1).expect("slot is free");
            right_tx.try_send("one").expect("slot is free");

            match tokio_test::block_on(select(&left_rx, &right_rx)) {
                Selected::Left(value) => {
                    assert_eq!(value, Some(1));
                    assert_eq!(right_rx.try_receive().expect("still queued"), "one");
                }
                Selected::Right(value) => {
                    assert_eq!(value, Some("one"));
                    assert_eq!(left_rx.try_receive().expect("still queued"), 1);
                }
            }
        }
    }

    #[test]
    fn closed_channel_is_always_ready_with_no_value() {
        let (closed_tx, closed_rx) = unbuffered::<i64>();
        let (_open_tx, open_rx) = unbuffered::<i64>();
        closed_tx.close();

        for _ in 0..3 {
            let selected = tokio_test::block_on(select(&closed_rx, &open_rx));
            assert_eq!(selected, Selected::Left(None));
        }
        assert!(matches!(open_rx.try_receive(), Err(ChannelError::Empty)));
    }

    #[test]
    fn select_any_reports_the_ready_index() {
        let channels: Vec<_> = (0..4).map(|_| buffered::<i64>(1)).collect();
        let receivers: Vec<_> = channels.iter().map(|(_, rx)| rx.clone()).collect();

        let mut selecting = task::spawn(select_any(&receivers));
        assert_pending!(selecting.poll());

        channels[2].0.try_send(42).expect("slot is free");
        assert_eq!(assert_ready!(selecting.poll()), (2, Some(42)));

        for (index, receiver) in receivers.iter().enumerate() {
            assert!(receiver.is_empty(), "channel {index} should be drained");
        }
    }

    #[test]
    #[should_panic(expected = "select over no channels")]
    fn select_any_over_nothing_panics() {
        tokio_test::block_on(select_any::<i64>(&[]));
    }
}
