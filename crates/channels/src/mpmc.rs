use std::{
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use futures::{channel::oneshot, Stream};

use crate::{ChannelError, Result};

/// Creates a rendezvous channel: a send completes only once some receiver has
/// taken the value.
pub fn unbuffered<T>() -> (SendChannel<T>, ReceiveChannel<T>) {
    create(0)
}

/// Creates a channel holding up to `capacity` values before senders wait.
/// A `capacity` of zero gives an [`unbuffered`] channel.
pub fn buffered<T>(capacity: usize) -> (SendChannel<T>, ReceiveChannel<T>) {
    create(capacity)
}

fn create<T>(capacity: usize) -> (SendChannel<T>, ReceiveChannel<T>) {
    // a rendezvous channel parks the value in a single slot and holds the
    // sender until a receiver acknowledges it.
    let (tx, rx) = async_channel::bounded::<Envelope<T>>(capacity.max(1));
    let shared = Arc::new(Shared {
        capacity,
        parked_receivers: AtomicUsize::new(0),
        receivers: AtomicUsize::new(1),
    });

    let sender = SendChannel {
        src: tx,
        shared: shared.clone(),
    };
    let receiver = ReceiveChannel { src: rx, shared };
    (sender, receiver)
}

struct Shared {
    capacity: usize,
    parked_receivers: AtomicUsize,
    receivers: AtomicUsize,
}

impl Shared {
    fn is_rendezvous(&self) -> bool {
        self.capacity == 0
    }
}

struct Envelope<T> {
    value: T,
    delivered: Option<oneshot::Sender<()>>,
}

/// Counts a receiver as waiting for the lifetime of one receive call.
struct Parked<'a>(&'a AtomicUsize);

impl<'a> Parked<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::AcqRel);
        Self(counter)
    }
}

impl Drop for Parked<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

pub struct SendChannel<T> {
    src: async_channel::Sender<Envelope<T>>,
    shared: Arc<Shared>,
}

impl<T> Clone for SendChannel<T> {
    fn clone(&self) -> Self {
        Self {
            src: self.src.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T> fmt::Debug for SendChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendChannel")
            .field("capacity", &self.shared.capacity)
            .field("pending", &self.src.len())
            .field("closed", &self.src.is_closed())
            .finish()
    }
}

impl<T> SendChannel<T> {
    /// Zero for unbuffered channels.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Values handed to the channel and not yet received.
    #[must_use]
    pub fn pending_message_count(&self) -> usize {
        self.src.len()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.src.is_closed()
    }

    /// Closes the channel for every sender and receiver. Values already queued
    /// are still received, after which receivers see `None`.
    ///
    /// # Panics
    ///
    /// Panics when the channel was already closed.
    pub fn close(&self) {
        assert!(self.src.close(), "close of closed channel");
        fanout_trace::debug!(pending = self.src.len(), "channel closed");
    }

    /// Sends `t`, waiting for buffer space, or for a receiver to take the value
    /// when the channel is unbuffered.
    ///
    /// # Panics
    ///
    /// Panics when the channel is closed.
    pub async fn send(&self, t: T) {
        let (envelope, delivered) = self.wrap(t);
        if self.src.send(envelope).await.is_err() {
            self.closed_panic();
        }

        if let Some(delivered) = delivered {
            // a value accepted before close is still handed over, so the
            // acknowledgement only fails once the last receiver dropped it.
            if delivered.await.is_err() {
                self.closed_panic();
            }
        }
    }

    /// [`SendChannel`].block_send() blocks the current thread till the value is
    /// handed over. This generally should not be used inside async tasks.
    ///
    /// # Panics
    ///
    /// Panics when the channel is closed.
    pub fn block_send(&self, t: T) {
        let (envelope, delivered) = self.wrap(t);
        if self.src.send_blocking(envelope).is_err() {
            self.closed_panic();
        }

        if let Some(delivered) = delivered {
            if futures::executor::block_on(delivered).is_err() {
                self.closed_panic();
            }
        }
    }

    /// [`SendChannel::send`] bounded by `after`.
    ///
    /// On an unbuffered channel a value that was already parked for pickup
    /// when the timeout fires stays there and is handed to the next receiver.
    ///
    /// # Errors
    ///
    /// [`ChannelError::TimedOut`] when the send did not complete in time.
    ///
    /// # Panics
    ///
    /// Panics when the channel is closed.
    pub async fn send_timeout(&self, t: T, after: Duration) -> Result<()> {
        tokio::time::timeout(after, self.send(t))
            .await
            .map_err(|_| ChannelError::TimedOut(after))
    }

    /// Sends without waiting.
    ///
    /// An unbuffered channel only accepts the value when a receiver is
    /// currently waiting for one. A receive cancelled between that check and
    /// the handoff leaves the value queued for the next receiver, the same as
    /// a timed out [`SendChannel::send_timeout`].
    ///
    /// # Errors
    ///
    /// [`ChannelError::Closed`] or [`ChannelError::Full`].
    pub fn try_send(&self, t: T) -> Result<()> {
        if self.src.is_closed() {
            return Err(ChannelError::Closed);
        }

        if self.shared.is_rendezvous()
            && self.shared.parked_receivers.load(Ordering::Acquire) == 0
        {
            return Err(ChannelError::Full);
        }

        let envelope = Envelope {
            value: t,
            delivered: None,
        };
        match self.src.try_send(envelope) {
            Ok(()) => Ok(()),
            Err(async_channel::TrySendError::Full(_)) => Err(ChannelError::Full),
            Err(async_channel::TrySendError::Closed(_)) => Err(ChannelError::Closed),
        }
    }

    fn wrap(&self, value: T) -> (Envelope<T>, Option<oneshot::Receiver<()>>) {
        if !self.shared.is_rendezvous() {
            return (
                Envelope {
                    value,
                    delivered: None,
                },
                None,
            );
        }

        let (tx, rx) = oneshot::channel();
        (
            Envelope {
                value,
                delivered: Some(tx),
            },
            Some(rx),
        )
    }

    fn closed_panic(&self) -> ! {
        if self.src.receiver_count() == 0 {
            panic!("send on channel without receivers");
        }
        panic!("send on closed channel");
    }
}

pub struct ReceiveChannel<T> {
    src: async_channel::Receiver<Envelope<T>>,
    shared: Arc<Shared>,
}

impl<T> Clone for ReceiveChannel<T> {
    fn clone(&self) -> Self {
        self.shared.receivers.fetch_add(1, Ordering::AcqRel);
        Self {
            src: self.src.clone(),
            shared: self.shared.clone(),
        }
    }
}

impl<T> Drop for ReceiveChannel<T> {
    fn drop(&mut self) {
        if self.shared.receivers.fetch_sub(1, Ordering::AcqRel) != 1 {
            return;
        }

        // last receiver: nothing queued can be taken anymore, so drop it and
        // let senders parked on an acknowledgement see the loss.
        self.src.close();
        while self.src.try_recv().is_ok() {}
    }
}

impl<T> fmt::Debug for ReceiveChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiveChannel")
            .field("capacity", &self.shared.capacity)
            .field("pending", &self.src.len())
            .field("closed", &self.src.is_closed())
            .finish()
    }
}

impl<T> ReceiveChannel<T> {
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.src.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.src.is_closed()
    }

    /// Waits for the next value. `None` means the channel is closed and drained.
    ///
    /// Cancel safe: dropping the future before it resolves never loses a value.
    pub async fn receive(&self) -> Option<T> {
        let _parked = Parked::new(&self.shared.parked_receivers);
        let envelope = self.src.recv().await.ok()?;
        Some(Self::open(envelope))
    }

    /// [`ReceiveChannel`].block_receive() blocks the current thread till a value
    /// is received or the channel is closed and drained. This generally should
    /// not be used inside async tasks.
    pub fn block_receive(&self) -> Option<T> {
        let _parked = Parked::new(&self.shared.parked_receivers);
        let envelope = self.src.recv_blocking().ok()?;
        Some(Self::open(envelope))
    }

    /// [`ReceiveChannel::receive`] bounded by `after`.
    ///
    /// # Errors
    ///
    /// [`ChannelError::TimedOut`] when nothing arrived in time.
    pub async fn receive_timeout(&self, after: Duration) -> Result<Option<T>> {
        tokio::time::timeout(after, self.receive())
            .await
            .map_err(|_| ChannelError::TimedOut(after))
    }

    /// Takes a value only if one is queued right now.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Empty`] when nothing is queued, [`ChannelError::Closed`]
    /// once the channel is closed and drained.
    pub fn try_receive(&self) -> Result<T> {
        match self.src.try_recv() {
            Ok(envelope) => Ok(Self::open(envelope)),
            Err(async_channel::TryRecvError::Empty) => Err(ChannelError::Empty),
            Err(async_channel::TryRecvError::Closed) => Err(ChannelError::Closed),
        }
    }

    /// Yields every value until the channel is closed and drained.
    pub fn into_stream(self) -> impl Stream<Item = T> {
        futures::stream::unfold(self, |receiver| async move {
            let value = receiver.receive().await?;
            Some((value, receiver))
        })
    }

    fn open(envelope: Envelope<T>) -> T {
        if let Some(delivered) = envelope.delivered {
            // the sender may have given up waiting, nobody to tell then.
            let _ = delivered.send(());
        }
        envelope.value
    }
}
