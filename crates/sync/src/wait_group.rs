use std::{fmt, sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::watch;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("wait group still had {outstanding} outstanding units after {after:?}")]
    TimedOut { outstanding: usize, after: Duration },
}

pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Counting completion barrier.
///
/// Units of work are registered with [`WaitGroup::add`] (or [`WaitGroup::enter`])
/// before they start and released with [`WaitGroup::done`] when they finish.
/// Every pending [`WaitGroup::wait`] returns once the counter crosses back to
/// zero. Cloning is cheap and every clone observes the same counter.
///
/// Releasing more units than were registered is a programming defect and
/// panics.
///
/// ```
/// use fanout_sync::WaitGroup;
///
/// # tokio_test::block_on(async {
/// let group = WaitGroup::new();
/// for _ in 0..3 {
///     let guard = group.enter();
///     tokio::spawn(async move {
///         let _guard = guard;
///     });
/// }
/// group.wait().await;
/// assert_eq!(group.count(), 0);
/// # });
/// ```
/// Outstanding units plus the number of times they crossed back to zero. A
/// waiter is released by a crossing even if units were added again before it
/// got to look.
#[derive(Debug, Clone, Copy, Default)]
struct Counter {
    outstanding: usize,
    generation: u64,
}

#[derive(Clone)]
pub struct WaitGroup {
    counter: Arc<watch::Sender<Counter>>,
}

impl Default for WaitGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WaitGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitGroup")
            .field("outstanding", &self.count())
            .finish()
    }
}

impl WaitGroup {
    #[must_use]
    pub fn new() -> Self {
        let (counter, _) = watch::channel(Counter::default());
        Self {
            counter: Arc::new(counter),
        }
    }

    /// Registers `units` more outstanding units.
    ///
    /// # Panics
    ///
    /// Panics if the counter would overflow `usize`.
    pub fn add(&self, units: usize) {
        if units == 0 {
            return;
        }

        let mut outstanding = None;
        self.counter
            .send_if_modified(|counter| match counter.outstanding.checked_add(units) {
                Some(next) => {
                    counter.outstanding = next;
                    outstanding = Some(next);
                    true
                }
                None => false,
            });

        let Some(outstanding) = outstanding else {
            panic!("wait group counter overflowed while adding {units} units");
        };
        fanout_trace::debug!(units, outstanding, "registered units");
    }

    /// Releases one unit.
    ///
    /// # Panics
    ///
    /// Panics if no unit is outstanding.
    pub fn done(&self) {
        let mut remaining = None;
        self.counter.send_if_modified(|counter| {
            if counter.outstanding == 0 {
                return false;
            }
            counter.outstanding -= 1;
            if counter.outstanding == 0 {
                counter.generation = counter.generation.wrapping_add(1);
            }
            remaining = Some(counter.outstanding);
            true
        });

        match remaining {
            Some(0) => fanout_trace::debug!("wait group reached zero"),
            Some(_) => {}
            None => panic!("wait group released more units than were registered"),
        }
    }

    /// Registers one unit and returns a guard that releases it when dropped,
    /// on every exit path of the owning scope including panics and task
    /// cancellation.
    pub fn enter(&self) -> DoneGuard {
        self.add(1);
        DoneGuard {
            group: self.clone(),
        }
    }

    /// Number of units registered and not yet released.
    #[must_use]
    pub fn count(&self) -> usize {
        self.counter.borrow().outstanding
    }

    /// Resolves once the counter crosses to zero, even when units are added
    /// again before this waiter runs. Resolves immediately when nothing is
    /// outstanding.
    pub async fn wait(&self) {
        let mut receiver = self.counter.subscribe();
        let started = receiver.borrow_and_update().generation;

        // the sender is owned by `self`, so the channel cannot close while we wait.
        let _ = receiver
            .wait_for(|counter| counter.outstanding == 0 || counter.generation != started)
            .await;
    }

    /// Like [`WaitGroup::wait`] but gives up after `after`, leaving the counter
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`SyncError::TimedOut`] with the number of units still outstanding.
    pub async fn wait_timeout(&self, after: Duration) -> SyncResult<()> {
        if tokio::time::timeout(after, self.wait()).await.is_ok() {
            return Ok(());
        }

        let outstanding = self.count();
        fanout_trace::warn!(outstanding, ?after, "wait group timed out");
        Err(SyncError::TimedOut { outstanding, after })
    }

    /// Blocks the calling OS thread until the counter is zero.
    ///
    /// Meant for plain threads. Calling it from inside an async task parks the
    /// runtime worker that runs the task.
    pub fn wait_blocking(&self) {
        futures::executor::block_on(self.wait());
    }
}

/// Releases one unit of its [`WaitGroup`] on drop.
#[must_use = "dropping the guard immediately releases the unit"]
#[derive(Debug)]
pub struct DoneGuard {
    group: WaitGroup,
}

impl DoneGuard {
    #[must_use]
    pub fn group(&self) -> &WaitGroup {
        &self.group
    }
}

impl Drop for DoneGuard {
    fn drop(&mut self) {
        self.group.done();
    }
}
