//! The sequence handle and the stage-spawning machinery behind every
//! combinator.
//!
//! An [`Iter`] owns the receiving end of one handoff channel. On the other
//! end sits a dedicated stage thread that pushes values and closes the
//! channel (by dropping its sender) when it is done. A pipeline of `k`
//! combinators therefore runs `k` threads, each blocked either pulling from
//! its upstream or pushing to its downstream. With the default capacity of
//! zero every push is a rendezvous, so demand propagates one hop at a time.
//!
//! Dropping an `Iter` disconnects its channel. The producing stage notices on
//! its next push, stops, and drops its own upstream, so abandoned pipelines
//! unwind hop by hop instead of blocking forever.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::Config;

//==============================================================================
// Iter: the consumer handle
//==============================================================================

/// A lazily produced, possibly infinite sequence of `T`.
///
/// `Iter` is deliberately not `Clone`: a sequence has exactly one consumer.
/// Use [`Iter::tee`] to read the same values from several places.
pub struct Iter<T> {
    rx: Receiver<T>,
    config: Arc<Config>,
}

/// Outcome of a non-blocking or time-limited pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull<T> {
    Item(T),
    /// The sequence is still open but nothing arrived in time.
    Pending,
    Closed,
}

impl<T> Pull<T> {
    pub fn item(self) -> Option<T> {
        match self {
            Pull::Item(value) => Some(value),
            Pull::Pending | Pull::Closed => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Pull::Closed)
    }
}

impl<T> Iter<T> {
    /// Pull the next element, blocking until one arrives. Returns `None` once
    /// the producer has closed the sequence, and keeps returning `None`.
    pub fn next(&mut self) -> Option<T> {
        self.rx.recv().ok()
    }

    pub fn try_next(&mut self) -> Pull<T> {
        match self.rx.try_recv() {
            Ok(value) => Pull::Item(value),
            Err(TryRecvError::Empty) => Pull::Pending,
            Err(TryRecvError::Disconnected) => Pull::Closed,
        }
    }

    pub fn next_timeout(&mut self, timeout: Duration) -> Pull<T> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Pull::Item(value),
            Err(RecvTimeoutError::Timeout) => Pull::Pending,
            Err(RecvTimeoutError::Disconnected) => Pull::Closed,
        }
    }

    /// Stop consuming. Equivalent to dropping the handle.
    pub fn close(self) {}

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn shared_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    pub(crate) fn into_receiver(self) -> Receiver<T> {
        self.rx
    }
}

impl<T> fmt::Debug for Iter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("buffered", &self.rx.len())
            .field("capacity", &self.config.capacity)
            .finish()
    }
}

//==============================================================================
// Std iterator bridges
//==============================================================================

/// Owning iterator over the remaining elements of an [`Iter`].
pub struct IntoIter<T> {
    rx: Receiver<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.rx.recv().ok()
    }
}

impl<T> IntoIterator for Iter<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter { rx: self.rx }
    }
}

/// Borrowing iterator; lets a loop stop early and keep the sequence.
pub struct Pulls<'a, T> {
    iter: &'a mut Iter<T>,
}

impl<T> Iterator for Pulls<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.iter.next()
    }
}

impl<'a, T> IntoIterator for &'a mut Iter<T> {
    type Item = T;
    type IntoIter = Pulls<'a, T>;

    fn into_iter(self) -> Pulls<'a, T> {
        Pulls { iter: self }
    }
}

//==============================================================================
// Stage threads
//==============================================================================

/// The downstream consumer went away; the stage should stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Detached;

/// Sending half handed to a stage body.
pub(crate) struct Producer<T> {
    tx: Sender<T>,
    emitted: usize,
}

impl<T> Producer<T> {
    pub(crate) fn push(&mut self, value: T) -> Result<(), Detached> {
        self.tx.send(value).map_err(|_| Detached)?;
        self.emitted += 1;
        Ok(())
    }

    /// Push unless `signal` becomes ready first. `Ok(false)` means the
    /// signal won and `value` was discarded.
    pub(crate) fn push_unless(
        &mut self,
        value: T,
        signal: &Receiver<()>,
    ) -> Result<bool, Detached> {
        channel::select! {
            send(self.tx, value) -> sent => {
                sent.map_err(|_| Detached)?;
                self.emitted += 1;
                Ok(true)
            }
            recv(signal) -> _ => Ok(false),
        }
    }
}

/// Spawn a stage thread running `body` and return the sequence it feeds.
///
/// The channel closes when `body` returns, whether it finished or was
/// detached, or when it panics.
///
/// # Panics
///
/// Panics if the operating system refuses to create the thread, as
/// [`std::thread::spawn`] does.
pub(crate) fn spawn_stage<T, F>(config: Arc<Config>, stage: &'static str, body: F) -> Iter<T>
where
    T: Send + 'static,
    F: FnOnce(&mut Producer<T>) -> Result<(), Detached> + Send + 'static,
{
    let (tx, rx) = channel::bounded(config.capacity);

    let spawned = config.thread_builder(stage).spawn(move || {
        trace!(stage, "stage started");
        let mut producer = Producer { tx, emitted: 0 };
        match body(&mut producer) {
            Ok(()) => trace!(stage, emitted = producer.emitted, "stage closed"),
            Err(Detached) => debug!(
                stage,
                emitted = producer.emitted,
                "downstream dropped, stage stopped"
            ),
        }
    });
    if let Err(err) = spawned {
        panic!("failed to spawn `{stage}` stage thread: {err}");
    }

    Iter { rx, config }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Instant;

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn wait_for(flag: &AtomicBool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if flag.load(Ordering::SeqCst) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_next_after_close_stays_none() {
        let mut it = crate::new(vec![1]);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        assert!(it.try_next().is_closed());
    }

    #[test]
    fn test_next_timeout_on_idle_stage() {
        let mut it: Iter<i32> = spawn_stage(Arc::new(Config::default()), "idle", |_out| {
            thread::sleep(Duration::from_millis(200));
            Ok(())
        });
        assert_eq!(it.next_timeout(Duration::from_millis(10)), Pull::Pending);
        assert_eq!(it.next_timeout(Duration::from_secs(5)), Pull::Closed);
    }

    #[test]
    fn test_borrowing_loop_keeps_sequence() {
        let mut it = crate::count(0u32);
        for value in &mut it {
            if value == 3 {
                break;
            }
        }
        assert_eq!(it.next(), Some(4));
    }

    #[test]
    fn test_dropping_consumer_stops_producer() {
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = DropFlag(Arc::clone(&stopped));
        let source = (0u64..).map(move |n| {
            let _keep = &flag;
            n
        });

        let mut it = crate::from_source(source).map(|n| n * 2);
        assert_eq!(it.next(), Some(0));
        assert_eq!(it.next(), Some(2));
        drop(it);

        assert!(wait_for(&stopped), "upstream producer never shut down");
    }

    #[test]
    fn test_panicking_stage_closes_sequence() {
        let mut it = crate::new(vec![1, 2, 3]).map(|n: i32| {
            if n == 2 {
                panic!("bad element");
            }
            n
        });
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_debug_output() {
        let it = crate::new(Vec::<u8>::new());
        assert!(format!("{it:?}").starts_with("Iter {"));
    }
}
