//! Explicit cancellation for pipelines whose consumer may be stuck in a
//! blocking pull.
//!
//! Dropping an [`Iter`] already unwinds everything upstream of it. That does
//! not help a consumer blocked in [`Iter::next`] on another thread, so
//! [`Iter::with_cancel`] inserts a relay stage that also watches a
//! [`CancelToken`]. Cancelling closes the relay's downstream (the blocked
//! consumer sees the end of the sequence) and drops its upstream.

use crossbeam::channel::{self, Receiver, Sender, TryRecvError};

use crate::error::{Error, Result};
use crate::iter::{spawn_stage, Iter};

/// Fires the paired tokens when [`cancel`](Canceller::cancel)led or dropped.
#[derive(Debug)]
pub struct Canceller {
    _tx: Sender<()>,
}

/// Observes a [`Canceller`]. Clone it to watch several pipelines.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: Receiver<()>,
}

pub fn cancel_pair() -> (Canceller, CancelToken) {
    let (tx, rx) = channel::bounded(0);
    (Canceller { _tx: tx }, CancelToken { rx })
}

impl Canceller {
    pub fn cancel(self) {}
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// `Err(Error::Cancelled)` once cancelled; for use inside long-running
    /// callbacks.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl<T: Send + 'static> Iter<T> {
    /// Relay this sequence until `token` is cancelled, then close.
    pub fn with_cancel(self, token: CancelToken) -> Iter<T> {
        let config = self.shared_config();
        spawn_stage(config, "cancel", move |out| {
            let upstream = self.into_receiver();
            loop {
                if token.is_cancelled() {
                    return Ok(());
                }
                let value = channel::select! {
                    recv(upstream) -> msg => match msg {
                        Ok(value) => value,
                        Err(_) => return Ok(()),
                    },
                    recv(token.rx) -> _ => return Ok(()),
                };
                if !out.push_unless(value, &token.rx)? {
                    return Ok(());
                }
            }
        })
    }
}
