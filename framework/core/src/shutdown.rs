use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::{Receiver, Sender};
use tokio::sync::Mutex;

/// Broadcasts a single shutdown signal to every listener created from it.
///
/// The simulator has no pre-emptive cancellation. Listeners are checked at iteration and
/// scenario boundaries so that a long batch stops between measurements rather than in the
/// middle of one.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.sender.send(()) {
            // Nobody is listening, so there is nothing to stop.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

#[derive(Clone, Debug)]
pub struct DelegatedShutdownListener {
    receiver: Arc<Mutex<Receiver<()>>>,
    // Latched once the signal has been observed so that clones sharing the receiver keep
    // reporting the shutdown after the single broadcast value has been consumed.
    observed: Arc<AtomicBool>,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver: Arc::new(Mutex::new(receiver)),
            observed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Point in time check for the shutdown signal. Once this returns true it keeps returning
    /// true.
    pub fn should_shutdown(&self) -> bool {
        if self.observed.load(Ordering::Acquire) {
            return true;
        }

        let seen = match self.receiver.try_lock() {
            Ok(mut guard) => match guard.try_recv() {
                Ok(_) => true,
                Err(TryRecvError::Closed) => true,
                // Empty or lagged, keep going.
                Err(_) => false,
            },
            Err(_) => false,
        };

        if seen {
            self.observed.store(true, Ordering::Release);
        }

        seen
    }

    /// Wait until the shutdown signal is received. Safe to race against other work with
    /// `tokio::select!`.
    pub async fn wait_for_shutdown(&self) {
        if self.observed.load(Ordering::Acquire) {
            return;
        }

        match self.receiver.lock().await.recv().await {
            Ok(()) | Err(RecvError::Closed) | Err(RecvError::Lagged(_)) => {
                self.observed.store(true, Ordering::Release);
            }
        }
    }
}
