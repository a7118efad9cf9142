//! Done signal shared by the search workers
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle that stops a running search.
///
/// Cancelling drops the only sender of the done channel, so every worker
/// blocked in a `select!` on `done()` wakes up with a disconnect.
#[derive(Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    sender: Arc<Mutex<Option<Sender<()>>>>,
    done: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (sender, done) = bounded(0);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            sender: Arc::new(Mutex::new(Some(sender))),
            done,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.sender.lock().take();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Receiver that never yields a value and disconnects on cancel.
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::TryRecvError;

    #[test]
    fn test_cancel_disconnects_done() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        assert_eq!(token.done().try_recv(), Err(TryRecvError::Empty));

        let clone = token.clone();
        clone.cancel();

        assert!(token.is_cancelled());
        assert_eq!(token.done().try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
