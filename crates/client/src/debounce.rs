use std::sync::Mutex;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiet period used by the catalog search box.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Forwards a value to the receiver only after `delay` passes with no newer
/// value. Each `push` cancels the pending one.
pub struct Debouncer<T> {
    delay: Duration,
    tx: mpsc::UnboundedSender<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { delay, tx, pending: Mutex::new(None) }, rx)
    }

    /// Must be called inside a tokio runtime.
    pub fn push(&self, value: T) {
        let tx = self.tx.clone();
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        });
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = pending.replace(task) {
            old.abort();
        }
    }

    /// Drop the pending value, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(old) = pending.take() {
            old.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(task) = pending.take() {
                task.abort();
            }
        }
    }
}
