//! Debounced query settling.
//!
//! Raw keystroke values go in through [`QueryDebouncer::push`]; a value comes
//! out of the settled receiver only after no newer value has arrived for the
//! whole quiet window.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Handle feeding raw query values to the debounce task.
#[derive(Clone)]
pub struct QueryDebouncer {
    raw_tx: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
    window: Duration,
}

impl QueryDebouncer {
    /// Spawn the debounce task.
    ///
    /// Returns the input handle and the receiver of settled values. The task
    /// stops when `cancel` fires, when every handle is dropped, or when the
    /// settled receiver is dropped.
    pub fn spawn(
        window: Duration,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (raw_tx, raw_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        tokio::spawn(run(window, cancel.clone(), raw_rx, settled_tx));

        (
            Self {
                raw_tx,
                cancel,
                window,
            },
            settled_rx,
        )
    }

    /// Feed one raw value; restarts the quiet window.
    pub fn push(&self, raw: &str) {
        if self.cancel.is_cancelled() {
            return;
        }
        // Send only fails once the task has stopped.
        let _ = self.raw_tx.send(raw.trim().to_string());
    }

    /// Drop any pending value without emitting it and stop the task.
    pub fn teardown(&self) {
        self.cancel.cancel();
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled() && !self.raw_tx.is_closed()
    }
}

async fn run(
    window: Duration,
    cancel: CancellationToken,
    mut raw_rx: mpsc::UnboundedReceiver<String>,
    settled_tx: mpsc::UnboundedSender<String>,
) {
    let mut pending: Option<String> = None;

    loop {
        match pending.take() {
            None => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = raw_rx.recv() => match next {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                }
            }
            Some(current) => {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        trace!(component = "debounce", "Pending value dropped on teardown");
                        break;
                    }
                    next = raw_rx.recv() => match next {
                        // Newer value restarts the window.
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    _ = sleep(window) => {
                        // Repeats are emitted too: retyping the current
                        // query must still drop an active mood.
                        debug!(component = "debounce", query = %current, "Query settled");
                        if settled_tx.send(current).is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }

    debug!(component = "debounce", "Debounce task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_burst_settles_once_on_last_value() {
        let (debouncer, mut settled) = QueryDebouncer::spawn(WINDOW, CancellationToken::new());

        debouncer.push("b");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("ba");
        sleep(Duration::from_millis(100)).await;
        debouncer.push("bat");

        let start = tokio::time::Instant::now();
        assert_eq!(settled.recv().await.as_deref(), Some("bat"));
        assert!(start.elapsed() >= WINDOW);

        sleep(WINDOW * 3).await;
        assert!(settled.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_whitespace_settles_as_empty() {
        let (debouncer, mut settled) = QueryDebouncer::spawn(WINDOW, CancellationToken::new());
        debouncer.push("   ");
        assert_eq!(settled.recv().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_value_settles_again() {
        let (debouncer, mut settled) = QueryDebouncer::spawn(WINDOW, CancellationToken::new());

        debouncer.push("heat");
        assert_eq!(settled.recv().await.as_deref(), Some("heat"));

        debouncer.push("");
        debouncer.push("heat ");
        assert_eq!(settled.recv().await.as_deref(), Some("heat"));

        debouncer.push("");
        assert_eq!(settled.recv().await.as_deref(), Some(""));
        debouncer.push("  ");
        assert_eq!(settled.recv().await.as_deref(), Some(""));
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_mid_window_emits_nothing() {
        let (debouncer, mut settled) = QueryDebouncer::spawn(WINDOW, CancellationToken::new());

        debouncer.push("alien");
        sleep(Duration::from_millis(200)).await;
        debouncer.teardown();

        sleep(WINDOW * 2).await;
        // Task has exited and dropped its sender.
        assert_eq!(settled.recv().await, None);
        assert!(!debouncer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_after_teardown_is_ignored() {
        let cancel = CancellationToken::new();
        let (debouncer, mut settled) = QueryDebouncer::spawn(WINDOW, cancel.clone());
        cancel.cancel();
        debouncer.push("late");
        assert_eq!(settled.recv().await, None);
    }
}
