//! Cancellable deferred action used to reset a finished round.

use derive_more::Display;
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Identifies one scheduling of a [`RoundTimer`].
///
/// The fired action hands its ticket back to the owner, which calls
/// [`RoundTimer::claim`] before running any effect. Tickets from cancelled
/// or superseded schedules are refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("timer#{_0}")]
pub struct Ticket(u64);

#[derive(Debug)]
struct Pending {
    ticket: Ticket,
    handle: JoinHandle<()>,
}

/// Holds at most one pending deferred action.
///
/// Dropping the timer cancels whatever is pending.
#[derive(Debug, Default)]
pub struct RoundTimer {
    issued: u64,
    pending: Option<Pending>,
}

impl RoundTimer {
    /// Creates an idle timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any pending action, then runs `action` once after `delay`.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self, action))]
    pub fn schedule<F, Fut>(&mut self, delay: Duration, action: F) -> Ticket
    where
        F: FnOnce(Ticket) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(ticket).await;
        });
        debug!(%ticket, "Deferred action scheduled");
        self.pending = Some(Pending { ticket, handle });
        ticket
    }

    /// Prevents the pending action from firing. No-op when idle.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            debug!(ticket = %pending.ticket, "Deferred action cancelled");
        }
    }

    /// Accepts a fired ticket if it is the one currently pending.
    ///
    /// Returns `true` exactly once per schedule and leaves the timer idle.
    pub fn claim(&mut self, ticket: Ticket) -> bool {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending = None;
                true
            }
            _ => {
                debug!(%ticket, "Stale timer ticket refused");
                false
            }
        }
    }

    /// Whether an action is scheduled and not yet claimed or cancelled.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    const DELAY: Duration = Duration::from_secs(5);

    fn counting_action(
        fired: &Arc<AtomicUsize>,
    ) -> impl FnOnce(Ticket) -> std::future::Ready<()> + Send + 'static {
        let fired = Arc::clone(fired);
        move |_| {
            fired.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = RoundTimer::new();
        timer.schedule(DELAY, counting_action(&fired));

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = RoundTimer::new();
        let first = timer.schedule(DELAY, counting_action(&fired));
        let second = timer.schedule(DELAY, counting_action(&fired));
        assert_ne!(first, second);

        tokio::time::sleep(DELAY * 3).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!timer.claim(first));
        assert!(timer.claim(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = RoundTimer::new();
        timer.cancel();
        timer.schedule(DELAY, counting_action(&fired));
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_pending());

        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticket_fired_then_cancelled_is_refused() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = RoundTimer::new();
        timer.schedule(DELAY, move |ticket| async move {
            let _ = tx.send(ticket);
        });

        let ticket = rx.recv().await.unwrap();
        timer.cancel();
        assert!(!timer.claim(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut timer = RoundTimer::new();
            timer.schedule(DELAY, counting_action(&fired));
        }
        tokio::time::sleep(DELAY * 2).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
