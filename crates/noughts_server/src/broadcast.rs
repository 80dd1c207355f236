//! Session registry and snapshot fan-out.

use crate::state::RoundState;
use derive_more::{Display, Error};
use noughts_board::Mark;
use std::collections::BTreeMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Rejection returned by admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum AdmitError {
    /// Both marks are held by live connections.
    #[display("2 players already connected")]
    CapacityExceeded,
    /// The coordinator has stopped.
    #[display("Game coordinator is closed")]
    Closed,
}

/// A snapshot could not be queued for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Outbound channel for {mark} is closed")]
pub struct DeliveryError {
    /// Recipient whose queue is gone.
    pub mark: Mark,
}

/// Sending half of a participant's outbound snapshot queue.
///
/// Pushing never blocks; the connection's writer drains the queue at its
/// own pace, so one slow socket cannot stall the coordinator.
#[derive(Debug, Clone)]
pub struct Outbox(mpsc::UnboundedSender<Arc<RoundState>>);

/// Receiving half of a participant's outbound snapshot queue.
#[derive(Debug)]
pub struct Inbox(mpsc::UnboundedReceiver<Arc<RoundState>>);

impl Outbox {
    /// Creates a connected outbox/inbox pair.
    pub fn channel() -> (Outbox, Inbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbox(tx), Inbox(rx))
    }

    fn deliver(&self, mark: Mark, snapshot: &Arc<RoundState>) -> Result<(), DeliveryError> {
        self.0
            .send(Arc::clone(snapshot))
            .map_err(|_| DeliveryError { mark })
    }

    /// Whether the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.0.is_closed()
    }
}

impl Inbox {
    /// Waits for the next snapshot; `None` once the outbox side is gone.
    pub async fn recv(&mut self) -> Option<Arc<RoundState>> {
        self.0.recv().await
    }

    /// Takes the next queued snapshot without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<RoundState>> {
        self.0.try_recv().ok()
    }
}

/// Maps each held mark to its connection's outbox. Never more than two.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    slots: BTreeMap<Mark, Outbox>,
}

impl SessionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `outbox` to the first free mark, `X` before `O`.
    ///
    /// # Errors
    ///
    /// Returns [`AdmitError::CapacityExceeded`] when both marks are taken.
    #[instrument(skip(self, outbox), fields(held = self.slots.len()))]
    pub fn admit(&mut self, outbox: Outbox) -> Result<Mark, AdmitError> {
        let mark = Mark::iter()
            .find(|mark| !self.slots.contains_key(mark))
            .ok_or_else(|| {
                warn!("Both marks already held");
                AdmitError::CapacityExceeded
            })?;
        self.slots.insert(mark, outbox);
        info!(%mark, "Mark assigned");
        Ok(mark)
    }

    /// Frees `mark`. Returns whether it was held.
    #[instrument(skip(self))]
    pub fn evict(&mut self, mark: Mark) -> bool {
        let held = self.slots.remove(&mark).is_some();
        if !held {
            debug!("Evicting a mark that was not held");
        }
        held
    }

    /// Whether `mark` is currently held.
    pub fn contains(&self, mark: Mark) -> bool {
        self.slots.contains_key(&mark)
    }

    /// Number of held marks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no mark is held.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Queues `snapshot` for every registered participant.
    ///
    /// A closed queue is logged and skipped. Returns how many recipients
    /// accepted the snapshot.
    #[instrument(skip_all, fields(version = snapshot.version()))]
    pub fn publish(&self, snapshot: &Arc<RoundState>) -> usize {
        let mut delivered = 0;
        for (mark, outbox) in &self.slots {
            match outbox.deliver(*mark, snapshot) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(error = %e, "Dropping snapshot"),
            }
        }
        debug!(delivered, "Snapshot published");
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admit_prefers_x_then_o_then_rejects() {
        let mut registry = SessionRegistry::new();
        assert_eq!(registry.admit(Outbox::channel().0), Ok(Mark::X));
        assert_eq!(registry.admit(Outbox::channel().0), Ok(Mark::O));
        for _ in 0..5 {
            assert_eq!(
                registry.admit(Outbox::channel().0),
                Err(AdmitError::CapacityExceeded)
            );
        }
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_evict_frees_slot_for_readmission() {
        let mut registry = SessionRegistry::new();
        registry.admit(Outbox::channel().0).unwrap();
        registry.admit(Outbox::channel().0).unwrap();
        assert!(registry.evict(Mark::X));
        assert!(!registry.evict(Mark::X));
        assert_eq!(registry.admit(Outbox::channel().0), Ok(Mark::X));
    }

    #[test]
    fn test_closed_recipient_does_not_block_other() {
        let mut registry = SessionRegistry::new();
        let (dead, dead_inbox) = Outbox::channel();
        let (live, mut live_inbox) = Outbox::channel();
        registry.admit(dead).unwrap();
        registry.admit(live).unwrap();
        drop(dead_inbox);

        let snapshot = Arc::new(RoundState::new());
        assert_eq!(registry.publish(&snapshot), 1);
        assert_eq!(live_inbox.try_recv(), Some(snapshot));
    }

    #[test]
    fn test_per_recipient_order() {
        let mut registry = SessionRegistry::new();
        let (outbox, mut inbox) = Outbox::channel();
        registry.admit(outbox).unwrap();

        let first = Arc::new(RoundState::new());
        let second = Arc::new(first.with_connected(Mark::X));
        registry.publish(&first);
        registry.publish(&second);
        assert_eq!(inbox.try_recv().map(|s| s.version()), Some(0));
        assert_eq!(inbox.try_recv().map(|s| s.version()), Some(1));
        assert_eq!(inbox.try_recv(), None);
    }
}
