//! The currently selected network.
//!
//! Exactly one network (or none) is selected at a time.  The selection is
//! owned by the `NetService`; only `select` and `clear` change it.  Views
//! that need to react to a change hold a [`watch::Receiver`] from
//! [`Selection::subscribe`] and re-run the `net` query when it fires.
//!
//! A `watch` channel keeps only the latest value, which is exactly the
//! semantics of a selection: intermediate values a slow reader missed are
//! irrelevant.

use netstudio_core::NetId;
use tokio::sync::watch;
use tracing::debug;

/// Reactive cell holding the selected network id.
pub struct Selection {
    tx: watch::Sender<Option<NetId>>,
}

impl Default for Selection {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected id, or `None` when nothing is selected.
    pub fn current(&self) -> Option<NetId> {
        *self.tx.borrow()
    }

    /// Selects `id`.  Subscribers are notified only if the value changed.
    pub fn select(&self, id: NetId) {
        self.set(Some(id));
    }

    /// Resets to "no selection".
    pub fn clear(&self) {
        self.set(None);
    }

    /// Returns a receiver that observes future changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<NetId>> {
        self.tx.subscribe()
    }

    fn set(&self, value: Option<NetId>) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        });
        if changed {
            debug!(selected = ?value, "selection changed");
        }
    }
}
