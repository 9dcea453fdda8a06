//! Form context observer.
//!
//! Rebuilds a [`FormSnapshot`] whenever the form reports an input or change
//! event and broadcasts it to listeners, skipping events that did not
//! change any value.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use medconnect_core::models::form::{FormField, FormSnapshot};

use crate::source::FormSource;

pub struct FormObserver {
    source: Arc<dyn FormSource>,
    tx: watch::Sender<FormSnapshot>,
    last_hash: AtomicU64,
}

impl FormObserver {
    /// Read the form once and start observing it.
    pub fn new(source: Arc<dyn FormSource>) -> Self {
        let snapshot = read_snapshot(source.as_ref());
        let hash = snapshot.content_hash();
        Self {
            source,
            tx: watch::Sender::new(snapshot),
            last_hash: AtomicU64::new(hash),
        }
    }

    /// Handle an input/change event.
    ///
    /// Returns `true` when the snapshot changed and was broadcast.
    pub fn refresh(&self) -> bool {
        let snapshot = read_snapshot(self.source.as_ref());
        let hash = snapshot.content_hash();

        if self.last_hash.swap(hash, Ordering::AcqRel) == hash {
            return false;
        }

        debug!(
            filled = snapshot.filled().count(),
            sufficient = snapshot.is_sufficient(),
            "form context changed"
        );
        self.tx.send_replace(snapshot);
        true
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.tx.borrow().clone()
    }

    pub fn has_sufficient_context(&self) -> bool {
        self.tx.borrow().is_sufficient()
    }

    /// Listen for future snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.tx.subscribe()
    }
}

fn read_snapshot(source: &dyn FormSource) -> FormSnapshot {
    FormSnapshot::from_fields(
        FormField::ALL
            .into_iter()
            .map(|field| (field, source.read(field).unwrap_or_default())),
    )
}
