//! Strings watcher.
//!
//! A watcher delivers batches of changed entity ids. The producing side
//! holds a [`WatchSender`]; once the watcher is stopped or dropped, sends
//! report failure so producers can prune their subscriber lists.
//!
//! Changes sent while the consumer is not reading are merged into one
//! pending batch (each id once, first-seen order), so an idle watcher
//! holds at most one id per entity.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Create a connected sender/watcher pair.
pub fn channel() -> (WatchSender, StringsWatcher) {
    let shared = Arc::new(Shared {
        pending: Mutex::new(Pending::default()),
        notify: Notify::new(),
        senders: AtomicUsize::new(1),
    });
    let (stop_tx, stop_rx) = watch::channel(false);
    (
        WatchSender {
            shared: shared.clone(),
            stopped: stop_rx,
        },
        StringsWatcher { shared, stop_tx },
    )
}

#[derive(Debug, Default)]
struct Pending {
    ids: Vec<String>,
    /// Set once a change (possibly empty) is waiting to be read.
    ready: bool,
}

impl Pending {
    fn merge(&mut self, changes: Vec<String>) {
        for id in changes {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        self.ready = true;
    }

    fn take(&mut self) -> Option<Vec<String>> {
        if !self.ready {
            return None;
        }
        self.ready = false;
        Some(std::mem::take(&mut self.ids))
    }
}

#[derive(Debug)]
struct Shared {
    pending: Mutex<Pending>,
    notify: Notify,
    senders: AtomicUsize,
}

/// Producer half of a strings watcher.
#[derive(Debug)]
pub struct WatchSender {
    shared: Arc<Shared>,
    stopped: watch::Receiver<bool>,
}

impl WatchSender {
    /// Queue a change. Returns false if the watcher is gone.
    pub fn send(&self, changes: Vec<String>) -> bool {
        if self.is_closed() {
            return false;
        }
        self.shared.pending.lock().merge(changes);
        self.shared.notify.notify_one();
        true
    }

    /// Check if the consuming watcher has been stopped or dropped.
    pub fn is_closed(&self) -> bool {
        *self.stopped.borrow() || self.stopped.has_changed().is_err()
    }
}

impl Clone for WatchSender {
    fn clone(&self) -> Self {
        self.shared.senders.fetch_add(1, Ordering::AcqRel);
        Self {
            shared: self.shared.clone(),
            stopped: self.stopped.clone(),
        }
    }
}

impl Drop for WatchSender {
    fn drop(&mut self) {
        if self.shared.senders.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.shared.notify.notify_one();
        }
    }
}

/// Consumer half of a strings watcher.
#[derive(Debug)]
pub struct StringsWatcher {
    shared: Arc<Shared>,
    stop_tx: watch::Sender<bool>,
}

impl StringsWatcher {
    /// Wait for the next change.
    ///
    /// Returns `None` once the watcher is stopped, or once the producer is
    /// gone and nothing is pending.
    pub async fn next(&self) -> Option<Vec<String>> {
        let mut stopped = self.stop_tx.subscribe();
        loop {
            if *stopped.borrow_and_update() {
                return None;
            }
            let pending = self.shared.pending.lock().take();
            if pending.is_some() {
                return pending;
            }
            if self.shared.senders.load(Ordering::Acquire) == 0 {
                return None;
            }
            tokio::select! {
                biased;
                _ = stopped.changed() => {}
                _ = self.shared.notify.notified() => {}
            }
        }
    }

    /// Take a pending change without waiting.
    pub fn try_next(&self) -> Option<Vec<String>> {
        if self.is_stopped() {
            return None;
        }
        self.shared.pending.lock().take()
    }

    /// Stop the watcher. Pending and future changes are discarded.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
        *self.shared.pending.lock() = Pending::default();
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }
}
