//! Publish/subscribe registry for ranking snapshots.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::UserRanking;

/// Callback receiving a full snapshot of every stored ranking.
pub type RankingListener = Arc<dyn Fn(&[UserRanking]) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, RankingListener)>>,
    publishing: Mutex<()>,
}

impl Registry {
    fn remove(&self, id: u64) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(candidate, _)| *candidate != id);
    }
}

/// Observer list shared by store implementations.
///
/// Stores open a [`Publication`] with [`RankingFeed::begin`] before they
/// write, take their snapshot while holding it, and deliver through it.
/// Publications are exclusive, so listeners see snapshots in write order
/// even when several threads write at once. Every listener receives the
/// whole snapshot, never a delta.
///
/// Listeners run while the publication is held and must not write to the
/// store that feeds them.
#[derive(Clone, Default)]
pub struct RankingFeed {
    registry: Arc<Registry>,
}

impl std::fmt::Debug for RankingFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingFeed")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl RankingFeed {
    /// Create an empty feed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until no other publication is open, then open one.
    pub fn begin(&self) -> Publication<'_> {
        Publication {
            registry: &self.registry,
            _turn: self
                .registry
                .publishing
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Register `listener` and hand it `snapshot` straight away.
    ///
    /// Shorthand for a publication that only registers.
    pub fn register(&self, listener: RankingListener, snapshot: &[UserRanking]) -> Subscription {
        self.begin().register(listener, snapshot)
    }

    /// Deliver `snapshot` to every registered listener.
    ///
    /// Shorthand for a publication with no write of its own.
    pub fn publish(&self, snapshot: &[UserRanking]) {
        self.begin().publish(snapshot);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive turn on a [`RankingFeed`].
///
/// Dropping it without publishing delivers nothing, which is what a failed
/// write wants.
#[must_use = "a publication delivers nothing unless published"]
pub struct Publication<'feed> {
    registry: &'feed Arc<Registry>,
    _turn: MutexGuard<'feed, ()>,
}

impl std::fmt::Debug for Publication<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publication").finish_non_exhaustive()
    }
}

impl Publication<'_> {
    /// Register `listener`, hand it `snapshot` and close the publication.
    pub fn register(self, listener: RankingListener, snapshot: &[UserRanking]) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        listener(snapshot);
        self.registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        Subscription {
            id,
            registry: Arc::downgrade(self.registry),
        }
    }

    /// Deliver `snapshot` to every listener and close the publication.
    ///
    /// Listeners are called outside the registry lock, so a listener may
    /// drop its own subscription.
    pub fn publish(self, snapshot: &[UserRanking]) {
        let listeners: Vec<RankingListener> = self
            .registry
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        log::debug!(
            "publishing {} rankings to {} listeners",
            snapshot.len(),
            listeners.len()
        );
        for listener in listeners {
            listener(snapshot);
        }
    }
}

/// Handle keeping a listener registered; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Registry>,
}

impl Subscription {
    /// Stop receiving snapshots.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}
