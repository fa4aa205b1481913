//! Weakly-held subscriber list.
//!
//! Subscribers are never kept alive by the registry. Dead entries are skipped
//! and dropped during `broadcast`, and swept on `subscribe` once the list grows
//! past an adaptive threshold.

use std::sync::{Arc, Weak};

pub struct WeakRegistry<T> {
    entries: Vec<Weak<T>>,
    min_threshold: usize,
    next_prune: usize,
}

impl<T> WeakRegistry<T> {
    pub fn new(prune_threshold: usize) -> Self {
        let min_threshold = prune_threshold.max(1);
        Self {
            entries: Vec::new(),
            min_threshold,
            next_prune: min_threshold,
        }
    }

    /// Registers `subscriber`, sweeping dead entries first when the list is due.
    /// Returns the number of dead entries removed by that sweep.
    pub fn subscribe(&mut self, subscriber: &Arc<T>) -> usize {
        let mut pruned = 0;
        if self.entries.len() >= self.next_prune {
            pruned = self.prune();
            self.next_prune = (self.entries.len() * 2).max(self.min_threshold);
        }
        self.entries.push(Arc::downgrade(subscriber));
        pruned
    }

    /// Delivers to every live subscriber in subscription order. `deliver`
    /// returns whether the subscriber still wants notifications; entries that
    /// return false or are dead are removed.
    pub fn broadcast<F>(&mut self, mut deliver: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.entries.retain(|weak| match weak.upgrade() {
            Some(sub) => deliver(&sub),
            None => false,
        });
    }

    /// Drops entries whose subscriber is gone. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|weak| weak.strong_count() > 0);
        before - self.entries.len()
    }

    /// Number of entries, including dead ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_count(&self) -> usize {
        self.entries.iter().filter(|w| w.strong_count() > 0).count()
    }
}
