// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mutex-guarded hash sets shared by the driver and its workers: the
//! undefs set and the next-group set.
//!
//! Both are instances of the same small [`ConcurrentSet`] wrapper --
//! iteration snapshots are not required; `for_each` simply holds the lock
//! for the callback's duration, so callbacks must not call back into the
//! same set.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::hash::Hash;

pub struct ConcurrentSet<T> {
    items: Mutex<HashSet<T>>,
}

impl<T: Eq + Hash + Clone> ConcurrentSet<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashSet::new()),
        }
    }

    pub fn add(&self, value: T) {
        self.items.lock().insert(value);
    }

    /// Returns whether `value` was present before removal.
    pub fn erase(&self, value: &T) -> bool {
        self.items.lock().remove(value)
    }

    pub fn has(&self, value: &T) -> bool {
        self.items.lock().contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Holds the lock for the duration of `f`. `f` must not call back
    /// into this same set.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        let items = self.items.lock();
        for item in items.iter() {
            f(item);
        }
    }

    /// Empty the set, returning whether it was non-empty beforehand.
    pub fn clear(&self) -> bool {
        let mut items = self.items.lock();
        let had_items = !items.is_empty();
        items.clear();
        had_items
    }
}

impl<T: Eq + Hash + Clone> Default for ConcurrentSet<T> {
    fn default() -> Self {
        Self::new()
    }
}
