// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Producer/consumer synchronizer that assigns a dense ordinal to every
//! input file and delivers completion notifications to a single
//! downstream consumer strictly in ordinal order, regardless of the
//! order resolver threads finish in.
//!
//! # Architecture
//!
//! A [`parking_lot::Mutex`] guards a min-heap of completed-but-undelivered
//! ordinals plus the consumer's current position; a [`parking_lot::Condvar`]
//! wakes the (single) consumer when the heap's minimum matches its
//! position, or when the gate closes. The gate's hot path is a heap
//! push/pop under the lock, not a single atomic store, so there is no
//! benefit to a separate lock-free fast path the way there would be for
//! a plain idle-wait flag.

use parking_lot::{Condvar, Mutex};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(debug_assertions)]
use std::collections::HashSet;

struct Inner {
    waiting: BinaryHeap<Reverse<u32>>,
    consumer_pos: u32,
    done: bool,
    error: bool,
    #[cfg(debug_assertions)]
    visited: HashSet<u32>,
    #[cfg(debug_assertions)]
    open_ranges: Vec<(u32, u32)>,
}

/// Producer/consumer ordinal synchronizer. Lives for one link invocation.
pub struct OrdinalGate {
    bias: AtomicU32,
    inner: Mutex<Inner>,
    condvar: Condvar,
}

impl OrdinalGate {
    pub fn new() -> Self {
        Self {
            bias: AtomicU32::new(0),
            inner: Mutex::new(Inner {
                waiting: BinaryHeap::new(),
                consumer_pos: 0,
                done: false,
                error: false,
                #[cfg(debug_assertions)]
                visited: HashSet::new(),
                #[cfg(debug_assertions)]
                open_ranges: Vec::new(),
            }),
            condvar: Condvar::new(),
        }
    }

    /// Atomically reserve `group_members` contiguous ordinals for the next
    /// round and return the base of that range. Ordinals for the group
    /// are `[base, base + group_members)`.
    pub fn start_group(&self, group_members: u32) -> u32 {
        let base = self.bias.fetch_add(group_members, Ordering::SeqCst);
        #[cfg(debug_assertions)]
        {
            self.inner
                .lock()
                .open_ranges
                .push((base, base + group_members));
        }
        base
    }

    /// Notify the gate that the file at `ordinal` finished. May be called
    /// from any resolver thread, in any order, any number of times across
    /// different ordinals concurrently.
    ///
    /// # Panics
    /// In debug builds: if called after [`OrdinalGate::done`], if
    /// `ordinal` falls outside every range handed out by
    /// [`OrdinalGate::start_group`], or if `ordinal` was already
    /// delivered via a prior `file_completed` call.
    pub fn file_completed(&self, ordinal: u32) {
        let mut inner = self.inner.lock();
        debug_assert!(!inner.done, "file_completed({ordinal}) after done()");
        #[cfg(debug_assertions)]
        {
            assert!(
                inner
                    .open_ranges
                    .iter()
                    .any(|&(lo, hi)| ordinal >= lo && ordinal < hi),
                "ordinal {ordinal} outside any group range handed out by start_group"
            );
            assert!(
                inner.visited.insert(ordinal),
                "duplicate file_completed({ordinal})"
            );
        }
        inner.waiting.push(Reverse(ordinal));
        self.condvar.notify_one();
    }

    /// Mark the gate closed: no more ordinals will ever be completed.
    /// The consumer drains whatever is already queued, then `next()`
    /// returns `None`.
    pub fn done(&self) {
        let mut inner = self.inner.lock();
        inner.done = true;
        self.condvar.notify_all();
    }

    /// Signal an unrecoverable failure. `next()` immediately (and from
    /// then on) returns `None`, and pending ordinals remain unserved.
    pub fn error(&self) {
        let mut inner = self.inner.lock();
        inner.error = true;
        self.condvar.notify_all();
    }

    pub fn has_error(&self) -> bool {
        self.inner.lock().error
    }

    /// Block until the next ordinal in sequence is ready, the gate has
    /// drained cleanly, or an error was signaled. Only one thread may
    /// call `next()` at a time.
    pub fn next(&self) -> Option<u32> {
        let mut inner = self.inner.lock();
        loop {
            if inner.error {
                return None;
            }
            if inner.done && inner.waiting.is_empty() {
                return None;
            }
            if let Some(&Reverse(top)) = inner.waiting.peek() {
                if top == inner.consumer_pos {
                    inner.waiting.pop();
                    let delivered = inner.consumer_pos;
                    inner.consumer_pos += 1;
                    return Some(delivered);
                }
            }
            self.condvar.wait(&mut inner);
        }
    }
}

impl Default for OrdinalGate {
    fn default() -> Self {
        Self::new()
    }
}
