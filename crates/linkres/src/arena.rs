// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Append-only arenas for [`crate::symbol::Symbol`] and
//! [`crate::symbol::Compilationref`] records.
//!
//! # Architecture
//!
//! Each arena owns a `Vec<Box<T>>` behind a single lock. Appends are
//! serialized by that lock; the returned reference borrows the *heap
//! allocation* inside the `Box`, not the `Vec`'s backing storage, so it
//! stays valid across later `Vec` growth (push/realloc only moves the
//! pointers, never the boxed payload). Entries are never freed or moved
//! for the lifetime of the arena, matching the shadow map's requirement
//! that published pointers remain dereferenceable forever.
//!
//! # Performance
//!
//! `emplace` holds the arena lock only long enough to push one `Box` --
//! the allocation itself happens before the lock is taken.

use parking_lot::Mutex;
use std::mem::align_of;

/// Owner of `T` records referenced from the shadow map.
///
/// `T` must have alignment >= 2 so that a pointer to it has a free low
/// bit, which the shadow slot uses to distinguish symbols from
/// compilation-refs (see [`crate::shadow::TaggedPtr`]).
pub struct Arena<T> {
    entries: Mutex<Vec<Box<T>>>,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        const { assert!(align_of::<T>() >= 2, "arena entries need a free tag bit") };
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Construct `value` and append it, returning a stable reference.
    ///
    /// # Safety rationale
    ///
    /// The returned reference outlives the lock guard used to publish it.
    /// This is sound because the arena never drops or relocates a `Box`'s
    /// heap allocation -- only `Vec::push` runs under the lock, and a
    /// `Box<T>`'s pointee address is immutable once created. The
    /// reference's true lifetime is bounded by `&self`, matching the
    /// arena's own lifetime, which outlives every shadow-map slot that
    /// stores the returned pointer.
    pub fn emplace(&self, value: T) -> &T {
        let boxed = Box::new(value);
        let ptr: *const T = boxed.as_ref();
        let mut entries = self.entries.lock();
        entries.push(boxed);
        // SAFETY: see doc comment above.
        unsafe { &*ptr }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: access to the `Vec<Box<T>>` is always serialized by `entries`'s
// lock; `T: Send` is required transitively via `Mutex`'s own bound, and
// shared `&T` references handed out by `emplace` require `T: Sync` to be
// read concurrently, which callers get from the `Sync` bound below.
unsafe impl<T: Send> Send for Arena<T> {}
unsafe impl<T: Send + Sync> Sync for Arena<T> {}
