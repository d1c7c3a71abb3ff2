// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shadow memory: a fixed-size array of atomic tagged-pointer slots, one
//! per possible symbol address, implementing the four-state resolution
//! protocol described in the module overview below.
//!
//! # Architecture
//!
//! Each slot holds one machine word encoding `NULL` | `BUSY` | `symbol*` |
//! `compilationref*`. The low bit of a published pointer tags which kind
//! it is; arena records are aligned >= 2 so that bit is always free on a
//! freshly constructed pointer (see [`crate::arena::Arena`]).
//!
//! Every visible transition passes through `BUSY`:
//!
//! ```text
//! NULL    --CAS--> BUSY --create()-------------> {symbol*, cref*}
//! cref*   --CAS--> BUSY --create_from_cref(cref)-> {symbol*, cref*}
//! symbol* --CAS--> BUSY --update(sym)-----------> {symbol*, cref*}
//! ```
//!
//! Once a symbol exists for a name, only `update` ever runs on that slot,
//! never `create_from_cref` again. `update`'s return type is the full
//! `TaggedPtr`, not a bare symbol reference: archive discovery's
//! `match_undef_in_archive` (`crate::worker::discovery`) uses exactly this
//! to reclaim an *undefined* symbol's slot for a fresh archive claim,
//! rewriting the slot's tagged target from `symbol*` to `cref*` while
//! leaving the now-unreferenced symbol object allocated (arenas are
//! append-only; nothing is ever freed).
//!
//! # Memory ordering
//!
//! The CAS into `BUSY` uses acquire-release on success, relaxed on
//! failure. Publishing the final value is a release store; every load
//! that might observe a non-`BUSY` value is an acquire load. Together
//! these establish happens-before from a callback's writes (e.g.
//! constructing the arena object `create` returns) to the next thread
//! that observes the published slot.

use crate::model::Address;
use crate::symbol::{Compilationref, Symbol};
use std::sync::atomic::{AtomicUsize, Ordering};

const NULL: usize = 0;
const BUSY: usize = usize::MAX;

/// A shadow slot's tagged payload once it is neither `NULL` nor `BUSY`.
#[derive(Clone, Copy)]
pub enum TaggedPtr<'a> {
    Symbol(&'a Symbol),
    Cref(&'a Compilationref),
}

impl<'a> TaggedPtr<'a> {
    fn encode(self) -> usize {
        match self {
            TaggedPtr::Symbol(sym) => {
                let raw = sym as *const Symbol as usize;
                debug_assert_eq!(raw & 1, 0, "symbol pointer must have a free tag bit");
                raw
            }
            TaggedPtr::Cref(cref) => {
                let raw = cref as *const Compilationref as usize;
                debug_assert_eq!(raw & 1, 0, "cref pointer must have a free tag bit");
                raw | 1
            }
        }
    }

    /// # Safety
    /// `raw` must be a value previously produced by [`TaggedPtr::encode`]
    /// from a reference into an arena that outlives `'a`, and must be
    /// neither `NULL` nor `BUSY`.
    unsafe fn decode(raw: usize) -> TaggedPtr<'a> {
        if raw & 1 == 1 {
            TaggedPtr::Cref(unsafe { &*((raw & !1) as *const Compilationref) })
        } else {
            TaggedPtr::Symbol(unsafe { &*(raw as *const Symbol) })
        }
    }
}

/// Fixed-size array of atomic shadow slots, one per address in
/// `0..shadow_size`.
pub struct ShadowMap {
    slots: Vec<AtomicUsize>,
}

impl ShadowMap {
    /// Allocate `size` slots, all initially `NULL`.
    pub fn new(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || AtomicUsize::new(NULL));
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drive one transition of the slot at `addr`. Exactly one of
    /// `create`, `create_from_cref`, or `update` runs, chosen by which
    /// edge the slot is currently on; the winner's result is published
    /// and returned.
    ///
    /// Callbacks run while the slot is held `BUSY` -- they must not block
    /// on this same slot, must not recursively call `set` on it, and must
    /// complete in bounded time, since every other thread waiting on this
    /// slot spins until the callback publishes its result.
    pub fn set<'a>(
        &self,
        addr: Address,
        create: impl FnOnce() -> TaggedPtr<'a>,
        create_from_cref: impl FnOnce(&'a Compilationref) -> TaggedPtr<'a>,
        update: impl FnOnce(&'a Symbol) -> TaggedPtr<'a>,
    ) -> TaggedPtr<'a> {
        let slot = &self.slots[addr.as_usize()];
        loop {
            let current = slot.load(Ordering::Acquire);

            if current == BUSY {
                std::thread::yield_now();
                continue;
            }

            if current == NULL {
                match slot.compare_exchange(NULL, BUSY, Ordering::AcqRel, Ordering::Relaxed) {
                    Ok(_) => {
                        let result = create();
                        slot.store(result.encode(), Ordering::Release);
                        return result;
                    }
                    Err(_) => continue,
                }
            }

            // SAFETY: `current` is neither NULL nor BUSY, so it was
            // published by a prior `set` call via `encode`, from a
            // reference into an arena the caller guarantees outlives
            // this shadow map.
            match unsafe { TaggedPtr::decode(current) } {
                TaggedPtr::Cref(cref) => {
                    match slot.compare_exchange(current, BUSY, Ordering::AcqRel, Ordering::Relaxed)
                    {
                        Ok(_) => {
                            let result = create_from_cref(cref);
                            slot.store(result.encode(), Ordering::Release);
                            return result;
                        }
                        Err(_) => continue,
                    }
                }
                TaggedPtr::Symbol(sym) => {
                    match slot.compare_exchange(current, BUSY, Ordering::AcqRel, Ordering::Relaxed)
                    {
                        Ok(_) => {
                            let result = update(sym);
                            slot.store(result.encode(), Ordering::Release);
                            return result;
                        }
                        Err(_) => continue,
                    }
                }
            }
        }
    }

    /// Inspect the current value of a slot without transitioning it.
    /// Returns `None` for `NULL` or a momentary `BUSY` observation.
    pub fn peek(&self, addr: Address) -> Option<TaggedPtr<'_>> {
        let current = self.slots[addr.as_usize()].load(Ordering::Acquire);
        if current == NULL || current == BUSY {
            return None;
        }
        // SAFETY: see `set`.
        Some(unsafe { TaggedPtr::decode(current) })
    }
}
