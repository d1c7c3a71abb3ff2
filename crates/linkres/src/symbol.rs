// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Arena-owned records that a shadow slot can point to: resolved
//! [`Symbol`]s and archive-claim [`Compilationref`]s.

use crate::model::{Address, Digest, Position};
use parking_lot::{Mutex, MutexGuard};

/// A symbol name's resolution state.
///
/// `name` never changes after construction. `ordinal` starts absent
/// (undefined) and may transition to present (defined) exactly once; the
/// transition, and any later replacement of the winning definition, is
/// serialized by [`Symbol::lock`].
pub struct Symbol {
    name: Address,
    state: Mutex<SymbolState>,
}

#[derive(Debug, Clone, Copy, Default)]
struct SymbolState {
    /// Absent => undefined. Present => defined; the value is the
    /// resolution round ordinal that assigned the winning definition.
    ordinal: Option<u32>,
}

impl Symbol {
    /// Construct an undefined symbol for `name`.
    pub fn undefined(name: Address) -> Self {
        Self {
            name,
            state: Mutex::new(SymbolState::default()),
        }
    }

    /// Construct a symbol already defined at `ordinal`.
    pub fn defined(name: Address, ordinal: u32) -> Self {
        Self {
            name,
            state: Mutex::new(SymbolState {
                ordinal: Some(ordinal),
            }),
        }
    }

    pub fn name(&self) -> Address {
        self.name
    }

    /// Acquire the per-symbol lock.
    ///
    /// Needed to make a read-then-act sequence (observe `is_def`, then
    /// maybe promote) atomic with a concurrent promotion from another
    /// thread -- see `match_undef_in_archive` in
    /// [`crate::worker::discovery`].
    pub fn lock(&self) -> SymbolGuard<'_> {
        SymbolGuard {
            guard: self.state.lock(),
        }
    }

    pub fn is_def(&self) -> bool {
        self.state.lock().ordinal.is_some()
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.state.lock().ordinal
    }
}

/// RAII handle over one symbol's state, covering the `is_def()`
/// observation and any subsequent promotion as a single critical section.
pub struct SymbolGuard<'a> {
    guard: MutexGuard<'a, SymbolState>,
}

impl SymbolGuard<'_> {
    pub fn is_def(&self) -> bool {
        self.guard.ordinal.is_some()
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.guard.ordinal
    }

    /// Promote to defined at `ordinal`. Callers must have already checked
    /// `is_def() == false`; promoting an already-defined symbol is a
    /// one-definition-rule violation the caller must detect itself.
    pub fn promote(&mut self, ordinal: u32) {
        self.guard.ordinal = Some(ordinal);
    }
}

/// A per-slot marker: "an archive member claims this name, at this
/// command-line position." Immutable once constructed; a better-positioned
/// claim is published as a brand new `Compilationref`, never mutated in
/// place.
#[derive(Debug, Clone)]
pub struct Compilationref {
    pub compilation: Digest,
    /// e.g. `"liba.a(g.o)"`; diagnostic only.
    pub origin: String,
    pub position: Position,
}

impl Compilationref {
    pub fn new(compilation: Digest, origin: impl Into<String>, position: Position) -> Self {
        Self {
            compilation,
            origin: origin.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_then_promote_once() {
        let sym = Symbol::undefined(Address(7));
        assert!(!sym.is_def());
        {
            let mut guard = sym.lock();
            assert!(!guard.is_def());
            guard.promote(3);
        }
        assert!(sym.is_def());
        assert_eq!(sym.ordinal(), Some(3));
    }

    #[test]
    fn defined_constructor_sets_ordinal() {
        let sym = Symbol::defined(Address(1), 9);
        assert!(sym.is_def());
        assert_eq!(sym.ordinal(), Some(9));
    }

    #[test]
    fn position_orders_lexicographically() {
        let earlier = Position::archive_member(1, 0);
        let later = Position::archive_member(1, 1);
        let other_archive = Position::archive_member(3, 0);
        assert!(earlier < later);
        assert!(later < other_archive);
        assert!(Position::ticket(0) < earlier);
    }
}
