// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-round worker logic: one resolution worker per compilation, one
//! discovery worker per archive member. Both share the same read-only
//! [`Context`] into the shadow map, arenas, and concurrent sets.

pub mod discovery;
pub mod resolution;

use crate::arena::Arena;
use crate::model::Address;
use crate::repository::Repository;
use crate::sets::ConcurrentSet;
use crate::shadow::ShadowMap;
use crate::symbol::{Compilationref, Symbol};
use parking_lot::Mutex;

/// Collaborators shared, read-only, by every worker thread in a round.
/// Owned by the driver for the lifetime of one link invocation.
pub struct Context<'a> {
    pub shadow: &'a ShadowMap,
    pub symbols: &'a Arena<Symbol>,
    pub crefs: &'a Arena<Compilationref>,
    pub repository: &'a dyn Repository,
    pub undefs: &'a ConcurrentSet<Address>,
    first_duplicate: Mutex<Option<Address>>,
}

impl<'a> Context<'a> {
    pub fn new(
        shadow: &'a ShadowMap,
        symbols: &'a Arena<Symbol>,
        crefs: &'a Arena<Compilationref>,
        repository: &'a dyn Repository,
        undefs: &'a ConcurrentSet<Address>,
    ) -> Self {
        Self {
            shadow,
            symbols,
            crefs,
            repository,
            undefs,
            first_duplicate: Mutex::new(None),
        }
    }

    /// Record a one-definition-rule violation. Only the first offender
    /// observed across the whole run is kept; later duplicates on other
    /// names are silently dropped, matching the driver's policy of
    /// reporting a single aggregated failure.
    pub fn report_duplicate(&self, name: Address) {
        let mut slot = self.first_duplicate.lock();
        if slot.is_none() {
            *slot = Some(name);
        }
    }

    pub fn duplicate(&self) -> Option<Address> {
        *self.first_duplicate.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_duplicate_keeps_first_only() {
        let shadow = ShadowMap::new(4);
        let symbols = Arena::new();
        let crefs = Arena::new();
        let repo = crate::repository::InMemoryRepository::new(4);
        let undefs = ConcurrentSet::new();
        let ctx = Context::new(&shadow, &symbols, &crefs, &repo, &undefs);

        assert_eq!(ctx.duplicate(), None);
        ctx.report_duplicate(Address(1));
        ctx.report_duplicate(Address(2));
        assert_eq!(ctx.duplicate(), Some(Address(1)));
    }
}
