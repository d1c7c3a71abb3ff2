// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Archive-discovery worker: for each definition in one archive member's
//! compilation, stakes an archive claim on the shadow map. One worker per
//! member, run concurrently with round-0 resolution and joined before
//! round 1 begins.

use crate::model::{Address, LibraryMember};
use crate::sets::ConcurrentSet;
use crate::shadow::TaggedPtr;
use crate::symbol::{Compilationref, Symbol};
use crate::worker::Context;

/// Stake `member`'s definitions into the shadow map. A name already
/// defined wins over any archive claim; a name already claimed by a
/// *later*-positioned member is replaced; a name already undefined is
/// reclaimed for this member's claim and scheduled into `next_group`.
pub fn discover_member(ctx: &Context<'_>, member: &LibraryMember, next_group: &ConcurrentSet<Address>) {
    let Some(compilation) = ctx.repository.compilation(member.compilation) else {
        return;
    };

    for definition in &compilation.definitions {
        let name = definition.name;

        let stake_cref = || {
            TaggedPtr::Cref(ctx.crefs.emplace(Compilationref::new(
                member.compilation,
                member.origin.clone(),
                member.position,
            )))
        };

        let choose_better_cref = |existing: &Compilationref| {
            if member.position < existing.position {
                log::trace!(
                    "[discovery] {} at {} replaces {} at {} for {name}",
                    member.origin, member.position, existing.origin, existing.position
                );
                TaggedPtr::Cref(ctx.crefs.emplace(Compilationref::new(
                    member.compilation,
                    member.origin.clone(),
                    member.position,
                )))
            } else {
                TaggedPtr::Cref(existing)
            }
        };

        let match_undef_in_archive = |sym: &Symbol| {
            let guard = sym.lock();
            if guard.is_def() {
                TaggedPtr::Symbol(sym)
            } else {
                drop(guard);
                next_group.add(name);
                TaggedPtr::Cref(ctx.crefs.emplace(Compilationref::new(
                    member.compilation,
                    member.origin.clone(),
                    member.position,
                )))
            }
        };

        ctx.shadow
            .set(name, stake_cref, choose_better_cref, match_undef_in_archive);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::model::{Compilation, Definition, Digest, Fragment, Position};
    use crate::repository::InMemoryRepository;
    use crate::shadow::ShadowMap;

    fn member(compilation: Digest, origin: &str, position: Position) -> LibraryMember {
        LibraryMember::new(compilation, origin, position)
    }

    #[test]
    fn first_claim_stakes_a_cref() {
        let mut repo = InMemoryRepository::new(4);
        repo.insert_fragment(Digest(10), Fragment::new(vec![]));
        repo.insert_compilation(
            Digest(1),
            Compilation::new(vec![Definition::new(Address(0), Digest(10))]),
        );
        let shadow = ShadowMap::new(4);
        let symbols: Arena<Symbol> = Arena::new();
        let crefs: Arena<Compilationref> = Arena::new();
        let undefs = ConcurrentSet::new();
        let ctx = Context::new(&shadow, &symbols, &crefs, &repo, &undefs);
        let next_group = ConcurrentSet::new();

        let m = member(Digest(1), "liba.a(a.o)", Position::archive_member(1, 0));
        discover_member(&ctx, &m, &next_group);

        match shadow.peek(Address(0)) {
            Some(TaggedPtr::Cref(cref)) => assert_eq!(cref.position, Position::archive_member(1, 0)),
            _ => panic!("expected cref"),
        }
    }

    #[test]
    fn later_member_with_earlier_position_replaces_claim() {
        let mut repo = InMemoryRepository::new(4);
        repo.insert_fragment(Digest(10), Fragment::new(vec![]));
        repo.insert_compilation(
            Digest(1),
            Compilation::new(vec![Definition::new(Address(0), Digest(10))]),
        );
        repo.insert_compilation(
            Digest(2),
            Compilation::new(vec![Definition::new(Address(0), Digest(10))]),
        );
        let shadow = ShadowMap::new(4);
        let symbols: Arena<Symbol> = Arena::new();
        let crefs: Arena<Compilationref> = Arena::new();
        let undefs = ConcurrentSet::new();
        let ctx = Context::new(&shadow, &symbols, &crefs, &repo, &undefs);
        let next_group = ConcurrentSet::new();

        let late = member(Digest(1), "libc.a(a.o)", Position::archive_member(3, 0));
        let early = member(Digest(2), "liba.a(a.o)", Position::archive_member(1, 0));
        discover_member(&ctx, &late, &next_group);
        discover_member(&ctx, &early, &next_group);

        match shadow.peek(Address(0)) {
            Some(TaggedPtr::Cref(cref)) => assert_eq!(cref.position, Position::archive_member(1, 0)),
            _ => panic!("expected cref"),
        }
    }

    #[test]
    fn undefined_symbol_is_reclaimed_into_a_cref_and_scheduled() {
        let mut repo = InMemoryRepository::new(4);
        repo.insert_fragment(Digest(10), Fragment::new(vec![]));
        repo.insert_compilation(
            Digest(1),
            Compilation::new(vec![Definition::new(Address(0), Digest(10))]),
        );
        let shadow = ShadowMap::new(4);
        let symbols: Arena<Symbol> = Arena::new();
        let crefs: Arena<Compilationref> = Arena::new();
        let undefs = ConcurrentSet::new();
        let ctx = Context::new(&shadow, &symbols, &crefs, &repo, &undefs);
        let next_group = ConcurrentSet::new();

        shadow.set(
            Address(0),
            || TaggedPtr::Symbol(symbols.emplace(Symbol::undefined(Address(0)))),
            |cref| TaggedPtr::Cref(cref),
            |sym| TaggedPtr::Symbol(sym),
        );

        let m = member(Digest(1), "liba.a(a.o)", Position::archive_member(1, 0));
        discover_member(&ctx, &m, &next_group);

        assert!(next_group.has(&Address(0)));
        match shadow.peek(Address(0)) {
            Some(TaggedPtr::Cref(_)) => {}
            _ => panic!("expected the slot to have been reclaimed as a cref"),
        }
    }

    #[test]
    fn defined_symbol_is_left_untouched() {
        let mut repo = InMemoryRepository::new(4);
        repo.insert_fragment(Digest(10), Fragment::new(vec![]));
        repo.insert_compilation(
            Digest(1),
            Compilation::new(vec![Definition::new(Address(0), Digest(10))]),
        );
        let shadow = ShadowMap::new(4);
        let symbols: Arena<Symbol> = Arena::new();
        let crefs: Arena<Compilationref> = Arena::new();
        let undefs = ConcurrentSet::new();
        let ctx = Context::new(&shadow, &symbols, &crefs, &repo, &undefs);
        let next_group = ConcurrentSet::new();

        shadow.set(
            Address(0),
            || TaggedPtr::Symbol(symbols.emplace(Symbol::defined(Address(0), 0))),
            |cref| TaggedPtr::Cref(cref),
            |sym| TaggedPtr::Symbol(sym),
        );

        let m = member(Digest(1), "liba.a(a.o)", Position::archive_member(1, 0));
        discover_member(&ctx, &m, &next_group);

        assert!(!next_group.has(&Address(0)));
        match shadow.peek(Address(0)) {
            Some(TaggedPtr::Symbol(sym)) => assert!(sym.is_def()),
            _ => panic!("expected the defined symbol to remain"),
        }
    }
}
