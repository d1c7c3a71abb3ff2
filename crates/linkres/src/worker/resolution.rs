// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Symbol-resolution worker: walks one compilation's definitions and
//! their fragment references, driving the shadow map's state machine on
//! each. One worker per compilation in the current round, run on its own
//! thread by [`crate::driver`].

use crate::model::Address;
use crate::sets::ConcurrentSet;
use crate::shadow::TaggedPtr;
use crate::symbol::{Compilationref, Symbol};
use crate::worker::Context;

/// Resolve every definition of `cref`'s compilation, assigning `ordinal`
/// to any symbol this worker defines. Anything the definitions' fragments
/// reference but do not themselves define is recorded into `undefs` and,
/// if it was already claimed by an archive, into `next_group` for the
/// following round.
pub fn resolve_compilation(
    ctx: &Context<'_>,
    cref: &Compilationref,
    ordinal: u32,
    next_group: &ConcurrentSet<Address>,
) {
    let Some(compilation) = ctx.repository.compilation(cref.compilation) else {
        return;
    };

    for definition in &compilation.definitions {
        let name = definition.name;

        let create_def = || TaggedPtr::Symbol(ctx.symbols.emplace(Symbol::defined(name, ordinal)));

        let create_def_over_cref = |_existing: &Compilationref| {
            // Ticket definition supersedes an archive claim outright; the
            // abandoned cref's compilation is never scheduled.
            ctx.undefs.erase(&name);
            TaggedPtr::Symbol(ctx.symbols.emplace(Symbol::defined(name, ordinal)))
        };

        let undef_to_def = |sym: &Symbol| {
            let mut guard = sym.lock();
            if guard.is_def() {
                ctx.report_duplicate(name);
            } else {
                ctx.undefs.erase(&name);
                guard.promote(ordinal);
            }
            TaggedPtr::Symbol(sym)
        };

        ctx.shadow
            .set(name, create_def, create_def_over_cref, undef_to_def);

        let Some(fragment) = ctx.repository.fragment(definition.fragment) else {
            continue;
        };

        for &reference in &fragment.references {
            let create_undef = || {
                ctx.undefs.add(reference);
                TaggedPtr::Symbol(ctx.symbols.emplace(Symbol::undefined(reference)))
            };

            let observe_cref_as_undef = |cref: &Compilationref| {
                next_group.add(reference);
                ctx.undefs.add(reference);
                TaggedPtr::Cref(cref)
            };

            let no_op_on_sym = |sym: &Symbol| TaggedPtr::Symbol(sym);

            ctx.shadow
                .set(reference, create_undef, observe_cref_as_undef, no_op_on_sym);
        }
    }
}
