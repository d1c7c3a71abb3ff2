// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use linkres::arena::Arena;
use linkres::model::{Address, Position};
use linkres::ordinal_gate::OrdinalGate;
use linkres::shadow::{ShadowMap, TaggedPtr};
use linkres::symbol::{Compilationref, Symbol};
use std::sync::Arc;
use std::thread;

// ============================================================================
// ShadowMap benchmarks
// ============================================================================

/// Benchmark: uncontended NULL -> symbol* transition.
fn bench_shadow_set_create(c: &mut Criterion) {
    c.bench_function("shadow_set_create", |b| {
        b.iter_batched(
            || (ShadowMap::new(1), Arena::<Symbol>::new()),
            |(map, symbols)| {
                let result = map.set(
                    Address(0),
                    || TaggedPtr::Symbol(symbols.emplace(Symbol::undefined(Address(0)))),
                    |cref| TaggedPtr::Cref(cref),
                    |sym| TaggedPtr::Symbol(sym),
                );
                black_box(result);
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: symbol* -> symbol* update transition (the hot path once a
/// name has converged -- repeated `undef_to_def`-style promotions).
fn bench_shadow_set_update(c: &mut Criterion) {
    c.bench_function("shadow_set_update", |b| {
        let map = ShadowMap::new(1);
        let symbols: Arena<Symbol> = Arena::new();
        map.set(
            Address(0),
            || TaggedPtr::Symbol(symbols.emplace(Symbol::undefined(Address(0)))),
            |cref| TaggedPtr::Cref(cref),
            |sym| TaggedPtr::Symbol(sym),
        );

        b.iter(|| {
            let result = map.set(
                Address(0),
                || panic!("slot already populated"),
                |cref| TaggedPtr::Cref(cref),
                |sym| black_box(TaggedPtr::Symbol(sym)),
            );
            black_box(result);
        });
    });
}

/// Benchmark: 8 threads racing `set` on the same slot -- worst-case CAS
/// contention for the shadow resolver's core loop.
fn bench_shadow_set_contended(c: &mut Criterion) {
    c.bench_function("shadow_set_contended_8t", |b| {
        b.iter_batched(
            || (Arc::new(ShadowMap::new(1)), Arc::new(Arena::<Symbol>::new())),
            |(map, symbols)| {
                thread::scope(|scope| {
                    for _ in 0..8 {
                        let map = Arc::clone(&map);
                        let symbols = Arc::clone(&symbols);
                        scope.spawn(move || {
                            for _ in 0..100 {
                                map.set(
                                    Address(0),
                                    || TaggedPtr::Symbol(symbols.emplace(Symbol::undefined(Address(0)))),
                                    |cref| TaggedPtr::Cref(cref),
                                    |sym| TaggedPtr::Symbol(sym),
                                );
                            }
                        });
                    }
                });
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark: archive claim replacement (`choose_better_cref`'s inner
/// comparison), the dominant cost of discovery workers racing a slot.
fn bench_cref_replacement(c: &mut Criterion) {
    c.bench_function("shadow_cref_replace", |b| {
        b.iter_batched(
            || (ShadowMap::new(1), Arena::<Compilationref>::new()),
            |(map, crefs)| {
                map.set(
                    Address(0),
                    || {
                        TaggedPtr::Cref(crefs.emplace(Compilationref::new(
                            linkres::model::Digest(1),
                            "liba.a(a.o)",
                            Position::archive_member(5, 0),
                        )))
                    },
                    |cref| TaggedPtr::Cref(cref),
                    |sym| TaggedPtr::Symbol(sym),
                );
                let result = map.set(
                    Address(0),
                    || panic!("slot already populated"),
                    |existing| {
                        if Position::archive_member(1, 0) < existing.position {
                            TaggedPtr::Cref(crefs.emplace(Compilationref::new(
                                linkres::model::Digest(2),
                                "liba.a(b.o)",
                                Position::archive_member(1, 0),
                            )))
                        } else {
                            TaggedPtr::Cref(existing)
                        }
                    },
                    |sym| TaggedPtr::Symbol(sym),
                );
                black_box(result);
            },
            BatchSize::SmallInput,
        );
    });
}

// ============================================================================
// Arena benchmarks
// ============================================================================

/// Benchmark: `Arena::emplace` under no contention.
fn bench_arena_emplace(c: &mut Criterion) {
    c.bench_function("arena_emplace", |b| {
        let arena: Arena<Symbol> = Arena::new();
        let mut next = 0u32;
        b.iter(|| {
            let sym = arena.emplace(Symbol::undefined(Address(next)));
            next = next.wrapping_add(1);
            black_box(sym);
        });
    });
}

// ============================================================================
// OrdinalGate benchmarks
// ============================================================================

/// Benchmark: single-threaded `start_group` + `file_completed` + `next`
/// round-trip, the ordinal gate's baseline latency with no contention.
fn bench_ordinal_gate_roundtrip(c: &mut Criterion) {
    c.bench_function("ordinal_gate_roundtrip", |b| {
        let gate = OrdinalGate::new();
        b.iter(|| {
            let base = gate.start_group(1);
            gate.file_completed(base);
            black_box(gate.next());
        });
    });
}

criterion_group!(
    shadow_benches,
    bench_shadow_set_create,
    bench_shadow_set_update,
    bench_shadow_set_contended,
    bench_cref_replacement,
);

criterion_group!(arena_benches, bench_arena_emplace);

criterion_group!(ordinal_gate_benches, bench_ordinal_gate_roundtrip);

criterion_main!(shadow_benches, arena_benches, ordinal_gate_benches);
