// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The round loop: seeds a group with the ticket compilations, starts
//! archive discovery, then repeatedly spawns one resolution worker per
//! group member until the group empties or no undefs remain.
//!
//! # Architecture
//!
//! A single [`std::thread::scope`] spans the whole run: it hosts the
//! ordinal gate's consumer thread (alive for the run's duration), the
//! archive-discovery threads (joined after round 0), and -- per round --
//! one short-lived resolution-worker thread per group member. Nothing
//! here needs `Arc`; scoped threads may borrow the driver's locals
//! directly because the scope outlives every thread it spawns.

use crate::arena::Arena;
use crate::config::Config;
use crate::error::{LinkError, Result};
use crate::log_print;
use crate::logging::{Logger, Seq};
use crate::model::{Address, Digest, LibraryMember, Position};
use crate::ordinal_gate::OrdinalGate;
use crate::repository::Repository;
use crate::sets::ConcurrentSet;
use crate::shadow::{ShadowMap, TaggedPtr};
use crate::symbol::{Compilationref, Symbol};
use crate::worker::{discovery::discover_member, resolution::resolve_compilation, Context};
use std::thread;

/// Command-line inputs to one link invocation, in the order given.
pub struct LinkInputs {
    pub tickets: Vec<Digest>,
    pub archive_members: Vec<LibraryMember>,
}

/// What the round loop produced, independent of resolution outcome: the
/// file ordinals as the ordinal gate's consumer observed them. Always
/// `0..N` in order; carried for callers that want to confirm the
/// gate delivered everything (e.g. a future layout stage).
#[derive(Debug)]
pub struct RunReport {
    pub ordinals_delivered: Vec<u32>,
}

/// Run one full link invocation against `repository`, returning the
/// ordinal delivery report on success or the first error observed.
pub fn run(
    repository: &dyn Repository,
    inputs: &LinkInputs,
    logger: &Logger,
    config: &Config,
) -> Result<RunReport> {
    let shadow = ShadowMap::new(repository.shadow_size() as usize);
    let symbols: Arena<Symbol> = Arena::new();
    let crefs: Arena<Compilationref> = Arena::new();
    let undefs: ConcurrentSet<Address> = ConcurrentSet::new();
    let next_group: ConcurrentSet<Address> = ConcurrentSet::new();
    let gate = OrdinalGate::new();
    let ctx = Context::new(&shadow, &symbols, &crefs, repository, &undefs);

    let mut group: Vec<&Compilationref> = inputs
        .tickets
        .iter()
        .enumerate()
        .map(|(i, &digest)| {
            &*crefs.emplace(Compilationref::new(
                digest,
                format!("ticket[{i}]"),
                Position::ticket(i as u32),
            ))
        })
        .collect();

    let delivered = thread::scope(|scope| {
        let consumer = scope.spawn(|| {
            let mut delivered = Vec::new();
            while let Some(ordinal) = gate.next() {
                delivered.push(ordinal);
            }
            delivered
        });

        // Reverse member order: earlier command-line positions tend to
        // arrive first, reducing (but not requiring, for correctness)
        // the number of claim replacements in choose_better_cref.
        let mut discovery_handles: Option<Vec<_>> = Some(
            inputs
                .archive_members
                .iter()
                .rev()
                .map(|member| {
                    let ctx = &ctx;
                    let next_group = &next_group;
                    scope.spawn(move || discover_member(ctx, member, next_group))
                })
                .collect(),
        );

        let mut round: u32 = 0;
        loop {
            log::debug!("[driver] round {round}: {} compilations, {} undefs outstanding", group.len(), undefs.len());
            log_print!(logger, "round", round, "group size", group.len());

            let base = gate.start_group(group.len() as u32);
            thread::scope(|round_scope| {
                for (i, cref) in group.iter().enumerate() {
                    let ordinal = base + i as u32;
                    let ctx = &ctx;
                    let next_group = &next_group;
                    let gate = &gate;
                    round_scope.spawn(move || {
                        resolve_compilation(ctx, cref, ordinal, next_group);
                        gate.file_completed(ordinal);
                    });
                }
            });

            if round == 0 {
                if let Some(handles) = discovery_handles.take() {
                    for handle in handles {
                        handle.join().expect("discovery worker panicked");
                    }
                }
            }

            let mut next = Vec::new();
            next_group.for_each(|addr| {
                if let Some(TaggedPtr::Cref(cref)) = shadow.peek(*addr) {
                    next.push(cref);
                }
            });
            next_group.clear();
            group = next;
            round += 1;

            // Round 0 always runs unconditionally; the termination
            // predicate is only meaningful once undefs has actually had a
            // chance to be populated by a resolution worker.
            if group.is_empty() || undefs.is_empty() || (round as usize) >= config.max_rounds {
                break;
            }
        }

        // archive_members may be empty, in which case discovery_handles
        // was already an empty, pre-joined Vec; nothing left to do here.
        if let Some(handles) = discovery_handles.take() {
            for handle in handles {
                handle.join().expect("discovery worker panicked");
            }
        }

        gate.done();
        consumer.join().expect("ordinal gate consumer panicked")
    });

    if let Some(name) = ctx.duplicate() {
        log::warn!("[driver] one-definition-rule violation at {name}");
        return Err(LinkError::DuplicateDefinition(name));
    }

    if !undefs.is_empty() {
        let mut names = Vec::new();
        undefs.for_each(|addr| names.push(*addr));
        names.sort_by_key(|addr| addr.0);
        log::warn!("[driver] {} unresolved external(s)", names.len());
        log_print!(logger, "unresolved externals:", Seq(names.iter().copied()));
        return Err(LinkError::UnresolvedExternals(names));
    }

    Ok(RunReport {
        ordinals_delivered: delivered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compilation, Definition, Fragment};
    use crate::repository::InMemoryRepository;

    fn addr_name(repo: &mut InMemoryRepository, addr: u32, name: &str) -> Address {
        let a = Address(addr);
        repo.insert_name(a, name);
        a
    }

    #[test]
    fn scenario_a_ticket_resolved_via_archive_chain() {
        let mut repo = InMemoryRepository::new(4);
        let f = addr_name(&mut repo, 0, "f");
        let g = addr_name(&mut repo, 1, "g");
        let h = addr_name(&mut repo, 2, "h");
        let j = addr_name(&mut repo, 3, "j");

        repo.insert_fragment(Digest(100), Fragment::new(vec![g, h]));
        repo.insert_compilation(Digest(1), Compilation::new(vec![Definition::new(f, Digest(100))]));

        repo.insert_fragment(Digest(101), Fragment::new(vec![j]));
        repo.insert_compilation(Digest(2), Compilation::new(vec![Definition::new(g, Digest(101))]));
        repo.insert_compilation(Digest(5), Compilation::new(vec![Definition::new(g, Digest(101))]));

        repo.insert_fragment(Digest(102), Fragment::new(vec![]));
        repo.insert_compilation(Digest(3), Compilation::new(vec![Definition::new(h, Digest(102))]));

        repo.insert_fragment(Digest(103), Fragment::new(vec![]));
        repo.insert_compilation(Digest(4), Compilation::new(vec![Definition::new(j, Digest(103))]));

        let inputs = LinkInputs {
            tickets: vec![Digest(1)],
            archive_members: vec![
                LibraryMember::new(Digest(2), "liba.a(g.o)", Position::archive_member(1, 0)),
                LibraryMember::new(Digest(4), "liba.a(j.o)", Position::archive_member(1, 1)),
                LibraryMember::new(Digest(3), "libb.a(h.o)", Position::archive_member(2, 0)),
                LibraryMember::new(Digest(5), "libc.a(g.o)", Position::archive_member(3, 0)),
            ],
        };

        let logger = Logger::new(Box::new(std::io::sink()));
        let config = Config::default();
        let report = run(&repo, &inputs, &logger, &config).expect("link should succeed");
        assert_eq!(report.ordinals_delivered.first(), Some(&0));
    }

    #[test]
    fn scenario_c_unresolved_external_fails() {
        let mut repo = InMemoryRepository::new(4);
        let f = addr_name(&mut repo, 0, "f");
        let x = addr_name(&mut repo, 1, "x");
        repo.insert_fragment(Digest(100), Fragment::new(vec![x]));
        repo.insert_compilation(Digest(1), Compilation::new(vec![Definition::new(f, Digest(100))]));

        let inputs = LinkInputs {
            tickets: vec![Digest(1)],
            archive_members: vec![],
        };

        let logger = Logger::new(Box::new(std::io::sink()));
        let config = Config::default();
        match run(&repo, &inputs, &logger, &config) {
            Err(LinkError::UnresolvedExternals(names)) => assert_eq!(names, vec![x]),
            other => panic!("expected unresolved externals, got {other:?}"),
        }
    }

    #[test]
    fn scenario_d_duplicate_definition_fails() {
        let mut repo = InMemoryRepository::new(4);
        let g = addr_name(&mut repo, 0, "g");
        repo.insert_fragment(Digest(100), Fragment::new(vec![]));
        repo.insert_compilation(Digest(1), Compilation::new(vec![Definition::new(g, Digest(100))]));
        repo.insert_compilation(Digest(2), Compilation::new(vec![Definition::new(g, Digest(100))]));

        let inputs = LinkInputs {
            tickets: vec![Digest(1), Digest(2)],
            archive_members: vec![],
        };

        let logger = Logger::new(Box::new(std::io::sink()));
        let config = Config::default();
        match run(&repo, &inputs, &logger, &config) {
            Err(LinkError::DuplicateDefinition(addr)) => assert_eq!(addr, g),
            other => panic!("expected duplicate definition, got {other:?}"),
        }
    }
}
