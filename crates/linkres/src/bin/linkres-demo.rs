// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed demo: links one ticket compilation `f` against three archives,
//! exercising the archive-chain resolution path end to end. Takes no
//! flags -- a real driver would take ticket digests and an ordered list
//! of archive members on the command line instead.
//!
//! Inputs wired up here:
//! - ticket: `f`, referencing `g` and `h`
//! - `liba.a(g.o)` @ (1, 0), referencing `j`
//! - `liba.a(j.o)` @ (1, 1)
//! - `libb.a(h.o)` @ (2, 0)
//! - `libc.a(g.o)` @ (3, 0) -- a losing, later-positioned claim on `g`

use linkres::config::Config;
use linkres::driver::{self, LinkInputs};
use linkres::log_print;
use linkres::logging::Logger;
use linkres::model::{Address, Compilation, Definition, Digest, Fragment, LibraryMember, Position};
use linkres::repository::InMemoryRepository;
use linkres::LinkError;
use std::process::ExitCode;

fn build_repository() -> InMemoryRepository {
    let mut repo = InMemoryRepository::new(4);

    let f = Address(0);
    let g = Address(1);
    let h = Address(2);
    let j = Address(3);
    repo.insert_name(f, "f");
    repo.insert_name(g, "g");
    repo.insert_name(h, "h");
    repo.insert_name(j, "j");

    // f -> {g, h}
    repo.insert_fragment(Digest(100), Fragment::new(vec![g, h]));
    repo.insert_compilation(Digest(1), Compilation::new(vec![Definition::new(f, Digest(100))]));

    // liba.a(g.o): g -> {j}
    repo.insert_fragment(Digest(101), Fragment::new(vec![j]));
    repo.insert_compilation(Digest(2), Compilation::new(vec![Definition::new(g, Digest(101))]));

    // liba.a(j.o): j -> {}
    repo.insert_fragment(Digest(102), Fragment::new(vec![]));
    repo.insert_compilation(Digest(3), Compilation::new(vec![Definition::new(j, Digest(102))]));

    // libb.a(h.o): h -> {}
    repo.insert_fragment(Digest(103), Fragment::new(vec![]));
    repo.insert_compilation(Digest(4), Compilation::new(vec![Definition::new(h, Digest(103))]));

    // libc.a(g.o): a losing, later-positioned claim on g, same definition.
    repo.insert_compilation(Digest(5), Compilation::new(vec![Definition::new(g, Digest(101))]));

    repo
}

fn main() -> ExitCode {
    let repository = build_repository();
    let inputs = LinkInputs {
        tickets: vec![Digest(1)],
        archive_members: vec![
            LibraryMember::new(Digest(2), "liba.a(g.o)", Position::archive_member(1, 0)),
            LibraryMember::new(Digest(3), "liba.a(j.o)", Position::archive_member(1, 1)),
            LibraryMember::new(Digest(4), "libb.a(h.o)", Position::archive_member(2, 0)),
            LibraryMember::new(Digest(5), "libc.a(g.o)", Position::archive_member(3, 0)),
        ],
    };

    let logger = Logger::stderr();
    let config = Config::default();

    match driver::run(&repository, &inputs, &logger, &config) {
        Ok(report) => {
            log_print!(
                logger,
                "link succeeded,",
                report.ordinals_delivered.len(),
                "files delivered in order"
            );
            ExitCode::SUCCESS
        }
        Err(LinkError::UnresolvedExternals(names)) => {
            for addr in &names {
                let name = repository_name(&repository, *addr);
                log_print!(logger, "undefined symbol:", name);
            }
            ExitCode::FAILURE
        }
        Err(LinkError::DuplicateDefinition(addr)) => {
            let name = repository_name(&repository, addr);
            log_print!(logger, "duplicate definition of symbol:", name);
            ExitCode::FAILURE
        }
    }
}

fn repository_name(repository: &InMemoryRepository, addr: Address) -> String {
    use linkres::Repository;
    repository
        .name(addr)
        .map(str::to_owned)
        .unwrap_or_else(|| addr.to_string())
}
