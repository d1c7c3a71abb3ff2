// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # linkres - the concurrent frontier of a whole-program linker
//!
//! The parallel symbol-resolution core of a linker that reads compiled
//! inputs from a content-addressed [`repository::Repository`]. Two
//! coupled subsystems do the hard part:
//!
//! - [`shadow`] -- a lock-free, per-symbol-name state machine
//!   ([`shadow::ShadowMap`]) that lets many resolution and archive-discovery
//!   threads race to claim, define, and redefine a name without losing
//!   updates.
//! - [`ordinal_gate`] -- a producer/consumer synchronizer
//!   ([`ordinal_gate::OrdinalGate`]) that assigns a dense ordinal to every
//!   input file and delivers completions to a single downstream consumer
//!   strictly in that order, regardless of which resolver thread finishes
//!   first.
//!
//! [`worker`] implements the two kinds of threads that drive the shadow
//! map each round -- symbol resolution over a compilation's definitions,
//! and archive discovery staking claims on behalf of an archive member --
//! and [`driver`] runs the round loop that schedules them until every
//! name is resolved or genuinely unresolvable.
//!
//! ## Quick start
//!
//! ```no_run
//! use linkres::config::Config;
//! use linkres::driver::{self, LinkInputs};
//! use linkres::logging::Logger;
//! use linkres::repository::InMemoryRepository;
//!
//! let repository = InMemoryRepository::new(0);
//! let inputs = LinkInputs { tickets: vec![], archive_members: vec![] };
//! let logger = Logger::stderr();
//! let config = Config::default();
//!
//! match driver::run(&repository, &inputs, &logger, &config) {
//!     Ok(report) => println!("resolved {} files", report.ordinals_delivered.len()),
//!     Err(err) => eprintln!("link failed: {err}"),
//! }
//! ```
//!
//! ## Non-goals
//!
//! This crate resolves names; it does not persist the shadow map, emit
//! linker output, mangle or demangle names, compute relocations,
//! implement symbol versioning, garbage-collect dead code, perform
//! incremental re-linking, or do any network or cross-process I/O.

pub mod arena;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod model;
pub mod ordinal_gate;
pub mod repository;
pub mod sets;
pub mod shadow;
pub mod symbol;
pub mod worker;

pub use config::Config;
pub use driver::{run, LinkInputs, RunReport};
pub use error::{LinkError, Result};
pub use repository::Repository;
