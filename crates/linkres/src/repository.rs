// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The content-addressed program repository this crate reads from.
//!
//! The real repository -- persistence, archive extraction, fragment
//! decoding -- is out of scope here; this module only defines the
//! read-only interface the resolver needs, plus a minimal in-memory
//! implementation for tests and the demo CLI.

use crate::model::{Address, Compilation, Digest, Fragment};
use std::collections::HashMap;

/// Read-only catalog of compiled inputs, keyed by content digest.
///
/// `Sync` because resolution and discovery workers query it concurrently
/// from many threads for the whole lifetime of a link invocation.
pub trait Repository: Sync {
    fn compilation(&self, digest: Digest) -> Option<&Compilation>;
    fn fragment(&self, digest: Digest) -> Option<&Fragment>;
    fn name(&self, address: Address) -> Option<&str>;
    /// Maximum addressable byte; bounds the shadow array's size.
    fn shadow_size(&self) -> u64;
}

/// Toy in-memory repository: everything is pre-loaded by the caller, no
/// lazy parsing or disk access.
#[derive(Default)]
pub struct InMemoryRepository {
    compilations: HashMap<Digest, Compilation>,
    fragments: HashMap<Digest, Fragment>,
    names: HashMap<Address, String>,
    shadow_size: u64,
}

impl InMemoryRepository {
    pub fn new(shadow_size: u64) -> Self {
        Self {
            shadow_size,
            ..Default::default()
        }
    }

    pub fn insert_compilation(&mut self, digest: Digest, compilation: Compilation) {
        self.compilations.insert(digest, compilation);
    }

    pub fn insert_fragment(&mut self, digest: Digest, fragment: Fragment) {
        self.fragments.insert(digest, fragment);
    }

    pub fn insert_name(&mut self, address: Address, name: impl Into<String>) {
        self.names.insert(address, name.into());
    }
}

impl Repository for InMemoryRepository {
    fn compilation(&self, digest: Digest) -> Option<&Compilation> {
        self.compilations.get(&digest)
    }

    fn fragment(&self, digest: Digest) -> Option<&Fragment> {
        self.fragments.get(&digest)
    }

    fn name(&self, address: Address) -> Option<&str> {
        self.names.get(&address).map(String::as_str)
    }

    fn shadow_size(&self) -> u64 {
        self.shadow_size
    }
}
