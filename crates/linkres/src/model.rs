// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Content-addressed input model: digests, addresses, fragments, and the
//! compilations/archive members that make up one link invocation.
//!
//! These types are read-only views into the [`crate::repository::Repository`]
//! external collaborator; nothing here owns the backing bytes.

use std::fmt;

/// Opaque 64-bit content hash identifying a compilation or fragment in the
/// repository. Equality and hashing only -- the bit pattern carries no
/// further meaning to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub u64);

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Integer offset into shadow memory identifying a single symbol name.
/// Distinct names have distinct addresses; the repository builder
/// guarantees no two in-use addresses collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub u32);

impl Address {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Command-line position of a compilation: tickets sit at `archive_index ==
/// 0`; archive members use `(archive_index, member_index)`. Ordered
/// lexicographically, so `(1, 0) < (1, 1) < (2, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub archive_index: u32,
    pub member_index: u32,
}

impl Position {
    pub const fn ticket(member_index: u32) -> Self {
        Self {
            archive_index: 0,
            member_index,
        }
    }

    pub const fn archive_member(archive_index: u32, member_index: u32) -> Self {
        Self {
            archive_index,
            member_index,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.archive_index, self.member_index)
    }
}

/// A bag of outgoing symbol references belonging to one definition.
#[derive(Debug, Clone, Default)]
pub struct Fragment {
    pub references: Vec<Address>,
}

impl Fragment {
    pub fn new(references: Vec<Address>) -> Self {
        Self { references }
    }
}

/// A symbol name backed by a fragment, as produced by one compilation.
#[derive(Debug, Clone, Copy)]
pub struct Definition {
    pub name: Address,
    pub fragment: Digest,
}

impl Definition {
    pub fn new(name: Address, fragment: Digest) -> Self {
        Self { name, fragment }
    }
}

/// One translation unit's worth of definitions, keyed by compilation digest
/// in the repository.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub definitions: Vec<Definition>,
}

impl Compilation {
    pub fn new(definitions: Vec<Definition>) -> Self {
        Self { definitions }
    }
}

/// One archive member as named on the command line: which compilation it
/// packages, a diagnostic label, and its position for tie-breaking.
#[derive(Debug, Clone)]
pub struct LibraryMember {
    pub compilation: Digest,
    /// e.g. `"liba.a(g.o)"`; diagnostic only.
    pub origin: String,
    pub position: Position,
}

impl LibraryMember {
    pub fn new(compilation: Digest, origin: impl Into<String>, position: Position) -> Self {
        Self {
            compilation,
            origin: origin.into(),
            position,
        }
    }
}
