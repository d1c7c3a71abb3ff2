// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Errors surfaced by a completed link run.
//!
//! Worker threads never raise directly to the driver -- a one-definition
//! rule violation is recorded by pushing onto a shared error slot, and an
//! unresolved external is simply whatever remains in the undefs set once
//! the round loop terminates. [`crate::driver::run`] aggregates both into
//! a single [`LinkError`] at the end of the run.

use crate::model::Address;
use std::fmt;

/// Result type for a full link invocation.
pub type Result<T> = core::result::Result<T, LinkError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// Two compilations both define the same name (one-definition-rule
    /// violation). Reported for the first such name observed; the run
    /// stops scheduling further rounds once this fires.
    DuplicateDefinition(Address),
    /// The round loop terminated with names still undefined.
    UnresolvedExternals(Vec<Address>),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateDefinition(addr) => {
                write!(f, "duplicate definition of symbol {addr}")
            }
            Self::UnresolvedExternals(addrs) => {
                write!(f, "unresolved external symbol(s):")?;
                for addr in addrs {
                    write!(f, " {addr}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LinkError {}
