// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime configuration for one link invocation.
//!
//! # Architecture
//!
//! A single small, immutable `Config` built once via [`ConfigBuilder`]
//! and threaded through the driver and its workers. There is
//! deliberately no global/static configuration store here (unlike a
//! long-lived service, a link invocation has exactly one `Config` for
//! its entire lifetime, built before the first thread spawns).

use crate::logging::LogLevel;

/// Resolved configuration for a single link run.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: LogLevel,
    /// Cap on resolution rounds, purely a runaway-loop backstop; liveness
    /// is already guaranteed by the round loop's termination argument.
    pub max_rounds: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            max_rounds: 1_000_000,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.config.max_rounds = max_rounds;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
