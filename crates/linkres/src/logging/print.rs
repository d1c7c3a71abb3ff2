// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thread-safe variadic print sink used to narrate the round loop without
//! interleaving partial lines from concurrent workers.
//!
//! # Architecture
//!
//! Every call to [`Logger::print`] (normally reached through
//! [`crate::log_print!`]) assembles its full line -- thread ordinal prefix,
//! fields, newline -- before taking the sink's lock, then writes it in one
//! `write_all` call. That keeps concurrent callers from interleaving
//! partial lines without holding the lock while formatting.

use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt;
use std::io::Write as _;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_THREAD_ORDINAL: AtomicU32 = AtomicU32::new(0);

thread_local! {
    static THREAD_ORDINAL: Cell<Option<u32>> = const { Cell::new(None) };
}

/// A stable, dense ordinal identifying the calling thread, assigned on
/// first use. Unrelated to symbol ordinals or file ordinals elsewhere in
/// this crate -- purely a log-readability aid.
fn thread_ordinal() -> u32 {
    THREAD_ORDINAL.with(|cell| match cell.get() {
        Some(id) => id,
        None => {
            let id = NEXT_THREAD_ORDINAL.fetch_add(1, Ordering::Relaxed);
            cell.set(Some(id));
            id
        }
    })
}

/// A value [`crate::log_print!`] knows how to append to a line.
///
/// Implemented for every [`fmt::Display`] type, and separately for
/// [`Seq`] so a caller can pass an iterator range as one field and have
/// its elements printed space-separated, rather than pre-formatting it
/// themselves.
pub trait LogField {
    fn append_to(&self, buf: &mut String);
}

impl<T: fmt::Display> LogField for T {
    fn append_to(&self, buf: &mut String) {
        use fmt::Write as _;
        let _ = write!(buf, "{self}");
    }
}

/// Wraps an iterable so `log_print!` prints its elements space-separated.
pub struct Seq<I>(pub I);

impl<I> LogField for Seq<I>
where
    I: Clone + IntoIterator,
    I::Item: fmt::Display,
{
    fn append_to(&self, buf: &mut String) {
        use fmt::Write as _;
        for (index, item) in self.0.clone().into_iter().enumerate() {
            if index > 0 {
                buf.push(' ');
            }
            let _ = write!(buf, "{item}");
        }
    }
}

/// Thread-safe print sink. One instance is shared by the driver and every
/// worker thread for the lifetime of a link invocation.
pub struct Logger {
    sink: Mutex<Box<dyn std::io::Write + Send>>,
}

impl Logger {
    pub fn new(sink: Box<dyn std::io::Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
        }
    }

    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Print one already-assembled line, prefixed with this thread's
    /// stable ordinal and newline-terminated. Call via
    /// [`crate::log_print!`] rather than directly.
    pub fn print(&self, line: &str) {
        let mut sink = self.sink.lock();
        let _ = writeln!(sink, "[{:04}] {line}", thread_ordinal());
    }
}

/// Print a space-separated line to a [`Logger`], accepting any mix of
/// [`fmt::Display`] values and [`Seq`]-wrapped iterator ranges.
///
/// ```ignore
/// log_print!(logger, "resolved", name, "at ordinal", ordinal);
/// log_print!(logger, "remaining undefs:", Seq(undef_names.iter()));
/// ```
#[macro_export]
macro_rules! log_print {
    ($logger:expr, $($field:expr),+ $(,)?) => {{
        let mut buf = String::new();
        let mut first = true;
        $(
            if !first {
                buf.push(' ');
            }
            first = false;
            $crate::logging::print::LogField::append_to(&($field), &mut buf);
        )+
        $logger.print(&buf);
    }};
}
