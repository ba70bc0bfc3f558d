// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Hook for settling the heap before sampling starts.
//!
//! Rust has no tracing collector, but operations under test may sit on top of
//! something that does (an embedded interpreter, an arena, an allocator with
//! deferred frees). A [`Job`](crate::Job) calls its collector exactly once per
//! `report`, before the first timed sample, so a pause never lands inside one.

/// Opaque "force a collection" call.
pub trait Collector {
    fn collect(&mut self);
}

/// Collector that does nothing. The default for every job.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCollection;

impl Collector for NoCollection {
    fn collect(&mut self) {}
}

impl<F: FnMut()> Collector for F {
    fn collect(&mut self) {
        self()
    }
}
