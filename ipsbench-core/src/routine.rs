// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Specialized timing loops.
//!
//! A [`TimingRoutine`] is built once per (input count, dup flag) pair. The
//! shape decisions are made when the routine is built and resolved once per
//! timing call, outside the timed region:
//!
//! - up to [`MAX_UNROLLED_SLOTS`] inputs are bound to individual locals with a
//!   slice pattern, so the loop body is a fixed sequence of calls with no
//!   indexing or bounds checks;
//! - larger input sets fall back to one pass over the slice per repetition;
//! - in-place versus duplicated delivery is a type parameter, so the loop
//!   body carries no per-invocation branch.

use std::time::{Duration, Instant};

/// Largest input set that gets a fully unrolled loop body.
pub const MAX_UNROLLED_SLOTS: usize = 8;

/// How input slots are laid out inside the timed loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotLayout {
    /// Each input bound to its own local; the loop body is unrolled.
    Unrolled(usize),
    /// One indexed pass over the inputs per repetition.
    Indexed(usize),
}

impl SlotLayout {
    fn for_slots(slots: usize) -> Self {
        if slots <= MAX_UNROLLED_SLOTS {
            SlotLayout::Unrolled(slots)
        } else {
            SlotLayout::Indexed(slots)
        }
    }

    /// Number of input slots the routine was built for.
    pub fn slots(&self) -> usize {
        match self {
            SlotLayout::Unrolled(n) | SlotLayout::Indexed(n) => *n,
        }
    }
}

/// How an input value reaches the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The operation receives the stored input and may mutate it.
    InPlace,
    /// The operation receives a fresh clone made right before the call.
    Duplicate,
}

trait Deliver {
    fn deliver<T: Clone, F: FnMut(&mut T)>(slot: &mut T, op: &mut F);
}

struct InPlace;

impl Deliver for InPlace {
    #[inline(always)]
    fn deliver<T: Clone, F: FnMut(&mut T)>(slot: &mut T, op: &mut F) {
        op(slot);
    }
}

struct Duplicate;

impl Deliver for Duplicate {
    #[inline(always)]
    fn deliver<T: Clone, F: FnMut(&mut T)>(slot: &mut T, op: &mut F) {
        let mut copy = slot.clone();
        op(&mut copy);
    }
}

/// Times `$reps` passes over the bound slot locals.
macro_rules! timed_unrolled {
    ($deliver:ty, $reps:expr, $op:expr; $($slot:ident),+) => {{
        let start = Instant::now();
        for _ in 0..$reps {
            $( <$deliver>::deliver(&mut *$slot, &mut *$op); )+
        }
        start.elapsed()
    }};
}

/// Timing loop specialized for a fixed input count and delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingRoutine {
    layout: SlotLayout,
    delivery: Delivery,
}

impl TimingRoutine {
    /// Build the routine for `slots` inputs.
    pub fn build(slots: usize, dup_inputs: bool) -> Self {
        let routine = Self {
            layout: SlotLayout::for_slots(slots),
            delivery: if dup_inputs {
                Delivery::Duplicate
            } else {
                Delivery::InPlace
            },
        };
        tracing::debug!(
            layout = ?routine.layout,
            delivery = ?routine.delivery,
            "Built timing routine"
        );
        routine
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    /// Run `repetitions` passes of `op` over `inputs` and return the elapsed time.
    ///
    /// `inputs` must have the length the routine was built for.
    pub fn time<T, F>(&self, inputs: &mut [T], repetitions: u64, op: &mut F) -> Duration
    where
        T: Clone,
        F: FnMut(&mut T),
    {
        debug_assert_eq!(inputs.len(), self.layout.slots());
        match self.delivery {
            Delivery::InPlace => self.time_with::<InPlace, T, F>(inputs, repetitions, op),
            Delivery::Duplicate => self.time_with::<Duplicate, T, F>(inputs, repetitions, op),
        }
    }

    fn time_with<D, T, F>(&self, inputs: &mut [T], repetitions: u64, op: &mut F) -> Duration
    where
        D: Deliver,
        T: Clone,
        F: FnMut(&mut T),
    {
        match (self.layout, inputs) {
            (SlotLayout::Unrolled(1), [a]) => timed_unrolled!(D, repetitions, op; a),
            (SlotLayout::Unrolled(2), [a, b]) => timed_unrolled!(D, repetitions, op; a, b),
            (SlotLayout::Unrolled(3), [a, b, c]) => timed_unrolled!(D, repetitions, op; a, b, c),
            (SlotLayout::Unrolled(4), [a, b, c, d]) => {
                timed_unrolled!(D, repetitions, op; a, b, c, d)
            }
            (SlotLayout::Unrolled(5), [a, b, c, d, e]) => {
                timed_unrolled!(D, repetitions, op; a, b, c, d, e)
            }
            (SlotLayout::Unrolled(6), [a, b, c, d, e, f]) => {
                timed_unrolled!(D, repetitions, op; a, b, c, d, e, f)
            }
            (SlotLayout::Unrolled(7), [a, b, c, d, e, f, g]) => {
                timed_unrolled!(D, repetitions, op; a, b, c, d, e, f, g)
            }
            (SlotLayout::Unrolled(8), [a, b, c, d, e, f, g, h]) => {
                timed_unrolled!(D, repetitions, op; a, b, c, d, e, f, g, h)
            }
            (_, slots) => {
                let start = Instant::now();
                for _ in 0..repetitions {
                    for slot in slots.iter_mut() {
                        D::deliver(slot, &mut *op);
                    }
                }
                start.elapsed()
            }
        }
    }
}
