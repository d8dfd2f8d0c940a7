// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Usher Online
//!
//! Online seat allocation for distanced auditoriums: groups arrive one at a
//! time, each is seated (or turned away) immediately, and a seat once given
//! is never taken back.
//!
//! ## Modules
//!
//! - `strategy`: the `AllocationStrategy` trait and the five built-in
//!   heuristics (first fit, best fit, worst fit, minimum impact, hybrid),
//!   plus `StrategyKind` for choosing one by name.
//! - `allocator`: `OnlineAllocator`, the arrival loop driving a strategy over
//!   a `SeatingGrid`.
//! - `observer`: `AllocationObserver` hooks with no-op and tracing
//!   implementations.
//! - `result`: per-group placement records and the run outcome.
//! - `stats`: counters collected during a run.
//!
//! ## Highlights
//!
//! - Strategies see the grid read-only; only the allocator mutates it.
//! - Groups that do not fit are recorded and skipped, never fatal.
//! - Randomness is confined to the hybrid strategy and injected as an `Rng`,
//!   so seeded runs are reproducible.

pub mod allocator;
pub mod observer;
pub mod result;
pub mod stats;
pub mod strategy;
