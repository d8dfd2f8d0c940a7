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

//! Worst-fit allocation
//!
//! Seats the group in the largest run, on the theory that the leftover
//! stays usable. Among runs of equal size the first in row-major order
//! wins; the group takes its leftmost seats.

use crate::strategy::{AllocationStrategy, NoPlacementFound};
use std::cmp::Reverse;
use usher_model::{grid::SeatingGrid, possibility::PlacementPossibility};

/// Places each group in the largest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorstFitStrategy;

impl WorstFitStrategy {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl AllocationStrategy for WorstFitStrategy {
    fn name(&self) -> &str {
        "WorstFitStrategy"
    }

    fn choose(
        &mut self,
        _grid: &SeatingGrid,
        options: &[PlacementPossibility],
        group_size: usize,
    ) -> Result<PlacementPossibility, NoPlacementFound> {
        // `max_by_key` would keep the last maximum; reversing keeps the first.
        let option = options
            .iter()
            .filter(|o| o.fits(group_size))
            .min_by_key(|o| Reverse(o.size()))
            .ok_or(NoPlacementFound { group_size })?;
        Ok(option.leftmost(group_size)?)
    }
}
