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

//! Minimum proximity impact allocation
//!
//! Scores every group-sized sub-run of every run that fits by the number of
//! eligible seats the placement would block, and picks the lowest score.
//! Equal scores go to the first candidate in row, column, sub-run order.
//!
//! Scoring needs a neighbor set per candidate; `ImpactScorer` keeps one bit
//! set around so repeated decisions do not reallocate it.

use crate::strategy::{AllocationStrategy, NoPlacementFound};
use fixedbitset::FixedBitSet;
use usher_model::{grid::SeatingGrid, possibility::PlacementPossibility};

/// Reusable proximity impact evaluator.
#[derive(Debug, Clone, Default)]
pub(crate) struct ImpactScorer {
    scratch: FixedBitSet,
}

impl ImpactScorer {
    #[inline]
    pub(crate) fn new() -> Self {
        Self {
            scratch: FixedBitSet::new(),
        }
    }

    /// Number of eligible seats that placing `candidate` would block.
    #[inline]
    pub(crate) fn score(&mut self, grid: &SeatingGrid, candidate: &PlacementPossibility) -> usize {
        grid.proximity_impact_with(&candidate.seat_coordinates(), &mut self.scratch)
    }
}

/// Places each group where it blocks the fewest eligible seats.
#[derive(Debug, Clone, Default)]
pub struct MinImpactStrategy {
    scorer: ImpactScorer,
}

impl MinImpactStrategy {
    pub fn new() -> Self {
        Self {
            scorer: ImpactScorer::new(),
        }
    }
}

impl AllocationStrategy for MinImpactStrategy {
    fn name(&self) -> &str {
        "MinImpactStrategy"
    }

    fn choose(
        &mut self,
        grid: &SeatingGrid,
        options: &[PlacementPossibility],
        group_size: usize,
    ) -> Result<PlacementPossibility, NoPlacementFound> {
        let mut best: Option<(usize, PlacementPossibility)> = None;
        for option in options.iter().filter(|o| o.fits(group_size)) {
            for candidate in option.sub_possibilities(group_size)? {
                let impact = self.scorer.score(grid, &candidate);
                if best.is_none_or(|(b, _)| impact < b) {
                    best = Some((impact, candidate));
                }
            }
        }
        best.map(|(_, candidate)| candidate)
            .ok_or(NoPlacementFound { group_size })
    }
}
