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

use crate::stats::AllocationStatistics;
use usher_model::{grid::SeatingGrid, index::GroupId, possibility::PlacementPossibility};

/// Receives the events of an allocation run.
///
/// Callbacks run on the allocator's thread, between decisions; keep them cheap.
pub trait AllocationObserver {
    /// Returns the name of the observer.
    fn name(&self) -> &str;
    /// Called once, before the first group is pulled.
    fn on_start(&mut self, grid: &SeatingGrid, statistics: &AllocationStatistics);
    /// Called when a group arrives, with the options the strategy will see.
    fn on_arrival(
        &mut self,
        group: GroupId,
        size: usize,
        options: &[PlacementPossibility],
        statistics: &AllocationStatistics,
    );
    /// Called after a group has been seated on `placement`.
    fn on_placement(
        &mut self,
        group: GroupId,
        placement: &PlacementPossibility,
        invalidated: usize,
        statistics: &AllocationStatistics,
    );
    /// Called when no run could hold the group.
    fn on_skip(&mut self, group: GroupId, size: usize, statistics: &AllocationStatistics);
    /// Called once, after the arrival sequence is exhausted.
    fn on_finish(&mut self, grid: &SeatingGrid, statistics: &AllocationStatistics);
}

impl<O> AllocationObserver for &mut O
where
    O: AllocationObserver + ?Sized,
{
    fn name(&self) -> &str {
        (**self).name()
    }

    fn on_start(&mut self, grid: &SeatingGrid, statistics: &AllocationStatistics) {
        (**self).on_start(grid, statistics)
    }

    fn on_arrival(
        &mut self,
        group: GroupId,
        size: usize,
        options: &[PlacementPossibility],
        statistics: &AllocationStatistics,
    ) {
        (**self).on_arrival(group, size, options, statistics)
    }

    fn on_placement(
        &mut self,
        group: GroupId,
        placement: &PlacementPossibility,
        invalidated: usize,
        statistics: &AllocationStatistics,
    ) {
        (**self).on_placement(group, placement, invalidated, statistics)
    }

    fn on_skip(&mut self, group: GroupId, size: usize, statistics: &AllocationStatistics) {
        (**self).on_skip(group, size, statistics)
    }

    fn on_finish(&mut self, grid: &SeatingGrid, statistics: &AllocationStatistics) {
        (**self).on_finish(grid, statistics)
    }
}

impl std::fmt::Debug for dyn AllocationObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationObserver({})", self.name())
    }
}

impl std::fmt::Display for dyn AllocationObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationObserver({})", self.name())
    }
}
