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

use crate::{observer::allocation_observer::AllocationObserver, stats::AllocationStatistics};
use usher_model::{grid::SeatingGrid, index::GroupId, possibility::PlacementPossibility};

/// An observer that ignores every event.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationObserver;

impl NoOperationObserver {
    /// Creates a new `NoOperationObserver`.
    #[inline(always)]
    pub fn new() -> Self {
        Self
    }
}

impl AllocationObserver for NoOperationObserver {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationObserver"
    }

    #[inline(always)]
    fn on_start(&mut self, _grid: &SeatingGrid, _statistics: &AllocationStatistics) {}

    #[inline(always)]
    fn on_arrival(
        &mut self,
        _group: GroupId,
        _size: usize,
        _options: &[PlacementPossibility],
        _statistics: &AllocationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_placement(
        &mut self,
        _group: GroupId,
        _placement: &PlacementPossibility,
        _invalidated: usize,
        _statistics: &AllocationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_skip(&mut self, _group: GroupId, _size: usize, _statistics: &AllocationStatistics) {}

    #[inline(always)]
    fn on_finish(&mut self, _grid: &SeatingGrid, _statistics: &AllocationStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name() {
        let observer = NoOperationObserver::new();
        assert_eq!(observer.name(), "NoOperationObserver");
    }
}
