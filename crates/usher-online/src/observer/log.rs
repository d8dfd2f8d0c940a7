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

//! Tracing observer
//!
//! Reports allocator events as `tracing` events: the run boundaries at
//! `info`, every decision at `debug`, and the options offered at `trace`.

use crate::{observer::allocation_observer::AllocationObserver, stats::AllocationStatistics};
use std::time::Instant;
use tracing::{debug, info, trace};
use usher_model::{grid::SeatingGrid, index::GroupId, possibility::PlacementPossibility};

/// Logs every allocation event through `tracing`.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
    start_time: Instant,
}

impl LogObserver {
    /// Creates an observer whose events carry `label` (usually the strategy name).
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
            start_time: Instant::now(),
        }
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LogObserver {
    fn default() -> Self {
        Self::new("allocation")
    }
}

impl std::fmt::Display for LogObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogObserver(label: {})", self.label)
    }
}

impl AllocationObserver for LogObserver {
    fn name(&self) -> &str {
        "LogObserver"
    }

    fn on_start(&mut self, grid: &SeatingGrid, _statistics: &AllocationStatistics) {
        self.start_time = Instant::now();
        info!(
            label = %self.label,
            rows = grid.rows(),
            cols = grid.cols(),
            seats = grid.num_seats(),
            "allocation started"
        );
    }

    fn on_arrival(
        &mut self,
        group: GroupId,
        size: usize,
        options: &[PlacementPossibility],
        _statistics: &AllocationStatistics,
    ) {
        trace!(
            label = %self.label,
            group = group.get(),
            size,
            options = options.len(),
            largest = options.iter().map(PlacementPossibility::size).max().unwrap_or(0),
            "group arrived"
        );
    }

    fn on_placement(
        &mut self,
        group: GroupId,
        placement: &PlacementPossibility,
        invalidated: usize,
        _statistics: &AllocationStatistics,
    ) {
        debug!(
            label = %self.label,
            group = group.get(),
            size = placement.size(),
            row = placement.anchor().row.get(),
            col = placement.anchor().col.get(),
            impact = invalidated,
            "group placed"
        );
    }

    fn on_skip(&mut self, group: GroupId, size: usize, _statistics: &AllocationStatistics) {
        debug!(label = %self.label, group = group.get(), size, "group skipped");
    }

    fn on_finish(&mut self, grid: &SeatingGrid, statistics: &AllocationStatistics) {
        info!(
            label = %self.label,
            placed = statistics.groups_placed,
            skipped = statistics.groups_skipped,
            seats_filled = statistics.seats_filled,
            eligible_left = grid.num_eligible_seats(),
            elapsed_ms = self.start_time.elapsed().as_millis() as u64,
            "allocation finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usher_model::{grid::Layout, index::Coordinate};

    #[test]
    fn test_events_do_not_panic_without_subscriber() {
        let grid = SeatingGrid::from_layout(&Layout::from_rows(&["111"])).unwrap();
        let stats = AllocationStatistics::default();
        let p = PlacementPossibility::new(Coordinate::new(0, 0), 1);
        let mut observer = LogObserver::new("first-fit");
        observer.on_start(&grid, &stats);
        observer.on_arrival(GroupId::new(0), 1, &[p], &stats);
        observer.on_placement(GroupId::new(0), &p, 2, &stats);
        observer.on_skip(GroupId::new(1), 9, &stats);
        observer.on_finish(&grid, &stats);
        assert_eq!(observer.label(), "first-fit");
        assert_eq!(observer.to_string(), "LogObserver(label: first-fit)");
    }
}
