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

use serde::Serialize;
use std::time::Duration;

/// Statistics collected while an `OnlineAllocator` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllocationStatistics {
    /// Groups pulled from the arrival sequence.
    pub groups_arrived: u64,
    /// Groups that received seats.
    pub groups_placed: u64,
    /// Groups for which no run was large enough.
    pub groups_skipped: u64,
    /// Seats now taken.
    pub seats_filled: u64,
    /// Seats blocked by distancing as a side effect of placements.
    pub seats_invalidated: u64,
    /// Placement possibilities handed to the strategy, summed over all decisions.
    pub possibilities_considered: u64,
    /// Wall time from the first step until the sequence ran out.
    pub time_total: Duration,
}

impl AllocationStatistics {
    #[inline]
    pub fn on_arrival(&mut self, possibilities: usize) {
        self.groups_arrived = self.groups_arrived.saturating_add(1);
        self.possibilities_considered = self
            .possibilities_considered
            .saturating_add(possibilities as u64);
    }

    #[inline]
    pub fn on_placement(&mut self, size: usize, invalidated: usize) {
        self.groups_placed = self.groups_placed.saturating_add(1);
        self.seats_filled = self.seats_filled.saturating_add(size as u64);
        self.seats_invalidated = self.seats_invalidated.saturating_add(invalidated as u64);
    }

    #[inline]
    pub fn on_skip(&mut self) {
        self.groups_skipped = self.groups_skipped.saturating_add(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    /// Fraction of arrived groups that were seated, `0.0` before any arrival.
    #[inline]
    pub fn acceptance_ratio(&self) -> f64 {
        if self.groups_arrived == 0 {
            0.0
        } else {
            self.groups_placed as f64 / self.groups_arrived as f64
        }
    }
}

impl std::fmt::Display for AllocationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Usher Allocation Statistics:")?;
        writeln!(f, "  Groups arrived:       {}", self.groups_arrived)?;
        writeln!(f, "  Groups placed:        {}", self.groups_placed)?;
        writeln!(f, "  Groups skipped:       {}", self.groups_skipped)?;
        writeln!(f, "  Seats filled:         {}", self.seats_filled)?;
        writeln!(f, "  Seats invalidated:    {}", self.seats_invalidated)?;
        writeln!(f, "  Options considered:   {}", self.possibilities_considered)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = AllocationStatistics::default();
        stats.on_arrival(3);
        stats.on_placement(2, 4);
        stats.on_arrival(1);
        stats.on_skip();

        assert_eq!(stats.groups_arrived, 2);
        assert_eq!(stats.groups_placed, 1);
        assert_eq!(stats.groups_skipped, 1);
        assert_eq!(stats.seats_filled, 2);
        assert_eq!(stats.seats_invalidated, 4);
        assert_eq!(stats.possibilities_considered, 4);
        assert!((stats.acceptance_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_lists_counters() {
        let mut stats = AllocationStatistics::default();
        stats.on_arrival(0);
        stats.on_skip();
        let text = stats.to_string();
        assert!(text.contains("Groups arrived:       1"));
        assert!(text.contains("Groups skipped:       1"));
    }
}
