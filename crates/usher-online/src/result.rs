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
use usher_model::index::{Coordinate, GroupId};

/// What happened to one arriving group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPlacement {
    pub group: GroupId,
    pub size: usize,
    /// Leftmost seat of the group, or `None` if it was turned away.
    pub anchor: Option<Coordinate>,
    /// Seats blocked by this placement.
    pub invalidated: usize,
}

impl GroupPlacement {
    #[inline]
    pub fn placed(group: GroupId, size: usize, anchor: Coordinate, invalidated: usize) -> Self {
        Self {
            group,
            size,
            anchor: Some(anchor),
            invalidated,
        }
    }

    #[inline]
    pub fn unplaced(group: GroupId, size: usize) -> Self {
        Self {
            group,
            size,
            anchor: None,
            invalidated: 0,
        }
    }

    #[inline]
    pub fn is_placed(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Prints the 1-based anchor as `"<row> <col>"`, or `"0 0"` if unplaced.
impl std::fmt::Display for GroupPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.anchor {
            Some(anchor) => write!(f, "{}", anchor.one_based()),
            None => write!(f, "0 0"),
        }
    }
}

/// Result of a complete allocation run.
#[derive(Debug, Clone)]
pub struct AllocationOutcome {
    placements: Vec<GroupPlacement>,
    seats_filled: usize,
    remaining_eligible: usize,
    statistics: AllocationStatistics,
}

impl AllocationOutcome {
    #[inline]
    pub fn new(
        placements: Vec<GroupPlacement>,
        remaining_eligible: usize,
        statistics: AllocationStatistics,
    ) -> Self {
        let seats_filled = placements
            .iter()
            .filter(|p| p.is_placed())
            .map(|p| p.size)
            .sum();
        Self {
            placements,
            seats_filled,
            remaining_eligible,
            statistics,
        }
    }

    /// One record per arrived group, in arrival order.
    #[inline]
    pub fn placements(&self) -> &[GroupPlacement] {
        &self.placements
    }

    #[inline]
    pub fn seats_filled(&self) -> usize {
        self.seats_filled
    }

    #[inline]
    pub fn num_unplaced(&self) -> usize {
        self.placements.iter().filter(|p| !p.is_placed()).count()
    }

    /// Eligible seats left in the final grid.
    #[inline]
    pub fn remaining_eligible(&self) -> usize {
        self.remaining_eligible
    }

    #[inline]
    pub fn statistics(&self) -> &AllocationStatistics {
        &self.statistics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_display() {
        let placed = GroupPlacement::placed(GroupId::new(0), 2, Coordinate::new(0, 3), 1);
        assert_eq!(placed.to_string(), "1 4");
        let unplaced = GroupPlacement::unplaced(GroupId::new(1), 10);
        assert_eq!(unplaced.to_string(), "0 0");
        assert!(!unplaced.is_placed());
    }

    #[test]
    fn test_outcome_totals() {
        let outcome = AllocationOutcome::new(
            vec![
                GroupPlacement::placed(GroupId::new(0), 2, Coordinate::new(0, 0), 1),
                GroupPlacement::unplaced(GroupId::new(1), 5),
                GroupPlacement::placed(GroupId::new(2), 1, Coordinate::new(0, 3), 0),
            ],
            0,
            AllocationStatistics::default(),
        );
        assert_eq!(outcome.seats_filled(), 3);
        assert_eq!(outcome.num_unplaced(), 1);
        assert_eq!(outcome.placements().len(), 3);
    }
}
