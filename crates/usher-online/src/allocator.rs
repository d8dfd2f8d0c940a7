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

//! # Online Allocator
//!
//! Drives one allocation run: pull the next group, compute the current runs
//! of eligible seats, ask the strategy, apply the placement. Decisions are
//! irrevocable and made without looking ahead in the arrival sequence.
//!
//! ## Lifecycle
//!
//! `Running` until the group source reports `NoGroupsLeft`, then `Finished`.
//! `step` performs one arrival and returns its record; `run` steps to the end.
//!
//! ## Failure modes
//!
//! - No run can hold the group: the group is recorded as unplaced and the
//!   run continues.
//! - The grid rejects the strategy's choice: returned as `GridError`, the
//!   grid is left as it was before the step.

use crate::{
    observer::allocation_observer::AllocationObserver,
    result::{AllocationOutcome, GroupPlacement},
    stats::AllocationStatistics,
    strategy::{AllocationStrategy, NoPlacementFound},
};
use std::time::Instant;
use tracing::{debug, instrument};
use usher_model::{
    grid::{GridError, SeatingGrid},
    groups::{GroupSource, NoGroupsLeft},
    index::GroupId,
};

/// Where the allocator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocatorState {
    Running,
    Finished,
}

/// Seats groups from `G` on a grid, one at a time, using strategy `S`.
#[derive(Debug)]
pub struct OnlineAllocator<S, G> {
    grid: SeatingGrid,
    strategy: S,
    source: G,
    state: AllocatorState,
    placements: Vec<GroupPlacement>,
    statistics: AllocationStatistics,
    started_at: Option<Instant>,
}

impl<S, G> OnlineAllocator<S, G>
where
    S: AllocationStrategy,
    G: GroupSource,
{
    pub fn new(grid: SeatingGrid, strategy: S, source: G) -> Self {
        let capacity = source.remaining().unwrap_or(0);
        Self {
            grid,
            strategy,
            source,
            state: AllocatorState::Running,
            placements: Vec::with_capacity(capacity),
            statistics: AllocationStatistics::default(),
            started_at: None,
        }
    }

    #[inline]
    pub fn state(&self) -> AllocatorState {
        self.state
    }

    #[inline]
    pub fn grid(&self) -> &SeatingGrid {
        &self.grid
    }

    /// Consumes the allocator and returns the final grid.
    #[inline]
    pub fn into_grid(self) -> SeatingGrid {
        self.grid
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    #[inline]
    pub fn statistics(&self) -> &AllocationStatistics {
        &self.statistics
    }

    /// Records of the groups processed so far, in arrival order.
    #[inline]
    pub fn placements(&self) -> &[GroupPlacement] {
        &self.placements
    }

    /// Processes one arriving group.
    ///
    /// Returns `Ok(None)` once the arrival sequence is exhausted; every call
    /// after that is a no-op.
    pub fn step<O>(&mut self, observer: &mut O) -> Result<Option<GroupPlacement>, GridError>
    where
        O: AllocationObserver + ?Sized,
    {
        if self.state == AllocatorState::Finished {
            return Ok(None);
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            observer.on_start(&self.grid, &self.statistics);
        }

        let size = match self.source.next_group() {
            Ok(size) => size,
            Err(NoGroupsLeft) => {
                self.finish(observer);
                return Ok(None);
            }
        };
        let group = GroupId::new(self.placements.len());

        let options = self.grid.placement_possibilities();
        self.statistics.on_arrival(options.len());
        observer.on_arrival(group, size, &options, &self.statistics);

        let record = match self.strategy.choose(&self.grid, &options, size) {
            Ok(choice) => {
                debug_assert_eq!(
                    choice.size(),
                    size,
                    "called `AllocationStrategy::choose` on {} for a group of {} and got {}",
                    self.strategy.name(),
                    size,
                    choice
                );
                let invalidated = self.grid.place_group(choice.anchor(), size, group)?;
                self.statistics.on_placement(size, invalidated);
                observer.on_placement(group, &choice, invalidated, &self.statistics);
                GroupPlacement::placed(group, size, choice.anchor(), invalidated)
            }
            Err(NoPlacementFound { .. }) => {
                self.statistics.on_skip();
                observer.on_skip(group, size, &self.statistics);
                GroupPlacement::unplaced(group, size)
            }
        };

        self.placements.push(record);
        Ok(Some(record))
    }

    /// Processes groups until the arrival sequence is exhausted.
    #[instrument(level = "debug", skip_all, fields(strategy = self.strategy.name()))]
    pub fn run<O>(&mut self, observer: &mut O) -> Result<AllocationOutcome, GridError>
    where
        O: AllocationObserver + ?Sized,
    {
        while self.step(observer)?.is_some() {}
        Ok(self.outcome())
    }

    /// A snapshot of the run so far.
    pub fn outcome(&self) -> AllocationOutcome {
        AllocationOutcome::new(
            self.placements.clone(),
            self.grid.num_eligible_seats(),
            self.statistics.clone(),
        )
    }

    fn finish<O>(&mut self, observer: &mut O)
    where
        O: AllocationObserver + ?Sized,
    {
        self.state = AllocatorState::Finished;
        if let Some(started_at) = self.started_at {
            self.statistics.set_total_time(started_at.elapsed());
        }
        debug!(
            groups = self.placements.len(),
            seats_filled = self.statistics.seats_filled,
            "arrival sequence exhausted"
        );
        observer.on_finish(&self.grid, &self.statistics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        observer::no_op::NoOperationObserver,
        strategy::{
            StrategyKind, best_fit::BestFitStrategy, first_fit::FirstFitStrategy,
            min_impact::MinImpactStrategy,
        },
    };
    use usher_model::{grid::Layout, groups::GroupSequence};

    fn grid(rows: &[&str]) -> SeatingGrid {
        SeatingGrid::from_layout(&Layout::from_rows(rows)).unwrap()
    }

    fn lines(outcome: &AllocationOutcome) -> Vec<String> {
        outcome.placements().iter().map(|p| p.to_string()).collect()
    }

    fn assert_distancing(grid: &SeatingGrid) {
        for taken in grid.taken_coordinates() {
            for &n in grid.adjacency().neighbors(taken.flat(grid.cols())) {
                assert!(!grid.positions()[n as usize].is_eligible());
            }
        }
    }

    #[test]
    fn test_pair_in_row_of_four() {
        let mut allocator = OnlineAllocator::new(
            grid(&["1111"]),
            FirstFitStrategy::new(),
            GroupSequence::from(vec![2, 0]),
        );
        let outcome = allocator.run(&mut NoOperationObserver).unwrap();
        assert_eq!(lines(&outcome), vec!["1 1"]);
        assert_eq!(outcome.seats_filled(), 2);
        assert_eq!(outcome.remaining_eligible(), 0);
        assert!(allocator.grid().eligible_coordinates().is_empty());
        assert!(allocator.grid().placement_possibilities().is_empty());
        assert_eq!(allocator.state(), AllocatorState::Finished);
    }

    #[test]
    fn test_oversize_group_is_skipped_and_run_continues() {
        let mut allocator = OnlineAllocator::new(
            grid(&["11111"]),
            BestFitStrategy::new(),
            GroupSequence::from(vec![10, 1, 0]),
        );
        let outcome = allocator.run(&mut NoOperationObserver).unwrap();
        assert_eq!(lines(&outcome), vec!["0 0", "1 1"]);
        assert_eq!(outcome.num_unplaced(), 1);
        assert_eq!(outcome.seats_filled(), 1);
        assert_eq!(outcome.statistics().groups_skipped, 1);
        assert_eq!(outcome.statistics().groups_placed, 1);
    }

    #[test]
    fn test_min_impact_single_seat_takes_row_end() {
        let mut allocator = OnlineAllocator::new(
            grid(&["11111"]),
            MinImpactStrategy::new(),
            GroupSequence::from(vec![1, 1, 1, 0]),
        );
        let outcome = allocator.run(&mut NoOperationObserver).unwrap();
        // Left end, then the nearer of the two free seats, then nothing.
        assert_eq!(lines(&outcome), vec!["1 1", "1 4", "0 0"]);
        assert_eq!(outcome.seats_filled(), 2);
    }

    #[test]
    fn test_group_ids_follow_arrival_order() {
        let mut allocator = OnlineAllocator::new(
            grid(&["111111", "000000", "111111"]),
            FirstFitStrategy::new(),
            GroupSequence::from(vec![3, 9, 2]),
        );
        let outcome = allocator.run(&mut NoOperationObserver).unwrap();
        let ids: Vec<usize> = outcome.placements().iter().map(|p| p.group.get()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        let grid = allocator.into_grid();
        assert_eq!(grid.seats_of_group(GroupId::new(0)).len(), 3);
        assert!(grid.seats_of_group(GroupId::new(1)).is_empty());
        assert_eq!(grid.seats_of_group(GroupId::new(2)).len(), 2);
    }

    #[test]
    fn test_step_is_inert_after_finish() {
        let mut allocator = OnlineAllocator::new(
            grid(&["11"]),
            FirstFitStrategy::new(),
            GroupSequence::from(vec![1]),
        );
        let mut observer = NoOperationObserver::new();
        assert!(allocator.step(&mut observer).unwrap().is_some());
        assert_eq!(allocator.state(), AllocatorState::Running);
        assert!(allocator.step(&mut observer).unwrap().is_none());
        assert_eq!(allocator.state(), AllocatorState::Finished);
        assert!(allocator.step(&mut observer).unwrap().is_none());
        assert_eq!(allocator.placements().len(), 1);
    }

    #[test]
    fn test_every_strategy_keeps_distancing_and_accounting() {
        let rows = [
            "1111111111",
            "1111111111",
            "1101111011",
            "1111111111",
            "0111111110",
        ];
        let groups = vec![3, 1, 4, 2, 2, 6, 1, 1, 3, 2, 5, 1, 2, 0];
        for kind in StrategyKind::ALL {
            let mut allocator = OnlineAllocator::new(
                grid(&rows),
                kind.build(42),
                GroupSequence::from(groups.clone()),
            );
            let outcome = allocator.run(&mut NoOperationObserver).unwrap();
            let grid = allocator.grid();

            assert_distancing(grid);
            assert_eq!(outcome.placements().len(), 13);
            assert_eq!(outcome.seats_filled(), grid.num_taken_seats(), "{}", kind);
            assert_eq!(outcome.remaining_eligible(), grid.num_eligible_seats());
            assert_eq!(
                grid.num_taken_seats() + grid.num_eligible_seats() + grid.num_unavailable_seats(),
                grid.num_seats()
            );
            for p in outcome.placements().iter().filter(|p| p.is_placed()) {
                let seats = grid.seats_of_group(p.group);
                assert_eq!(seats.len(), p.size);
                assert_eq!(Some(seats[0]), p.anchor);
            }
            let stats = outcome.statistics();
            assert_eq!(stats.groups_arrived, 13);
            assert_eq!(stats.groups_placed + stats.groups_skipped, 13);
            assert_eq!(stats.seats_filled as usize, outcome.seats_filled());
            assert_eq!(stats.seats_invalidated as usize, grid.num_unavailable_seats());
        }
    }

    #[test]
    fn test_hybrid_run_is_reproducible() {
        let rows = ["11111111", "11111111", "11111111", "11111111"];
        let groups = vec![1, 2, 1, 3, 1, 1, 2, 0];
        let run = |seed| {
            let mut allocator = OnlineAllocator::new(
                grid(&rows),
                StrategyKind::Hybrid.build(seed),
                GroupSequence::from(groups.clone()),
            );
            lines(&allocator.run(&mut NoOperationObserver).unwrap())
        };
        assert_eq!(run(42), run(42));
    }
}
