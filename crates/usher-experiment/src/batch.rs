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

//! # Batch Trials
//!
//! Runs every configured strategy over every configured arrival sequence on
//! the same auditorium, and collects one `TrialResult` per pair.
//!
//! ## Execution
//!
//! - Each strategy gets its own worker thread, spawned with
//!   `std::thread::scope`; at most `max_threads` workers run at a time.
//! - A worker runs its trials one after the other, each on a fresh copy of
//!   the grid. Trials never share mutable state.
//! - Randomized strategies are seeded per trial from the base seed, so a
//!   batch is reproducible regardless of scheduling.
//! - The report lists trials by strategy, in configuration order, then by
//!   trial index.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};
use usher_model::{
    grid::{GridError, Layout, SeatingGrid},
    groups::GroupSequence,
};
use usher_online::{
    allocator::OnlineAllocator, observer::no_op::NoOperationObserver, result::AllocationOutcome,
    strategy::StrategyKind,
};

/// The error type for batch runs.
#[derive(Debug)]
pub enum BatchError {
    /// The layout is malformed, or a strategy produced an invalid placement.
    Grid(GridError),
    /// No strategy was configured.
    NoStrategies,
    /// A worker thread panicked.
    WorkerPanicked(StrategyKind),
}

impl std::fmt::Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "Grid error: {}", e),
            Self::NoStrategies => write!(f, "No strategies configured"),
            Self::WorkerPanicked(kind) => write!(f, "Worker for strategy {} panicked", kind),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for BatchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

/// One strategy on one arrival sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialResult {
    pub strategy: StrategyKind,
    pub trial: usize,
    /// Seed handed to the strategy; only meaningful for randomized ones.
    pub seed: u64,
    pub groups: usize,
    pub groups_placed: usize,
    pub groups_skipped: usize,
    pub seats_filled: usize,
    pub remaining_eligible: usize,
    /// Zero-based `(row, col)` anchor per group in arrival order, `None` if skipped.
    pub anchors: Vec<Option<(usize, usize)>>,
    pub elapsed_micros: u64,
}

impl TrialResult {
    fn from_outcome(
        strategy: StrategyKind,
        trial: usize,
        seed: u64,
        outcome: &AllocationOutcome,
    ) -> Self {
        let stats = outcome.statistics();
        Self {
            strategy,
            trial,
            seed,
            groups: outcome.placements().len(),
            groups_placed: stats.groups_placed as usize,
            groups_skipped: stats.groups_skipped as usize,
            seats_filled: outcome.seats_filled(),
            remaining_eligible: outcome.remaining_eligible(),
            anchors: outcome
                .placements()
                .iter()
                .map(|p| p.anchor.map(|a| (a.row.get(), a.col.get())))
                .collect(),
            elapsed_micros: stats.time_total.as_micros() as u64,
        }
    }
}

/// All trials of a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub trials: Vec<TrialResult>,
}

impl BatchReport {
    /// The trials of one strategy, in trial order.
    pub fn trials_for(&self, strategy: StrategyKind) -> impl Iterator<Item = &TrialResult> {
        self.trials.iter().filter(move |t| t.strategy == strategy)
    }
}

/// Runs strategies over arrival sequences in parallel.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    strategies: Vec<StrategyKind>,
    sequences: Vec<Vec<usize>>,
    seed: u64,
    max_threads: usize,
}

impl BatchRunner {
    #[inline]
    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    #[inline]
    pub fn sequences(&self) -> &[Vec<usize>] {
        &self.sequences
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// The strategy seed for trial `trial`.
    #[inline]
    pub fn trial_seed(&self, trial: usize) -> u64 {
        self.seed.wrapping_add(trial as u64)
    }

    /// Runs every strategy over every sequence on `layout`.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::Grid` if the layout is malformed,
    /// `BatchError::NoStrategies` if nothing is configured, and
    /// `BatchError::WorkerPanicked` if a worker thread panicked.
    pub fn run(&self, layout: &Layout) -> Result<BatchReport, BatchError> {
        if self.strategies.is_empty() {
            return Err(BatchError::NoStrategies);
        }
        let template = SeatingGrid::from_layout(layout)?;
        let start_time = Instant::now();
        info!(
            strategies = self.strategies.len(),
            trials = self.sequences.len(),
            threads = self.max_threads,
            "batch started"
        );

        let mut trials = Vec::with_capacity(self.strategies.len() * self.sequences.len());
        for wave in self.strategies.chunks(self.max_threads.max(1)) {
            let results = std::thread::scope(|scope| {
                let handles: Vec<_> = wave
                    .iter()
                    .map(|&kind| {
                        let template = &template;
                        (kind, scope.spawn(move || self.run_strategy(kind, template)))
                    })
                    .collect();

                handles
                    .into_iter()
                    .map(|(kind, handle)| {
                        handle
                            .join()
                            .map_err(|_| BatchError::WorkerPanicked(kind))?
                            .map_err(BatchError::from)
                    })
                    .collect::<Result<Vec<_>, BatchError>>()
            })?;
            trials.extend(results.into_iter().flatten());
        }

        info!(
            trials = trials.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "batch finished"
        );
        Ok(BatchReport { trials })
    }

    fn run_strategy(
        &self,
        kind: StrategyKind,
        template: &SeatingGrid,
    ) -> Result<Vec<TrialResult>, GridError> {
        let mut results = Vec::with_capacity(self.sequences.len());
        for (trial, sizes) in self.sequences.iter().enumerate() {
            let seed = self.trial_seed(trial);
            let mut allocator = OnlineAllocator::new(
                template.clone(),
                kind.build(seed),
                GroupSequence::new(sizes.iter().copied()),
            );
            let outcome = allocator.run(&mut NoOperationObserver)?;
            debug!(
                strategy = kind.as_str(),
                trial,
                seats_filled = outcome.seats_filled(),
                unplaced = outcome.num_unplaced(),
                "trial finished"
            );
            results.push(TrialResult::from_outcome(kind, trial, seed, &outcome));
        }
        Ok(results)
    }
}

/// Configures a `BatchRunner`.
#[derive(Debug, Clone, Default)]
pub struct BatchRunnerBuilder {
    strategies: Vec<StrategyKind>,
    sequences: Vec<Vec<usize>>,
    seed: u64,
    max_threads: Option<usize>,
}

impl BatchRunnerBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a strategy. Duplicates are ignored.
    #[inline]
    pub fn with_strategy(mut self, kind: StrategyKind) -> Self {
        if !self.strategies.contains(&kind) {
            self.strategies.push(kind);
        }
        self
    }

    /// Adds several strategies, in order.
    #[inline]
    pub fn with_strategies<I: IntoIterator<Item = StrategyKind>>(self, kinds: I) -> Self {
        kinds.into_iter().fold(self, Self::with_strategy)
    }

    /// Adds one arrival sequence as a trial. A `0` ends the sequence early.
    #[inline]
    pub fn with_sequence(mut self, sizes: Vec<usize>) -> Self {
        self.sequences.push(sizes);
        self
    }

    /// Adds arrival sequences as trials, in order.
    #[inline]
    pub fn with_sequences<I: IntoIterator<Item = Vec<usize>>>(mut self, sequences: I) -> Self {
        self.sequences.extend(sequences);
        self
    }

    /// Base seed for randomized strategies.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Upper bound on concurrent worker threads. Defaults to the available parallelism.
    #[inline]
    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = Some(max_threads.max(1));
        self
    }

    pub fn build(self) -> BatchRunner {
        let max_threads = self.max_threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        });
        BatchRunner {
            strategies: self.strategies,
            sequences: self.sequences,
            seed: self.seed,
            max_threads,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GroupSequenceGenerator;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn layout() -> Layout {
        Layout::from_rows(&["1111111111", "1110111111", "1111111111", "0111111110"])
    }

    fn sequences(n: usize) -> Vec<Vec<usize>> {
        let mut generator = GroupSequenceGenerator::new(ChaCha8Rng::seed_from_u64(42));
        (0..n).map(|_| generator.generate(12)).collect()
    }

    #[test]
    fn test_report_order_and_size() {
        let runner = BatchRunnerBuilder::new()
            .with_strategies(StrategyKind::ALL)
            .with_sequences(sequences(3))
            .with_seed(42)
            .with_max_threads(2)
            .build();
        let report = runner.run(&layout()).unwrap();

        assert_eq!(report.trials.len(), 15);
        let order: Vec<(StrategyKind, usize)> =
            report.trials.iter().map(|t| (t.strategy, t.trial)).collect();
        let mut expected = Vec::new();
        for kind in StrategyKind::ALL {
            for trial in 0..3 {
                expected.push((kind, trial));
            }
        }
        assert_eq!(order, expected);
    }

    #[test]
    fn test_trials_match_sequential_runs() {
        let seqs = sequences(2);
        let runner = BatchRunnerBuilder::new()
            .with_strategy(StrategyKind::MinImpact)
            .with_strategy(StrategyKind::Hybrid)
            .with_sequences(seqs.clone())
            .with_seed(9)
            .build();
        let report = runner.run(&layout()).unwrap();

        for result in &report.trials {
            let grid = SeatingGrid::from_layout(&layout()).unwrap();
            let mut allocator = OnlineAllocator::new(
                grid,
                result.strategy.build(runner.trial_seed(result.trial)),
                GroupSequence::new(seqs[result.trial].iter().copied()),
            );
            let outcome = allocator.run(&mut NoOperationObserver).unwrap();
            assert_eq!(result.seats_filled, outcome.seats_filled());
            assert_eq!(result.groups, seqs[result.trial].len());
            assert_eq!(result.groups_placed + result.groups_skipped, result.groups);
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let build = || {
            BatchRunnerBuilder::new()
                .with_strategy(StrategyKind::Hybrid)
                .with_sequences(sequences(4))
                .with_seed(1)
                .build()
        };
        let a = build().run(&layout()).unwrap();
        let b = build().run(&layout()).unwrap();
        let strip = |r: &BatchReport| -> Vec<Vec<Option<(usize, usize)>>> {
            r.trials.iter().map(|t| t.anchors.clone()).collect()
        };
        assert_eq!(strip(&a), strip(&b));
    }

    #[test]
    fn test_errors() {
        let runner = BatchRunnerBuilder::new().with_sequence(vec![1]).build();
        assert!(matches!(
            runner.run(&layout()),
            Err(BatchError::NoStrategies)
        ));

        let runner = BatchRunnerBuilder::new()
            .with_strategy(StrategyKind::FirstFit)
            .build();
        let bad = Layout::from_rows(&["1x1"]);
        assert!(matches!(runner.run(&bad), Err(BatchError::Grid(_))));
    }

    #[test]
    fn test_builder_deduplicates_strategies() {
        let runner = BatchRunnerBuilder::new()
            .with_strategy(StrategyKind::BestFit)
            .with_strategies([StrategyKind::BestFit, StrategyKind::WorstFit])
            .with_max_threads(0)
            .build();
        assert_eq!(
            runner.strategies(),
            &[StrategyKind::BestFit, StrategyKind::WorstFit]
        );
        assert_eq!(runner.max_threads(), 1);
        assert_eq!(runner.trial_seed(3), 3);
    }

    #[test]
    fn test_anchors_record_skips() {
        let runner = BatchRunnerBuilder::new()
            .with_strategy(StrategyKind::FirstFit)
            .with_sequence(vec![2, 10, 0])
            .build();
        let report = runner.run(&Layout::from_rows(&["1111"])).unwrap();
        let trial = &report.trials[0];
        assert_eq!(trial.anchors, vec![Some((0, 0)), None]);
        assert_eq!(report.trials_for(StrategyKind::FirstFit).count(), 1);
        assert_eq!(report.trials_for(StrategyKind::Hybrid).count(), 0);
    }
}
