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

//! Online allocation strategies
//!
//! Each strategy looks at the current runs of eligible seats and picks the
//! exact seats for one arriving group. The returned possibility always has
//! the group's size; the allocator places it as-is.
//!
//! Provided strategies:
//! - `first_fit`: first run that is large enough, leftmost seats.
//! - `best_fit`: smallest run that is large enough, leftmost seats.
//! - `worst_fit`: largest run, leftmost seats.
//! - `min_impact`: the sub-run that blocks the fewest eligible seats.
//! - `hybrid`: best fit narrowed by impact, remaining ties drawn at random.
//!
//! Deterministic strategies break ties by the order of the options: by row,
//! then column, then sub-run position.

pub mod best_fit;
pub mod first_fit;
pub mod hybrid;
pub mod min_impact;
pub mod worst_fit;

use crate::strategy::{
    best_fit::BestFitStrategy, first_fit::FirstFitStrategy, hybrid::HybridStrategy,
    min_impact::MinImpactStrategy, worst_fit::WorstFitStrategy,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use usher_model::{
    grid::SeatingGrid,
    possibility::{PlacementPossibility, SizeMismatchError},
};

/// No option can hold the group.
///
/// The allocator skips the group and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPlacementFound {
    pub group_size: usize,
}

impl std::fmt::Display for NoPlacementFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No placement found for a group of {}", self.group_size)
    }
}

impl std::error::Error for NoPlacementFound {}

impl From<SizeMismatchError> for NoPlacementFound {
    fn from(e: SizeMismatchError) -> Self {
        Self {
            group_size: e.group_size,
        }
    }
}

/// Decides where an arriving group sits.
pub trait AllocationStrategy {
    /// Returns the name of the strategy.
    fn name(&self) -> &str;

    /// Picks `group_size` seats out of `options`.
    ///
    /// `options` are the maximal eligible runs of `grid`, in row-major order.
    /// The returned possibility has exactly `group_size` seats and lies
    /// inside one of the options.
    fn choose(
        &mut self,
        grid: &SeatingGrid,
        options: &[PlacementPossibility],
        group_size: usize,
    ) -> Result<PlacementPossibility, NoPlacementFound>;
}

impl<S> AllocationStrategy for Box<S>
where
    S: AllocationStrategy + ?Sized,
{
    #[inline]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline]
    fn choose(
        &mut self,
        grid: &SeatingGrid,
        options: &[PlacementPossibility],
        group_size: usize,
    ) -> Result<PlacementPossibility, NoPlacementFound> {
        (**self).choose(grid, options, group_size)
    }
}

impl std::fmt::Debug for dyn AllocationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationStrategy({})", self.name())
    }
}

impl std::fmt::Display for dyn AllocationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllocationStrategy({})", self.name())
    }
}

/// The built-in strategies by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    FirstFit,
    BestFit,
    WorstFit,
    MinImpact,
    Hybrid,
}

impl StrategyKind {
    /// Every strategy, in a fixed order.
    pub const ALL: [StrategyKind; 5] = [
        Self::FirstFit,
        Self::BestFit,
        Self::WorstFit,
        Self::MinImpact,
        Self::Hybrid,
    ];

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first-fit",
            Self::BestFit => "best-fit",
            Self::WorstFit => "worst-fit",
            Self::MinImpact => "min-impact",
            Self::Hybrid => "hybrid",
        }
    }

    /// Returns `true` if the strategy draws random numbers.
    #[inline]
    pub const fn is_randomized(&self) -> bool {
        matches!(self, Self::Hybrid)
    }

    /// Builds the strategy. `seed` is only used by randomized strategies.
    pub fn build(&self, seed: u64) -> Box<dyn AllocationStrategy + Send> {
        match self {
            Self::FirstFit => Box::new(FirstFitStrategy::new()),
            Self::BestFit => Box::new(BestFitStrategy::new()),
            Self::WorstFit => Box::new(WorstFitStrategy::new()),
            Self::MinImpact => Box::new(MinImpactStrategy::new()),
            Self::Hybrid => Box::new(HybridStrategy::new(ChaCha8Rng::seed_from_u64(seed))),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string does not name a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStrategyKindError {
    pub input: String,
}

impl std::fmt::Display for ParseStrategyKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown strategy '{}', expected one of: first-fit, best-fit, worst-fit, min-impact, hybrid",
            self.input
        )
    }
}

impl std::error::Error for ParseStrategyKindError {}

impl std::str::FromStr for StrategyKind {
    type Err = ParseStrategyKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ParseStrategyKindError {
                input: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usher_model::grid::Layout;

    #[test]
    fn test_kind_roundtrip_through_strings() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert_eq!("Best_Fit".parse::<StrategyKind>(), Ok(StrategyKind::BestFit));
        assert!("random".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn test_built_strategies_have_names() {
        let names: Vec<String> = StrategyKind::ALL
            .iter()
            .map(|k| k.build(0).name().to_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "FirstFitStrategy",
                "BestFitStrategy",
                "WorstFitStrategy",
                "MinImpactStrategy",
                "HybridStrategy"
            ]
        );
    }

    #[test]
    fn test_every_strategy_rejects_oversize_groups() {
        let grid = SeatingGrid::from_layout(&Layout::from_rows(&["11011", "11111"])).unwrap();
        let options = grid.placement_possibilities();
        for kind in StrategyKind::ALL {
            let mut strategy = kind.build(7);
            assert_eq!(
                strategy.choose(&grid, &options, 10),
                Err(NoPlacementFound { group_size: 10 }),
                "{}",
                kind
            );
            assert_eq!(
                strategy.choose(&grid, &[], 1),
                Err(NoPlacementFound { group_size: 1 })
            );
        }
    }

    #[test]
    fn test_every_strategy_returns_group_sized_run_inside_an_option() {
        let grid =
            SeatingGrid::from_layout(&Layout::from_rows(&["1101111", "1111111", "0111110"]))
                .unwrap();
        let options = grid.placement_possibilities();
        for kind in StrategyKind::ALL {
            let mut strategy = kind.build(3);
            for size in 1..=7 {
                let choice = strategy.choose(&grid, &options, size).unwrap();
                assert_eq!(choice.size(), size);
                assert!(options.iter().any(|o| {
                    o.row() == choice.row() && o.span().contains_span(choice.span())
                }));
            }
        }
    }
}
