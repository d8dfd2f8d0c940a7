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

//! Random arrival sequences.
//!
//! `GroupSequenceGenerator` draws group sizes independently from a weighted
//! distribution over a fixed set of sizes. The default distribution favors
//! small parties: sizes 1 to 3 with weight 0.2 each, 4 to 6 with 0.1 and 7 to
//! 8 with 0.05.

use rand::{Rng, distr::Distribution, distr::weighted::WeightedIndex};

/// Group sizes of the default distribution.
pub const DEFAULT_SIZES: [usize; 8] = [1, 2, 3, 4, 5, 6, 7, 8];

/// Weights of the default distribution, aligned with `DEFAULT_SIZES`.
pub const DEFAULT_WEIGHTS: [f64; 8] = [0.2, 0.2, 0.2, 0.1, 0.1, 0.1, 0.05, 0.05];

/// The error type for generator configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Sizes and weights have different lengths.
    LengthMismatch { sizes: usize, weights: usize },
    /// No sizes were given.
    Empty,
    /// A size of zero would read as the end of the sequence.
    ZeroSize,
    /// The weights do not form a distribution (negative, NaN or all zero).
    InvalidWeights(String),
}

impl std::fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LengthMismatch { sizes, weights } => write!(
                f,
                "Got {} group sizes but {} weights",
                sizes, weights
            ),
            Self::Empty => write!(f, "No group sizes given"),
            Self::ZeroSize => write!(f, "Group sizes must be positive"),
            Self::InvalidWeights(e) => write!(f, "Invalid weights: {}", e),
        }
    }
}

impl std::error::Error for GeneratorError {}

/// Draws arrival sequences of group sizes.
#[derive(Debug, Clone)]
pub struct GroupSequenceGenerator<R> {
    rng: R,
    sizes: Vec<usize>,
    distribution: WeightedIndex<f64>,
}

impl<R> GroupSequenceGenerator<R>
where
    R: Rng,
{
    /// Creates a generator over the default distribution.
    pub fn new(rng: R) -> Self {
        match Self::with_weights(rng, DEFAULT_SIZES.to_vec(), DEFAULT_WEIGHTS.to_vec()) {
            Ok(generator) => generator,
            Err(e) => unreachable!("the default distribution is valid: {}", e),
        }
    }

    /// Creates a generator drawing `sizes[i]` with probability proportional to `weights[i]`.
    pub fn with_weights(
        rng: R,
        sizes: Vec<usize>,
        weights: Vec<f64>,
    ) -> Result<Self, GeneratorError> {
        if sizes.len() != weights.len() {
            return Err(GeneratorError::LengthMismatch {
                sizes: sizes.len(),
                weights: weights.len(),
            });
        }
        if sizes.is_empty() {
            return Err(GeneratorError::Empty);
        }
        if sizes.contains(&0) {
            return Err(GeneratorError::ZeroSize);
        }
        let distribution = WeightedIndex::new(&weights)
            .map_err(|e| GeneratorError::InvalidWeights(e.to_string()))?;
        Ok(Self {
            rng,
            sizes,
            distribution,
        })
    }

    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Draws one group size.
    #[inline]
    pub fn next_size(&mut self) -> usize {
        self.sizes[self.distribution.sample(&mut self.rng)]
    }

    /// Draws `n` group sizes.
    pub fn generate(&mut self, n: usize) -> Vec<usize> {
        (0..n).map(|_| self.next_size()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use usher_model::groups::{GroupSequence, GroupSource};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_default_sizes_are_in_range() {
        let mut generator = GroupSequenceGenerator::new(rng());
        let sizes = generator.generate(500);
        assert_eq!(sizes.len(), 500);
        assert!(sizes.iter().all(|s| (1..=8).contains(s)));
    }

    #[test]
    fn test_small_groups_dominate() {
        let mut generator = GroupSequenceGenerator::new(rng());
        let sizes = generator.generate(10_000);
        let small = sizes.iter().filter(|&&s| s <= 3).count();
        // Expected share is 0.6.
        assert!(small > 5_500 && small < 6_500, "small = {}", small);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = GroupSequenceGenerator::new(rng()).generate(100);
        let b = GroupSequenceGenerator::new(rng()).generate(100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_weight_always_drawn() {
        let mut generator =
            GroupSequenceGenerator::with_weights(rng(), vec![2, 5], vec![0.0, 1.0]).unwrap();
        assert!(generator.generate(50).iter().all(|&s| s == 5));
    }

    #[test]
    fn test_configuration_errors() {
        assert_eq!(
            GroupSequenceGenerator::with_weights(rng(), vec![1, 2], vec![1.0]).unwrap_err(),
            GeneratorError::LengthMismatch {
                sizes: 2,
                weights: 1
            }
        );
        assert_eq!(
            GroupSequenceGenerator::with_weights(rng(), vec![], vec![]).unwrap_err(),
            GeneratorError::Empty
        );
        assert_eq!(
            GroupSequenceGenerator::with_weights(rng(), vec![0, 1], vec![1.0, 1.0]).unwrap_err(),
            GeneratorError::ZeroSize
        );
        assert!(matches!(
            GroupSequenceGenerator::with_weights(rng(), vec![1], vec![-1.0]),
            Err(GeneratorError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_generated_sequence_has_no_sentinel() {
        let sizes = GroupSequenceGenerator::new(rng()).generate(20);
        assert!(!sizes.contains(&0));
        let mut seq = GroupSequence::from(sizes);
        assert_eq!(seq.remaining(), Some(20));
        let mut count = 0;
        while seq.next_group().is_ok() {
            count += 1;
        }
        assert_eq!(count, 20);
    }
}
