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

use std::iter::FusedIterator;

/// A half-open span of columns `[start, end)`.
///
/// # Invariants
/// `start <= end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ColumnSpan {
    start: usize,
    end: usize,
}

impl ColumnSpan {
    /// Creates a new `ColumnSpan`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use usher_core::math::span::ColumnSpan;
    /// let span = ColumnSpan::new(2, 6);
    /// assert_eq!(span.len(), 4);
    /// ```
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(
            start <= end,
            "called `ColumnSpan::new` with start {} greater than end {}",
            start,
            end
        );
        Self { start, end }
    }

    /// Creates the span of `len` columns beginning at `start`.
    #[inline]
    pub fn with_len(start: usize, len: usize) -> Self {
        Self::new(start, start + len)
    }

    /// The first column of the span (inclusive).
    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// The column one past the last (exclusive).
    #[inline]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Number of columns covered.
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `column` lies inside the span.
    #[inline]
    pub const fn contains(&self, column: usize) -> bool {
        self.start <= column && column < self.end
    }

    /// Returns `true` if `other` lies entirely inside `self`.
    #[inline]
    pub const fn contains_span(&self, other: ColumnSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Every sub-span of exactly `width` columns, left to right.
    ///
    /// Yields `len - width + 1` spans when `0 < width <= len`, nothing otherwise.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use usher_core::math::span::ColumnSpan;
    /// let windows: Vec<_> = ColumnSpan::new(3, 7).windows(3).collect();
    /// assert_eq!(windows, vec![ColumnSpan::new(3, 6), ColumnSpan::new(4, 7)]);
    /// ```
    #[inline]
    pub fn windows(&self, width: usize) -> SpanWindows {
        let count = if width == 0 || width > self.len() {
            0
        } else {
            self.len() - width + 1
        };
        SpanWindows {
            next_start: self.start,
            width,
            remaining: count,
        }
    }
}

impl std::fmt::Display for ColumnSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl IntoIterator for ColumnSpan {
    type Item = usize;
    type IntoIter = std::ops::Range<usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.start..self.end
    }
}

/// Iterator over the fixed-width windows of a `ColumnSpan`.
#[derive(Clone, Debug)]
pub struct SpanWindows {
    next_start: usize,
    width: usize,
    remaining: usize,
}

impl Iterator for SpanWindows {
    type Item = ColumnSpan;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let window = ColumnSpan::with_len(self.next_start, self.width);
        self.next_start += 1;
        self.remaining -= 1;
        Some(window)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SpanWindows {}
impl FusedIterator for SpanWindows {}

/// Splits an ascending list of columns into maximal runs of consecutive values.
///
/// The input must be strictly ascending; duplicates would split a run in two.
///
/// # Examples
///
/// ```rust
/// # use usher_core::math::span::{ColumnSpan, ConsecutiveRuns};
/// let runs: Vec<_> = ConsecutiveRuns::new(&[0, 1, 2, 5, 7, 8]).collect();
/// assert_eq!(
///     runs,
///     vec![ColumnSpan::new(0, 3), ColumnSpan::new(5, 6), ColumnSpan::new(7, 9)]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct ConsecutiveRuns<'a> {
    columns: &'a [usize],
    pos: usize,
}

impl<'a> ConsecutiveRuns<'a> {
    #[inline]
    pub fn new(columns: &'a [usize]) -> Self {
        debug_assert!(
            columns.windows(2).all(|w| w[0] < w[1]),
            "called `ConsecutiveRuns::new` with columns that are not strictly ascending"
        );
        Self { columns, pos: 0 }
    }
}

impl Iterator for ConsecutiveRuns<'_> {
    type Item = ColumnSpan;

    fn next(&mut self) -> Option<Self::Item> {
        let first = *self.columns.get(self.pos)?;
        let mut end = first + 1;
        self.pos += 1;
        while let Some(&col) = self.columns.get(self.pos) {
            if col != end {
                break;
            }
            end += 1;
            self.pos += 1;
        }
        Some(ColumnSpan::new(first, end))
    }
}

impl FusedIterator for ConsecutiveRuns<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_accessors() {
        let span = ColumnSpan::new(2, 5);
        assert_eq!(span.start(), 2);
        assert_eq!(span.end(), 5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert!(ColumnSpan::new(4, 4).is_empty());
    }

    #[test]
    #[should_panic(expected = "called `ColumnSpan::new` with start")]
    fn test_new_panics_on_inverted_bounds() {
        let _ = ColumnSpan::new(5, 2);
    }

    #[test]
    fn test_contains() {
        let span = ColumnSpan::with_len(3, 2);
        assert!(!span.contains(2));
        assert!(span.contains(3));
        assert!(span.contains(4));
        assert!(!span.contains(5));

        assert!(span.contains_span(ColumnSpan::new(3, 5)));
        assert!(span.contains_span(ColumnSpan::new(4, 4)));
        assert!(!span.contains_span(ColumnSpan::new(2, 4)));
    }

    #[test]
    fn test_iter_and_display() {
        let span = ColumnSpan::new(1, 4);
        assert_eq!(span.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(format!("{}", span), "[1, 4)");
    }

    #[test]
    fn test_windows_count_and_order() {
        let span = ColumnSpan::new(0, 5);
        let windows: Vec<_> = span.windows(2).collect();
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0], ColumnSpan::new(0, 2));
        assert_eq!(windows[3], ColumnSpan::new(3, 5));
        assert_eq!(span.windows(2).len(), 4);
    }

    #[test]
    fn test_windows_full_width_and_degenerate() {
        let span = ColumnSpan::new(2, 5);
        assert_eq!(span.windows(3).collect::<Vec<_>>(), vec![span]);
        assert_eq!(span.windows(4).count(), 0);
        assert_eq!(span.windows(0).count(), 0);
    }

    #[test]
    fn test_consecutive_runs_splits_gaps() {
        let runs: Vec<_> = ConsecutiveRuns::new(&[1, 2, 4, 5, 6, 9]).collect();
        assert_eq!(
            runs,
            vec![
                ColumnSpan::new(1, 3),
                ColumnSpan::new(4, 7),
                ColumnSpan::new(9, 10)
            ]
        );
    }

    #[test]
    fn test_consecutive_runs_empty_and_single() {
        assert_eq!(ConsecutiveRuns::new(&[]).count(), 0);
        let runs: Vec<_> = ConsecutiveRuns::new(&[3]).collect();
        assert_eq!(runs, vec![ColumnSpan::new(3, 4)]);
    }

    #[test]
    fn test_consecutive_runs_is_fused() {
        let mut runs = ConsecutiveRuns::new(&[0]);
        assert!(runs.next().is_some());
        assert!(runs.next().is_none());
        assert!(runs.next().is_none());
    }
}
