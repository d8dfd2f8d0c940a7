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

//! Runs of eligible seats.
//!
//! A `PlacementPossibility` is a row-contiguous run of `size` seats starting at
//! `anchor`. The grid hands out maximal runs; strategies narrow them down to
//! exactly the group size with [`PlacementPossibility::sub_possibilities`].

use crate::index::{Coordinate, RowIndex};
use smallvec::SmallVec;
use usher_core::math::span::{ColumnSpan, SpanWindows};

/// The requested group size does not fit the possibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeMismatchError {
    /// The group size that was asked for.
    pub group_size: usize,
    /// The number of seats in the possibility.
    pub available: usize,
}

impl std::fmt::Display for SizeMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group_size == 0 {
            write!(f, "Group size must be positive")
        } else {
            write!(
                f,
                "Group of {} does not fit a run of {} seats",
                self.group_size, self.available
            )
        }
    }
}

impl std::error::Error for SizeMismatchError {}

/// `size` consecutive seats in one row, the leftmost at `anchor`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PlacementPossibility {
    size: usize,
    anchor: Coordinate,
}

impl PlacementPossibility {
    #[inline]
    pub const fn new(anchor: Coordinate, size: usize) -> Self {
        Self { size, anchor }
    }

    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub const fn anchor(&self) -> Coordinate {
        self.anchor
    }

    #[inline]
    pub const fn row(&self) -> RowIndex {
        self.anchor.row
    }

    /// The columns covered by this run.
    #[inline]
    pub fn span(&self) -> ColumnSpan {
        ColumnSpan::with_len(self.anchor.col.get(), self.size)
    }

    /// Returns `true` if a group of `group_size` fits.
    #[inline]
    pub const fn fits(&self, group_size: usize) -> bool {
        group_size > 0 && group_size <= self.size
    }

    /// All runs of exactly `group_size` seats inside this one, left to right.
    ///
    /// There are `size - group_size + 1` of them.
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatchError` when `group_size` is zero or larger than
    /// `size`.
    pub fn sub_possibilities(
        &self,
        group_size: usize,
    ) -> Result<SubPossibilities, SizeMismatchError> {
        if !self.fits(group_size) {
            return Err(SizeMismatchError {
                group_size,
                available: self.size,
            });
        }
        Ok(SubPossibilities {
            row: self.anchor.row,
            windows: self.span().windows(group_size),
        })
    }

    /// The leftmost run of `group_size` seats, where first/best/worst fit put a group.
    pub fn leftmost(&self, group_size: usize) -> Result<PlacementPossibility, SizeMismatchError> {
        if !self.fits(group_size) {
            return Err(SizeMismatchError {
                group_size,
                available: self.size,
            });
        }
        Ok(Self::new(self.anchor, group_size))
    }

    /// The covered coordinates, left to right.
    pub fn seat_coordinates(&self) -> SmallVec<[Coordinate; 8]> {
        let row = self.anchor.row.get();
        self.span()
            .into_iter()
            .map(|col| Coordinate::new(row, col))
            .collect()
    }
}

impl std::fmt::Display for PlacementPossibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} seat(s) from {}", self.size, self.anchor)
    }
}

/// Iterator returned by [`PlacementPossibility::sub_possibilities`].
#[derive(Clone, Debug)]
pub struct SubPossibilities {
    row: RowIndex,
    windows: SpanWindows,
}

impl Iterator for SubPossibilities {
    type Item = PlacementPossibility;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let window = self.windows.next()?;
        Some(PlacementPossibility::new(
            Coordinate::new(self.row.get(), window.start()),
            window.len(),
        ))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.windows.size_hint()
    }
}

impl ExactSizeIterator for SubPossibilities {}
impl std::iter::FusedIterator for SubPossibilities {}
