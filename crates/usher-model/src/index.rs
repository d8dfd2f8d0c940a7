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

use usher_core::utils::index::{TypedIndex, TypedIndexTag};

/// A tag type for row indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RowIndexTag;

impl TypedIndexTag for RowIndexTag {
    const NAME: &'static str = "RowIndex";
}

/// A typed index for auditorium rows.
pub type RowIndex = TypedIndex<RowIndexTag>;

/// A tag type for column indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ColumnIndexTag;

impl TypedIndexTag for ColumnIndexTag {
    const NAME: &'static str = "ColumnIndex";
}

/// A typed index for auditorium columns.
pub type ColumnIndex = TypedIndex<ColumnIndexTag>;

/// A tag type for group identifiers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct GroupIdTag;

impl TypedIndexTag for GroupIdTag {
    const NAME: &'static str = "GroupId";
}

/// Identifies an arriving group by its 0-based arrival position.
pub type GroupId = TypedIndex<GroupIdTag>;

/// A zero-based `(row, column)` position in the auditorium grid.
///
/// Ordering is row-major: rows compare first, then columns. This is the
/// order in which every query on the grid reports its results.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Coordinate {
    pub row: RowIndex,
    pub col: ColumnIndex,
}

impl Coordinate {
    /// Creates a coordinate from raw zero-based row and column numbers.
    #[inline]
    pub const fn new(row: usize, col: usize) -> Self {
        Self {
            row: RowIndex::new(row),
            col: ColumnIndex::new(col),
        }
    }

    /// The coordinate `offset` columns to the right in the same row.
    #[inline]
    pub const fn shifted_right(&self, offset: usize) -> Self {
        Self::new(self.row.get(), self.col.get() + offset)
    }

    /// The row-major flat index of this coordinate in a grid `cols` wide.
    #[inline]
    pub const fn flat(&self, cols: usize) -> usize {
        self.row.get() * cols + self.col.get()
    }

    /// Inverse of [`Coordinate::flat`].
    #[inline]
    pub const fn from_flat(flat: usize, cols: usize) -> Self {
        Self::new(flat / cols, flat % cols)
    }

    /// Renders the coordinate 1-based as `"<row> <col>"`.
    #[inline]
    pub fn one_based(&self) -> OneBased {
        OneBased(*self)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row.get(), self.col.get())
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, col): (usize, usize)) -> Self {
        Self::new(row, col)
    }
}

/// Display adapter printing a coordinate 1-based as `"<row> <col>"`.
#[derive(Clone, Copy, Debug)]
pub struct OneBased(Coordinate);

impl std::fmt::Display for OneBased {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0.row.one_based(), self.0.col.one_based())
    }
}
