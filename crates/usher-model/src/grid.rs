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

//! # Seating Grid
//!
//! The mutable auditorium state. A `SeatingGrid` owns a row-major array of
//! `Position`s and the fixed `AdjacencyIndex` over them, and is the only
//! place where seat states change.
//!
//! ## Operations
//!
//! - `placement_possibilities`: maximal runs of eligible seats, row-major.
//! - `place_group`: validates a run, marks it taken, then blocks every
//!   eligible neighbor of the new seats. Validation happens before any
//!   mutation, so a rejected placement leaves the grid untouched.
//! - `proximity_impact`: how many eligible seats a placement *would* block,
//!   without mutating anything.
//!
//! ## Distancing
//!
//! After every successful `place_group`, no eligible seat is adjacent to a
//! taken seat. Seats only move Eligible -> Taken or Eligible -> Unavailable;
//! `free_seat` is the only way back, and it does not revisit neighbors.

use crate::{
    adjacency::AdjacencyIndex,
    index::{Coordinate, GroupId},
    position::{Position, Seat, Spacer},
    possibility::PlacementPossibility,
};
use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};
use tracing::trace;
use usher_core::math::span::ConsecutiveRuns;

/// The raw auditorium description: `rows` strings of `cols` characters,
/// `1` for a seat and `0` for a spacer.
///
/// A `Layout` is not validated; `SeatingGrid::from_layout` does that.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    pub lines: Vec<String>,
}

impl Layout {
    #[inline]
    pub fn new(rows: usize, cols: usize, lines: Vec<String>) -> Self {
        Self { rows, cols, lines }
    }

    /// Builds a layout from row strings, taking the dimensions from the input.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let lines: Vec<String> = rows.iter().map(|r| r.as_ref().to_owned()).collect();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        Self {
            rows: lines.len(),
            cols,
            lines,
        }
    }
}

/// Why a layout could not be turned into a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedGridError {
    /// A cell holds something other than `0` or `1`.
    InvalidCell { row: usize, col: usize, value: char },
    /// A row has the wrong number of cells.
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The number of row strings differs from the declared row count.
    RowCount { expected: usize, found: usize },
    /// The grid has more positions than the adjacency index can address.
    TooLarge { rows: usize, cols: usize },
}

impl std::fmt::Display for MalformedGridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCell { row, col, value } => write!(
                f,
                "Cell ({}, {}) holds '{}', expected '0' or '1'",
                row, col, value
            ),
            Self::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "Row {} has {} cells, expected {}",
                row, found, expected
            ),
            Self::RowCount { expected, found } => {
                write!(f, "Found {} rows, expected {}", found, expected)
            }
            Self::TooLarge { rows, cols } => {
                write!(f, "Grid of {}x{} positions is too large", rows, cols)
            }
        }
    }
}

impl std::error::Error for MalformedGridError {}

/// What is wrong with one coordinate of a requested placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementViolation {
    /// The coordinate is a spacer.
    Spacer,
    /// The coordinate lies outside the grid.
    OutOfBounds,
    /// The seat is taken or unavailable.
    NotEligible,
    /// The group has no members.
    EmptyGroup,
}

impl std::fmt::Display for PlacementViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spacer => write!(f, "position is a spacer"),
            Self::OutOfBounds => write!(f, "position is out of bounds"),
            Self::NotEligible => write!(f, "seat is not eligible"),
            Self::EmptyGroup => write!(f, "group size is zero"),
        }
    }
}

/// A placement request that the grid refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPlacementError {
    pub anchor: Coordinate,
    pub size: usize,
    /// The first coordinate of the run that failed validation.
    pub coordinate: Coordinate,
    pub violation: PlacementViolation,
}

impl std::fmt::Display for InvalidPlacementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot place {} seat(s) at {}: {} {}",
            self.size, self.anchor, self.coordinate, self.violation
        )
    }
}

impl std::error::Error for InvalidPlacementError {}

/// Fatal grid errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    MalformedGrid(MalformedGridError),
    InvalidPlacement(InvalidPlacementError),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedGrid(e) => write!(f, "Malformed grid: {}", e),
            Self::InvalidPlacement(e) => write!(f, "Invalid placement: {}", e),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedGrid(e) => Some(e),
            Self::InvalidPlacement(e) => Some(e),
        }
    }
}

impl From<MalformedGridError> for GridError {
    fn from(e: MalformedGridError) -> Self {
        Self::MalformedGrid(e)
    }
}

impl From<InvalidPlacementError> for GridError {
    fn from(e: InvalidPlacementError) -> Self {
        Self::InvalidPlacement(e)
    }
}

/// The auditorium: positions plus their proximity relation.
#[derive(Clone, Debug)]
pub struct SeatingGrid {
    rows: usize,
    cols: usize,
    positions: Vec<Position>,
    adjacency: AdjacencyIndex,
}

impl SeatingGrid {
    /// Validates `layout` and builds a grid with every seat eligible.
    ///
    /// # Errors
    ///
    /// Returns `GridError::MalformedGrid` if the row count or any row length
    /// differs from the declared dimensions, or a cell is not `0`/`1`.
    pub fn from_layout(layout: &Layout) -> Result<Self, GridError> {
        let (rows, cols) = (layout.rows, layout.cols);
        if layout.lines.len() != rows {
            return Err(MalformedGridError::RowCount {
                expected: rows,
                found: layout.lines.len(),
            }
            .into());
        }
        if !AdjacencyIndex::fits(rows, cols) {
            return Err(MalformedGridError::TooLarge { rows, cols }.into());
        }

        let mut positions = Vec::with_capacity(rows * cols);
        for (row, line) in layout.lines.iter().enumerate() {
            let found = line.chars().count();
            if found != cols {
                return Err(MalformedGridError::RowLength {
                    row,
                    expected: cols,
                    found,
                }
                .into());
            }
            for (col, value) in line.chars().enumerate() {
                let coordinate = Coordinate::new(row, col);
                let position = match value {
                    '1' => Position::Seat(Seat::new(coordinate)),
                    '0' => Position::Spacer(Spacer::new(coordinate)),
                    _ => {
                        return Err(MalformedGridError::InvalidCell { row, col, value }.into());
                    }
                };
                positions.push(position);
            }
        }

        Ok(Self {
            rows,
            cols,
            positions,
            adjacency: AdjacencyIndex::new(rows, cols),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    /// Returns `true` if `coordinate` lies inside the grid.
    #[inline]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.row.get() < self.rows && coordinate.col.get() < self.cols
    }

    #[inline]
    pub fn position(&self, coordinate: Coordinate) -> Option<&Position> {
        if self.contains(coordinate) {
            Some(&self.positions[coordinate.flat(self.cols)])
        } else {
            None
        }
    }

    /// The seat at `coordinate`, or `None` for spacers and out-of-bounds.
    #[inline]
    pub fn seat(&self, coordinate: Coordinate) -> Option<&Seat> {
        self.position(coordinate).and_then(Position::as_seat)
    }

    /// All positions in row-major order.
    #[inline]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    fn seats(&self) -> impl Iterator<Item = &Seat> {
        self.positions.iter().filter_map(Position::as_seat)
    }

    /// Eligible seat coordinates in row-major order.
    pub fn eligible_coordinates(&self) -> Vec<Coordinate> {
        self.seats()
            .filter(|s| s.is_eligible())
            .map(Seat::coordinate)
            .collect()
    }

    /// Taken seat coordinates in row-major order.
    pub fn taken_coordinates(&self) -> Vec<Coordinate> {
        self.seats()
            .filter(|s| s.is_taken())
            .map(Seat::coordinate)
            .collect()
    }

    /// The seats occupied by `group`, left to right.
    pub fn seats_of_group(&self, group: GroupId) -> Vec<Coordinate> {
        self.seats()
            .filter(|s| s.taken_by() == Some(group))
            .map(Seat::coordinate)
            .collect()
    }

    #[inline]
    pub fn num_seats(&self) -> usize {
        self.seats().count()
    }

    #[inline]
    pub fn num_eligible_seats(&self) -> usize {
        self.seats().filter(|s| s.is_eligible()).count()
    }

    #[inline]
    pub fn num_taken_seats(&self) -> usize {
        self.seats().filter(|s| s.is_taken()).count()
    }

    #[inline]
    pub fn num_unavailable_seats(&self) -> usize {
        self.seats().filter(|s| s.is_unavailable()).count()
    }

    /// Maximal runs of eligible seats, ordered by row and then column.
    ///
    /// Each run is anchored at its leftmost column. Spacers, taken and
    /// unavailable seats all end a run.
    pub fn placement_possibilities(&self) -> Vec<PlacementPossibility> {
        let mut out = Vec::new();
        let mut columns = Vec::with_capacity(self.cols);
        for row in 0..self.rows {
            columns.clear();
            let base = row * self.cols;
            columns.extend(
                (0..self.cols).filter(|&col| self.positions[base + col].is_eligible()),
            );
            out.extend(ConsecutiveRuns::new(&columns).map(|span| {
                PlacementPossibility::new(Coordinate::new(row, span.start()), span.len())
            }));
        }
        out
    }

    fn validate_run(
        &self,
        anchor: Coordinate,
        size: usize,
    ) -> Result<(), InvalidPlacementError> {
        let fail = |coordinate, violation| InvalidPlacementError {
            anchor,
            size,
            coordinate,
            violation,
        };
        if size == 0 {
            return Err(fail(anchor, PlacementViolation::EmptyGroup));
        }
        for offset in 0..size {
            let coordinate = anchor.shifted_right(offset);
            match self.position(coordinate) {
                None => return Err(fail(coordinate, PlacementViolation::OutOfBounds)),
                Some(Position::Spacer(_)) => {
                    return Err(fail(coordinate, PlacementViolation::Spacer));
                }
                Some(Position::Seat(seat)) if !seat.is_eligible() => {
                    return Err(fail(coordinate, PlacementViolation::NotEligible));
                }
                Some(Position::Seat(_)) => {}
            }
        }
        Ok(())
    }

    /// Places `group` on the `size` seats starting at `anchor` and blocks
    /// their eligible neighbors.
    ///
    /// Returns the number of seats that became unavailable.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidPlacement` naming the first offending
    /// coordinate if any seat of the run is a spacer, out of bounds or not
    /// eligible. The grid is unchanged in that case.
    pub fn place_group(
        &mut self,
        anchor: Coordinate,
        size: usize,
        group: GroupId,
    ) -> Result<usize, GridError> {
        self.validate_run(anchor, size)?;

        let base = anchor.flat(self.cols);
        for flat in base..base + size {
            if let Some(seat) = self.positions[flat].as_seat_mut() {
                seat.occupy(group);
            }
        }

        let mut blocked = FixedBitSet::with_capacity(self.positions.len());
        for flat in base..base + size {
            for &n in self.adjacency.neighbors(flat) {
                let n = n as usize;
                // Group seats are taken by now and therefore skipped here.
                if self.positions[n].is_eligible() {
                    blocked.insert(n);
                }
            }
        }

        let invalidated = blocked.count_ones(..);
        for flat in blocked.ones() {
            if let Some(seat) = self.positions[flat].as_seat_mut() {
                seat.make_unavailable();
            }
        }

        trace!(
            group = group.get(),
            row = anchor.row.get(),
            col = anchor.col.get(),
            size,
            invalidated,
            "placed group"
        );
        Ok(invalidated)
    }

    /// Number of eligible seats a placement on `seats` would block.
    ///
    /// The candidate seats themselves are never counted. Does not mutate the grid.
    pub fn proximity_impact(&self, seats: &[Coordinate]) -> usize {
        let mut scratch = FixedBitSet::with_capacity(self.positions.len());
        self.proximity_impact_with(seats, &mut scratch)
    }

    /// Like [`SeatingGrid::proximity_impact`], reusing `scratch` as the neighbor set.
    pub fn proximity_impact_with(&self, seats: &[Coordinate], scratch: &mut FixedBitSet) -> usize {
        self.collect_neighbors(seats, scratch);
        scratch.count_ones(..)
    }

    /// The eligible neighbors of `seats`, excluding `seats`, in row-major order.
    pub fn proximity_neighbors(&self, seats: &[Coordinate]) -> Vec<Coordinate> {
        let mut scratch = FixedBitSet::with_capacity(self.positions.len());
        self.collect_neighbors(seats, &mut scratch);
        scratch
            .ones()
            .map(|flat| Coordinate::from_flat(flat, self.cols))
            .collect()
    }

    fn collect_neighbors(&self, seats: &[Coordinate], scratch: &mut FixedBitSet) {
        scratch.clear();
        scratch.grow(self.positions.len());
        for &seat in seats {
            debug_assert!(
                self.contains(seat),
                "called `SeatingGrid::proximity_impact` with {} outside a {}x{} grid",
                seat,
                self.rows,
                self.cols
            );
            for &n in self.adjacency.neighbors(seat.flat(self.cols)) {
                let n = n as usize;
                if self.positions[n].is_eligible() {
                    scratch.insert(n);
                }
            }
        }
        for &seat in seats {
            scratch.set(seat.flat(self.cols), false);
        }
    }

    /// Returns the seat at `coordinate` to eligible, clearing its group.
    ///
    /// Neighbors blocked by this seat stay unavailable.
    ///
    /// # Errors
    ///
    /// Returns `GridError::InvalidPlacement` for spacers and coordinates
    /// outside the grid.
    pub fn free_seat(&mut self, coordinate: Coordinate) -> Result<(), GridError> {
        let fail = |violation| InvalidPlacementError {
            anchor: coordinate,
            size: 1,
            coordinate,
            violation,
        };
        if !self.contains(coordinate) {
            return Err(fail(PlacementViolation::OutOfBounds).into());
        }
        let flat = coordinate.flat(self.cols);
        match self.positions[flat].as_seat_mut() {
            Some(seat) => {
                seat.free();
                Ok(())
            }
            None => Err(fail(PlacementViolation::Spacer).into()),
        }
    }
}

impl std::fmt::Display for SeatingGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.positions.chunks(self.cols.max(1)) {
            for position in row {
                write!(f, "{}", position.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
