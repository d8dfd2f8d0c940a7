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

//! # Usher Model
//!
//! **The auditorium model for online distanced seating.**
//!
//! This crate holds the state that allocation strategies read and the
//! allocator mutates: a grid of seats and spacers, the fixed proximity
//! relation between them, and the runs of eligible seats a group can be
//! placed on.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `RowIndex`, `ColumnIndex` and `GroupId`, plus the
//!   row-major `Coordinate`.
//! * **`position`**: `Seat` (Eligible / Taken / Unavailable) and inert `Spacer` cells.
//! * **`adjacency`**: The proximity relation as a compressed sparse row list.
//! * **`grid`**: `Layout` (raw input) and `SeatingGrid` (validated, mutable state).
//! * **`possibility`**: `PlacementPossibility`, a run of eligible seats in one row.
//! * **`groups`**: The `GroupSource` trait and the in-memory `GroupSequence`.
//! * **`loading`**: Text-format loader producing an `Instance`.
//!
//! ## Design Philosophy
//!
//! 1.  **Type Safety**: Rows, columns and groups are distinct index types.
//! 2.  **Memory Layout**: Positions live in one flat row-major vector and the
//!     adjacency is precomputed once, so queries are slice scans.
//! 3.  **Fail-Fast**: Malformed layouts are rejected at construction, and
//!     placements are fully validated before the grid is touched.

pub mod adjacency;
pub mod grid;
pub mod groups;
pub mod index;
pub mod loading;
pub mod position;
pub mod possibility;
