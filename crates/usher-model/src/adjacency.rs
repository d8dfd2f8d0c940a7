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

//! Proximity relation between grid positions.
//!
//! Two positions are neighbors when they sit in the same row one or two
//! columns apart, in the same column one row apart, or diagonally one row and
//! one column apart. The relation is undirected and fixed for the lifetime of
//! a grid, so it is stored once in compressed sparse row form:
//! `offsets[p]..offsets[p + 1]` indexes the sorted neighbor list of the
//! position with flat index `p` inside `neighbors`.
//!
//! Spacers are ordinary nodes here. Filtering them out is the grid's job.

/// Row/column displacements that define the proximity relation.
///
/// The pattern is symmetric under negation, which makes the relation symmetric.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 10] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -2),
    (0, -1),
    (0, 1),
    (0, 2),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A read-only CSR adjacency list over the flat positions of a `rows x cols` grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyIndex {
    rows: usize,
    cols: usize,
    /// Length `rows * cols + 1`.
    offsets: Vec<u32>,
    /// Neighbor lists, sorted within each position.
    neighbors: Vec<u32>,
}

impl AdjacencyIndex {
    /// Returns `true` if a `rows x cols` grid can be indexed, i.e. every
    /// neighbor list entry and offset fits in a `u32`.
    #[inline]
    pub const fn fits(rows: usize, cols: usize) -> bool {
        match rows.checked_mul(cols) {
            Some(positions) => match positions.checked_mul(NEIGHBOR_OFFSETS.len()) {
                Some(entries) => entries < u32::MAX as usize,
                None => false,
            },
            None => false,
        }
    }

    /// Builds the relation for a `rows x cols` grid.
    ///
    /// # Panics
    ///
    /// Panics if [`AdjacencyIndex::fits`] is `false` for the dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            Self::fits(rows, cols),
            "called `AdjacencyIndex::new` with a {}x{} grid, which exceeds the u32 index space",
            rows,
            cols
        );
        let num_positions = rows * cols;

        let mut offsets = Vec::with_capacity(num_positions + 1);
        let mut neighbors = Vec::with_capacity(num_positions * NEIGHBOR_OFFSETS.len());
        offsets.push(0u32);

        for row in 0..rows {
            for col in 0..cols {
                // Offsets are listed in ascending (dr, dc) order, which is
                // ascending flat order as well.
                for &(dr, dc) in NEIGHBOR_OFFSETS.iter() {
                    let (Some(r), Some(c)) =
                        (row.checked_add_signed(dr), col.checked_add_signed(dc))
                    else {
                        continue;
                    };
                    if r < rows && c < cols {
                        neighbors.push((r * cols + c) as u32);
                    }
                }
                offsets.push(neighbors.len() as u32);
            }
        }

        debug_assert!(
            offsets.windows(2).all(|w| {
                neighbors[w[0] as usize..w[1] as usize]
                    .windows(2)
                    .all(|p| p[0] < p[1])
            }),
            "called `AdjacencyIndex::new` produced an unsorted neighbor list"
        );

        Self {
            rows,
            cols,
            offsets,
            neighbors,
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of positions covered by this index.
    #[inline]
    pub fn num_positions(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Sorted flat indices of the positions adjacent to `position`.
    #[inline]
    pub fn neighbors(&self, position: usize) -> &[u32] {
        debug_assert!(
            position < self.num_positions(),
            "called `AdjacencyIndex::neighbors` with position {} out of bounds for {} positions",
            position,
            self.num_positions()
        );
        let start = self.offsets[position] as usize;
        let end = self.offsets[position + 1] as usize;
        &self.neighbors[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adjacent(adj: &AdjacencyIndex, a: usize, b: usize) -> bool {
        adj.neighbors(a).binary_search(&(b as u32)).is_ok()
    }

    #[test]
    fn test_offsets_are_symmetric() {
        for &(dr, dc) in NEIGHBOR_OFFSETS.iter() {
            assert!(NEIGHBOR_OFFSETS.contains(&(-dr, -dc)));
        }
    }

    #[test]
    fn test_single_row_reaches_two_columns() {
        let adj = AdjacencyIndex::new(1, 5);
        assert_eq!(adj.neighbors(0), &[1, 2]);
        assert_eq!(adj.neighbors(2), &[0, 1, 3, 4]);
        assert_eq!(adj.neighbors(4), &[2, 3]);
    }

    #[test]
    fn test_interior_position_has_ten_neighbors() {
        let adj = AdjacencyIndex::new(3, 5);
        // (1, 2) -> flat 7
        let n = adj.neighbors(7);
        assert_eq!(n.len(), 10);
        assert_eq!(n, &[1, 2, 3, 5, 6, 8, 9, 11, 12, 13]);
    }

    #[test]
    fn test_no_vertical_distance_two() {
        let adj = AdjacencyIndex::new(3, 1);
        assert!(adjacent(&adj, 0, 1));
        assert!(!adjacent(&adj, 0, 2));
    }

    #[test]
    fn test_no_diagonal_knight_moves() {
        let adj = AdjacencyIndex::new(2, 4);
        // (0, 0) and (1, 2) are one row and two columns apart.
        assert!(!adjacent(&adj, 0, 6));
        assert!(adjacent(&adj, 0, 5));
    }

    #[test]
    fn test_symmetry_over_all_positions() {
        for (rows, cols) in [(1, 1), (1, 6), (4, 1), (3, 7), (6, 6)] {
            let adj = AdjacencyIndex::new(rows, cols);
            assert_eq!(adj.num_positions(), rows * cols);
            for a in 0..adj.num_positions() {
                assert!(!adjacent(&adj, a, a));
                for &b in adj.neighbors(a) {
                    assert!(adjacent(&adj, b as usize, a), "{} -> {} not mirrored", a, b);
                }
            }
        }
    }

    #[test]
    fn test_edge_count() {
        // A 1x4 row: horizontal edges at distance 1 (3) and distance 2 (2).
        assert_eq!(AdjacencyIndex::new(1, 4).num_edges(), 5);
        // A 2x2 block: 2 horizontal, 2 vertical, 2 diagonal.
        assert_eq!(AdjacencyIndex::new(2, 2).num_edges(), 6);
    }

    #[test]
    fn test_fits_counts_neighbor_entries() {
        assert!(AdjacencyIndex::fits(20, 30));
        assert!(AdjacencyIndex::fits(1, 429_496_729));
        // Fewer positions than u32::MAX, but ten neighbor slots each overflow.
        assert!(!AdjacencyIndex::fits(1, 429_496_730));
        assert!(!AdjacencyIndex::fits(usize::MAX, 2));
    }

    #[test]
    fn test_empty_grid() {
        let adj = AdjacencyIndex::new(0, 0);
        assert_eq!(adj.num_positions(), 0);
        assert_eq!(adj.num_edges(), 0);
    }
}
