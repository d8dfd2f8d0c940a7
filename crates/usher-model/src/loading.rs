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

//! Instance loader for auditorium layouts and arrival sequences.
//!
//! The `LayoutLoader` turns a whitespace-delimited text stream into an
//! `Instance`: the raw `Layout` of the auditorium and the ordered group sizes
//! that will arrive. Cell values are passed through untouched, so a bad digit
//! is reported by `SeatingGrid::from_layout` with its exact row and column.
//!
//! Lines may contain comments introduced by `#`. The parser accepts any
//! `BufRead`, file path, raw reader, or string slice.

use crate::{
    grid::{GridError, Layout, SeatingGrid},
    groups::GroupSequence,
};
use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use tracing::{debug, warn};

/// The error type for the instance loading process.
#[derive(Debug)]
pub enum LayoutLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before the layout was complete.
    UnexpectedEof,
    /// A token could not be parsed into the expected type.
    Parse(ParseTokenError),
    /// The row or column count is zero.
    InvalidDimensions,
    /// The group sequence was not terminated by `0`.
    MissingSentinel,
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "usize").
    pub type_name: &'static str,
}

impl std::fmt::Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl std::fmt::Display for LayoutLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => {
                write!(f, "Grid dimensions (R and C) must be positive integers")
            }
            Self::MissingSentinel => {
                write!(f, "Group sequence ended without the terminating 0")
            }
        }
    }
}

impl std::error::Error for LayoutLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LayoutLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for LayoutLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

/// A loaded problem: the auditorium plus its arrival sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub layout: Layout,
    /// Group sizes in arrival order, without the sentinel.
    pub groups: Vec<usize>,
}

impl Instance {
    /// Builds a fresh grid from the layout.
    #[inline]
    pub fn grid(&self) -> Result<SeatingGrid, GridError> {
        SeatingGrid::from_layout(&self.layout)
    }

    /// A fresh arrival sequence over `groups`.
    #[inline]
    pub fn sequence(&self) -> GroupSequence {
        GroupSequence::new(self.groups.iter().copied())
    }
}

/// A configurable loader for seating instances.
///
/// The format this parser expects is as follows (whitespace-separated tokens):
///
/// ```raw
/// R                 // number of rows
/// C                 // number of columns
/// c_1_1 ... c_1_C   // row 1 as one token of C digits, 1 = seat, 0 = spacer
/// ...
/// c_R_1 ... c_R_C
/// g_1               // group sizes in arrival order
/// ...
/// 0                 // sentinel
/// ```
///
/// # Configuration
/// * `require_sentinel`: If true, a stream that ends before the `0` sentinel
///   is an error. Otherwise the groups read so far are kept and a warning is
///   logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutLoader {
    require_sentinel: bool,
}

impl LayoutLoader {
    /// Creates a new `LayoutLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether a missing `0` sentinel is an error.
    #[inline]
    pub fn require_sentinel(mut self, yes: bool) -> Self {
        self.require_sentinel = yes;
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Instance, LayoutLoaderError> {
        let mut tokens = Tokens::new(rdr);

        let rows: usize = tokens.next()?;
        let cols: usize = tokens.next()?;
        if rows == 0 || cols == 0 {
            return Err(LayoutLoaderError::InvalidDimensions);
        }

        let mut lines = Vec::with_capacity(rows);
        for _ in 0..rows {
            lines.push(tokens.next::<String>()?);
        }

        let mut groups = Vec::new();
        loop {
            match tokens.next::<usize>() {
                Ok(0) => break,
                Ok(size) => groups.push(size),
                Err(LayoutLoaderError::UnexpectedEof) => {
                    if self.require_sentinel {
                        return Err(LayoutLoaderError::MissingSentinel);
                    }
                    warn!(
                        groups = groups.len(),
                        "group sequence ended without the terminating 0"
                    );
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(rows, cols, groups = groups.len(), "loaded instance");
        Ok(Instance {
            layout: Layout::new(rows, cols, lines),
            groups,
        })
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Instance, LayoutLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Instance, LayoutLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Instance, LayoutLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Pulls whitespace-separated tokens out of a line-oriented reader.
///
/// Everything from `#` to the end of a line is dropped before splitting.
struct Tokens<R> {
    rdr: R,
    line: String,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            line: String::new(),
            pending: VecDeque::new(),
        }
    }

    /// Reads lines until at least one token is pending. Returns `Ok(false)` on EOF.
    fn refill(&mut self) -> Result<bool, LayoutLoaderError> {
        while self.pending.is_empty() {
            self.line.clear();
            if self.rdr.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
            let content = match self.line.split_once('#') {
                Some((before, _)) => before,
                None => self.line.as_str(),
            };
            self.pending
                .extend(content.split_whitespace().map(str::to_owned));
        }
        Ok(true)
    }

    /// Parses the next token as `T`.
    fn next<T: FromStr>(&mut self) -> Result<T, LayoutLoaderError> {
        if !self.refill()? {
            return Err(LayoutLoaderError::UnexpectedEof);
        }
        let token = self
            .pending
            .pop_front()
            .ok_or(LayoutLoaderError::UnexpectedEof)?;
        token.parse::<T>().map_err(|_| {
            LayoutLoaderError::Parse(ParseTokenError {
                type_name: std::any::type_name::<T>(),
                token,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MalformedGridError;
    use crate::groups::GroupSource;

    const SMALL_INSTANCE: &str = r#"
        3           # rows
        5           # cols
        11011
        11111       # full row
        01110
        2 1
        3
        0
        4           # after the sentinel, ignored
    "#;

    #[test]
    fn test_loads_layout_and_groups() {
        let instance = LayoutLoader::new().from_str(SMALL_INSTANCE).unwrap();
        assert_eq!(instance.layout.rows, 3);
        assert_eq!(instance.layout.cols, 5);
        assert_eq!(instance.layout.lines, vec!["11011", "11111", "01110"]);
        assert_eq!(instance.groups, vec![2, 1, 3]);

        let grid = instance.grid().unwrap();
        assert_eq!(grid.num_seats(), 12);

        let mut seq = instance.sequence();
        assert_eq!(seq.next_group(), Ok(2));
    }

    #[test]
    fn test_missing_sentinel_is_tolerated_by_default() {
        let instance = LayoutLoader::new().from_str("1 3 111 1 2").unwrap();
        assert_eq!(instance.groups, vec![1, 2]);
    }

    #[test]
    fn test_missing_sentinel_can_be_required() {
        let res = LayoutLoader::new()
            .require_sentinel(true)
            .from_str("1 3 111 1 2");
        assert!(matches!(res, Err(LayoutLoaderError::MissingSentinel)));
    }

    #[test]
    fn test_truncated_layout() {
        let res = LayoutLoader::new().from_str("2 3 111");
        assert!(matches!(res, Err(LayoutLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_zero_dimensions() {
        let res = LayoutLoader::new().from_str("0 3 0");
        assert!(matches!(res, Err(LayoutLoaderError::InvalidDimensions)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res = LayoutLoader::new().from_str("1 3 111 2 two 0");
        match res {
            Err(LayoutLoaderError::Parse(e)) => {
                assert_eq!(e.token, "two");
                assert!(e.type_name.contains("usize"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_bad_digit_reaches_grid() {
        let instance = LayoutLoader::new().from_str("1 3 121 0").unwrap();
        assert!(matches!(
            instance.grid(),
            Err(GridError::MalformedGrid(MalformedGridError::InvalidCell {
                row: 0,
                col: 1,
                value: '2'
            }))
        ));
    }

    #[test]
    fn test_comment_glued_to_token() {
        let instance = LayoutLoader::new().from_str("1 2#dims\n11#row\n0").unwrap();
        assert_eq!(instance.layout.lines, vec!["11"]);
        assert!(instance.groups.is_empty());
    }
}
