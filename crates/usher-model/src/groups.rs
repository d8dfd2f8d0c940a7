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

//! Arrival sequences of group sizes.

use std::collections::VecDeque;

/// The arrival sequence is exhausted.
///
/// This is the normal way for an allocation run to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoGroupsLeft;

impl std::fmt::Display for NoGroupsLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "No groups left in the arrival sequence")
    }
}

impl std::error::Error for NoGroupsLeft {}

/// A source of arriving group sizes, consumed front to back.
pub trait GroupSource {
    /// Pops the next group size.
    ///
    /// Once this returns `NoGroupsLeft` it keeps doing so.
    fn next_group(&mut self) -> Result<usize, NoGroupsLeft>;

    /// The number of groups still queued, if known.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// An in-memory arrival sequence.
///
/// A `0` entry acts as the sentinel: it and everything after it are never
/// handed out. Running off the end without a sentinel ends the sequence too.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupSequence {
    queue: VecDeque<usize>,
    exhausted: bool,
}

impl GroupSequence {
    #[inline]
    pub fn new<I: IntoIterator<Item = usize>>(sizes: I) -> Self {
        Self {
            queue: sizes.into_iter().collect(),
            exhausted: false,
        }
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl GroupSource for GroupSequence {
    fn next_group(&mut self) -> Result<usize, NoGroupsLeft> {
        if self.exhausted {
            return Err(NoGroupsLeft);
        }
        match self.queue.pop_front() {
            Some(size) if size > 0 => Ok(size),
            _ => {
                self.exhausted = true;
                self.queue.clear();
                Err(NoGroupsLeft)
            }
        }
    }

    fn remaining(&self) -> Option<usize> {
        if self.exhausted {
            return Some(0);
        }
        Some(self.queue.iter().take_while(|&&s| s > 0).count())
    }
}

impl<G: GroupSource + ?Sized> GroupSource for &mut G {
    #[inline]
    fn next_group(&mut self) -> Result<usize, NoGroupsLeft> {
        (**self).next_group()
    }

    #[inline]
    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

impl From<Vec<usize>> for GroupSequence {
    fn from(sizes: Vec<usize>) -> Self {
        Self {
            queue: sizes.into(),
            exhausted: false,
        }
    }
}

impl FromIterator<usize> for GroupSequence {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_at_sentinel() {
        let mut seq = GroupSequence::from(vec![2, 3, 0, 4]);
        assert_eq!(seq.remaining(), Some(2));
        assert_eq!(seq.next_group(), Ok(2));
        assert_eq!(seq.next_group(), Ok(3));
        assert_eq!(seq.next_group(), Err(NoGroupsLeft));
        assert!(seq.is_exhausted());
        assert_eq!(seq.next_group(), Err(NoGroupsLeft));
        assert_eq!(seq.remaining(), Some(0));
    }

    #[test]
    fn test_ends_without_sentinel() {
        let mut seq: GroupSequence = [1].into_iter().collect();
        assert_eq!(seq.next_group(), Ok(1));
        assert_eq!(seq.next_group(), Err(NoGroupsLeft));
        assert_eq!(seq.next_group(), Err(NoGroupsLeft));
    }

    #[test]
    fn test_empty_sequence() {
        let mut seq = GroupSequence::default();
        assert_eq!(seq.next_group(), Err(NoGroupsLeft));
    }

    #[test]
    fn test_mut_ref_is_a_source() {
        fn drain<S: GroupSource>(mut source: S) -> Vec<usize> {
            std::iter::from_fn(|| source.next_group().ok()).collect()
        }
        let mut seq = GroupSequence::new([4, 1]);
        assert_eq!(drain(&mut seq), vec![4, 1]);
        assert!(seq.is_exhausted());
    }
}
