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

//! Grid cells.
//!
//! A `Position` is either a `Seat`, which moves through the
//! Eligible / Taken / Unavailable state machine, or a `Spacer`, which is inert
//! floor space (aisles, stairs, gaps). Spacers still take part in the
//! proximity relation so that distances are measured in physical columns.

use crate::index::{Coordinate, GroupId};

/// The state of a single seat.
///
/// A seat holds a group identifier exactly when it is `Taken`; the variant
/// carries it, so the two can never disagree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum SeatState {
    /// Free and not blocked by distancing; a group may be placed here.
    #[default]
    Eligible,
    /// Occupied by the given group.
    Taken(GroupId),
    /// Blocked because it is too close to an occupied seat.
    Unavailable,
}

impl SeatState {
    /// The single-character rendering used by the grid display.
    #[inline]
    pub const fn symbol(&self) -> char {
        match self {
            Self::Eligible => 'F',
            Self::Taken(_) => 'T',
            Self::Unavailable => 'U',
        }
    }
}

impl std::fmt::Display for SeatState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eligible => write!(f, "Eligible"),
            Self::Taken(group) => write!(f, "Taken({})", group.get()),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// A seat at a fixed coordinate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Seat {
    coordinate: Coordinate,
    state: SeatState,
}

impl Seat {
    /// Creates an eligible seat.
    #[inline]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            state: SeatState::Eligible,
        }
    }

    #[inline]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[inline]
    pub const fn state(&self) -> SeatState {
        self.state
    }

    #[inline]
    pub const fn is_eligible(&self) -> bool {
        matches!(self.state, SeatState::Eligible)
    }

    #[inline]
    pub const fn is_taken(&self) -> bool {
        matches!(self.state, SeatState::Taken(_))
    }

    #[inline]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self.state, SeatState::Unavailable)
    }

    /// The group occupying this seat, if any.
    #[inline]
    pub const fn taken_by(&self) -> Option<GroupId> {
        match self.state {
            SeatState::Taken(group) => Some(group),
            _ => None,
        }
    }

    /// Marks the seat as taken by `group`.
    ///
    /// The caller validates eligibility first; the grid never occupies a
    /// seat that is not eligible.
    #[inline]
    pub fn occupy(&mut self, group: GroupId) {
        debug_assert!(
            self.is_eligible(),
            "called `Seat::occupy` on seat {} in state {}",
            self.coordinate,
            self.state
        );
        self.state = SeatState::Taken(group);
    }

    /// Blocks the seat because of distancing.
    #[inline]
    pub fn make_unavailable(&mut self) {
        debug_assert!(
            !self.is_taken(),
            "called `Seat::make_unavailable` on taken seat {}",
            self.coordinate
        );
        self.state = SeatState::Unavailable;
    }

    /// Returns the seat to `Eligible` and clears any owning group.
    #[inline]
    pub fn free(&mut self) {
        self.state = SeatState::Eligible;
    }
}

/// Inert floor space.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Spacer {
    coordinate: Coordinate,
}

impl Spacer {
    #[inline]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self { coordinate }
    }

    #[inline]
    pub const fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

/// One cell of the seating grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Position {
    Seat(Seat),
    Spacer(Spacer),
}

impl Position {
    #[inline]
    pub const fn coordinate(&self) -> Coordinate {
        match self {
            Self::Seat(seat) => seat.coordinate(),
            Self::Spacer(spacer) => spacer.coordinate(),
        }
    }

    #[inline]
    pub const fn is_spacer(&self) -> bool {
        matches!(self, Self::Spacer(_))
    }

    /// Returns `true` for a seat in the `Eligible` state.
    #[inline]
    pub const fn is_eligible(&self) -> bool {
        match self {
            Self::Seat(seat) => seat.is_eligible(),
            Self::Spacer(_) => false,
        }
    }

    #[inline]
    pub const fn as_seat(&self) -> Option<&Seat> {
        match self {
            Self::Seat(seat) => Some(seat),
            Self::Spacer(_) => None,
        }
    }

    #[inline]
    pub fn as_seat_mut(&mut self) -> Option<&mut Seat> {
        match self {
            Self::Seat(seat) => Some(seat),
            Self::Spacer(_) => None,
        }
    }

    /// `F`, `T` or `U` for seats by state, `X` for spacers.
    #[inline]
    pub const fn symbol(&self) -> char {
        match self {
            Self::Seat(seat) => seat.state().symbol(),
            Self::Spacer(_) => 'X',
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_lifecycle() {
        let mut seat = Seat::new(Coordinate::new(0, 0));
        assert!(seat.is_eligible());
        assert_eq!(seat.taken_by(), None);

        seat.occupy(GroupId::new(3));
        assert!(seat.is_taken());
        assert_eq!(seat.taken_by(), Some(GroupId::new(3)));

        seat.free();
        assert!(seat.is_eligible());
        assert_eq!(seat.taken_by(), None);

        seat.make_unavailable();
        assert!(seat.is_unavailable());
        assert_eq!(seat.taken_by(), None);
    }

    #[test]
    fn test_taken_iff_group_present() {
        let states = [
            SeatState::Eligible,
            SeatState::Taken(GroupId::new(0)),
            SeatState::Unavailable,
        ];
        for state in states {
            let seat = Seat {
                coordinate: Coordinate::new(0, 0),
                state,
            };
            assert_eq!(seat.is_taken(), seat.taken_by().is_some());
        }
    }

    #[test]
    fn test_spacer_is_never_eligible() {
        let p = Position::Spacer(Spacer::new(Coordinate::new(1, 1)));
        assert!(p.is_spacer());
        assert!(!p.is_eligible());
        assert!(p.as_seat().is_none());
        assert_eq!(p.coordinate(), Coordinate::new(1, 1));
    }

    #[test]
    fn test_symbols() {
        let mut seat = Seat::new(Coordinate::new(0, 0));
        assert_eq!(Position::Seat(seat).symbol(), 'F');
        seat.occupy(GroupId::new(0));
        assert_eq!(Position::Seat(seat).symbol(), 'T');
        let mut other = Seat::new(Coordinate::new(0, 1));
        other.make_unavailable();
        assert_eq!(format!("{}", Position::Seat(other)), "U");
        assert_eq!(
            Position::Spacer(Spacer::new(Coordinate::new(0, 2))).symbol(),
            'X'
        );
    }
}
