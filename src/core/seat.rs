//! Seat, marble and board-space identification.
//!
//! ## SeatId
//!
//! Type-safe seat identifier. Seats are 0-based: the first seat at the
//! table is `SeatId(0)`.
//!
//! ## MarbleRef
//!
//! A marble is addressed by its owning seat and its index among that
//! seat's marbles (0..4 in a standard game).

use serde::{Deserialize, Serialize};

/// Seat identifier supporting 1-255 seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeatId(pub u8);

impl SeatId {
    /// Create a new seat ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seat IDs for a table with `seat_count` seats.
    ///
    /// ```
    /// use marbles_screen::core::SeatId;
    ///
    /// let seats: Vec<_> = SeatId::all(4).collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[3], SeatId::new(3));
    /// ```
    pub fn all(seat_count: usize) -> impl Iterator<Item = SeatId> {
        (0..seat_count.min(255) as u8).map(SeatId)
    }
}

impl std::fmt::Display for SeatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Reference to one marble on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarbleRef {
    /// Owning seat.
    pub seat: SeatId,
    /// Index among the seat's marbles.
    pub index: u8,
}

impl MarbleRef {
    /// Create a marble reference.
    #[must_use]
    pub const fn new(seat: SeatId, index: u8) -> Self {
        Self { seat, index }
    }
}

impl std::fmt::Display for MarbleRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Marble({}, {})", self.seat.0, self.index)
    }
}

/// Index of a space on the board, as numbered by the rule engine.
///
/// The engine owns the topology; this crate only passes indices back to
/// `BoardView` for geometry lookups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoardIndex(pub u16);

impl BoardIndex {
    /// Create a new board index.
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// The next space in numbering order.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}
