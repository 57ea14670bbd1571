//! Playing cards as seen by the presentation layer.
//!
//! The rule engine owns the deck; this crate only needs card identity (to
//! address the card's visual actor) and the two rank properties that shape
//! move selection: whether a rank is split between marbles and how many
//! marbles a move with it touches.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ParseCardError;

/// Total spaces a split card moves, shared between its two marbles.
pub const SPLIT_TOTAL: u8 = 7;

/// Number of cards in a full deck.
pub const FULL_DECK_SIZE: usize = 52;

/// Card rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Does playing this rank ask the player how to split its move?
    #[must_use]
    pub const fn requires_split(self) -> bool {
        matches!(self, Rank::Seven)
    }

    /// Number of marbles a move with this rank touches.
    ///
    /// A Jack swaps one of the player's marbles with another marble, so it
    /// always needs two. A split card needs a second marble unless the
    /// first one takes the whole move.
    #[must_use]
    pub const fn marbles_required(self, split: Option<u8>) -> usize {
        match self {
            Rank::Jack => 2,
            Rank::Seven => match split {
                Some(value) if value < SPLIT_TOTAL => 2,
                _ => 1,
            },
            _ => 1,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Card suit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    /// All suits.
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    fn symbol(self) -> char {
        match self {
            Suit::Clubs => 'C',
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Spades => 'S',
        }
    }
}

/// A single playing card.
///
/// ```
/// use marbles_screen::core::{Card, Rank, Suit};
///
/// let card: Card = "JH".parse().unwrap();
/// assert_eq!(card, Card::new(Rank::Jack, Suit::Hearts));
/// assert_eq!(card.to_string(), "JH");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    /// Create a card.
    #[must_use]
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Iterate over every card of a full deck, suit by suit.
    pub fn full_deck() -> impl Iterator<Item = Card> {
        Suit::ALL
            .into_iter()
            .flat_map(|suit| Rank::ALL.into_iter().map(move |rank| Card::new(rank, suit)))
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

impl FromStr for Card {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let suit_char = chars.next_back().ok_or(ParseCardError::Empty)?;
        let rank_part = chars.as_str();

        let suit = Suit::ALL
            .into_iter()
            .find(|suit| suit.symbol() == suit_char.to_ascii_uppercase())
            .ok_or(ParseCardError::UnknownSuit(suit_char))?;

        let rank = Rank::ALL
            .into_iter()
            .find(|rank| rank.symbol().eq_ignore_ascii_case(rank_part))
            .ok_or_else(|| ParseCardError::UnknownRank(rank_part.to_string()))?;

        Ok(Card::new(rank, suit))
    }
}
