//! Card and deck model.
//!
//! Every card carries a direction and a rank, and moves between locations
//! (deck, hand, drawn, action, discard, trashed) for the whole life of a
//! game. Cards are dealt out once at setup and never created or destroyed
//! afterwards.

use serde::{Deserialize, Serialize};

/// Lowest card rank.
pub const MIN_VALUE: u8 = 1;
/// Highest card rank.
pub const MAX_VALUE: u8 = 3;
/// Copies of each direction/rank combination in a player's deck.
pub const COPIES_PER_CARD: usize = 3;

/// Direction printed on a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Back,
}

impl Direction {
    /// Lane delta applied when a card of this direction moves a tank.
    pub fn delta(self) -> i8 {
        match self {
            Direction::Forward => 1,
            Direction::Back => -1,
        }
    }
}

/// Where a card currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardLocation {
    Deck,
    Hand,
    /// Drawn this round, merged into the hand when the draw phase resolves.
    Drawn,
    /// Staged as part of a play-phase submission.
    Action,
    Discard,
    Trashed,
}

/// How a staged card is being used this round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Move,
    Feint,
    Shot,
}

/// A single playing card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub dir: Direction,
    pub value: u8,
    pub location: CardLocation,
    /// Set only while `location == Action`.
    pub action_type: Option<ActionType>,
}

impl Card {
    pub fn new(dir: Direction, value: u8) -> Self {
        Self {
            dir,
            value,
            location: CardLocation::Deck,
            action_type: None,
        }
    }
}

/// Create one player's full deck: 3 copies of each direction/rank pair.
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(COPIES_PER_CARD * 6);
    for dir in [Direction::Forward, Direction::Back] {
        for value in MIN_VALUE..=MAX_VALUE {
            for _ in 0..COPIES_PER_CARD {
                deck.push(Card::new(dir, value));
            }
        }
    }
    deck
}
