//! Per-player state: seat, cards, units, damage markers, and the staged
//! submission for the current round.

use crate::card::{self, ActionType, Card, CardLocation, Direction};
use crate::damage::{self, DamageMarker};
use crate::unit::Unit;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cards dealt to each player at setup, and the discard-phase hand limit.
pub const HAND_LIMIT: usize = 3;
/// Lane of the single real tank each player starts with.
pub const START_LANE: u8 = 2;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seat {
    White,
    Black,
}

impl Seat {
    pub const BOTH: [Seat; 2] = [Seat::White, Seat::Black];

    pub fn other(self) -> Seat {
        match self {
            Seat::White => Seat::Black,
            Seat::Black => Seat::White,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::White => 0,
            Seat::Black => 1,
        }
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Seat::White => write!(f, "white"),
            Seat::Black => write!(f, "black"),
        }
    }
}

/// A card staged as part of a play submission. `card` indexes into the
/// owner's card vector, which never reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedAction {
    pub card: usize,
    pub action: ActionType,
    pub resolved: bool,
}

/// The phase-shaped submission a player has staged for this round.
/// Staged data is applied only when the phase transition fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pending {
    Draw { count: u8 },
    Play { actions: Vec<StagedAction> },
    Discard { cards: Vec<usize> },
}

/// A single player's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub seat: Seat,
    /// Every card the player owns, in a fixed order. Identity is the index.
    pub cards: Vec<Card>,
    /// Draw order for cards whose location is `Deck`; the top is the back.
    pub deck_order: Vec<usize>,
    pub units: Vec<Unit>,
    pub damage: Vec<DamageMarker>,
    pub ready: bool,
    pub pending: Option<Pending>,
}

impl PlayerState {
    /// Deal out a fresh player: full shuffled deck, starting hand, one
    /// real tank on the starting lane.
    pub fn new<R: Rng>(seat: Seat, rng: &mut R) -> Self {
        let cards = card::standard_deck();
        let mut deck_order: Vec<usize> = (0..cards.len()).collect();
        deck_order.shuffle(rng);

        let mut player = Self {
            seat,
            cards,
            deck_order,
            units: vec![Unit::real(START_LANE)],
            damage: Vec::new(),
            ready: false,
            pending: None,
        };
        for _ in 0..HAND_LIMIT {
            if let Some(idx) = player.deck_order.pop() {
                player.cards[idx].location = CardLocation::Hand;
            }
        }
        player
    }

    /// The one non-fake unit.
    pub fn real_unit(&self) -> Option<&Unit> {
        self.units.iter().find(|u| !u.fake)
    }

    /// Sum of real damage marker values.
    pub fn real_damage(&self) -> u32 {
        damage::real_total(&self.damage)
    }

    pub fn hand_size(&self) -> usize {
        self.count_in(CardLocation::Hand)
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck_order.len()
    }

    pub fn count_in(&self, location: CardLocation) -> usize {
        self.cards.iter().filter(|c| c.location == location).count()
    }

    /// First hand card matching `(value, dir)` that is not already used.
    pub fn find_in_hand(&self, value: u8, dir: Direction, used: &[usize]) -> Option<usize> {
        self.cards
            .iter()
            .enumerate()
            .find(|(idx, c)| {
                c.location == CardLocation::Hand
                    && c.value == value
                    && c.dir == dir
                    && !used.contains(idx)
            })
            .map(|(idx, _)| idx)
    }

    /// Move up to `count` cards from the deck to the drawn pile, recycling
    /// the discard pile when the deck runs dry. Returns how many cards
    /// actually moved.
    pub fn draw_to_drawn<R: Rng>(&mut self, count: u8, rng: &mut R) -> u8 {
        let mut drawn = 0;
        for _ in 0..count {
            if self.deck_order.is_empty() {
                self.recycle_discard(rng);
            }
            match self.deck_order.pop() {
                Some(idx) => {
                    self.cards[idx].location = CardLocation::Drawn;
                    drawn += 1;
                }
                None => break,
            }
        }
        drawn
    }

    /// Shuffle the discard pile back under the deck.
    pub fn recycle_discard<R: Rng>(&mut self, rng: &mut R) {
        let mut recycled: Vec<usize> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.location == CardLocation::Discard)
            .map(|(idx, _)| idx)
            .collect();
        if recycled.is_empty() {
            return;
        }
        for &idx in &recycled {
            self.cards[idx].location = CardLocation::Deck;
        }
        recycled.shuffle(rng);
        self.deck_order.extend(recycled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player() -> PlayerState {
        let mut rng = StdRng::seed_from_u64(42);
        PlayerState::new(Seat::White, &mut rng)
    }

    #[test]
    fn test_deal_out() {
        let p = player();
        assert_eq!(p.cards.len(), 18);
        assert_eq!(p.hand_size(), 3);
        assert_eq!(p.deck_remaining(), 15);
        assert_eq!(p.units, vec![Unit::real(START_LANE)]);
        assert_eq!(p.real_damage(), 0);
    }

    #[test]
    fn test_draw_to_drawn() {
        let mut p = player();
        let mut rng = StdRng::seed_from_u64(1);
        let drawn = p.draw_to_drawn(3, &mut rng);
        assert_eq!(drawn, 3);
        assert_eq!(p.count_in(CardLocation::Drawn), 3);
        assert_eq!(p.deck_remaining(), 12);
    }

    #[test]
    fn test_draw_recycles_discard() {
        let mut p = player();
        let mut rng = StdRng::seed_from_u64(1);

        // exhaust the deck, discard everything drawn
        while p.deck_remaining() > 0 {
            p.draw_to_drawn(3, &mut rng);
            for c in &mut p.cards {
                if c.location == CardLocation::Drawn {
                    c.location = CardLocation::Discard;
                }
            }
        }
        let in_discard = p.count_in(CardLocation::Discard);
        assert!(in_discard > 0);

        let drawn = p.draw_to_drawn(2, &mut rng);
        assert_eq!(drawn, 2, "an empty deck wraps instead of failing");
        assert_eq!(p.count_in(CardLocation::Discard), 0);
        assert_eq!(p.deck_remaining(), in_discard - 2);
    }

    #[test]
    fn test_draw_stops_when_nothing_left_to_recycle() {
        let mut p = player();
        let mut rng = StdRng::seed_from_u64(1);
        // park every card in hand so neither deck nor discard can serve
        for c in &mut p.cards {
            c.location = CardLocation::Hand;
        }
        p.deck_order.clear();
        assert_eq!(p.draw_to_drawn(2, &mut rng), 0);
    }

    #[test]
    fn test_find_in_hand_skips_used() {
        let mut p = player();
        for c in &mut p.cards {
            c.location = CardLocation::Deck;
        }
        p.cards[0] = Card::new(Direction::Forward, 2);
        p.cards[0].location = CardLocation::Hand;
        p.cards[1] = Card::new(Direction::Forward, 2);
        p.cards[1].location = CardLocation::Hand;

        let first = p.find_in_hand(2, Direction::Forward, &[]).unwrap();
        let second = p.find_in_hand(2, Direction::Forward, &[first]).unwrap();
        assert_ne!(first, second);
        assert!(p.find_in_hand(2, Direction::Forward, &[first, second]).is_none());
    }
}
