//! Viewer-dependent serialization of game state.
//!
//! The same game looks different to each seat: a player sees their own
//! hand, drawn cards, staged actions, real damage total, and which of
//! their tanks and markers are decoys; the opponent's side is redacted
//! to exactly what would be visible across the table.

use crate::card::{Card, CardLocation, Direction};
use crate::game::{GamePhase, GameResult, GameState};
use crate::player::{PlayerState, Seat};
use serde::{Deserialize, Serialize};

/// The public face of a card: rank and direction, no location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    pub value: u8,
    pub dir: Direction,
}

impl CardFace {
    fn of(card: &Card) -> Self {
        Self {
            value: card.value,
            dir: card.dir,
        }
    }
}

/// A tank as one seat sees it; `fake` is present only for the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankView {
    pub position: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fake: Option<bool>,
}

/// A damage marker as one seat sees it; `fake` is present only for the
/// owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerView {
    pub value: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fake: Option<bool>,
}

/// One seat's side of the table as seen by the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: Seat,
    pub ready: bool,
    /// Real damage total; own seat only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<u32>,
    pub markers: Vec<MarkerView>,
    pub tanks: Vec<TankView>,
    /// Playable hand; own seat only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand: Option<Vec<CardFace>>,
    /// Cards drawn this round; own seat only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawn: Option<Vec<CardFace>>,
    /// Cards staged for this round's play; own seat only. The opponent
    /// sees only how many were committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub played: Option<Vec<CardFace>>,
    pub played_count: usize,
    pub trashed: Vec<CardFace>,
    pub discard: Vec<CardFace>,
    pub deck_remaining: usize,
}

impl SeatView {
    fn of(player: &PlayerState, own: bool) -> Self {
        let faces = |location: CardLocation| -> Vec<CardFace> {
            player
                .cards
                .iter()
                .filter(|c| c.location == location)
                .map(CardFace::of)
                .collect()
        };

        Self {
            seat: player.seat,
            ready: player.ready,
            damage: own.then(|| player.real_damage()),
            markers: player
                .damage
                .iter()
                .map(|m| MarkerView {
                    value: m.value,
                    fake: own.then_some(m.fake),
                })
                .collect(),
            tanks: player
                .units
                .iter()
                .map(|u| TankView {
                    position: u.position,
                    fake: own.then_some(u.fake),
                })
                .collect(),
            hand: own.then(|| faces(CardLocation::Hand)),
            drawn: own.then(|| faces(CardLocation::Drawn)),
            played: own.then(|| faces(CardLocation::Action)),
            played_count: player.count_in(CardLocation::Action),
            trashed: faces(CardLocation::Trashed),
            discard: faces(CardLocation::Discard),
            deck_remaining: player.deck_remaining(),
        }
    }
}

/// Everything a renderer may show one seat. This is the sole wire
/// contract of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub phase: GamePhase,
    pub viewer: Seat,
    pub you: SeatView,
    pub opponent: SeatView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GameResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Seat>,
}

impl GameState {
    /// Serialize the game as seen from one seat.
    pub fn view(&self, viewer: Seat) -> GameView {
        GameView {
            phase: self.phase,
            viewer,
            you: SeatView::of(self.player(viewer), true),
            opponent: SeatView::of(self.player(viewer.other()), false),
            result: self.result,
            winner: self.winner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::DamageMarker;
    use crate::unit::Unit;

    #[test]
    fn test_opponent_side_is_redacted() {
        let mut game = GameState::new();
        game.player_mut(Seat::Black).units = vec![Unit::real(1), Unit::decoy(3)];
        game.player_mut(Seat::Black).damage.push(DamageMarker {
            value: 2,
            fake: true,
        });

        let view = game.view(Seat::White);
        assert!(view.opponent.hand.is_none());
        assert!(view.opponent.drawn.is_none());
        assert!(view.opponent.played.is_none());
        assert!(view.opponent.damage.is_none());
        assert_eq!(view.opponent.tanks.len(), 2);
        assert!(view.opponent.tanks.iter().all(|t| t.fake.is_none()));
        assert!(view.opponent.markers.iter().all(|m| m.fake.is_none()));
    }

    #[test]
    fn test_own_side_is_fully_visible() {
        let game = GameState::new();
        let view = game.view(Seat::Black);
        assert_eq!(view.viewer, Seat::Black);
        assert_eq!(view.you.seat, Seat::Black);
        assert_eq!(view.you.hand.as_ref().map(Vec::len), Some(3));
        assert_eq!(view.you.damage, Some(0));
        assert!(view.you.tanks.iter().all(|t| t.fake.is_some()));
    }

    #[test]
    fn test_view_serializes() {
        let game = GameState::new();
        let json = serde_json::to_value(game.view(Seat::White)).unwrap();
        assert_eq!(json["phase"], "draw");
        assert_eq!(json["viewer"], "white");
        assert!(json.get("result").is_none());
    }
}
