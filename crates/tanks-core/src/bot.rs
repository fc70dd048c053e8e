//! AI opponent.
//!
//! The bot consumes the same validity primitives as the resolution
//! engine: `legal_plays` enumerates every legal use of every hand card,
//! and the orchestrator reuses it for the empty-legal-play forfeit check.
//! Bot choices are deliberately noisy - it sometimes draws against a
//! decoy lane and bluffs itself into an overheat.

use crate::actions::{CardSpec, PlayAction, Submission};
use crate::card::{ActionType, Card, CardLocation};
use crate::game::{GamePhase, GameState};
use crate::player::{PlayerState, Seat, HAND_LIMIT};
use crate::unit::{valid_feint, valid_move, valid_shot, Paper, Unit};
use rand::prelude::*;

/// Chance the bot fires when a legal shot exists.
const SHOT_BIAS: f64 = 0.6;
/// Chance a chosen non-shot play is committed as a genuine move.
const MOVE_BIAS: f64 = 0.8;
/// Chance the bot draws against its real lane rather than a decoy lane.
const HONEST_DRAW: f64 = 0.5;

/// Enumerate every legal play for a hand against a projected roster.
/// A legal move is always offered as a feint too.
pub fn legal_plays(units: &[Unit], cards: &[Card]) -> Vec<PlayAction> {
    let paper = Paper::project(units);
    let mut plays = Vec::new();
    for card in cards.iter().filter(|c| c.location == CardLocation::Hand) {
        if valid_shot(card.value, &paper) {
            plays.push(PlayAction {
                value: card.value,
                dir: card.dir,
                action_type: ActionType::Shot,
            });
        }
        if valid_move(card.dir, &paper) {
            plays.push(PlayAction {
                value: card.value,
                dir: card.dir,
                action_type: ActionType::Move,
            });
        }
        if valid_feint() {
            plays.push(PlayAction {
                value: card.value,
                dir: card.dir,
                action_type: ActionType::Feint,
            });
        }
    }
    plays
}

/// A bot player that can produce a submission for any phase.
pub struct Bot {
    pub seat: Seat,
    rng: StdRng,
}

impl Bot {
    pub fn new(seat: Seat) -> Self {
        Self {
            seat,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seat: Seat, seed: u64) -> Self {
        Self {
            seat,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Produce this bot's submission for the current phase, or `None`
    /// when the game is over.
    pub fn submission(&mut self, game: &GameState) -> Option<Submission> {
        let player = game.player(self.seat);
        match game.phase {
            GamePhase::Draw => Some(Submission::Draw {
                count: self.choose_draw(player),
            }),
            GamePhase::Play => Some(Submission::Play {
                actions: self.choose_play(player),
            }),
            GamePhase::Discard => Some(Submission::Discard {
                cards: self.choose_discard(player),
            }),
            GamePhase::GameOver => None,
        }
    }

    /// With no decoys the position is public, so draw exactly it.
    /// Otherwise split 50/50 between the real lane and a random decoy
    /// lane, sometimes bluffing into an overheat.
    pub fn choose_draw(&mut self, player: &PlayerState) -> u8 {
        let Some(real) = player.real_unit().map(|u| u.position) else {
            return 1;
        };
        let decoys: Vec<u8> = player
            .units
            .iter()
            .filter(|u| u.fake)
            .map(|u| u.position)
            .collect();
        if decoys.is_empty() || self.rng.gen_bool(HONEST_DRAW) {
            real
        } else {
            *decoys.choose(&mut self.rng).unwrap_or(&real)
        }
    }

    /// Pick at most one action from the legal plays.
    pub fn choose_play(&mut self, player: &PlayerState) -> Vec<PlayAction> {
        let plays = legal_plays(&player.units, &player.cards);
        match self.pick_action(&plays) {
            Some(action) => vec![action],
            None => Vec::new(),
        }
    }

    fn pick_action(&mut self, plays: &[PlayAction]) -> Option<PlayAction> {
        let shots: Vec<&PlayAction> = plays
            .iter()
            .filter(|p| p.action_type == ActionType::Shot)
            .collect();
        if !shots.is_empty() && self.rng.gen_bool(SHOT_BIAS) {
            return shots.choose(&mut self.rng).map(|p| **p);
        }

        let others: Vec<&PlayAction> = plays
            .iter()
            .filter(|p| p.action_type != ActionType::Shot)
            .collect();
        let mut action = **others.choose(&mut self.rng)?;
        // re-tagging may pick an illegal move; the AI submission path
        // drops it as a no-op rather than raising
        action.action_type = if self.rng.gen_bool(MOVE_BIAS) {
            ActionType::Move
        } else {
            ActionType::Feint
        };
        Some(action)
    }

    /// Discard down to the hand limit, choosing at random.
    pub fn choose_discard(&mut self, player: &PlayerState) -> Vec<CardSpec> {
        let mut hand: Vec<CardSpec> = player
            .cards
            .iter()
            .filter(|c| c.location == CardLocation::Hand)
            .map(|c| CardSpec {
                value: c.value,
                dir: c.dir,
            })
            .collect();
        if hand.len() <= HAND_LIMIT {
            return Vec::new();
        }
        hand.shuffle(&mut self.rng);
        hand.truncate(hand.len() - HAND_LIMIT);
        hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::Origin;
    use crate::card::Direction;

    #[test]
    fn test_single_unit_draws_its_position() {
        let mut game = GameState::new();
        game.player_mut(Seat::Black).units = vec![Unit::real(3)];
        let mut bot = Bot::with_seed(Seat::Black, 9);
        assert_eq!(bot.choose_draw(game.player(Seat::Black)), 3);
    }

    #[test]
    fn test_draw_with_decoys_is_an_occupied_lane() {
        let mut game = GameState::new();
        game.player_mut(Seat::Black).units = vec![Unit::real(1), Unit::decoy(3)];
        let mut bot = Bot::with_seed(Seat::Black, 9);
        for _ in 0..20 {
            let count = bot.choose_draw(game.player(Seat::Black));
            assert!(count == 1 || count == 3);
        }
    }

    #[test]
    fn test_legal_plays_offers_every_card_as_feint() {
        let game = GameState::new();
        let player = game.player(Seat::White);
        let plays = legal_plays(&player.units, &player.cards);
        let feints = plays
            .iter()
            .filter(|p| p.action_type == ActionType::Feint)
            .count();
        assert_eq!(feints, player.hand_size());
    }

    #[test]
    fn test_legal_plays_gates_shots_on_real_lane() {
        let mut game = GameState::new();
        let player = game.player_mut(Seat::White);
        player.units = vec![Unit::real(1), Unit::decoy(3)];
        for c in &mut player.cards {
            c.location = CardLocation::Deck;
        }
        let idx = player
            .cards
            .iter()
            .position(|c| c.value == 1 && c.dir == Direction::Forward)
            .unwrap();
        player.cards[idx].location = CardLocation::Hand;

        let plays = legal_plays(&player.units, &player.cards);
        // rank-1 shots need the real tank at lane 3; the decoy there lies
        assert!(!plays.iter().any(|p| p.action_type == ActionType::Shot));
        assert!(plays.iter().any(|p| p.action_type == ActionType::Move));
    }

    #[test]
    fn test_discard_down_to_limit() {
        let mut game = GameState::new();
        let player = game.player_mut(Seat::White);
        for c in player.cards.iter_mut().take(5) {
            c.location = CardLocation::Hand;
        }
        for c in player.cards.iter_mut().skip(5) {
            c.location = CardLocation::Deck;
        }
        let mut bot = Bot::with_seed(Seat::White, 3);
        let discards = bot.choose_discard(game.player(Seat::White));
        assert_eq!(discards.len(), 2);
    }

    #[test]
    fn test_no_discard_at_or_under_limit() {
        let game = GameState::new();
        let mut bot = Bot::with_seed(Seat::White, 3);
        assert!(bot.choose_discard(game.player(Seat::White)).is_empty());
    }

    #[test]
    fn test_bot_submissions_are_always_accepted() {
        // a bot-driven game must never surface a rule error
        let mut game = GameState::new();
        let mut white = Bot::with_seed(Seat::White, 11);
        let mut black = Bot::with_seed(Seat::Black, 22);

        for _ in 0..120 {
            if game.is_finished() {
                break;
            }
            for (seat, bot) in [(Seat::White, &mut white), (Seat::Black, &mut black)] {
                if game.is_finished() || game.player(seat).ready {
                    continue;
                }
                let submission = bot.submission(&game).unwrap();
                game.submit(seat, submission, Origin::Ai).unwrap();
            }
        }
    }
}
