//! Phase orchestrator and action resolution engine.
//!
//! The game advances `draw -> play -> discard -> draw ...` (or into
//! `game_over`). Each submission stages a player's pending mutations and
//! flips their ready flag; the transition fires only once both players
//! are ready, applies the departing phase's effects, advances the phase,
//! and resets both flags. Callers that serve concurrent players must run
//! `submit` inside a per-game critical section so the check-then-act
//! transition executes exactly once per round.

use crate::actions::{GameError, Origin, PlayAction, Submission};
use crate::bot::legal_plays;
use crate::card::{ActionType, CardLocation};
use crate::damage::{self, DamageMarker};
use crate::player::{Pending, PlayerState, Seat, StagedAction, HAND_LIMIT};
use crate::unit::{
    collapse_units, legal_shots, shift_units, valid_move, valid_shot, Paper, Unit, MAX_LANE,
    MIN_LANE,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Real damage at which a player is destroyed.
pub const LOSS_THRESHOLD: u32 = 9;

/// Damage assessed when a player has no legal play at the start of a
/// play phase.
pub const FORCED_LOSS_DAMAGE: u8 = 10;

/// Most actions a player may stage in one play phase.
pub const MAX_ACTIONS: usize = 2;

/// Most cards a player may draw in one draw phase.
pub const MAX_DRAW: u8 = 3;

/// Nominal damage for playing two actions in one turn, and for drawing
/// past the overheat threshold.
const OVERHEAT_HARM: u8 = 2;

/// Nominal damage for a direct hit.
const SHOT_HARM: u8 = 3;

/// Movement passes run over the staged action list before anything left
/// unresolved is abandoned.
const MOVEMENT_PASSES: usize = 2;

/// Game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Draw,
    Play,
    Discard,
    GameOver,
}

/// Terminal outcome. Set if and only if the phase is `GameOver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameResult {
    /// A player quit; the opponent is declared winner.
    Quit { winner: Seat },
    /// A player was destroyed or had no legal play.
    Victory { winner: Seat },
}

impl GameResult {
    pub fn winner(&self) -> Seat {
        match self {
            GameResult::Quit { winner } | GameResult::Victory { winner } => *winner,
        }
    }
}

/// The complete state of one game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub result: Option<GameResult>,
    pub players: [PlayerState; 2],
    /// Shared damage-marker pool, drawn from the back, refilled when dry.
    pub damage_pool: Vec<u8>,
}

impl GameState {
    /// Deal out a new game.
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            phase: GamePhase::Draw,
            result: None,
            players: [
                PlayerState::new(Seat::White, &mut rng),
                PlayerState::new(Seat::Black, &mut rng),
            ],
            damage_pool: damage::standard_pool(&mut rng),
        }
    }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut PlayerState {
        &mut self.players[seat.index()]
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver)
    }

    pub fn winner(&self) -> Option<Seat> {
        self.result.map(|r| r.winner())
    }

    /// Stage one player's phase submission. Sets that player's ready
    /// flag and, if the opponent is already ready, resolves the round
    /// and advances the phase before returning.
    pub fn submit(
        &mut self,
        seat: Seat,
        submission: Submission,
        origin: Origin,
    ) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        if self.player(seat).ready {
            return Err(GameError::AlreadySubmitted);
        }

        match (self.phase, submission) {
            (GamePhase::Draw, Submission::Draw { count }) => self.stage_draw(seat, count)?,
            (GamePhase::Play, Submission::Play { actions }) => {
                self.stage_play(seat, &actions, origin)?
            }
            (GamePhase::Discard, Submission::Discard { cards }) => {
                self.stage_discard(seat, &cards)?
            }
            _ => return Err(GameError::WrongPhase),
        }

        self.player_mut(seat).ready = true;
        self.try_advance();
        Ok(())
    }

    /// Concede. The opponent is declared winner.
    pub fn quit(&mut self, seat: Seat) -> Result<(), GameError> {
        if self.result.is_some() {
            return Err(GameError::GameOver);
        }
        info!(quitter = %seat, "player quit");
        self.finish(GameResult::Quit {
            winner: seat.other(),
        });
        Ok(())
    }

    /// Apply nominal damage `amount` to a player: draws `amount - 1`
    /// markers from the pool ("hurt for one less, the last marker is
    /// nullified"), tagging each with `fake`. Refills the pool rather
    /// than failing when it runs dry mid-draw.
    pub fn harm(&mut self, seat: Seat, amount: u8, fake: bool) {
        let mut rng = rand::thread_rng();
        for _ in 1..amount {
            if self.damage_pool.is_empty() {
                self.damage_pool = damage::standard_pool(&mut rng);
            }
            if let Some(value) = self.damage_pool.pop() {
                self.players[seat.index()]
                    .damage
                    .push(DamageMarker { value, fake });
            }
        }
    }

    fn stage_draw(&mut self, seat: Seat, count: u8) -> Result<(), GameError> {
        if count > MAX_DRAW {
            return Err(GameError::Malformed(format!(
                "may draw at most {MAX_DRAW} cards"
            )));
        }
        let mut rng = rand::thread_rng();
        let drawn = self.player_mut(seat).draw_to_drawn(count, &mut rng);
        self.player_mut(seat).pending = Some(Pending::Draw { count: drawn });
        Ok(())
    }

    /// Validate a proposed action sequence against a paper projection of
    /// the submitter's units, threading `trial_move` through so the
    /// second card is checked against the board the first would leave
    /// behind. Human validation failures are returned; AI-proposed
    /// invalid actions are filtered out instead.
    fn stage_play(
        &mut self,
        seat: Seat,
        actions: &[PlayAction],
        origin: Origin,
    ) -> Result<(), GameError> {
        if actions.len() > MAX_ACTIONS {
            return Err(GameError::Malformed(format!(
                "may play at most {MAX_ACTIONS} actions"
            )));
        }
        if actions.is_empty() && origin == Origin::Human {
            return Err(GameError::Malformed("must play at least one action".into()));
        }

        let player = self.player(seat);
        let mut staged: Vec<StagedAction> = Vec::new();
        let mut used: Vec<usize> = Vec::new();
        let mut paper = Paper::project(&player.units);

        for action in actions {
            if !(MIN_LANE..=MAX_LANE).contains(&action.value) {
                return Err(GameError::Malformed(format!(
                    "no such card rank {}",
                    action.value
                )));
            }
            let idx = match player.find_in_hand(action.value, action.dir, &used) {
                Some(idx) => idx,
                None => match origin {
                    Origin::Human => {
                        return Err(GameError::Malformed("card is not in your hand".into()))
                    }
                    Origin::Ai => continue,
                },
            };

            match action.action_type {
                ActionType::Shot => {
                    if !valid_shot(action.value, &paper) {
                        match origin {
                            Origin::Human => {
                                return Err(GameError::InvalidMove(format!(
                                    "a rank-{} shot may only be fired from lanes {:?}",
                                    action.value,
                                    legal_shots(action.value)
                                )))
                            }
                            Origin::Ai => continue,
                        }
                    }
                }
                ActionType::Move => {
                    if !valid_move(action.dir, &paper) {
                        match origin {
                            Origin::Human => {
                                return Err(GameError::InvalidMove(format!(
                                    "cannot move {:?} from this lane",
                                    action.dir
                                )))
                            }
                            Origin::Ai => continue,
                        }
                    }
                    paper = paper.trial_move(action.dir, false);
                }
                ActionType::Feint => {
                    paper = paper.trial_move(action.dir, true);
                }
            }

            used.push(idx);
            staged.push(StagedAction {
                card: idx,
                action: action.action_type,
                resolved: false,
            });
        }

        // commit: nothing above mutated state
        let player = self.player_mut(seat);
        for action in &staged {
            player.cards[action.card].location = CardLocation::Action;
            player.cards[action.card].action_type = Some(action.action);
        }
        player.pending = Some(Pending::Play { actions: staged });
        Ok(())
    }

    fn stage_discard(
        &mut self,
        seat: Seat,
        cards: &[crate::actions::CardSpec],
    ) -> Result<(), GameError> {
        let player = self.player(seat);
        let required = player.hand_size().saturating_sub(HAND_LIMIT);
        if cards.len() != required {
            return Err(GameError::Malformed(format!(
                "must discard exactly {required} cards"
            )));
        }

        let mut used: Vec<usize> = Vec::new();
        for spec in cards {
            match player.find_in_hand(spec.value, spec.dir, &used) {
                Some(idx) => used.push(idx),
                None => return Err(GameError::Malformed("card is not in your hand".into())),
            }
        }
        self.player_mut(seat).pending = Some(Pending::Discard { cards: used });
        Ok(())
    }

    /// The single check-then-act transition: if both players are ready,
    /// resolve the departing phase, advance, and reset both flags.
    fn try_advance(&mut self) {
        if !(self.players[0].ready && self.players[1].ready) {
            return;
        }
        match self.phase {
            GamePhase::Draw => self.resolve_draw_phase(),
            GamePhase::Play => self.resolve_play_phase(),
            GamePhase::Discard => self.resolve_discard_phase(),
            GamePhase::GameOver => {}
        }
        for player in &mut self.players {
            player.ready = false;
            player.pending = None;
        }
    }

    fn resolve_draw_phase(&mut self) {
        for seat in Seat::BOTH {
            let drawn = match self.player(seat).pending {
                Some(Pending::Draw { count }) => count,
                _ => 0,
            };

            for card in &mut self.player_mut(seat).cards {
                if card.location == CardLocation::Drawn {
                    card.location = CardLocation::Hand;
                }
            }

            // drawing past the rearmost occupied lane overheats; the
            // marker is only real if the draw also outran the true lane
            let player = self.player(seat);
            if let Some(real) = player.real_unit().map(|u| u.position) {
                let minimum = player
                    .units
                    .iter()
                    .map(|u| u.position)
                    .min()
                    .unwrap_or(real);
                if drawn > minimum {
                    let fake = drawn <= real;
                    debug!(seat = %seat, drawn, minimum, fake, "draw overheat");
                    self.harm(seat, OVERHEAT_HARM, fake);
                }
            }
        }

        // a player who cannot act at all forfeits the game
        for seat in Seat::BOTH {
            let player = self.player(seat);
            if legal_plays(&player.units, &player.cards).is_empty() {
                info!(seat = %seat, "no legal play available, forced loss");
                self.harm(seat, FORCED_LOSS_DAMAGE + 1, false);
                self.finish(GameResult::Victory {
                    winner: seat.other(),
                });
                return;
            }
        }

        self.phase = GamePhase::Play;
    }

    fn resolve_play_phase(&mut self) {
        let mut staged: [Vec<StagedAction>; 2] = [Vec::new(), Vec::new()];
        for seat in Seat::BOTH {
            if let Some(Pending::Play { actions }) = self.players[seat.index()].pending.take() {
                staged[seat.index()] = actions;
            }
        }

        // playing two actions in one turn always overheats for real
        for seat in Seat::BOTH {
            if staged[seat.index()].len() == MAX_ACTIONS {
                self.harm(seat, OVERHEAT_HARM, false);
            }
        }

        // movement before gunfire; a bounded fixed-point loop so a pair
        // of cards whose second depends on the first converges
        for _ in 0..MOVEMENT_PASSES {
            for seat in Seat::BOTH {
                for i in 0..staged[seat.index()].len() {
                    let action = staged[seat.index()][i];
                    if action.resolved || action.action == ActionType::Shot {
                        continue;
                    }
                    let dir = self.player(seat).cards[action.card].dir;
                    let paper = Paper::project(&self.player(seat).units);
                    if !valid_move(dir, &paper) {
                        continue;
                    }
                    let feint = action.action == ActionType::Feint;
                    shift_units(&mut self.player_mut(seat).units, dir, feint);
                    self.discard_action_card(seat, action.card);
                    staged[seat.index()][i].resolved = true;
                }
            }
        }

        for seat in Seat::BOTH {
            for i in 0..staged[seat.index()].len() {
                let action = staged[seat.index()][i];
                if action.resolved || action.action != ActionType::Shot {
                    continue;
                }
                let value = self.player(seat).cards[action.card].value;
                let paper = Paper::project(&self.player(seat).units);
                if valid_shot(value, &paper) {
                    self.resolve_shot(value, seat);
                } else {
                    debug!(seat = %seat, value, "shot no longer legal, dropped");
                }
                self.discard_action_card(seat, action.card);
                staged[seat.index()][i].resolved = true;
            }
        }

        for seat in Seat::BOTH {
            collapse_units(&mut self.player_mut(seat).units);
            for action in &staged[seat.index()] {
                if !action.resolved {
                    debug!(
                        seat = %seat,
                        card = action.card,
                        "action unresolved after {MOVEMENT_PASSES} passes, dropped"
                    );
                    self.discard_action_card(seat, action.card);
                }
            }
        }

        for seat in Seat::BOTH {
            if self.player(seat).real_damage() >= LOSS_THRESHOLD {
                info!(seat = %seat, damage = self.player(seat).real_damage(), "player destroyed");
                self.finish(GameResult::Victory {
                    winner: seat.other(),
                });
                return;
            }
        }

        self.phase = GamePhase::Discard;
    }

    /// Resolve one shot of rank `value` fired by `shooter`.
    fn resolve_shot(&mut self, value: u8, shooter: Seat) {
        let defender = shooter.other();

        // firing proves the shooter's real lane is compatible with the
        // rank, so any of their decoys that contradict it are removed
        let spots = legal_shots(value);
        self.players[shooter.index()]
            .units
            .retain(|u| spots.contains(&u.position));

        let hit = self
            .player(defender)
            .units
            .iter()
            .any(|u| u.position == value && !u.fake);

        if hit {
            debug!(shooter = %shooter, value, "direct hit");
            self.harm(defender, SHOT_HARM, false);
            // a direct hit reveals the true position and collapses every decoy
            self.player_mut(defender).units = vec![Unit::real(value)];
        } else if let Some(idx) = self
            .player(defender)
            .units
            .iter()
            .position(|u| u.position == value)
        {
            debug!(shooter = %shooter, value, "decoy destroyed");
            self.player_mut(defender).units.remove(idx);
        }
    }

    fn resolve_discard_phase(&mut self) {
        for seat in Seat::BOTH {
            if let Some(Pending::Discard { cards }) = self.players[seat.index()].pending.take() {
                for idx in cards {
                    self.players[seat.index()].cards[idx].location = CardLocation::Discard;
                }
            }
        }
        self.phase = GamePhase::Draw;
    }

    fn discard_action_card(&mut self, seat: Seat, idx: usize) {
        let card = &mut self.players[seat.index()].cards[idx];
        card.location = CardLocation::Discard;
        card.action_type = None;
    }

    fn finish(&mut self, result: GameResult) {
        info!(winner = %result.winner(), "game over");
        self.result = Some(result);
        self.phase = GamePhase::GameOver;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::CardSpec;
    use crate::card::Direction;

    #[test]
    fn test_wrong_phase_rejected() {
        let mut game = GameState::new();
        let err = game
            .submit(
                Seat::White,
                Submission::Play { actions: vec![] },
                Origin::Human,
            )
            .unwrap_err();
        assert!(matches!(err, GameError::WrongPhase));
    }

    #[test]
    fn test_one_submission_per_round() {
        let mut game = GameState::new();
        game.submit(Seat::White, Submission::Draw { count: 1 }, Origin::Human)
            .unwrap();
        let err = game
            .submit(Seat::White, Submission::Draw { count: 1 }, Origin::Human)
            .unwrap_err();
        assert!(matches!(err, GameError::AlreadySubmitted));
    }

    #[test]
    fn test_draw_count_capped() {
        let mut game = GameState::new();
        let err = game
            .submit(Seat::White, Submission::Draw { count: 4 }, Origin::Human)
            .unwrap_err();
        assert!(matches!(err, GameError::Malformed(_)));
        assert!(!game.player(Seat::White).ready);
    }

    #[test]
    fn test_quit_declares_opponent_winner() {
        let mut game = GameState::new();
        game.quit(Seat::White).unwrap();
        assert_eq!(game.phase, GamePhase::GameOver);
        assert_eq!(game.winner(), Some(Seat::Black));
        assert!(matches!(game.result, Some(GameResult::Quit { .. })));

        let err = game
            .submit(Seat::Black, Submission::Draw { count: 1 }, Origin::Human)
            .unwrap_err();
        assert!(matches!(err, GameError::GameOver));
        assert!(game.quit(Seat::Black).is_err());
    }

    #[test]
    fn test_harm_draws_one_less_marker() {
        let mut game = GameState::new();
        game.damage_pool = vec![1, 2, 3];
        game.harm(Seat::White, 3, false);
        assert_eq!(game.player(Seat::White).damage.len(), 2);
        assert_eq!(game.player(Seat::White).real_damage(), 5); // drew 3 then 2
    }

    #[test]
    fn test_harm_refills_exhausted_pool() {
        let mut game = GameState::new();
        game.damage_pool.clear();
        game.harm(Seat::Black, 2, true);
        assert_eq!(game.player(Seat::Black).damage.len(), 1);
        assert!(game.player(Seat::Black).damage[0].fake);
        assert_eq!(game.damage_pool.len(), 11, "pool refilled then drew one");
    }

    #[test]
    fn test_discard_requires_exact_count() {
        let mut game = GameState::new();
        game.phase = GamePhase::Discard;
        // fresh hand holds 3 cards, so zero discards are required
        let hand_card = game
            .player(Seat::White)
            .cards
            .iter()
            .find(|c| c.location == CardLocation::Hand)
            .map(|c| CardSpec {
                value: c.value,
                dir: c.dir,
            })
            .unwrap();
        let err = game
            .submit(
                Seat::White,
                Submission::Discard {
                    cards: vec![hand_card],
                },
                Origin::Human,
            )
            .unwrap_err();
        assert!(matches!(err, GameError::Malformed(_)));

        game.submit(
            Seat::White,
            Submission::Discard { cards: vec![] },
            Origin::Human,
        )
        .unwrap();
        assert!(game.player(Seat::White).ready);
    }
}
