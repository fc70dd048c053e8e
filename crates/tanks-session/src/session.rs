//! Session management over a game store.
//!
//! `SessionManager` owns the per-game critical sections. The engine's
//! phase transition is check-then-act, so every load-mutate-save round
//! for one game runs under that game's lock; two players submitting at
//! the same instant are serialized and the round resolves exactly once.
//! Reads take no lock.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use tanks_core::{Bot, GameError, GameView, Origin, Seat, Submission};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{Controller, GameId, GameRecord, GameStore, StoreError};

/// Bot submissions allowed per drive before giving up. A stuck loop
/// here means an engine bug, not a slow game.
const MAX_BOT_TURNS: usize = 256;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("you are not a player in this game")]
    NotAPlayer,
    #[error(transparent)]
    Rule(#[from] GameError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct SessionManager<S: GameStore> {
    store: S,
    locks: DashMap<GameId, Arc<Mutex<()>>>,
}

impl<S: GameStore> SessionManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn lock_for(&self, id: GameId) -> Arc<Mutex<()>> {
        self.locks.entry(id).or_default().clone()
    }

    /// Create a game and let any bot seats make their opening
    /// submissions.
    pub fn create_game(&self, white: Controller, black: Controller) -> Result<GameId, SessionError> {
        let mut record = GameRecord::new(white, black);
        let id = record.id;
        info!(game = %id, "game created");

        let lock = self.lock_for(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.drive_bots(&mut record);
        self.store.save(&record)?;
        Ok(id)
    }

    /// Stage one human submission, then let bot seats respond. The
    /// whole round runs under the game lock.
    pub fn submit_action(
        &self,
        game_id: GameId,
        player_id: Uuid,
        submission: Submission,
    ) -> Result<GameView, SessionError> {
        let lock = self.lock_for(game_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.store.load(game_id)?;
        let seat = record.seat_of(player_id).ok_or(SessionError::NotAPlayer)?;
        record.state.submit(seat, submission, Origin::Human)?;
        self.drive_bots(&mut record);
        self.store.save(&record)?;
        Ok(record.state.view(seat))
    }

    /// Concede on behalf of a human player.
    pub fn quit(&self, game_id: GameId, player_id: Uuid) -> Result<GameView, SessionError> {
        let lock = self.lock_for(game_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.store.load(game_id)?;
        let seat = record.seat_of(player_id).ok_or(SessionError::NotAPlayer)?;
        record.state.quit(seat)?;
        self.store.save(&record)?;
        Ok(record.state.view(seat))
    }

    /// Redacted snapshot for one player. Lock-free.
    pub fn view(&self, game_id: GameId, player_id: Uuid) -> Result<GameView, SessionError> {
        let record = self.store.load(game_id)?;
        let seat = record.seat_of(player_id).ok_or(SessionError::NotAPlayer)?;
        Ok(record.state.view(seat))
    }

    /// Advance bot-only games that have no human submission to ride on.
    pub fn step_bots(&self, game_id: GameId) -> Result<(), SessionError> {
        let lock = self.lock_for(game_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut record = self.store.load(game_id)?;
        self.drive_bots(&mut record);
        self.store.save(&record)?;
        Ok(())
    }

    /// Submit for every bot seat that still owes the current phase a
    /// move, until only human submissions remain outstanding.
    fn drive_bots(&self, record: &mut GameRecord) {
        for _ in 0..MAX_BOT_TURNS {
            let Some(seat) = Seat::BOTH.into_iter().find(|&seat| {
                record.is_bot(seat)
                    && !record.state.is_finished()
                    && !record.state.player(seat).ready
            }) else {
                return;
            };

            let mut bot = Bot::new(seat);
            let Some(submission) = bot.submission(&record.state) else {
                return;
            };
            if let Err(err) = record.state.submit(seat, submission, Origin::Ai) {
                warn!(game = %record.id, seat = %seat, %err, "bot submission rejected");
                return;
            }
        }
        warn!(game = %record.id, "bot drive exceeded {MAX_BOT_TURNS} submissions");
    }
}
