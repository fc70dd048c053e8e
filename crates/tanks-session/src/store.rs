//! Game persistence boundary.
//!
//! The engine itself never touches storage; sessions load a record, run
//! rule logic, and save it back. `GameStore` is the seam a real backend
//! plugs into, and `MemoryStore` is the in-process implementation used
//! by tests and single-node deployments.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tanks_core::{GameState, Seat};
use thiserror::Error;
use uuid::Uuid;

pub type GameId = Uuid;

/// Failures of the persistence layer, distinct from rule violations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    NotFound(GameId),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Who controls a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Controller {
    Human { player_id: Uuid },
    Bot,
}

/// One stored game: rule state plus the seat assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub state: GameState,
    pub white: Controller,
    pub black: Controller,
}

impl GameRecord {
    pub fn new(white: Controller, black: Controller) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: GameState::new(),
            white,
            black,
        }
    }

    /// The seat a human player controls, if any.
    pub fn seat_of(&self, player_id: Uuid) -> Option<Seat> {
        match (self.white, self.black) {
            (Controller::Human { player_id: id }, _) if id == player_id => Some(Seat::White),
            (_, Controller::Human { player_id: id }) if id == player_id => Some(Seat::Black),
            _ => None,
        }
    }

    pub fn controller(&self, seat: Seat) -> Controller {
        match seat {
            Seat::White => self.white,
            Seat::Black => self.black,
        }
    }

    pub fn is_bot(&self, seat: Seat) -> bool {
        self.controller(seat) == Controller::Bot
    }
}

/// Load and save whole game records. Implementations must be shareable
/// across threads; atomicity of a load-mutate-save round is the
/// session layer's job, not the store's.
pub trait GameStore: Send + Sync {
    fn load(&self, id: GameId) -> Result<GameRecord, StoreError>;
    fn save(&self, record: &GameRecord) -> Result<(), StoreError>;
}

/// In-memory store backed by a concurrent map. Loads hand out clones,
/// so a mutation only lands once it is saved back.
#[derive(Default)]
pub struct MemoryStore {
    games: DashMap<GameId, GameRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameStore for MemoryStore {
    fn load(&self, id: GameId) -> Result<GameRecord, StoreError> {
        self.games
            .get(&id)
            .map(|r| r.clone())
            .ok_or(StoreError::NotFound(id))
    }

    fn save(&self, record: &GameRecord) -> Result<(), StoreError> {
        self.games.insert(record.id, record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_missing_game_is_not_found() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.load(id), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let store = MemoryStore::new();
        let record = GameRecord::new(
            Controller::Human {
                player_id: Uuid::new_v4(),
            },
            Controller::Bot,
        );
        store.save(&record).unwrap();
        let loaded = store.load(record.id).unwrap();
        assert_eq!(loaded.id, record.id);
        assert!(loaded.is_bot(Seat::Black));
        assert!(!loaded.is_bot(Seat::White));
    }

    #[test]
    fn test_seat_of_maps_players_to_seats() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let record = GameRecord::new(
            Controller::Human { player_id: alice },
            Controller::Human { player_id: bob },
        );
        assert_eq!(record.seat_of(alice), Some(Seat::White));
        assert_eq!(record.seat_of(bob), Some(Seat::Black));
        assert_eq!(record.seat_of(Uuid::new_v4()), None);
    }
}
