//! Session layer for Ninja Tanks.
//!
//! Sits between transports and the rule engine: games are persisted
//! through the [`store::GameStore`] seam, and [`session::SessionManager`]
//! runs every load-mutate-save round inside a per-game critical section
//! so simultaneous submissions resolve each round exactly once. Bot
//! seats are driven automatically after each human submission.

pub mod session;
pub mod store;

pub use session::{SessionError, SessionManager};
pub use store::{Controller, GameId, GameRecord, GameStore, MemoryStore, StoreError};
