//! Ninja Tanks - a two-player, simultaneous-turn hidden-information
//! card game engine.
//!
//! Both players secretly occupy one of three lanes, surrounded by decoy
//! tanks and decoy damage markers whose whole purpose is to hide the
//! truth from the opponent. Each round both players submit a
//! phase-shaped action bundle; once both are ready the round resolves at
//! once, movement before gunfire.
//!
//! # Modules
//!
//! - [`card`]: cards, deck composition, and card locations
//! - [`unit`]: tank positions, decoys, and the paper legality simulation
//! - [`damage`]: the cycling damage-marker pool
//! - [`player`]: per-player state and staged submissions
//! - [`actions`]: submission payloads and the rule-error taxonomy
//! - [`game`]: the phase orchestrator and action resolution engine
//! - [`bot`]: the rule-aware AI opponent
//! - [`view`]: asymmetric, viewer-dependent serialization

pub mod actions;
pub mod bot;
pub mod card;
pub mod damage;
pub mod game;
pub mod player;
pub mod unit;
pub mod view;

// Re-export commonly used types
pub use actions::{CardSpec, GameError, Origin, PlayAction, Submission};
pub use bot::{legal_plays, Bot};
pub use card::{ActionType, Card, CardLocation, Direction};
pub use damage::DamageMarker;
pub use game::{GamePhase, GameResult, GameState, FORCED_LOSS_DAMAGE, LOSS_THRESHOLD};
pub use player::{Pending, PlayerState, Seat, StagedAction, HAND_LIMIT};
pub use unit::{legal_shots, Paper, Unit, LEGAL_SHOTS};
pub use view::{CardFace, GameView, MarkerView, SeatView, TankView};
