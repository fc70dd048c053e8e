//! Submission payloads players send each phase, and the rule-level error
//! taxonomy surfaced back to them.

use crate::card::{ActionType, Direction};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One proposed action inside a play-phase submission. Names a hand card
/// by rank and direction and says how it is being used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayAction {
    pub value: u8,
    pub dir: Direction,
    pub action_type: ActionType,
}

/// Names a hand card by rank and direction, for discards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSpec {
    pub value: u8,
    pub dir: Direction,
}

/// A phase-shaped action bundle submitted by one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Submission {
    Draw { count: u8 },
    Play { actions: Vec<PlayAction> },
    Discard { cards: Vec<CardSpec> },
}

/// Who proposed a submission. Human submissions surface validation
/// failures as errors; AI-proposed invalid actions are silently filtered
/// instead, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Human,
    Ai,
}

/// Errors a submission can be rejected with. All of these are
/// recoverable: nothing was mutated and the player may resubmit.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("game is over")]
    GameOver,

    #[error("submission does not match the current phase")]
    WrongPhase,

    #[error("already submitted this round")]
    AlreadySubmitted,

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("malformed submission: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_shape() {
        let json = r#"{"type":"play","payload":{"actions":[{"value":3,"dir":"forward","action_type":"shot"}]}}"#;
        let sub: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(
            sub,
            Submission::Play {
                actions: vec![PlayAction {
                    value: 3,
                    dir: Direction::Forward,
                    action_type: ActionType::Shot,
                }],
            }
        );
    }

    #[test]
    fn test_draw_wire_shape() {
        let json = r#"{"type":"draw","payload":{"count":2}}"#;
        let sub: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(sub, Submission::Draw { count: 2 });
    }
}
