//! Unit ("tank") position model and legality simulation.
//!
//! A player's roster holds exactly one real tank and any number of decoys
//! on the 3-lane track. All legality checks run against a [`Paper`]
//! projection of the roster, so multi-action sequences can be validated
//! speculatively without touching live units; the same shift routine is
//! then applied to the live roster when an action actually resolves.

use crate::card::Direction;
use serde::{Deserialize, Serialize};

/// Rearmost lane.
pub const MIN_LANE: u8 = 1;
/// Frontmost lane.
pub const MAX_LANE: u8 = 3;

/// Lanes a shot of each rank may legally be fired from, indexed by rank - 1.
pub const LEGAL_SHOTS: [&[u8]; 3] = [&[3], &[2, 3], &[1, 2, 3]];

/// Lanes from which a shot of rank `value` may be fired.
pub fn legal_shots(value: u8) -> &'static [u8] {
    LEGAL_SHOTS[(value - 1) as usize]
}

/// A lane occupancy record. Exactly one per player is real; the rest are
/// decoys that exist only to hide which lane is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub position: u8,
    pub fake: bool,
}

impl Unit {
    pub fn real(position: u8) -> Self {
        Self {
            position,
            fake: false,
        }
    }

    pub fn decoy(position: u8) -> Self {
        Self {
            position,
            fake: true,
        }
    }
}

/// Non-mutating projection of a unit roster used for legality simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paper(Vec<Unit>);

impl Paper {
    /// Project a live roster onto paper.
    pub fn project(units: &[Unit]) -> Self {
        Self(units.to_vec())
    }

    pub fn units(&self) -> &[Unit] {
        &self.0
    }

    /// Lane of the projected real unit.
    pub fn real_position(&self) -> Option<u8> {
        self.0.iter().find(|u| !u.fake).map(|u| u.position)
    }

    /// Pure speculative application of a move or feint: returns the
    /// projection as it would look after the action resolves.
    pub fn trial_move(&self, dir: Direction, feint: bool) -> Paper {
        let mut next = self.0.clone();
        shift_units(&mut next, dir, feint);
        Paper(next)
    }
}

/// A rank-`value` shot may only be fired if the real tank sits in one of
/// that rank's legal lanes.
pub fn valid_shot(value: u8, paper: &Paper) -> bool {
    match paper.real_position() {
        Some(lane) => legal_shots(value).contains(&lane),
        None => false,
    }
}

/// A move is blocked only when it would push the real tank off the track.
pub fn valid_move(dir: Direction, paper: &Paper) -> bool {
    match paper.real_position() {
        Some(lane) => match dir {
            Direction::Forward => lane < MAX_LANE,
            Direction::Back => lane > MIN_LANE,
        },
        None => false,
    }
}

/// Feints have no positional precondition.
pub fn valid_feint() -> bool {
    true
}

/// Shift a roster for a resolved move or feint.
///
/// Every unit that is not blocked by a track boundary gains a shifted
/// copy. For a genuine move the copy of the real tank becomes the new
/// real tank and the original turns into a decoy; a feint's copies are
/// always decoys. Boundary-blocked units simply gain no copy.
pub fn shift_units(units: &mut Vec<Unit>, dir: Direction, feint: bool) {
    let delta = dir.delta();
    let mut shifted = Vec::new();
    let mut real_moved = false;

    for unit in units.iter() {
        let lane = unit.position as i8 + delta;
        if !(MIN_LANE as i8..=MAX_LANE as i8).contains(&lane) {
            continue;
        }
        let is_real_copy = !feint && !unit.fake;
        if is_real_copy {
            real_moved = true;
        }
        shifted.push(Unit {
            position: lane as u8,
            fake: !is_real_copy,
        });
    }

    if real_moved {
        for unit in units.iter_mut() {
            unit.fake = true;
        }
    }
    units.append(&mut shifted);
}

/// Collapse duplicate-lane units to one per lane, preferring the real one.
pub fn collapse_units(units: &mut Vec<Unit>) {
    let mut kept = Vec::new();
    for lane in MIN_LANE..=MAX_LANE {
        let at_lane: Vec<Unit> = units.iter().copied().filter(|u| u.position == lane).collect();
        if let Some(unit) = at_lane.iter().find(|u| !u.fake).or_else(|| at_lane.first()) {
            kept.push(*unit);
        }
    }
    *units = kept;
}
