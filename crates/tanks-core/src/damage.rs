//! Damage pool model.
//!
//! Damage is tracked as a stack of markers per player. Some markers are
//! real, some are decoys; only the real ones count toward elimination,
//! and the opponent cannot tell which are which. Markers are drawn from a
//! shared pool that cycles like the card deck: when it runs dry mid-draw
//! it is refilled with a fresh shuffled set rather than erroring.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Copies of each marker value seeded into the pool.
pub const COPIES_PER_MARKER: usize = 4;

/// A single damage marker on a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageMarker {
    pub value: u8,
    pub fake: bool,
}

/// Build a freshly shuffled marker pool: 4 copies of each value 1..=3.
/// Drawn from the back.
pub fn standard_pool<R: Rng>(rng: &mut R) -> Vec<u8> {
    let mut pool = Vec::with_capacity(COPIES_PER_MARKER * 3);
    for value in 1..=3 {
        pool.extend(std::iter::repeat(value).take(COPIES_PER_MARKER));
    }
    pool.shuffle(rng);
    pool
}

/// Sum of real marker values.
pub fn real_total(markers: &[DamageMarker]) -> u32 {
    markers
        .iter()
        .filter(|m| !m.fake)
        .map(|m| m.value as u32)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_standard_pool_composition() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = standard_pool(&mut rng);
        assert_eq!(pool.len(), 12);
        for value in 1..=3 {
            assert_eq!(pool.iter().filter(|&&v| v == value).count(), COPIES_PER_MARKER);
        }
    }

    #[test]
    fn test_real_total_ignores_decoys() {
        let markers = vec![
            DamageMarker { value: 3, fake: false },
            DamageMarker { value: 2, fake: true },
            DamageMarker { value: 1, fake: false },
        ];
        assert_eq!(real_total(&markers), 4);
    }
}
