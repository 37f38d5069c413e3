//! Procedural generator that derives the default content of every cell.
//!
//! The content of a cell is a function of its identifier alone. The formula is
//! part of the save-compatibility contract: changing it would silently rewrite
//! every cell a player has not touched yet.

use world_of_bits_core::{Cell, CellId, Token};

const SEED_MULTIPLIER_X: i32 = 73_856_093;
const SEED_MULTIPLIER_Y: i32 = 19_349_663;
const LUCK_AMPLITUDE: f64 = 43_758.545_312_3;

/// Cumulative thresholds mapping a luck roll to the content of a cell.
///
/// Rolls below the first threshold leave the cell empty; rolls at or above
/// the last threshold produce [`FALLBACK_TOKEN_VALUE`].
const CONTENT_THRESHOLDS: [(f64, Option<u64>); 3] = [(0.50, None), (0.80, Some(1)), (0.95, Some(2))];
const FALLBACK_TOKEN_VALUE: u64 = 4;

/// Combines the cell coordinates into a single integer seed.
#[must_use]
pub fn seed_for(id: CellId) -> i32 {
    id.x().wrapping_mul(SEED_MULTIPLIER_X) ^ id.y().wrapping_mul(SEED_MULTIPLIER_Y)
}

/// Derives a pseudo-random roll in the unit interval from the seed.
#[must_use]
pub fn luck(seed: i32) -> f64 {
    let scaled = f64::from(seed).sin() * LUCK_AMPLITUDE;
    scaled - scaled.floor()
}

/// Token a cell holds before any player interaction, if any.
#[must_use]
pub fn base_token(id: CellId) -> Option<Token> {
    let roll = luck(seed_for(id));
    for (threshold, value) in CONTENT_THRESHOLDS {
        if roll < threshold {
            return value.map(Token::new);
        }
    }
    Some(Token::new(FALLBACK_TOKEN_VALUE))
}

/// Default content of the cell absent any override.
#[must_use]
pub fn base_cell(id: CellId) -> Cell {
    Cell::new(id, base_token(id))
}
