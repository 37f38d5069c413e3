//! Score bookkeeping and the win transition.

use tracing::info;
use world_of_bits_core::{Event, GameStatus, TARGET_SCORE};

use crate::World;

/// Adds `delta` to the score, tracking the best score and the win state.
///
/// A zero delta is ignored. The transition to [`GameStatus::Won`] happens at
/// most once; later deltas keep adjusting the score but never revert it.
pub fn apply_score_delta(world: &mut World, delta: u64, out_events: &mut Vec<Event>) {
    if delta == 0 {
        return;
    }

    world.score = world.score.saturating_add(delta);
    if world.score > world.best_score {
        world.best_score = world.score;
    }
    out_events.push(Event::ScoreChanged {
        score: world.score,
        best_score: world.best_score,
    });

    if world.status == GameStatus::Playing && world.score >= TARGET_SCORE {
        world.status = GameStatus::Won;
        info!(score = world.score, "target score reached");
        out_events.push(Event::GameWon { score: world.score });
    }
}
