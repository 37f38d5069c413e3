//! Cell interaction rules driven by player clicks.

use tracing::debug;
use world_of_bits_core::{CellId, Event, GameStatus, INTERACTION_RANGE};

use crate::{score, CellRole, World};

/// Resolves a click on `cell` against the held token and the cell content.
///
/// Clicks are ignored once the game is won or when the cell lies beyond
/// [`INTERACTION_RANGE`]. Ordinary cells support pickup and drop; the craft
/// cell additionally merges a held token into the token it already holds; the
/// score cell converts the held token into score.
pub(crate) fn click_cell(world: &mut World, cell: CellId, out_events: &mut Vec<Event>) {
    if world.status == GameStatus::Won {
        debug!(%cell, "ignoring click after the game was won");
        return;
    }

    let distance = world.player_cell().manhattan_distance(cell);
    if distance > INTERACTION_RANGE {
        debug!(%cell, distance, "ignoring click outside interaction range");
        return;
    }

    let role = world.role_of(cell);
    if role == CellRole::Score {
        cash_in(world, cell, out_events);
        return;
    }

    match (world.held, world.cell(cell).token()) {
        (None, Some(token)) => {
            world.held = Some(token);
            world.write_override(cell, None);
            out_events.push(Event::TokenPickedUp { cell, token });
        }
        (Some(token), None) => {
            world.write_override(cell, Some(token));
            world.held = None;
            out_events.push(Event::TokenDropped { cell, token });
        }
        (Some(held), Some(existing)) if role == CellRole::Craft => {
            let result = held.combine(existing);
            world.write_override(cell, Some(result));
            world.held = None;
            out_events.push(Event::TokensCombined {
                cell,
                held,
                existing,
                result,
            });
        }
        (held, existing) => {
            debug!(%cell, ?role, ?held, ?existing, "click has no effect");
        }
    }
}

fn cash_in(world: &mut World, cell: CellId, out_events: &mut Vec<Event>) {
    let Some(token) = world.held.take() else {
        debug!(%cell, "nothing held to cash in");
        return;
    };

    world.write_override(cell, None);
    out_events.push(Event::TokenCashedIn { cell, token });
    score::apply_score_delta(world, token.value(), out_events);
}
