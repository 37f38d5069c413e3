//! Text rendering of the neighbourhood around the player.

use std::{collections::BTreeMap, fmt::Write as _};

use world_of_bits_core::{Cell, CellId, Event, GameStatus, GeoRegion, TARGET_SCORE};
use world_of_bits_world::{query, World};

/// Draws the `(2r + 1)²` block of cells centred on the player, north row first.
///
/// Tokens show their value, empty special cells show their role label and the
/// player's cell is bracketed.
pub(crate) fn map(world: &World, radius: u32) -> String {
    let player = query::player_cell(world);
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let region = GeoRegion::new(player.offset(-r, -r).center(), player.offset(r, r).center());
    let cells: BTreeMap<CellId, Cell> = query::visible_cells(world, region)
        .into_iter()
        .map(|cell| (cell.id(), cell))
        .collect();

    let mut out = String::new();
    for dy in (-r..=r).rev() {
        for dx in -r..=r {
            let id = player.offset(dx, dy);
            let shown = cells
                .get(&id)
                .map_or_else(|| "?".to_owned(), |cell| glyph(world, cell));
            if id == player {
                let _ = write!(out, "[{shown:>3}]");
            } else {
                let _ = write!(out, " {shown:>3} ");
            }
        }
        out.push('\n');
    }
    out
}

fn glyph(world: &World, cell: &Cell) -> String {
    match cell.token() {
        Some(token) => token.value().to_string(),
        None => query::cell_role(world, cell.id())
            .label()
            .unwrap_or('.')
            .to_string(),
    }
}

/// One-line summary of score, goal, carried token and heading.
pub(crate) fn hud(world: &World) -> String {
    let held = query::held(world).map_or_else(|| "-".to_owned(), |token| token.value().to_string());
    let heading = query::heading_deg(world)
        .map_or_else(|| "-".to_owned(), |heading| format!("{heading:.0}°"));
    let mut line = format!(
        "score {} | best {} | goal {} | held {} | heading {} | cell {}",
        query::score(world),
        query::best_score(world),
        TARGET_SCORE,
        held,
        heading,
        query::player_cell(world),
    );
    if query::status(world) == GameStatus::Won {
        line.push_str(" | WON");
    }
    line
}

/// Human-readable description of an event.
pub(crate) fn describe(event: &Event) -> String {
    match event {
        Event::PlayerMoved { to, .. } => {
            format!("moved to {:.6}, {:.6}", to.lat(), to.lng())
        }
        Event::TokenPickedUp { cell, token } => {
            format!("picked up {} from {cell}", token.value())
        }
        Event::TokenDropped { cell, token } => format!("dropped {} at {cell}", token.value()),
        Event::TokensCombined {
            held,
            existing,
            result,
            ..
        } => format!(
            "combined {} with {} into {}",
            held.value(),
            existing.value(),
            result.value()
        ),
        Event::TokenCashedIn { token, .. } => format!("cashed in {}", token.value()),
        Event::ScoreChanged { score, best_score } => format!("score {score} (best {best_score})"),
        Event::GameWon { score } => format!("you reached {score} points and won!"),
        Event::WorldReset => "started a fresh world".to_owned(),
    }
}
