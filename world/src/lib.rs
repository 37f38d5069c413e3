#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for World of Bits.
//!
//! The world is an infinite procedural grid patched by a sparse table of
//! player-caused overrides. Only overrides ever change; the procedural layer
//! is recomputed on demand and never stored.

pub mod generation;
mod interaction;
mod score;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};
use world_of_bits_core::{
    normalize_heading, Cell, CellId, Command, Event, GameStatus, GeoPoint, Token, CRAFT_CELL_OFFSET,
    SCORE_CELL_OFFSET, START_ORIGIN,
};

use crate::generation::base_cell;

pub use score::apply_score_delta;

/// Represents the authoritative World of Bits session state.
#[derive(Clone, Debug, PartialEq)]
pub struct World {
    player_position: GeoPoint,
    heading_deg: Option<f64>,
    held: Option<Token>,
    overrides: BTreeMap<CellId, Cell>,
    craft_cell: CellId,
    score_cell: CellId,
    score: u64,
    best_score: u64,
    status: GameStatus,
}

impl World {
    /// Creates a fresh session at the fixed starting origin.
    ///
    /// The craft and score cells are placed next to the starting cell and
    /// recorded as empty overrides.
    #[must_use]
    pub fn new() -> Self {
        let (craft_cell, score_cell) = special_cells_near(CellId::containing(START_ORIGIN));
        let mut world = Self {
            player_position: START_ORIGIN,
            heading_deg: None,
            held: None,
            overrides: BTreeMap::new(),
            craft_cell,
            score_cell,
            score: 0,
            best_score: 0,
            status: GameStatus::Playing,
        };
        world.ensure_special_overrides();
        world
    }

    /// Rebuilds a session from previously captured parts.
    ///
    /// Missing special-cell overrides are inserted as empty cells, the best
    /// score is raised to at least the current score and the heading is
    /// folded into `[0, 360)`.
    pub fn restore(parts: WorldParts) -> Result<Self, RestoreError> {
        if !parts.player_position.is_finite() {
            return Err(RestoreError::NonFinitePosition);
        }
        if parts.craft_cell == parts.score_cell {
            return Err(RestoreError::SpecialCellsCoincide(parts.craft_cell));
        }

        let overrides = parts
            .overrides
            .into_iter()
            .map(|cell| (cell.id(), cell))
            .collect();

        let mut world = Self {
            player_position: parts.player_position,
            heading_deg: parts.heading_deg.and_then(normalize_heading),
            held: parts.held,
            overrides,
            craft_cell: parts.craft_cell,
            score_cell: parts.score_cell,
            score: parts.score,
            best_score: parts.best_score.max(parts.score),
            status: parts.status,
        };
        world.ensure_special_overrides();
        Ok(world)
    }

    fn ensure_special_overrides(&mut self) {
        for id in [self.craft_cell, self.score_cell] {
            let _ = self.overrides.entry(id).or_insert_with(|| Cell::empty(id));
        }
    }

    fn player_cell(&self) -> CellId {
        CellId::containing(self.player_position)
    }

    fn cell(&self, id: CellId) -> Cell {
        self.overrides
            .get(&id)
            .copied()
            .unwrap_or_else(|| base_cell(id))
    }

    fn write_override(&mut self, id: CellId, token: Option<Token>) {
        let _ = self.overrides.insert(id, Cell::new(id, token));
    }

    fn role_of(&self, id: CellId) -> CellRole {
        if id == self.craft_cell {
            CellRole::Craft
        } else if id == self.score_cell {
            CellRole::Score
        } else {
            CellRole::Ordinary
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-data description of a session used to rebuild a [`World`].
#[derive(Clone, Debug, PartialEq)]
pub struct WorldParts {
    /// Geographic position of the player.
    pub player_position: GeoPoint,
    /// Heading of the player in degrees, if known.
    pub heading_deg: Option<f64>,
    /// Token carried by the player.
    pub held: Option<Token>,
    /// Player-recorded cell contents.
    pub overrides: Vec<Cell>,
    /// Cell that supports combining tokens.
    pub craft_cell: CellId,
    /// Cell that converts tokens into score.
    pub score_cell: CellId,
    /// Current score.
    pub score: u64,
    /// Highest score reached during the session.
    pub best_score: u64,
    /// Progress of the session.
    pub status: GameStatus,
}

/// Reasons a session cannot be rebuilt from the provided parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RestoreError {
    /// The player position contained a non-finite component.
    #[error("player position must be finite")]
    NonFinitePosition,
    /// The craft and score cells were assigned to the same cell.
    #[error("craft and score cells must differ, both were {0}")]
    SpecialCellsCoincide(CellId),
}

/// Role a cell plays in the interaction rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// Designated cell supporting pickup, drop and combine.
    Craft,
    /// Designated cell that converts a held token into score.
    Score,
    /// Any other cell; supports pickup and drop only.
    Ordinary,
}

impl CellRole {
    /// Label shown for the cell when it holds no token.
    #[must_use]
    pub const fn label(self) -> Option<char> {
        match self {
            Self::Craft => Some('C'),
            Self::Score => Some('*'),
            Self::Ordinary => None,
        }
    }
}

/// Computes the craft and score cells for a session starting at `start`.
#[must_use]
pub const fn special_cells_near(start: CellId) -> (CellId, CellId) {
    (
        start.offset(CRAFT_CELL_OFFSET.0, CRAFT_CELL_OFFSET.1),
        start.offset(SCORE_CELL_OFFSET.0, SCORE_CELL_OFFSET.1),
    )
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every mutation is reported through `out_events`; commands that leave the
/// world untouched report nothing.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Move { dx, dy } => {
            if dx == 0 && dy == 0 {
                return;
            }
            let from = world.player_position;
            world.player_position = from.offset_cells(dx, dy);
            out_events.push(Event::PlayerMoved {
                from,
                to: world.player_position,
                heading_deg: world.heading_deg,
            });
        }
        Command::MoveTo { point, heading_deg } => {
            if !point.is_finite() {
                debug!(?point, "ignoring move to non-finite position");
                return;
            }
            let from = world.player_position;
            let heading = heading_deg.and_then(normalize_heading).or(world.heading_deg);
            if from == point && heading == world.heading_deg {
                return;
            }
            world.player_position = point;
            world.heading_deg = heading;
            out_events.push(Event::PlayerMoved {
                from,
                to: point,
                heading_deg: heading,
            });
        }
        Command::ClickCell { cell } => interaction::click_cell(world, cell, out_events),
        Command::Reset => {
            *world = World::new();
            info!("world reset to a fresh session");
            out_events.push(Event::WorldReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use world_of_bits_core::{Cell, CellId, GameStatus, GeoPoint, GeoRegion, Token, MAX_RENDER_DIST};

    use super::{CellRole, World};

    /// Geographic position of the player.
    #[must_use]
    pub fn player_position(world: &World) -> GeoPoint {
        world.player_position
    }

    /// Heading of the player in degrees within `[0, 360)`, if known.
    #[must_use]
    pub fn heading_deg(world: &World) -> Option<f64> {
        world.heading_deg
    }

    /// Cell currently occupied by the player.
    #[must_use]
    pub fn player_cell(world: &World) -> CellId {
        world.player_cell()
    }

    /// Token carried by the player, if any.
    #[must_use]
    pub fn held(world: &World) -> Option<Token> {
        world.held
    }

    /// Current score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Highest score reached during the session.
    #[must_use]
    pub fn best_score(world: &World) -> u64 {
        world.best_score
    }

    /// Progress of the session.
    #[must_use]
    pub fn status(world: &World) -> GameStatus {
        world.status
    }

    /// Cell that supports combining tokens.
    #[must_use]
    pub fn craft_cell(world: &World) -> CellId {
        world.craft_cell
    }

    /// Cell that converts held tokens into score.
    #[must_use]
    pub fn score_cell(world: &World) -> CellId {
        world.score_cell
    }

    /// Resolves the current content of a cell.
    ///
    /// A recorded override always wins, including an override that marks the
    /// cell as emptied; otherwise the procedural content is returned.
    #[must_use]
    pub fn cell(world: &World, id: CellId) -> Cell {
        world.cell(id)
    }

    /// Reports whether the player has recorded content for the cell.
    #[must_use]
    pub fn has_override(world: &World, id: CellId) -> bool {
        world.overrides.contains_key(&id)
    }

    /// Iterator over every recorded override ordered by cell identifier.
    pub fn overrides(world: &World) -> impl Iterator<Item = &Cell> {
        world.overrides.values()
    }

    /// Role the cell plays in the interaction rules.
    #[must_use]
    pub fn cell_role(world: &World, id: CellId) -> CellRole {
        world.role_of(id)
    }

    /// Resolves every cell in the region that lies within render distance.
    ///
    /// Cells further than [`MAX_RENDER_DIST`] steps from the player on either
    /// axis are skipped. The region is clipped to the render window before
    /// enumeration; cells come out in the order of
    /// [`cells_in_region`](world_of_bits_core::cells_in_region).
    #[must_use]
    pub fn visible_cells(world: &World, region: GeoRegion) -> Vec<Cell> {
        let player_cell = world.player_cell();
        let reach = i32::try_from(MAX_RENDER_DIST).unwrap_or(i32::MAX);
        let south_west = CellId::containing(region.south_west());
        let north_east = CellId::containing(region.north_east());

        let min_x = south_west.x().max(player_cell.x().saturating_sub(reach));
        let max_x = north_east.x().min(player_cell.x().saturating_add(reach));
        let min_y = south_west.y().max(player_cell.y().saturating_sub(reach));
        let max_y = north_east.y().min(player_cell.y().saturating_add(reach));

        (min_y..=max_y)
            .flat_map(|y| (min_x..=max_x).map(move |x| CellId::new(x, y)))
            .map(|id| world.cell(id))
            .collect()
    }
}
