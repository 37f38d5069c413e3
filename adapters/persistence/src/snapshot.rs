//! Durable snapshot formats and the defaulting rules applied when loading them.

use serde::{Deserialize, Serialize};
use world_of_bits_core::{Cell, CellId, GameStatus, GeoPoint, Token};
use world_of_bits_world::{query, special_cells_near, World, WorldParts};

/// Complete snapshot written for every save.
///
/// The heading and held token are omitted entirely when absent so payloads
/// remain readable by older loaders.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Geographic position of the player.
    pub player_position: GeoPoint,
    /// Current score.
    pub score: u64,
    /// Highest score reached during the session.
    pub best_score: u64,
    /// Progress of the session.
    pub status: GameStatus,
    /// Heading of the player in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_deg: Option<f64>,
    /// Token carried by the player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held: Option<Token>,
    /// Every recorded override, ordered by cell identifier.
    pub overrides: Vec<SavedCell>,
    /// Cell that supports combining tokens.
    pub craft_cell_id: CellId,
    /// Cell that converts tokens into score.
    pub score_cell_id: CellId,
}

impl Snapshot {
    /// Captures the persistent fields of the world.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        Self {
            player_position: query::player_position(world),
            score: query::score(world),
            best_score: query::best_score(world),
            status: query::status(world),
            heading_deg: query::heading_deg(world),
            held: query::held(world),
            overrides: query::overrides(world).copied().map(SavedCell::from).collect(),
            craft_cell_id: query::craft_cell(world),
            score_cell_id: query::score_cell(world),
        }
    }
}

/// Override entry stored inside a snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCell {
    /// Cell the override applies to.
    pub id: CellId,
    /// Token recorded for the cell; absent marks the cell as emptied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<Token>,
}

impl From<Cell> for SavedCell {
    fn from(cell: Cell) -> Self {
        Self {
            id: cell.id(),
            token: cell.token(),
        }
    }
}

impl From<SavedCell> for Cell {
    fn from(saved: SavedCell) -> Self {
        Cell::new(saved.id, saved.token)
    }
}

/// Snapshot as read back from storage, where every field but the player
/// position may be missing.
///
/// | Field         | Default when missing                          |
/// |---------------|-----------------------------------------------|
/// | `score`       | `0`                                           |
/// | `bestScore`   | the loaded score                              |
/// | `status`      | [`GameStatus::Playing`]                       |
/// | `headingDeg`  | no heading                                    |
/// | `held`        | nothing held                                  |
/// | `overrides`   | no overrides                                  |
/// | `craftCellId` | player cell shifted one column east           |
/// | `scoreCellId` | player cell shifted one row north             |
///
/// After defaulting, both special cells are guaranteed to exist as overrides.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSnapshot {
    /// Geographic position of the player.
    #[serde(alias = "playerLL")]
    pub player_position: GeoPoint,
    /// Current score.
    #[serde(default)]
    pub score: Option<u64>,
    /// Highest score reached during the session.
    #[serde(default)]
    pub best_score: Option<u64>,
    /// Progress of the session.
    #[serde(default)]
    pub status: Option<GameStatus>,
    /// Heading of the player in degrees.
    #[serde(default)]
    pub heading_deg: Option<f64>,
    /// Token carried by the player.
    #[serde(default)]
    pub held: Option<Token>,
    /// Recorded overrides.
    #[serde(default)]
    pub overrides: Vec<SavedCell>,
    /// Cell that supports combining tokens.
    #[serde(default)]
    pub craft_cell_id: Option<CellId>,
    /// Cell that converts tokens into score.
    #[serde(default)]
    pub score_cell_id: Option<CellId>,
}

impl PartialSnapshot {
    /// Applies the defaulting rules, producing the parts of a session.
    #[must_use]
    pub fn into_parts(self) -> WorldParts {
        let player_cell = CellId::containing(self.player_position);
        let (default_craft, default_score) = special_cells_near(player_cell);
        let score = self.score.unwrap_or(0);

        WorldParts {
            player_position: self.player_position,
            heading_deg: self.heading_deg,
            held: self.held,
            overrides: self.overrides.into_iter().map(Cell::from).collect(),
            craft_cell: self.craft_cell_id.unwrap_or(default_craft),
            score_cell: self.score_cell_id.unwrap_or(default_score),
            score,
            best_score: self.best_score.unwrap_or(score),
            status: self.status.unwrap_or_default(),
        }
    }
}

impl From<Snapshot> for PartialSnapshot {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            player_position: snapshot.player_position,
            score: Some(snapshot.score),
            best_score: Some(snapshot.best_score),
            status: Some(snapshot.status),
            heading_deg: snapshot.heading_deg,
            held: snapshot.held,
            overrides: snapshot.overrides,
            craft_cell_id: Some(snapshot.craft_cell_id),
            score_cell_id: Some(snapshot.score_cell_id),
        }
    }
}
