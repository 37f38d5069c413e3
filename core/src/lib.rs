#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the World of Bits engine.
//!
//! This crate defines the data model and the message surface that connects
//! input adapters, the authoritative world, and the persistence system.
//! Adapters submit [`Command`] values describing player intent, the world
//! executes those commands via its `apply` entry point, and then reports every
//! resulting mutation as an [`Event`]. An empty event batch means the command
//! was ignored.
//!
//! The grid is an implicit, infinite lattice laid over geographic
//! coordinates. Each square cell spans [`CELL_SIZE_DEG`] degrees of latitude
//! and longitude and is addressed by an integer [`CellId`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to World of Bits.";

/// Edge length of a grid cell measured in degrees.
pub const CELL_SIZE_DEG: f64 = 0.0002;

/// Largest Manhattan distance, in cells, at which the player may interact.
pub const INTERACTION_RANGE: u32 = 2;

/// Score that ends the session in the [`GameStatus::Won`] state.
pub const TARGET_SCORE: u64 = 128;

/// Renderers skip cells further than this many steps from the player on either axis.
pub const MAX_RENDER_DIST: u32 = 20;

/// Fixed location every fresh session starts from.
pub const START_ORIGIN: GeoPoint = GeoPoint::new(36.989743, -122.062819);

/// Offset of the craft cell relative to the player's starting cell.
pub const CRAFT_CELL_OFFSET: (i32, i32) = (1, 0);

/// Offset of the score cell relative to the player's starting cell.
pub const SCORE_CELL_OFFSET: (i32, i32) = (0, 1);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves the player by whole grid steps.
    Move {
        /// Number of cells to travel eastwards; negative values travel west.
        dx: i32,
        /// Number of cells to travel northwards; negative values travel south.
        dy: i32,
    },
    /// Repositions the player at an absolute coordinate.
    MoveTo {
        /// Destination reported by the input source.
        point: GeoPoint,
        /// Compass heading in degrees, if the input source reported one.
        heading_deg: Option<f64>,
    },
    /// Requests an interaction with the provided cell.
    ClickCell {
        /// Cell the player clicked.
        cell: CellId,
    },
    /// Discards the session and starts over from a fresh world.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the player position or heading changed.
    PlayerMoved {
        /// Position held before the move.
        from: GeoPoint,
        /// Position held after the move.
        to: GeoPoint,
        /// Heading after the move, if any.
        heading_deg: Option<f64>,
    },
    /// Confirms that the player picked a token up from a cell.
    TokenPickedUp {
        /// Cell that was emptied.
        cell: CellId,
        /// Token now carried by the player.
        token: Token,
    },
    /// Confirms that the held token was placed into an empty cell.
    TokenDropped {
        /// Cell that received the token.
        cell: CellId,
        /// Token placed into the cell.
        token: Token,
    },
    /// Confirms that the held token merged with the token in the craft cell.
    TokensCombined {
        /// Craft cell that holds the merged token.
        cell: CellId,
        /// Token that was carried into the cell.
        held: Token,
        /// Token that occupied the cell beforehand.
        existing: Token,
        /// Token produced by the combination.
        result: Token,
    },
    /// Confirms that the held token was converted into permanent score.
    TokenCashedIn {
        /// Score cell that consumed the token.
        cell: CellId,
        /// Token that was cashed in.
        token: Token,
    },
    /// Reports updated score totals.
    ScoreChanged {
        /// Current score after the change.
        score: u64,
        /// Highest score reached during the session.
        best_score: u64,
    },
    /// Announces that the session reached [`TARGET_SCORE`].
    GameWon {
        /// Score at the moment of winning.
        score: u64,
    },
    /// Announces that the world was replaced by a fresh session.
    WorldReset,
}

/// Progress of the current session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// Interactions are enabled and the target has not been reached yet.
    #[default]
    #[serde(alias = "playing")]
    Playing,
    /// The target score was reached; cell interactions are disabled.
    #[serde(alias = "won")]
    Won,
}

/// Continuous geographic coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    lat: f64,
    lng: f64,
}

impl GeoPoint {
    /// Creates a new coordinate from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude in degrees.
    #[must_use]
    pub const fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    #[must_use]
    pub const fn lng(&self) -> f64 {
        self.lng
    }

    /// Reports whether both components are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Returns the point shifted by whole grid steps.
    #[must_use]
    pub fn offset_cells(self, dx: i32, dy: i32) -> Self {
        Self {
            lat: self.lat + f64::from(dy) * CELL_SIZE_DEG,
            lng: self.lng + f64::from(dx) * CELL_SIZE_DEG,
        }
    }
}

/// Location of a single grid cell expressed as column and row indices.
///
/// `x` grows eastwards with longitude and `y` grows northwards with latitude.
/// The canonical key encoding is `"{x},{y}"`, see [`CellId::key`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId {
    x: i32,
    y: i32,
}

impl CellId {
    /// Creates a new grid cell identifier.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Maps a coordinate to the cell that contains it.
    ///
    /// Uses floor division so negative coordinates land in the cell whose
    /// bounds enclose them rather than being truncated towards zero.
    #[must_use]
    pub fn containing(point: GeoPoint) -> Self {
        Self {
            x: (point.lng() / CELL_SIZE_DEG).floor() as i32,
            y: (point.lat() / CELL_SIZE_DEG).floor() as i32,
        }
    }

    /// Geographic bounds covered by the cell.
    #[must_use]
    pub fn bounds(self) -> CellBounds {
        let south = f64::from(self.y) * CELL_SIZE_DEG;
        let west = f64::from(self.x) * CELL_SIZE_DEG;
        CellBounds {
            south,
            west,
            north: south + CELL_SIZE_DEG,
            east: west + CELL_SIZE_DEG,
        }
    }

    /// Coordinate at the middle of the cell.
    #[must_use]
    pub fn center(self) -> GeoPoint {
        let bounds = self.bounds();
        GeoPoint::new(
            bounds.south + CELL_SIZE_DEG / 2.0,
            bounds.west + CELL_SIZE_DEG / 2.0,
        )
    }

    /// Returns the cell shifted by the provided number of columns and rows.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Computes the Manhattan distance between two cells.
    #[must_use]
    pub fn manhattan_distance(self, other: CellId) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Canonical `"{x},{y}"` key used wherever a cell must index a mapping.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for CellId {
    type Err = CellKeyError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let (x, y) = key
            .split_once(',')
            .ok_or_else(|| CellKeyError::MissingSeparator(key.to_owned()))?;
        Ok(Self {
            x: parse_component(key, x)?,
            y: parse_component(key, y)?,
        })
    }
}

fn parse_component(key: &str, component: &str) -> Result<i32, CellKeyError> {
    let digits = component.strip_prefix('-').unwrap_or(component);
    let canonical = !digits.is_empty()
        && digits.bytes().all(|byte| byte.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
        && component != "-0";
    if !canonical {
        return Err(CellKeyError::InvalidComponent(key.to_owned()));
    }
    component
        .parse()
        .map_err(|_| CellKeyError::InvalidComponent(key.to_owned()))
}

/// Errors raised while decoding a canonical cell key.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CellKeyError {
    /// The key did not contain the `,` separator.
    #[error("cell key '{0}' is missing the ',' separator")]
    MissingSeparator(String),
    /// A component was not a canonical base-10 integer within range.
    #[error("cell key '{0}' contains a non-canonical integer component")]
    InvalidComponent(String),
}

/// Geographic bounds of a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBounds {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
}

impl CellBounds {
    /// Southern latitude edge.
    #[must_use]
    pub const fn south(&self) -> f64 {
        self.south
    }

    /// Western longitude edge.
    #[must_use]
    pub const fn west(&self) -> f64 {
        self.west
    }

    /// Northern latitude edge.
    #[must_use]
    pub const fn north(&self) -> f64 {
        self.north
    }

    /// Eastern longitude edge.
    #[must_use]
    pub const fn east(&self) -> f64 {
        self.east
    }
}

/// Rectangular viewport expressed in geographic coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoRegion {
    south_west: GeoPoint,
    north_east: GeoPoint,
}

impl GeoRegion {
    /// Creates a region from its south-west and north-east corners.
    #[must_use]
    pub const fn new(south_west: GeoPoint, north_east: GeoPoint) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// South-west corner of the region.
    #[must_use]
    pub const fn south_west(&self) -> GeoPoint {
        self.south_west
    }

    /// North-east corner of the region.
    #[must_use]
    pub const fn north_east(&self) -> GeoPoint {
        self.north_east
    }
}

/// Enumerates every cell whose bounds intersect the region.
///
/// Cells are produced row by row, southernmost row first and west to east
/// within a row. An inverted region yields no cells.
#[must_use]
pub fn cells_in_region(region: GeoRegion) -> Vec<CellId> {
    let min = CellId::containing(region.south_west());
    let max = CellId::containing(region.north_east());

    let mut cells = Vec::new();
    for y in min.y()..=max.y() {
        for x in min.x()..=max.x() {
            cells.push(CellId::new(x, y));
        }
    }
    cells
}

/// Folds an arbitrary heading into `[0, 360)`.
///
/// Non-finite headings are rejected so callers can treat them as "no heading
/// reported".
#[must_use]
pub fn normalize_heading(heading_deg: f64) -> Option<f64> {
    if !heading_deg.is_finite() {
        return None;
    }
    let normalized = heading_deg.rem_euclid(360.0);
    if normalized >= 360.0 {
        Some(0.0)
    } else {
        Some(normalized)
    }
}

/// Collectible unit carried between cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    value: u64,
}

impl Token {
    /// Creates a token with the provided value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self { value }
    }

    /// Numeric value of the token.
    #[must_use]
    pub const fn value(&self) -> u64 {
        self.value
    }

    /// Merges two tokens into one whose value is their sum.
    #[must_use]
    pub const fn combine(self, other: Token) -> Self {
        Self {
            value: self.value.saturating_add(other.value),
        }
    }
}

/// Content of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    id: CellId,
    token: Option<Token>,
}

impl Cell {
    /// Creates a cell holding the provided content.
    #[must_use]
    pub const fn new(id: CellId, token: Option<Token>) -> Self {
        Self { id, token }
    }

    /// Creates a cell that holds no token.
    #[must_use]
    pub const fn empty(id: CellId) -> Self {
        Self { id, token: None }
    }

    /// Identifier of the cell.
    #[must_use]
    pub const fn id(&self) -> CellId {
        self.id
    }

    /// Token stored in the cell, if any.
    #[must_use]
    pub const fn token(&self) -> Option<Token> {
        self.token
    }

    /// Reports whether the cell holds no token.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        cells_in_region, normalize_heading, CellId, CellKeyError, GameStatus, GeoPoint, GeoRegion,
        Token, CELL_SIZE_DEG,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellId::new(-1, 1);
        let destination = CellId::new(2, -3);
        assert_eq!(origin.manhattan_distance(destination), 7);
        assert_eq!(destination.manhattan_distance(origin), 7);
        assert_eq!(origin.manhattan_distance(origin), 0);
    }

    #[test]
    fn containing_uses_floor_for_negative_coordinates() {
        let point = GeoPoint::new(-0.00001, -0.00001);
        assert_eq!(CellId::containing(point), CellId::new(-1, -1));

        let point = GeoPoint::new(0.00001, 0.00001);
        assert_eq!(CellId::containing(point), CellId::new(0, 0));
    }

    #[test]
    fn start_origin_maps_to_expected_cell() {
        let cell = CellId::containing(super::START_ORIGIN);
        assert_eq!(cell, CellId::new(-610_315, 184_948));
    }

    #[test]
    fn bounds_enclose_cell_center() {
        let cell = CellId::new(-7, 12);
        let bounds = cell.bounds();
        assert!((bounds.north() - bounds.south() - CELL_SIZE_DEG).abs() < 1e-12);
        assert!((bounds.east() - bounds.west() - CELL_SIZE_DEG).abs() < 1e-12);
        assert_eq!(CellId::containing(cell.center()), cell);
    }

    #[test]
    fn cells_in_region_enumerates_rows_south_to_north() {
        let region = GeoRegion::new(
            CellId::new(2, 5).center(),
            CellId::new(3, 6).center(),
        );
        assert_eq!(
            cells_in_region(region),
            vec![
                CellId::new(2, 5),
                CellId::new(3, 5),
                CellId::new(2, 6),
                CellId::new(3, 6),
            ]
        );
    }

    #[test]
    fn cells_in_region_is_empty_for_inverted_region() {
        let region = GeoRegion::new(CellId::new(3, 6).center(), CellId::new(2, 5).center());
        assert!(cells_in_region(region).is_empty());
    }

    #[test]
    fn cell_key_round_trips_through_canonical_string() {
        for cell in [CellId::new(0, 0), CellId::new(-610_315, 184_948), CellId::new(17, -3)] {
            let key = cell.key();
            assert_eq!(key.parse::<CellId>(), Ok(cell));
        }
        assert_eq!(CellId::new(-4, 10).key(), "-4,10");
    }

    #[test]
    fn cell_key_rejects_non_canonical_input() {
        assert_eq!(
            "12".parse::<CellId>(),
            Err(CellKeyError::MissingSeparator("12".to_owned()))
        );
        for key in ["01,2", "1,+2", "-0,3", "a,b", ",4", "1, 2"] {
            assert_eq!(
                key.parse::<CellId>(),
                Err(CellKeyError::InvalidComponent(key.to_owned())),
                "{key} should be rejected"
            );
        }
    }

    #[test]
    fn heading_normalizes_into_half_open_range() {
        assert_eq!(normalize_heading(370.0), Some(10.0));
        assert_eq!(normalize_heading(-90.0), Some(270.0));
        assert_eq!(normalize_heading(360.0), Some(0.0));
        assert_eq!(normalize_heading(f64::NAN), None);
        assert_eq!(normalize_heading(f64::INFINITY), None);
    }

    #[test]
    fn combine_sums_token_values() {
        let combined = Token::new(2).combine(Token::new(1));
        assert_eq!(combined, Token::new(3));
        assert_eq!(Token::new(1).combine(Token::new(2)), combined);
    }

    #[test]
    fn data_model_round_trips_through_bincode() {
        assert_round_trip(&CellId::new(-3, 9));
        assert_round_trip(&Token::new(64));
        assert_round_trip(&GameStatus::Won);
        assert_round_trip(&GeoPoint::new(36.5, -122.25));
    }
}
