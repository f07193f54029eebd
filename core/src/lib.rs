#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the manor generator.
//!
//! This crate defines the vocabulary spoken by every stage of the generation
//! pipeline: grid [`Coordinate`] and [`Rect`] values, cardinal [`Direction`]s,
//! the semantic [`Tile`] set written into the feature grid, entry identifiers,
//! and the [`LayoutKind`] selector. It also owns the [`GenerationContext`]
//! that carries the seeded random source through a run, so that every manor
//! can be reproduced from its seed.

mod context;

use std::{
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use context::GenerationContext;

/// Canonical outer width of a room, walls included.
pub const ROOM_WIDTH: i32 = 12;

/// Canonical outer height of a room, walls included.
pub const ROOM_HEIGHT: i32 = 7;

/// Location of a single grid cell. `x` is the column and `y` the row, with the
/// origin in the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// A coordinate is valid when neither component is negative.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }

    /// Reports whether both components are less than or equal to the bound's.
    ///
    /// Used as the "fits inside" test when a size is compared against a size.
    #[must_use]
    pub const fn fits_within(&self, bound: Coordinate) -> bool {
        self.x <= bound.x && self.y <= bound.y
    }

    /// Reports whether the coordinate lies in the half-open box `[start, stop)`.
    #[must_use]
    pub const fn lies_within(&self, start: Coordinate, stop: Coordinate) -> bool {
        self.x >= start.x && self.y >= start.y && self.x < stop.x && self.y < stop.y
    }

    /// Component-wise maximum of two coordinates.
    #[must_use]
    pub fn component_max(self, other: Coordinate) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Neighbouring coordinate one step in the provided direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Self {
        self + direction.offset()
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Coordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Coordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle expressed in cell coordinates, walls included.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    origin: Coordinate,
    size: Coordinate,
}

impl Rect {
    /// Constructs a rectangle from its upper-left cell and size.
    #[must_use]
    pub const fn new(origin: Coordinate, size: Coordinate) -> Self {
        Self { origin, size }
    }

    /// Upper-left cell of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Width and height of the rectangle.
    #[must_use]
    pub const fn size(&self) -> Coordinate {
        self.size
    }

    /// Exclusive lower-right bound.
    #[must_use]
    pub fn stop(&self) -> Coordinate {
        self.origin + self.size
    }

    /// Inclusive lower-right cell.
    #[must_use]
    pub fn last(&self) -> Coordinate {
        self.stop() - Coordinate::new(1, 1)
    }

    /// Same rectangle shifted by `delta`.
    #[must_use]
    pub fn translated(&self, delta: Coordinate) -> Self {
        Self::new(self.origin + delta, self.size)
    }

    /// Reports whether the cell lies inside the rectangle, border included.
    #[must_use]
    pub fn contains(&self, cell: Coordinate) -> bool {
        cell.lies_within(self.origin, self.stop())
    }

    /// Reports whether the cell lies strictly inside the border.
    #[must_use]
    pub fn interior_contains(&self, cell: Coordinate) -> bool {
        let one = Coordinate::new(1, 1);
        cell.lies_within(self.origin + one, self.stop() - one)
    }

    /// Reports whether the cell lies on the one-cell border.
    #[must_use]
    pub fn on_perimeter(&self, cell: Coordinate) -> bool {
        self.contains(cell) && !self.interior_contains(cell)
    }

    /// Reports whether the cell is one of the four corners.
    #[must_use]
    pub fn is_corner(&self, cell: Coordinate) -> bool {
        let last = self.last();
        (cell.x() == self.origin.x() || cell.x() == last.x())
            && (cell.y() == self.origin.y() || cell.y() == last.y())
    }

    /// Reports whether two rectangles share at least one cell.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a = self.stop();
        let b = other.stop();
        self.origin.x() < b.x()
            && other.origin.x() < a.x()
            && self.origin.y() < b.y()
            && other.origin.y() < a.y()
    }

    /// Corner cells bounding the side facing `direction`, in scan order.
    #[must_use]
    pub fn side_corners(&self, direction: Direction) -> (Coordinate, Coordinate) {
        let first = self.origin;
        let last = self.last();
        match direction {
            Direction::North => (first, Coordinate::new(last.x(), first.y())),
            Direction::South => (Coordinate::new(first.x(), last.y()), last),
            Direction::West => (first, Coordinate::new(first.x(), last.y())),
            Direction::East => (Coordinate::new(last.x(), first.y()), last),
        }
    }

    /// Cells of the side facing `direction`, corners excluded, in scan order.
    #[must_use]
    pub fn side_cells(&self, direction: Direction) -> Vec<Coordinate> {
        let (start, end) = self.side_corners(direction);
        let along = direction.tangent();
        let mut cells = Vec::new();
        let mut cell = start.step(along);
        while cell != end {
            cells.push(cell);
            cell = cell.step(along);
        }
        cells
    }
}

/// Cardinal directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing column indices.
    East,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
}

impl Direction {
    /// All four directions in clockwise order starting at north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit offset of a single step.
    #[must_use]
    pub const fn offset(self) -> Coordinate {
        match self {
            Self::North => Coordinate::new(0, -1),
            Self::East => Coordinate::new(1, 0),
            Self::South => Coordinate::new(0, 1),
            Self::West => Coordinate::new(-1, 0),
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Direction that walks along a wall facing `self`, in scan order
    /// (west to east for horizontal walls, north to south for vertical ones).
    #[must_use]
    pub const fn tangent(self) -> Self {
        match self {
            Self::North | Self::South => Self::East,
            Self::East | Self::West => Self::South,
        }
    }

    /// Reports whether walls facing this direction run horizontally.
    #[must_use]
    pub const fn faces_horizontal_wall(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Long axis of a corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// Corridor runs west to east.
    Horizontal,
    /// Corridor runs north to south.
    Vertical,
}

impl Orientation {
    /// Directions across the short axis, i.e. toward the corridor's side walls.
    #[must_use]
    pub const fn normals(self) -> [Direction; 2] {
        match self {
            Self::Horizontal => [Direction::North, Direction::South],
            Self::Vertical => [Direction::West, Direction::East],
        }
    }

    /// Directions along the long axis, i.e. toward the corridor's two ends.
    #[must_use]
    pub const fn ends(self) -> [Direction; 2] {
        match self {
            Self::Horizontal => [Direction::West, Direction::East],
            Self::Vertical => [Direction::North, Direction::South],
        }
    }
}

/// Semantic value of a single cell of the feature grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Outside of every room and corridor.
    #[default]
    Nothing,
    /// Walkable floor.
    Floor,
    /// Solid wall.
    Wall,
    /// Door that is currently shut.
    ClosedDoor,
    /// Door standing open.
    OpenDoor,
    /// Window set into a horizontal wall.
    WindowHorizontal,
    /// Window set into a vertical wall.
    WindowVertical,
    /// A piece of furniture standing on the floor.
    Furniture(FurnitureKind),
}

impl Tile {
    /// Reports whether a walker may enter the cell.
    ///
    /// Doors count as traversable whether open or closed, since closed doors
    /// can be opened during play.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        match self {
            Self::Floor | Self::ClosedDoor | Self::OpenDoor => true,
            Self::Furniture(kind) => kind.is_traversable(),
            Self::Nothing | Self::Wall | Self::WindowHorizontal | Self::WindowVertical => false,
        }
    }

    /// Reports whether the tile is a door, open or closed.
    #[must_use]
    pub const fn is_door(self) -> bool {
        matches!(self, Self::ClosedDoor | Self::OpenDoor)
    }

    /// Reports whether the tile is a window.
    #[must_use]
    pub const fn is_window(self) -> bool {
        matches!(self, Self::WindowHorizontal | Self::WindowVertical)
    }

    /// Character used when the tile grid is printed.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Nothing => ' ',
            Self::Floor => '.',
            Self::Wall => '#',
            Self::ClosedDoor => '+',
            Self::OpenDoor => '/',
            Self::WindowHorizontal => '-',
            Self::WindowVertical => '|',
            Self::Furniture(kind) => kind.glyph(),
        }
    }
}

/// Furniture that can be placed on a room's floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FurnitureKind {
    /// A bed.
    Bed,
    /// A table.
    Table,
    /// A chair; can be stepped around and over.
    Chair,
    /// A wardrobe.
    Wardrobe,
    /// A bookshelf.
    Bookshelf,
    /// A fireplace.
    Fireplace,
    /// A piano.
    Piano,
    /// A bathtub.
    Bathtub,
    /// A sink.
    Sink,
    /// A kitchen counter.
    Counter,
    /// A carpet lying flat on the floor.
    Carpet,
}

impl FurnitureKind {
    /// Reports whether a walker may cross the cell holding this piece.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Chair | Self::Carpet)
    }

    /// Reports whether the piece is normally placed against a wall.
    #[must_use]
    pub const fn prefers_wall(self) -> bool {
        matches!(
            self,
            Self::Bed
                | Self::Wardrobe
                | Self::Bookshelf
                | Self::Fireplace
                | Self::Piano
                | Self::Bathtub
                | Self::Sink
                | Self::Counter
        )
    }

    /// Character used when the tile grid is printed.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Bed => 'B',
            Self::Table => 'T',
            Self::Chair => 'h',
            Self::Wardrobe => 'W',
            Self::Bookshelf => 'S',
            Self::Fireplace => 'F',
            Self::Piano => 'P',
            Self::Bathtub => 'U',
            Self::Sink => 'K',
            Self::Counter => 'C',
            Self::Carpet => '~',
        }
    }

    /// Lower-case description recorded on the room.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bed => "bed",
            Self::Table => "table",
            Self::Chair => "chair",
            Self::Wardrobe => "wardrobe",
            Self::Bookshelf => "bookshelf",
            Self::Fireplace => "fireplace",
            Self::Piano => "piano",
            Self::Bathtub => "bathtub",
            Self::Sink => "sink",
            Self::Counter => "counter",
            Self::Carpet => "carpet",
        }
    }
}

/// Identifier of a room or corridor inside a manor layout.
///
/// Rooms and corridors share one id space; the layout's entry arena tells
/// them apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates an identifier from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the identified entry in the layout arena.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Broad classification of a room or corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    /// Living quarters of the household.
    Domestic,
    /// Service rooms: kitchens, storage, servants' quarters.
    Utility,
    /// Corridors.
    Corridor,
}

/// Side of the base layout a leg attaches to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Western end of the main corridor.
    Left,
    /// Eastern end of the main corridor.
    Right,
}

impl Side {
    /// Both sides.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];
}

/// Whether a leg extends above or below the base layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Placement {
    /// Above the base layout.
    Top,
    /// Below the base layout.
    Bottom,
}

impl Placement {
    /// Both placements.
    pub const ALL: [Placement; 2] = [Placement::Top, Placement::Bottom];

    /// The other placement.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
        }
    }
}

/// Overall silhouette of a generated manor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Two rows of rooms around a single main corridor.
    Base,
    /// Base plus one leg.
    L,
    /// Z-shaped manor. Currently falls back to the base layout.
    Z,
    /// N-shaped manor. Currently falls back to the base layout.
    N,
    /// Base plus legs above and below on both sides.
    H,
    /// Ring-shaped manor. Currently falls back to the base layout.
    O,
    /// Base plus legs on both sides at the same placement.
    U,
    /// Uniform choice among the compound kinds.
    Random,
}

impl LayoutKind {
    /// Kinds that [`LayoutKind::Random`] chooses from.
    pub const COMPOUND: [LayoutKind; 6] = [
        LayoutKind::L,
        LayoutKind::Z,
        LayoutKind::N,
        LayoutKind::H,
        LayoutKind::O,
        LayoutKind::U,
    ];

    /// Short lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::L => "l",
            Self::Z => "z",
            Self::N => "n",
            Self::H => "h",
            Self::O => "o",
            Self::U => "u",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`LayoutKind`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown layout kind `{0}`; expected one of base, l, z, n, h, o, u, random")]
pub struct ParseLayoutKindError(String);

impl FromStr for LayoutKind {
    type Err = ParseLayoutKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "base" | "single" | "i" => Ok(Self::Base),
            "l" => Ok(Self::L),
            "z" => Ok(Self::Z),
            "n" => Ok(Self::N),
            "h" => Ok(Self::H),
            "o" => Ok(Self::O),
            "u" => Ok(Self::U),
            "random" | "any" => Ok(Self::Random),
            _ => Err(ParseLayoutKindError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Coordinate, Direction, FurnitureKind, LayoutKind, Rect, RoomId, Tile};
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
    fn coordinate_arithmetic_is_component_wise() {
        let a = Coordinate::new(3, 4);
        let b = Coordinate::new(1, 6);
        assert_eq!(a + b, Coordinate::new(4, 10));
        assert_eq!(a - b, Coordinate::new(2, -2));
        assert!(!(a - b).is_valid());
        assert!(Coordinate::new(2, 3).fits_within(a));
        assert!(!b.fits_within(a));
        assert_eq!(a.manhattan_distance(b), 4);
    }

    #[test]
    fn rect_perimeter_and_corners() {
        let rect = Rect::new(Coordinate::new(2, 1), Coordinate::new(4, 3));
        assert_eq!(rect.last(), Coordinate::new(5, 3));
        assert!(rect.is_corner(Coordinate::new(5, 1)));
        assert!(rect.on_perimeter(Coordinate::new(3, 1)));
        assert!(rect.interior_contains(Coordinate::new(3, 2)));
        assert!(!rect.contains(Coordinate::new(6, 2)));
    }

    #[test]
    fn side_cells_skip_corners_in_scan_order() {
        let rect = Rect::new(Coordinate::ZERO, Coordinate::new(5, 4));
        assert_eq!(
            rect.side_cells(Direction::South),
            vec![
                Coordinate::new(1, 3),
                Coordinate::new(2, 3),
                Coordinate::new(3, 3)
            ]
        );
        assert_eq!(
            rect.side_cells(Direction::East),
            vec![Coordinate::new(4, 1), Coordinate::new(4, 2)]
        );
    }

    #[test]
    fn rect_intersection_counts_shared_walls() {
        let left = Rect::new(Coordinate::ZERO, Coordinate::new(12, 7));
        let shared = Rect::new(Coordinate::new(11, 0), Coordinate::new(12, 7));
        let apart = Rect::new(Coordinate::new(12, 0), Coordinate::new(12, 7));
        assert!(left.intersects(&shared));
        assert!(!left.intersects(&apart));
    }

    #[test]
    fn traversability_follows_tile_semantics() {
        assert!(Tile::Floor.is_traversable());
        assert!(Tile::ClosedDoor.is_traversable());
        assert!(!Tile::Wall.is_traversable());
        assert!(!Tile::WindowVertical.is_traversable());
        assert!(Tile::Furniture(FurnitureKind::Carpet).is_traversable());
        assert!(!Tile::Furniture(FurnitureKind::Piano).is_traversable());
    }

    #[test]
    fn layout_kind_parses_case_insensitively() {
        assert_eq!("H".parse::<LayoutKind>(), Ok(LayoutKind::H));
        assert_eq!(" random ".parse::<LayoutKind>(), Ok(LayoutKind::Random));
        assert!("t".parse::<LayoutKind>().is_err());
    }

    #[test]
    fn tile_round_trips_through_bincode() {
        assert_round_trip(&Tile::Furniture(FurnitureKind::Bookshelf));
    }

    #[test]
    fn rect_round_trips_through_bincode() {
        assert_round_trip(&Rect::new(Coordinate::new(5, 7), Coordinate::new(2, 3)));
        assert_round_trip(&RoomId::new(42));
    }
}
