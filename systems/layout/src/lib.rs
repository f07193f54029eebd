#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Layout builder assembling rooms and corridors into a manor silhouette.
//!
//! Building runs in two phases. The base phase lays out two rows of rooms
//! joined by the main corridor. The optional leg phase attaches blocks of
//! rooms to the ends of the main corridor through vertical connector
//! corridors, producing L, U and H silhouettes.

use std::ops::RangeInclusive;

use log::warn;
use manor_core::{
    Coordinate, GenerationContext, LayoutKind, Orientation, Placement, Rect, Side, ROOM_HEIGHT,
    ROOM_WIDTH,
};
use manor_world::{LegRecord, ManorLayout, Shape, ShapeCollection};
use serde::{Deserialize, Serialize};

/// Height of a room enlarged to close one end of the main corridor.
pub const ENLARGED_ROOM_HEIGHT: i32 = ROOM_HEIGHT + 2;

const WALL: char = '#';
const FLOOR: char = '.';
const DOORWAY_STUB: char = '\'';

/// Tunable bounds for the random choices made by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutTuning {
    /// Fewest rooms placed in each base row.
    pub min_rooms_per_row: u32,
    /// Most rooms placed in each base row.
    pub max_rooms_per_row: u32,
    /// Fewest rooms stacked in each leg column.
    pub min_leg_rows: u32,
    /// Most rooms stacked in each leg column.
    pub max_leg_rows: u32,
    /// Most room columns in a leg.
    pub max_leg_columns: u32,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            min_rooms_per_row: 3,
            max_rooms_per_row: 5,
            min_leg_rows: 1,
            max_leg_rows: 3,
            max_leg_columns: 2,
        }
    }
}

impl LayoutTuning {
    fn rooms_per_row(&self) -> RangeInclusive<i32> {
        to_i32(self.min_rooms_per_row)..=to_i32(self.max_rooms_per_row)
    }

    fn leg_rows(&self) -> RangeInclusive<i32> {
        to_i32(self.min_leg_rows)..=to_i32(self.max_leg_rows)
    }

    fn leg_columns(&self) -> RangeInclusive<i32> {
        1..=to_i32(self.max_leg_columns.clamp(1, 2))
    }
}

/// How the base rows are balanced around the main corridor.
///
/// The corridor is shorter than the rows by one room on each end; enlarged
/// end rooms reach past the corridor row and close it off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Compensation {
    /// Both end rooms of the top row reach down past the corridor.
    TopEnds,
    /// Both end rooms of the bottom row reach up past the corridor.
    BottomEnds,
    /// One top end and the opposite bottom end are enlarged.
    Split {
        /// Whether the top row's left end (rather than its right end) is the
        /// enlarged one.
        top_left: bool,
    },
}

impl Compensation {
    /// Rows shared between the stacked top and bottom rows.
    #[must_use]
    pub const fn overlap(self) -> i32 {
        match self {
            Self::TopEnds | Self::BottomEnds => 1,
            Self::Split { .. } => 3,
        }
    }

    fn enlarges(self, top: bool, index: usize, count: usize) -> bool {
        let first = index == 0;
        let last = index + 1 == count;
        match self {
            Self::TopEnds => top && (first || last),
            Self::BottomEnds => !top && (first || last),
            Self::Split { top_left } => {
                if top == top_left {
                    first
                } else {
                    last
                }
            }
        }
    }

    fn random(ctx: &mut GenerationContext) -> Self {
        match ctx.below(3) {
            0 => Self::TopEnds,
            1 => Self::BottomEnds,
            _ => Self::Split {
                top_left: ctx.coin(),
            },
        }
    }
}

/// Block of rooms attached to one end of the main corridor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Leg {
    columns: u32,
    rows: u32,
}

impl Leg {
    /// Describes a leg of `columns` columns with `rows` rooms each.
    ///
    /// # Panics
    ///
    /// Panics unless `columns` is 1 or 2 and `rows` is at least 1.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        assert!(
            (1..=2).contains(&columns),
            "a leg has 1 or 2 columns, not {columns}"
        );
        assert!(rows >= 1, "a leg needs at least one row");
        Self { columns, rows }
    }

    /// Number of room columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Rooms per column.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Footprint of the leg including its connector column.
    #[must_use]
    pub fn size(&self) -> Coordinate {
        let width = if self.columns == 2 {
            2 * ROOM_WIDTH + 1
        } else {
            ROOM_WIDTH + 1
        };
        Coordinate::new(width, to_i32(self.rows) * (ROOM_HEIGHT - 1) + 1)
    }

    /// Column of the footprint carrying the connector corridor. A single
    /// column of rooms sits on the outer side of the connector.
    #[must_use]
    pub fn connector_column(&self, side: Side) -> i32 {
        if self.columns == 1 && side == Side::Right {
            0
        } else {
            ROOM_WIDTH
        }
    }

    /// Room shapes positioned inside the leg's footprint.
    #[must_use]
    pub fn rooms(&self, side: Side) -> ShapeCollection {
        let mut rooms = self.column();
        if self.columns == 2 {
            let _ = rooms.adjoin_collection(self.column(), -1);
        } else if side == Side::Right {
            rooms.translate(Coordinate::new(1, 0));
        }
        rooms
    }

    fn column(&self) -> ShapeCollection {
        let mut column = ShapeCollection::new();
        let _ = column.push(room_box(ROOM_HEIGHT), Coordinate::ZERO);
        for _ in 1..self.rows {
            let mut next = ShapeCollection::new();
            let _ = next.push(room_box(ROOM_HEIGHT), Coordinate::ZERO);
            let _ = column.stack_collection(next, 1);
        }
        column
    }
}

/// Where a leg lands relative to the current layout.
#[derive(Clone, Copy, Debug)]
struct LegGeometry {
    origin: Coordinate,
    connector_x: i32,
    main_row: i32,
    boundary_row: i32,
}

/// Builds manor layouts of a requested kind.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutBuilder {
    tuning: LayoutTuning,
}

impl LayoutBuilder {
    /// Creates a builder with the provided tuning.
    #[must_use]
    pub const fn new(tuning: LayoutTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the builder draws its random choices from.
    #[must_use]
    pub const fn tuning(&self) -> LayoutTuning {
        self.tuning
    }

    /// Builds a layout of the requested kind.
    ///
    /// Z, N and O silhouettes are not built yet; they log a warning and
    /// return the base layout.
    pub fn build(&self, kind: LayoutKind, ctx: &mut GenerationContext) -> ManorLayout {
        match kind {
            LayoutKind::Base => self.base(ctx),
            LayoutKind::L => {
                let mut layout = self.base(ctx);
                let side = if ctx.coin() { Side::Left } else { Side::Right };
                let placement = if ctx.coin() {
                    Placement::Top
                } else {
                    Placement::Bottom
                };
                self.attach_random_leg(&mut layout, side, placement, ctx);
                layout
            }
            LayoutKind::U => {
                let mut layout = self.base(ctx);
                let placement = if ctx.coin() {
                    Placement::Top
                } else {
                    Placement::Bottom
                };
                for side in Side::ALL {
                    self.attach_random_leg(&mut layout, side, placement, ctx);
                }
                layout
            }
            LayoutKind::H => {
                let mut layout = self.base(ctx);
                for placement in Placement::ALL {
                    for side in Side::ALL {
                        self.attach_random_leg(&mut layout, side, placement, ctx);
                    }
                }
                layout
            }
            LayoutKind::Z | LayoutKind::N | LayoutKind::O => {
                warn!("layout kind {kind} is not implemented; building the base layout instead");
                self.base(ctx)
            }
            LayoutKind::Random => {
                let kind = ctx
                    .choose(&LayoutKind::COMPOUND)
                    .copied()
                    .unwrap_or(LayoutKind::Base);
                self.build(kind, ctx)
            }
        }
    }

    /// Base phase: a random room count and compensation policy.
    pub fn base(&self, ctx: &mut GenerationContext) -> ManorLayout {
        let rooms_per_row = ctx.range(self.tuning.rooms_per_row());
        let compensation = Compensation::random(ctx);
        base_layout(u32::try_from(rooms_per_row).unwrap_or(3), compensation)
    }

    /// Leg phase: attaches a leg with random dimensions at the slot.
    ///
    /// A leg opposite an existing one on the same side copies its row count
    /// so both connectors line up. Two columns are used only when the wider
    /// footprint stays clear of every leg already attached.
    pub fn attach_random_leg(
        &self,
        layout: &mut ManorLayout,
        side: Side,
        placement: Placement,
        ctx: &mut GenerationContext,
    ) {
        let rows = match layout.leg(side, placement.opposite()) {
            Some(opposite) => opposite.rows(),
            None => u32::try_from(ctx.range(self.tuning.leg_rows())).unwrap_or(1),
        };
        let columns = u32::try_from(ctx.range(self.tuning.leg_columns())).unwrap_or(1);

        let mut leg = Leg::new(columns, rows.max(1));
        if columns == 2 && !leg_fits(layout, side, placement, leg) {
            leg = Leg::new(1, leg.rows());
        }
        attach_leg(layout, side, placement, leg);
    }
}

/// Deterministic base phase: two rows of `rooms_per_row` rooms around the
/// main corridor.
///
/// Rooms are adjoined with one shared wall column and the rows are stacked
/// with the compensation's overlap. The main corridor is one row tall,
/// anchored at `(ROOM_WIDTH, ROOM_HEIGHT)` and spans the canvas width minus
/// two rooms.
///
/// # Panics
///
/// Panics when fewer than three rooms per row are requested.
#[must_use]
pub fn base_layout(rooms_per_row: u32, compensation: Compensation) -> ManorLayout {
    assert!(
        rooms_per_row >= 3,
        "the base layout needs at least three rooms per row"
    );
    let count = usize::try_from(rooms_per_row).unwrap_or(3);

    let mut rows = room_row(count, compensation, true);
    let _ = rows.stack_collection(room_row(count, compensation, false), compensation.overlap());
    assert_eq!(
        rows.size().y(),
        2 * ROOM_HEIGHT + 1,
        "base rows must leave exactly one corridor row"
    );

    let mut layout = ManorLayout::new();
    let _ = layout.add_rooms(rows, Coordinate::ZERO, None);
    let corridor_width = layout.size().x() - 2 * ROOM_WIDTH;
    let main = layout.add_corridor(
        Shape::filled(Coordinate::new(corridor_width, 1), FLOOR),
        Coordinate::new(ROOM_WIDTH, ROOM_HEIGHT),
        Orientation::Horizontal,
    );
    layout.set_main_corridor(main);
    layout.set_base(Rect::new(Coordinate::ZERO, layout.size()));
    layout
}

/// Leg phase: attaches `leg` at `(side, placement)`.
///
/// Appends the leg's rooms, a vertical connector corridor running from the
/// main corridor to the far end of the leg, and a wall strip with a floor
/// notch where the connector crosses the base's outer wall. The whole layout
/// is translated first when the leg would otherwise land at a negative
/// offset.
///
/// # Panics
///
/// Panics when the slot is occupied, the base phase has not run, or the
/// leg's footprint overlaps another leg.
pub fn attach_leg(layout: &mut ManorLayout, side: Side, placement: Placement, leg: Leg) {
    assert!(
        layout.leg(side, placement).is_none(),
        "a leg is already attached at {side:?}/{placement:?}"
    );

    let mut geometry = leg_geometry(layout, side, placement, leg);
    if !geometry.origin.is_valid() {
        let shift = Coordinate::new((-geometry.origin.x()).max(0), (-geometry.origin.y()).max(0));
        layout.translate(shift);
        geometry = leg_geometry(layout, side, placement, leg);
    }

    let footprint = Rect::new(geometry.origin, leg.size());
    for (slot, other) in layout.legs() {
        assert!(
            !footprint.intersects(&other.rect()),
            "leg at {side:?}/{placement:?} overlaps the leg at {slot:?}"
        );
    }

    let rooms = layout.add_rooms(leg.rooms(side), geometry.origin, Some((side, placement)));

    let far_row = geometry.origin.y() + leg.size().y() - 1;
    let (start_row, length, stub_row) = match placement {
        Placement::Bottom => {
            let length = far_row - geometry.main_row;
            (geometry.main_row, length, 0)
        }
        Placement::Top => {
            let length = geometry.main_row - geometry.origin.y();
            (geometry.origin.y() + 1, length, length - 1)
        }
    };
    let mut connector_shape = Shape::filled(Coordinate::new(1, length), FLOOR);
    connector_shape.set(Coordinate::new(0, stub_row), Some(DOORWAY_STUB));
    let connector = layout.add_corridor(
        connector_shape,
        Coordinate::new(geometry.connector_x, start_row),
        Orientation::Vertical,
    );
    layout.add_decoration(
        Shape::from_rows(&["#.#"]),
        Coordinate::new(geometry.connector_x - 1, geometry.boundary_row),
    );

    layout.record_leg(
        side,
        placement,
        LegRecord::new(footprint, leg.rows(), leg.columns(), connector, rooms),
    );
}

/// Reports whether `leg` stays clear of every attached leg and of the
/// narrowest leg the other side could still receive at the same placement.
fn leg_fits(layout: &ManorLayout, side: Side, placement: Placement, leg: Leg) -> bool {
    let geometry = leg_geometry(layout, side, placement, leg);
    let footprint = Rect::new(geometry.origin, leg.size());
    let clear_of_legs = layout
        .legs()
        .all(|(_, other)| !footprint.intersects(&other.rect()));

    let other_side = match side {
        Side::Left => Side::Right,
        Side::Right => Side::Left,
    };
    let clear_of_reserved = layout.leg(other_side, placement).is_some() || {
        let narrow = Leg::new(1, leg.rows());
        let reserved = leg_geometry(layout, other_side, placement, narrow);
        !footprint.intersects(&Rect::new(reserved.origin, narrow.size()))
    };

    clear_of_legs && clear_of_reserved
}

fn leg_geometry(layout: &ManorLayout, side: Side, placement: Placement, leg: Leg) -> LegGeometry {
    let Some(main) = layout.main_corridor() else {
        panic!("legs attach to the main corridor, which has not been built");
    };
    let Some(base) = layout.base() else {
        panic!("legs attach to the base layout, which has not been built");
    };
    let corridor = layout.rect(main);
    let connector_x = match side {
        Side::Left => corridor.origin().x() - 1,
        Side::Right => corridor.stop().x(),
    };
    let (top, boundary_row) = match placement {
        Placement::Bottom => (base.last().y(), base.last().y()),
        Placement::Top => (base.origin().y() - (leg.size().y() - 1), base.origin().y()),
    };
    LegGeometry {
        origin: Coordinate::new(connector_x - leg.connector_column(side), top),
        connector_x,
        main_row: corridor.origin().y(),
        boundary_row,
    }
}

fn room_row(count: usize, compensation: Compensation, top: bool) -> ShapeCollection {
    let heights: Vec<i32> = (0..count)
        .map(|index| {
            if compensation.enlarges(top, index, count) {
                ENLARGED_ROOM_HEIGHT
            } else {
                ROOM_HEIGHT
            }
        })
        .collect();
    let row_height = heights.iter().copied().max().unwrap_or(ROOM_HEIGHT);

    let mut row = ShapeCollection::new();
    for (index, height) in heights.into_iter().enumerate() {
        let mut shape = room_box(height);
        if !top && height < row_height {
            shape = Shape::new(Coordinate::new(ROOM_WIDTH, row_height - height)).stack(&shape, 0);
        }
        if index == 0 {
            let _ = row.push(shape, Coordinate::ZERO);
        } else {
            let _ = row.adjoin_shape(shape, 1);
        }
    }
    row
}

fn room_box(height: i32) -> Shape {
    Shape::bordered(Coordinate::new(ROOM_WIDTH, height), WALL, FLOOR)
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
