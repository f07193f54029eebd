//! Positional bookkeeping for the rooms and corridors of a manor.

use std::collections::BTreeMap;

use manor_core::{Coordinate, Orientation, Placement, Rect, RoomId, Side};

use crate::{Shape, ShapeCollection, ShapeCoord};

/// Rectangular room drawn as a bordered box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    position: usize,
    rect: Rect,
    wing: Option<(Side, Placement)>,
}

impl Room {
    /// Position of the room's shape in the drawing list.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Bounding rectangle, walls included.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Leg slot the room belongs to, or `None` for rooms of the base layout.
    #[must_use]
    pub const fn wing(&self) -> Option<(Side, Placement)> {
        self.wing
    }
}

/// One-cell-thick walkway.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Corridor {
    position: usize,
    rect: Rect,
    orientation: Orientation,
}

impl Corridor {
    /// Position of the corridor's shape in the drawing list.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Cells covered by the corridor.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Long axis of the corridor.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }
}

/// Arena slot: every id names either a room or a corridor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    /// A room.
    Room(Room),
    /// A corridor.
    Corridor(Corridor),
}

impl Entry {
    /// Bounding rectangle of the entry.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        match self {
            Self::Room(room) => room.rect,
            Self::Corridor(corridor) => corridor.rect,
        }
    }

    /// Position of the entry's shape in the drawing list.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::Room(room) => room.position(),
            Self::Corridor(corridor) => corridor.position(),
        }
    }

    fn translate(&mut self, delta: Coordinate) {
        match self {
            Self::Room(room) => room.rect = room.rect.translated(delta),
            Self::Corridor(corridor) => corridor.rect = corridor.rect.translated(delta),
        }
    }
}

/// Bookkeeping for a leg attached to the base layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LegRecord {
    rect: Rect,
    rows: u32,
    columns: u32,
    connector: RoomId,
    rooms: Vec<RoomId>,
}

impl LegRecord {
    /// Describes an attached leg.
    #[must_use]
    pub fn new(rect: Rect, rows: u32, columns: u32, connector: RoomId, rooms: Vec<RoomId>) -> Self {
        Self {
            rect,
            rows,
            columns,
            connector,
            rooms,
        }
    }

    /// Footprint of the leg's rooms and connector.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Rooms per column.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of room columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Corridor joining the leg to the main corridor.
    #[must_use]
    pub const fn connector(&self) -> RoomId {
        self.connector
    }

    /// Rooms making up the leg.
    #[must_use]
    pub fn rooms(&self) -> &[RoomId] {
        &self.rooms
    }
}

/// Shape collection annotated with the rooms and corridors it is made of.
///
/// Rooms, corridors and decorations are drawn in insertion order. Only rooms
/// and corridors receive ids; decorations are visual only. Once feature
/// derivation starts the structure must not change.
#[derive(Clone, Debug, Default)]
pub struct ManorLayout {
    shapes: ShapeCollection,
    entries: Vec<Entry>,
    main_corridor: Option<RoomId>,
    entrance_hall: Option<RoomId>,
    base: Option<Rect>,
    legs: BTreeMap<(Side, Placement), LegRecord>,
}

impl ManorLayout {
    /// Creates an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a base-layout room.
    ///
    /// # Panics
    ///
    /// Panics when the shape defines no glyph or the offset is negative.
    pub fn add_room(&mut self, shape: Shape, offset: Coordinate) -> RoomId {
        self.add_room_in(shape, offset, None)
    }

    /// Appends a room belonging to a leg slot, or to the base when `wing` is
    /// `None`.
    pub fn add_room_in(
        &mut self,
        shape: Shape,
        offset: Coordinate,
        wing: Option<(Side, Placement)>,
    ) -> RoomId {
        let rect = defined_rect(&shape, offset);
        let position = self.shapes.push(shape, offset);
        self.push_entry(Entry::Room(Room {
            position,
            rect,
            wing,
        }))
    }

    /// Appends every shape of `rooms`, shifted by `offset`, as rooms.
    pub fn add_rooms(
        &mut self,
        rooms: ShapeCollection,
        offset: Coordinate,
        wing: Option<(Side, Placement)>,
    ) -> Vec<RoomId> {
        rooms
            .into_iter()
            .map(|entry| {
                let offset = entry.offset() + offset;
                self.add_room_in(entry.shape().clone(), offset, wing)
            })
            .collect()
    }

    /// Appends a corridor.
    ///
    /// # Panics
    ///
    /// Panics when the shape defines no glyph or the offset is negative.
    pub fn add_corridor(
        &mut self,
        shape: Shape,
        offset: Coordinate,
        orientation: Orientation,
    ) -> RoomId {
        let rect = defined_rect(&shape, offset);
        let position = self.shapes.push(shape, offset);
        self.push_entry(Entry::Corridor(Corridor {
            position,
            rect,
            orientation,
        }))
    }

    /// Draws a purely visual shape that receives no id.
    pub fn add_decoration(&mut self, shape: Shape, offset: Coordinate) {
        let _ = self.shapes.push(shape, offset);
    }

    /// Shifts every shape and every recorded rectangle by `delta`.
    ///
    /// # Panics
    ///
    /// Panics when a shape would end up at a negative offset.
    pub fn translate(&mut self, delta: Coordinate) {
        self.shapes.translate(delta);
        for entry in &mut self.entries {
            entry.translate(delta);
        }
        if let Some(base) = self.base.as_mut() {
            *base = base.translated(delta);
        }
        for leg in self.legs.values_mut() {
            leg.rect = leg.rect.translated(delta);
        }
    }

    /// Primary horizontal corridor, once the base layout is built.
    #[must_use]
    pub const fn main_corridor(&self) -> Option<RoomId> {
        self.main_corridor
    }

    /// Records the primary horizontal corridor.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not a corridor.
    pub fn set_main_corridor(&mut self, id: RoomId) {
        assert!(self.is_corridor(id), "main corridor {id} is not a corridor");
        self.main_corridor = Some(id);
    }

    /// Room through which the manor is entered, once chosen.
    #[must_use]
    pub const fn entrance_hall(&self) -> Option<RoomId> {
        self.entrance_hall
    }

    /// Records the entrance hall.
    ///
    /// # Panics
    ///
    /// Panics when `id` is not a room.
    pub fn set_entrance_hall(&mut self, id: RoomId) {
        assert!(self.is_room(id), "entrance hall {id} is not a room");
        self.entrance_hall = Some(id);
    }

    /// Footprint of the base layout, once built.
    #[must_use]
    pub const fn base(&self) -> Option<Rect> {
        self.base
    }

    /// Records the footprint of the base layout.
    pub fn set_base(&mut self, rect: Rect) {
        self.base = Some(rect);
    }

    /// Records a leg attached at `(side, placement)`.
    ///
    /// # Panics
    ///
    /// Panics when the slot is already occupied.
    pub fn record_leg(&mut self, side: Side, placement: Placement, leg: LegRecord) {
        let previous = self.legs.insert((side, placement), leg);
        assert!(
            previous.is_none(),
            "a leg is already attached at {side:?}/{placement:?}"
        );
    }

    /// Leg attached at `(side, placement)`, if any.
    #[must_use]
    pub fn leg(&self, side: Side, placement: Placement) -> Option<&LegRecord> {
        self.legs.get(&(side, placement))
    }

    /// Every attached leg keyed by its slot.
    pub fn legs(&self) -> impl Iterator<Item = (&(Side, Placement), &LegRecord)> {
        self.legs.iter()
    }

    /// Arena entry for `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown.
    #[must_use]
    pub fn entry(&self, id: RoomId) -> &Entry {
        let Some(entry) = self.entries.get(id.index()) else {
            panic!("unknown layout entry {id}");
        };
        entry
    }

    /// Room stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown or names a corridor.
    #[must_use]
    pub fn room(&self, id: RoomId) -> &Room {
        match self.entry(id) {
            Entry::Room(room) => room,
            Entry::Corridor(_) => panic!("entry {id} is a corridor, not a room"),
        }
    }

    /// Corridor stored under `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown or names a room.
    #[must_use]
    pub fn corridor(&self, id: RoomId) -> &Corridor {
        match self.entry(id) {
            Entry::Corridor(corridor) => corridor,
            Entry::Room(_) => panic!("entry {id} is a room, not a corridor"),
        }
    }

    /// Bounding rectangle of the entry stored under `id`.
    #[must_use]
    pub fn rect(&self, id: RoomId) -> Rect {
        self.entry(id).rect()
    }

    /// Shape drawn for the entry stored under `id`, with its current offset.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown.
    #[must_use]
    pub fn shape_of(&self, id: RoomId) -> &ShapeCoord {
        let position = self.entry(id).position();
        let Some(shape) = self.shapes.get(position) else {
            panic!("entry {id} has no shape at position {position}");
        };
        shape
    }

    /// Reports whether `id` names a room.
    #[must_use]
    pub fn is_room(&self, id: RoomId) -> bool {
        matches!(self.entries.get(id.index()), Some(Entry::Room(_)))
    }

    /// Reports whether `id` names a corridor.
    #[must_use]
    pub fn is_corridor(&self, id: RoomId) -> bool {
        matches!(self.entries.get(id.index()), Some(Entry::Corridor(_)))
    }

    /// Number of rooms and corridors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the layout holds no rooms or corridors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every id with its entry, in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (RoomId, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (to_id(index), entry))
    }

    /// Ids of every room, in insertion order.
    #[must_use]
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.entries()
            .filter(|(_, entry)| matches!(entry, Entry::Room(_)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of every corridor, in insertion order.
    #[must_use]
    pub fn corridor_ids(&self) -> Vec<RoomId> {
        self.entries()
            .filter(|(_, entry)| matches!(entry, Entry::Corridor(_)))
            .map(|(id, _)| id)
            .collect()
    }

    /// Every room whose rectangle contains `pos`. Shared walls belong to
    /// more than one room.
    #[must_use]
    pub fn room_indices(&self, pos: Coordinate) -> Vec<RoomId> {
        self.entries()
            .filter(|(_, entry)| matches!(entry, Entry::Room(room) if room.rect.contains(pos)))
            .map(|(id, _)| id)
            .collect()
    }

    /// First room whose rectangle contains `pos`.
    #[must_use]
    pub fn room_index(&self, pos: Coordinate) -> Option<RoomId> {
        self.room_indices(pos).first().copied()
    }

    /// The room whose interior holds `pos`, when exactly one does.
    #[must_use]
    pub fn interior_room(&self, pos: Coordinate) -> Option<RoomId> {
        let mut rooms = self
            .entries()
            .filter(|(_, entry)| {
                matches!(entry, Entry::Room(room) if room.rect.interior_contains(pos))
            })
            .map(|(id, _)| id);
        let first = rooms.next()?;
        rooms.next().is_none().then_some(first)
    }

    /// Every corridor covering `pos`.
    #[must_use]
    pub fn corridor_indices(&self, pos: Coordinate) -> Vec<RoomId> {
        self.entries()
            .filter(|(_, entry)| {
                matches!(entry, Entry::Corridor(corridor) if corridor.rect.contains(pos))
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// First corridor covering `pos`.
    #[must_use]
    pub fn corridor_index(&self, pos: Coordinate) -> Option<RoomId> {
        self.corridor_indices(pos).first().copied()
    }

    /// Size of the flattened canvas.
    #[must_use]
    pub fn size(&self) -> Coordinate {
        self.shapes.size()
    }

    /// Underlying drawing list.
    #[must_use]
    pub fn shapes(&self) -> &ShapeCollection {
        &self.shapes
    }

    /// Combined visual canvas.
    #[must_use]
    pub fn flatten(&self) -> Shape {
        self.shapes.flatten()
    }

    fn push_entry(&mut self, entry: Entry) -> RoomId {
        self.entries.push(entry);
        to_id(self.entries.len() - 1)
    }
}

fn defined_rect(shape: &Shape, offset: Coordinate) -> Rect {
    let Some((start, stop)) = shape.defined_bounds() else {
        panic!("layout entries must define at least one glyph");
    };
    Rect::new(offset + start, stop - start)
}

fn to_id(index: usize) -> RoomId {
    RoomId::new(u32::try_from(index).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_shape() -> Shape {
        Shape::bordered(Coordinate::new(12, 7), '#', '.')
    }

    fn two_rooms() -> ManorLayout {
        let mut layout = ManorLayout::new();
        let row = ShapeCollection::adjoin(room_shape(), room_shape(), 1);
        let _ = layout.add_rooms(row, Coordinate::ZERO, None);
        let corridor = layout.add_corridor(
            Shape::filled(Coordinate::new(5, 1), '.'),
            Coordinate::new(3, 7),
            Orientation::Horizontal,
        );
        layout.set_main_corridor(corridor);
        layout
    }

    #[test]
    fn ids_are_tagged_by_kind() {
        let layout = two_rooms();
        assert_eq!(layout.room_ids(), vec![RoomId::new(0), RoomId::new(1)]);
        assert_eq!(layout.corridor_ids(), vec![RoomId::new(2)]);
        assert!(layout.is_room(RoomId::new(1)));
        assert!(layout.is_corridor(RoomId::new(2)));
        assert!(!layout.is_room(RoomId::new(9)));
    }

    #[test]
    fn shared_wall_reports_both_rooms() {
        let layout = two_rooms();
        assert_eq!(
            layout.room_indices(Coordinate::new(11, 3)),
            vec![RoomId::new(0), RoomId::new(1)]
        );
        assert_eq!(
            layout.room_index(Coordinate::new(5, 3)),
            Some(RoomId::new(0))
        );
        assert_eq!(
            layout.corridor_index(Coordinate::new(4, 7)),
            Some(RoomId::new(2))
        );
        assert_eq!(layout.corridor_index(Coordinate::new(4, 6)), None);
    }

    #[test]
    fn padded_shapes_use_their_defined_bounds() {
        let mut layout = ManorLayout::new();
        let padded = Shape::new(Coordinate::new(12, 2)).stack(&room_shape(), 0);
        let id = layout.add_room(padded, Coordinate::new(4, 1));
        assert_eq!(
            layout.rect(id),
            Rect::new(Coordinate::new(4, 3), Coordinate::new(12, 7))
        );
    }

    #[test]
    fn shapes_follow_their_entries() {
        let mut layout = two_rooms();
        let right = layout.shape_of(RoomId::new(1));
        assert_eq!(right.offset(), layout.rect(RoomId::new(1)).origin());
        assert_eq!(right.shape().size(), Coordinate::new(12, 7));
        assert_eq!(layout.entry(RoomId::new(2)).position(), 2);

        layout.translate(Coordinate::new(3, 0));
        for (id, entry) in layout.entries() {
            let drawn = layout.shape_of(id);
            assert_eq!(drawn.offset(), entry.rect().origin(), "{id} drifted");
            assert_eq!(drawn.stop(), entry.rect().stop(), "{id} drifted");
        }
    }

    #[test]
    fn padded_shape_offset_differs_from_its_rect() {
        let mut layout = ManorLayout::new();
        let padded = Shape::new(Coordinate::new(12, 2)).stack(&room_shape(), 0);
        let id = layout.add_room(padded, Coordinate::new(4, 1));
        assert_eq!(layout.shape_of(id).offset(), Coordinate::new(4, 1));
        assert_eq!(layout.rect(id).origin(), Coordinate::new(4, 3));
    }

    #[test]
    fn translate_moves_rects_and_legs() {
        let mut layout = two_rooms();
        layout.set_base(Rect::new(Coordinate::ZERO, Coordinate::new(23, 8)));
        layout.record_leg(
            Side::Left,
            Placement::Bottom,
            LegRecord::new(
                Rect::new(Coordinate::new(0, 7), Coordinate::new(13, 7)),
                1,
                1,
                RoomId::new(2),
                Vec::new(),
            ),
        );
        layout.translate(Coordinate::new(1, 2));
        assert_eq!(layout.rect(RoomId::new(0)).origin(), Coordinate::new(1, 2));
        assert_eq!(
            layout.base().map(|rect| rect.origin()),
            Some(Coordinate::new(1, 2))
        );
        assert_eq!(
            layout
                .leg(Side::Left, Placement::Bottom)
                .map(|leg| leg.rect().origin()),
            Some(Coordinate::new(1, 9))
        );
        assert_eq!(layout.size(), Coordinate::new(24, 10));
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn occupied_leg_slot_is_rejected() {
        let mut layout = two_rooms();
        let leg = LegRecord::new(
            Rect::new(Coordinate::ZERO, Coordinate::new(1, 1)),
            1,
            1,
            RoomId::new(2),
            Vec::new(),
        );
        layout.record_leg(Side::Right, Placement::Top, leg.clone());
        layout.record_leg(Side::Right, Placement::Top, leg);
    }

    #[test]
    #[should_panic(expected = "is a room, not a corridor")]
    fn room_id_is_not_a_corridor() {
        let _ = two_rooms().corridor(RoomId::new(0));
    }

    #[test]
    fn flatten_draws_rooms_and_corridors() {
        let canvas = two_rooms().flatten();
        assert_eq!(canvas.size(), Coordinate::new(23, 8));
        assert_eq!(canvas.get(Coordinate::new(11, 3)), Some('#'));
        assert_eq!(canvas.get(Coordinate::new(7, 7)), Some('.'));
        assert_eq!(canvas.get(Coordinate::new(0, 7)), None);
    }
}
