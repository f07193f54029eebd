//! The generated manor and its read-mostly query interface.

use manor_core::{Coordinate, Direction, RoomId, Section, Tile};

use crate::{Entry, FeatureGrid, ManorLayout, Pathfinder, RoomProps, Shape};

/// A generated manor: frozen layout, semantic tiles and per-entry metadata.
///
/// Structure never changes once a `Manor` exists. Tiles and metadata may be
/// mutated by later passes and by the game loop.
#[derive(Clone, Debug)]
pub struct Manor {
    layout: ManorLayout,
    features: FeatureGrid,
    props: Vec<RoomProps>,
}

impl Manor {
    /// Freezes `layout` and creates default metadata and an empty tile grid.
    ///
    /// Base rooms are domestic, leg rooms utility. The main corridor is named
    /// "Main Corridor"; other entries are numbered per kind.
    #[must_use]
    pub fn new(layout: ManorLayout) -> Self {
        let features = FeatureGrid::new(layout.size());
        let mut rooms = 0;
        let mut corridors = 0;
        let props = layout
            .entries()
            .map(|(id, entry)| match entry {
                Entry::Room(room) => {
                    rooms += 1;
                    let section = if room.wing().is_some() {
                        Section::Utility
                    } else {
                        Section::Domestic
                    };
                    RoomProps::new(format!("Room {rooms}"), section)
                }
                Entry::Corridor(_) => {
                    corridors += 1;
                    if layout.main_corridor() == Some(id) {
                        RoomProps::new("Main Corridor", Section::Corridor)
                    } else {
                        RoomProps::new(format!("Corridor {corridors}"), Section::Corridor)
                    }
                }
            })
            .collect();

        Self {
            layout,
            features,
            props,
        }
    }

    /// Frozen structural layout.
    #[must_use]
    pub fn layout(&self) -> &ManorLayout {
        &self.layout
    }

    /// Semantic tile grid.
    #[must_use]
    pub fn features(&self) -> &FeatureGrid {
        &self.features
    }

    /// Combined visual canvas of the layout.
    #[must_use]
    pub fn flatten(&self) -> Shape {
        self.layout.flatten()
    }

    /// Size of the manor in cells.
    #[must_use]
    pub fn size(&self) -> Coordinate {
        self.features.size()
    }

    /// Tile at `pos`; [`Tile::Nothing`] outside the manor.
    #[must_use]
    pub fn feature(&self, pos: Coordinate) -> Tile {
        self.features.get(pos)
    }

    /// Overwrites the tile at `pos`; ignored outside the manor.
    pub fn set_feature(&mut self, pos: Coordinate, tile: Tile) {
        self.features.set(pos, tile);
    }

    /// First room whose rectangle contains `pos`.
    #[must_use]
    pub fn room_index(&self, pos: Coordinate) -> Option<RoomId> {
        self.layout.room_index(pos)
    }

    /// Every room whose rectangle contains `pos`.
    #[must_use]
    pub fn room_indices(&self, pos: Coordinate) -> Vec<RoomId> {
        self.layout.room_indices(pos)
    }

    /// First corridor covering `pos`.
    #[must_use]
    pub fn corridor_index(&self, pos: Coordinate) -> Option<RoomId> {
        self.layout.corridor_index(pos)
    }

    /// Every corridor covering `pos`.
    #[must_use]
    pub fn corridor_indices(&self, pos: Coordinate) -> Vec<RoomId> {
        self.layout.corridor_indices(pos)
    }

    /// Metadata of the room or corridor `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown.
    #[must_use]
    pub fn room_props(&self, id: RoomId) -> &RoomProps {
        let Some(props) = self.props.get(id.index()) else {
            panic!("unknown layout entry {id}");
        };
        props
    }

    /// Mutable metadata of the room or corridor `id`.
    ///
    /// # Panics
    ///
    /// Panics when `id` is unknown.
    pub fn room_props_mut(&mut self, id: RoomId) -> &mut RoomProps {
        let Some(props) = self.props.get_mut(id.index()) else {
            panic!("unknown layout entry {id}");
        };
        props
    }

    /// Records a door between `a` and `b` on both sides. Returns false when
    /// the connection was already known.
    pub fn connect(&mut self, a: RoomId, b: RoomId) -> bool {
        let added = self.room_props_mut(a).add_adjoining(b);
        let mirrored = self.room_props_mut(b).add_adjoining(a);
        added || mirrored
    }

    /// Names of the entries reachable through a door from `id`.
    #[must_use]
    pub fn adjoining_names(&self, id: RoomId) -> Vec<&str> {
        self.room_props(id)
            .adjoining()
            .iter()
            .map(|other| self.room_props(*other).name())
            .collect()
    }

    /// Room through which the manor is entered.
    #[must_use]
    pub fn entrance_hall(&self) -> Option<RoomId> {
        self.layout.entrance_hall()
    }

    /// Records the entrance hall.
    pub fn set_entrance_hall(&mut self, id: RoomId) {
        self.layout.set_entrance_hall(id);
    }

    /// Primary horizontal corridor.
    #[must_use]
    pub fn main_corridor(&self) -> Option<RoomId> {
        self.layout.main_corridor()
    }

    /// Reports whether the side of entry `id` facing `direction` looks onto
    /// open ground.
    ///
    /// A side qualifies when it lies on the manor's outer boundary, or when
    /// the two cells just outside its ends, one step in from each corner,
    /// hold nothing.
    #[must_use]
    pub fn side_faces_exterior(&self, id: RoomId, direction: Direction) -> bool {
        let rect = self.layout.rect(id);
        let (first, last) = rect.side_corners(direction);
        let on_boundary = match direction {
            Direction::North => first.y() == 0,
            Direction::South => first.y() == self.size().y() - 1,
            Direction::West => first.x() == 0,
            Direction::East => first.x() == self.size().x() - 1,
        };
        if on_boundary {
            return true;
        }

        let along = direction.tangent();
        let outside_first = first.step(along).step(direction);
        let outside_last = last.step(along.opposite()).step(direction);
        self.feature(outside_first) == Tile::Nothing && self.feature(outside_last) == Tile::Nothing
    }

    /// Shortest walk between two cells over traversable tiles.
    #[must_use]
    pub fn find_path(&self, start: Coordinate, target: Coordinate) -> Option<Vec<Coordinate>> {
        Pathfinder::new(self.size(), |pos| self.features.get(pos).is_traversable())
            .path(start, target)
    }

    /// Shortest walk from `start` into the nearest room accepted by `wanted`.
    ///
    /// The walk ends on the first traversable interior cell of such a room.
    #[must_use]
    pub fn path_to_nearest<P>(
        &self,
        start: Coordinate,
        wanted: P,
    ) -> Option<(RoomId, Vec<Coordinate>)>
    where
        P: Fn(RoomId, &RoomProps) -> bool,
    {
        let accepts = |pos: Coordinate| {
            self.features.get(pos).is_traversable()
                && self
                    .layout
                    .interior_room(pos)
                    .is_some_and(|room| wanted(room, self.room_props(room)))
        };
        let path = Pathfinder::new(self.size(), |pos| self.features.get(pos).is_traversable())
            .path_until(start, accepts)?;
        let room = path.last().and_then(|pos| self.layout.interior_room(*pos))?;
        Some((room, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manor_core::Orientation;

    use crate::ShapeCollection;

    fn room_shape() -> Shape {
        Shape::bordered(Coordinate::new(5, 4), '#', '.')
    }

    /// Two rooms side by side over a corridor, with hand-written tiles.
    fn small_manor() -> Manor {
        let mut layout = ManorLayout::new();
        let row = ShapeCollection::adjoin(room_shape(), room_shape(), 1);
        let _ = layout.add_rooms(row, Coordinate::ZERO, None);
        let corridor = layout.add_corridor(
            Shape::filled(Coordinate::new(7, 1), '.'),
            Coordinate::new(1, 4),
            Orientation::Horizontal,
        );
        layout.set_main_corridor(corridor);

        let mut manor = Manor::new(layout);
        for y in 0..5 {
            for x in 0..9 {
                let pos = Coordinate::new(x, y);
                let interior = (1..4).contains(&x) || (5..8).contains(&x);
                let tile = if (1..3).contains(&y) && interior || y == 4 && (1..8).contains(&x) {
                    Tile::Floor
                } else {
                    Tile::Wall
                };
                manor.set_feature(pos, tile);
            }
        }
        manor.set_feature(Coordinate::new(2, 3), Tile::ClosedDoor);
        manor
    }

    #[test]
    fn default_props_follow_entry_kind() {
        let manor = small_manor();
        assert_eq!(manor.room_props(RoomId::new(0)).name(), "Room 1");
        assert_eq!(
            manor.room_props(RoomId::new(1)).section(),
            Section::Domestic
        );
        assert_eq!(manor.room_props(RoomId::new(2)).name(), "Main Corridor");
        assert_eq!(manor.main_corridor(), Some(RoomId::new(2)));
    }

    #[test]
    fn connect_is_symmetric() {
        let mut manor = small_manor();
        assert!(manor.connect(RoomId::new(0), RoomId::new(2)));
        assert!(!manor.connect(RoomId::new(2), RoomId::new(0)));
        assert_eq!(manor.adjoining_names(RoomId::new(0)), vec!["Main Corridor"]);
        assert_eq!(manor.adjoining_names(RoomId::new(2)), vec!["Room 1"]);
    }

    #[test]
    fn paths_only_cross_traversable_tiles() {
        let manor = small_manor();
        let path = manor
            .find_path(Coordinate::new(1, 1), Coordinate::new(7, 4))
            .expect("door joins the first room to the corridor");
        assert!(path.contains(&Coordinate::new(2, 3)));
        assert!(manor
            .find_path(Coordinate::new(6, 1), Coordinate::new(7, 4))
            .is_none());
    }

    #[test]
    fn nearest_room_query_stops_inside_the_room() {
        let mut manor = small_manor();
        manor.room_props_mut(RoomId::new(0)).set_name("Study");
        let (room, path) = manor
            .path_to_nearest(Coordinate::new(7, 4), |_, props| props.name() == "Study")
            .expect("study is reachable");
        assert_eq!(room, RoomId::new(0));
        assert_eq!(path.last(), Some(&Coordinate::new(2, 2)));
    }

    #[test]
    fn exterior_sides_are_on_the_boundary_or_face_nothing() {
        let mut manor = small_manor();
        assert!(manor.side_faces_exterior(RoomId::new(0), Direction::North));
        assert!(manor.side_faces_exterior(RoomId::new(0), Direction::West));
        assert!(!manor.side_faces_exterior(RoomId::new(0), Direction::East));
        assert!(!manor.side_faces_exterior(RoomId::new(0), Direction::South));
        manor.set_feature(Coordinate::new(1, 4), Tile::Nothing);
        manor.set_feature(Coordinate::new(3, 4), Tile::Nothing);
        assert!(manor.side_faces_exterior(RoomId::new(0), Direction::South));
    }

    #[test]
    fn out_of_range_features_read_as_nothing() {
        let manor = small_manor();
        assert_eq!(manor.feature(Coordinate::new(-3, 0)), Tile::Nothing);
        assert_eq!(
            manor.room_index(Coordinate::new(4, 1)),
            Some(RoomId::new(0))
        );
        assert_eq!(manor.room_indices(Coordinate::new(4, 1)).len(), 2);
    }
}
