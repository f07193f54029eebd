use std::collections::{HashSet, VecDeque};

use manor_core::{
    Coordinate, Direction, GenerationContext, LayoutKind, RoomId, Tile, ROOM_HEIGHT, ROOM_WIDTH,
};
use manor_system_features::derive_features;
use manor_system_generation::{generate, ManorGenerator};
use manor_system_layout::LayoutBuilder;
use manor_world::{FeatureGrid, Manor};
use proptest::prelude::*;

fn kinds() -> impl Strategy<Value = LayoutKind> {
    prop::sample::select(vec![
        LayoutKind::Base,
        LayoutKind::L,
        LayoutKind::U,
        LayoutKind::H,
        LayoutKind::Random,
    ])
}

fn reachable(features: &FeatureGrid, start: Coordinate) -> HashSet<Coordinate> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for direction in Direction::ALL {
            let next = cell.step(direction);
            if features.get(next).is_traversable() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn first_floor(manor: &Manor, id: RoomId) -> Option<Coordinate> {
    let rect = manor.layout().rect(id);
    let is_room = manor.layout().is_room(id);
    (rect.origin().y()..rect.stop().y())
        .flat_map(|y| (rect.origin().x()..rect.stop().x()).map(move |x| Coordinate::new(x, y)))
        .filter(|cell| !is_room || rect.interior_contains(*cell))
        .find(|cell| manor.feature(*cell) == Tile::Floor)
}

fn covered(manor: &Manor) -> Vec<Coordinate> {
    let mut cells = Vec::new();
    for (_, entry) in manor.layout().entries() {
        let rect = entry.rect();
        for y in rect.origin().y()..rect.stop().y() {
            for x in rect.origin().x()..rect.stop().x() {
                cells.push(Coordinate::new(x, y));
            }
        }
    }
    cells
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_room_is_reachable_from_the_main_corridor(seed in any::<u64>(), kind in kinds()) {
        let manor = generate(kind, seed);
        let main = manor.main_corridor().expect("every layout has a main corridor");
        let seen = reachable(manor.features(), manor.layout().rect(main).origin());

        for (id, _) in manor.layout().entries() {
            let floor = first_floor(&manor, id).expect("every entry keeps floor");
            prop_assert!(seen.contains(&floor), "{} of a {} manor is unreachable", id, kind);
        }
    }

    #[test]
    fn doors_are_recorded_on_both_sides(seed in any::<u64>(), kind in kinds()) {
        let manor = generate(kind, seed);
        for (id, _) in manor.layout().entries() {
            for other in manor.room_props(id).adjoining() {
                prop_assert!(
                    manor.room_props(*other).adjoins(id),
                    "{} lists {} but not the other way round", id, other
                );
            }
        }
    }

    #[test]
    fn openings_only_replace_walls(seed in any::<u64>(), kind in kinds()) {
        let mut ctx = GenerationContext::new(seed);
        let mut bare = Manor::new(LayoutBuilder::default().build(kind, &mut ctx));
        derive_features(&mut bare);
        for cell in covered(&bare) {
            let tile = bare.feature(cell);
            prop_assert!(matches!(tile, Tile::Wall | Tile::Floor), "{} holds {:?}", cell, tile);
        }

        let manor = generate(kind, seed);
        prop_assert_eq!(manor.size(), bare.size());
        for (cell, tile) in manor.features().iter() {
            let before = bare.feature(cell);
            if tile == before {
                continue;
            }
            prop_assert!(tile.is_door() || tile.is_window(), "{} became {:?}", cell, tile);
            prop_assert_eq!(before, Tile::Wall, "opening at {} replaced {:?}", cell, before);
        }
    }

    #[test]
    fn furnishing_leaves_index_queries_unchanged(seed in any::<u64>(), kind in kinds()) {
        let generator = ManorGenerator::default();
        let mut manor = generator.generate(kind, seed);
        let cells: Vec<Coordinate> = manor.features().iter().map(|(cell, _)| cell).collect();
        let before: Vec<_> = cells
            .iter()
            .map(|cell| (manor.room_index(*cell), manor.corridor_index(*cell)))
            .collect();

        let _ = generator.furnish(&mut manor, &mut GenerationContext::new(seed ^ 1));

        for (cell, expected) in cells.iter().zip(before) {
            prop_assert_eq!((manor.room_index(*cell), manor.corridor_index(*cell)), expected);
        }
    }
}

#[test]
fn base_layout_spans_its_rooms_and_the_corridor_spans_the_middle() {
    for seed in 0..16 {
        let manor = generate(LayoutKind::Base, seed);
        let layout = manor.layout();
        let width = layout.size().x();
        let rooms = i32::try_from(layout.room_ids().len()).expect("few rooms");
        let per_row = rooms / 2;

        assert_eq!(width, per_row * ROOM_WIDTH - (per_row - 1), "seed {seed}");
        assert_eq!(layout.size().y(), 2 * ROOM_HEIGHT + 1, "seed {seed}");

        let main = layout.rect(manor.main_corridor().expect("main corridor"));
        assert_eq!(main.origin(), Coordinate::new(ROOM_WIDTH, ROOM_HEIGHT));
        assert_eq!(main.size(), Coordinate::new(width - 2 * ROOM_WIDTH, 1));
        assert_eq!(layout.corridor_ids().len(), 1);
    }
}

#[test]
fn same_seed_same_manor() {
    for kind in [LayoutKind::Base, LayoutKind::H, LayoutKind::Random] {
        let first = generate(kind, 42);
        let second = generate(kind, 42);
        assert_eq!(
            first.features(),
            second.features(),
            "{kind} differs between runs"
        );
        assert_eq!(first.entrance_hall(), second.entrance_hall());
        assert_eq!(first.flatten().to_string(), second.flatten().to_string());
    }
}

#[test]
fn furniture_never_cuts_off_a_room() {
    let generator = ManorGenerator::default();
    for seed in 0..6 {
        let mut manor = generator.generate(LayoutKind::H, seed);
        let _ = generator.furnish(&mut manor, &mut GenerationContext::new(seed + 100));

        let main = manor.main_corridor().expect("main corridor");
        let seen = reachable(manor.features(), manor.layout().rect(main).origin());
        for room in manor.layout().room_ids() {
            let rect = manor.layout().rect(room);
            for (cell, tile) in manor.features().iter() {
                if rect.interior_contains(cell) && tile.is_traversable() {
                    assert!(
                        seen.contains(&cell),
                        "seed {seed}: {cell} in {room} is cut off"
                    );
                }
            }
        }
    }
}
